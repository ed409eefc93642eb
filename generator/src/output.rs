//! Output formatting for declarations and reports.
//!
//! The declaration printer renders TypeScript declaration text. Output is a
//! pure function of the declaration list, so identical inputs print
//! byte-identical text.

use std::sync::LazyLock;

use api_decl_core::{Declaration, Member, Param, TupleElement, TypeNode};
use regex::Regex;
use serde::Serialize;

use crate::report::{GenerationReport, report_to_text};

const INDENT: &str = "    ";

static IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("static regex must compile")
});

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// TypeScript declaration text (plain text for reports).
    Declarations,
    Json,
    Yaml,
}

/// Formats declarations in the requested output format.
pub fn format_declarations(decls: &[Declaration], format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Declarations => Ok(print_declarations(decls)),
        OutputFormat::Json => serde_json::to_string_pretty(decls)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => to_yaml(&decls),
    }
}

/// Formats a generation report in the requested output format.
pub fn format_report(report: &GenerationReport, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Declarations => Ok(report_to_text(report)),
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => to_yaml(report),
    }
}

/// YAML with enums written as single-key maps, the form override files use.
fn to_yaml<T: Serialize>(value: &T) -> Result<String, String> {
    let mut buf = Vec::new();
    {
        let mut ser = serde_yaml::Serializer::new(&mut buf);
        serde_yaml::with::singleton_map_recursive::serialize(value, &mut ser)
            .map_err(|e| format!("YAML serialization failed: {e}"))?;
    }
    String::from_utf8(buf).map_err(|e| format!("YAML serialization failed: {e}"))
}

/// Prints declarations as TypeScript declaration text, one blank line
/// between top-level declarations.
///
/// ```
/// use api_decl_core::{Declaration, Keyword, TypeNode};
/// use api_decl_gen::print_declarations;
///
/// let decls = vec![
///     Declaration::alias("uint", TypeNode::Keyword(Keyword::Number)),
///     Declaration::alias("float", TypeNode::Keyword(Keyword::Number)),
/// ];
/// assert_eq!(print_declarations(&decls), "type uint = number\n\ntype float = number\n");
/// ```
pub fn print_declarations(decls: &[Declaration]) -> String {
    let mut printer = Printer::default();
    for (idx, decl) in decls.iter().enumerate() {
        if idx > 0 {
            printer.out.push('\n');
        }
        printer.declaration(decl, true);
    }
    printer.out
}

#[derive(Default)]
struct Printer {
    out: String,
    depth: usize,
}

impl Printer {
    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn doc(&mut self, doc: Option<&str>) {
        let Some(doc) = doc.filter(|d| !d.trim().is_empty()) else {
            return;
        };
        let doc = doc.replace("*/", "*\\/");
        let lines: Vec<&str> = doc.lines().collect();
        if let [single] = lines.as_slice() {
            self.line(&format!("/** {single} */"));
            return;
        }
        self.line("/**");
        for line in lines {
            if line.is_empty() {
                self.line(" *");
            } else {
                self.line(&format!(" * {line}"));
            }
        }
        self.line(" */");
    }

    fn declaration(&mut self, decl: &Declaration, top_level: bool) {
        let declare = if top_level { "declare " } else { "" };
        self.doc(decl.doc());
        match decl {
            Declaration::Interface(iface) => {
                let mut head = format!("interface {}", iface.name);
                if !iface.extends.is_empty() {
                    head.push_str(" extends ");
                    head.push_str(&join(&iface.extends, ", ", print_type));
                }
                if iface.members.is_empty() {
                    self.line(&format!("{head} {{}}"));
                    return;
                }
                self.line(&format!("{head} {{"));
                self.depth += 1;
                for member in &iface.members {
                    self.doc(member.doc());
                    self.line(&format!("{};", print_member(member)));
                }
                self.depth -= 1;
                self.line("}");
            }
            Declaration::TypeAlias(alias) => {
                self.line(&format!("type {} = {}", alias.name, print_type(&alias.ty)));
            }
            Declaration::Namespace(ns) => {
                if ns.body.is_empty() {
                    self.line(&format!("{declare}namespace {} {{}}", ns.name));
                    return;
                }
                self.line(&format!("{declare}namespace {} {{", ns.name));
                self.depth += 1;
                for child in &ns.body {
                    self.declaration(child, false);
                }
                self.depth -= 1;
                self.line("}");
            }
            Declaration::Enum(en) => {
                self.line(&format!("{declare}enum {} {{", en.name));
                self.depth += 1;
                for member in &en.members {
                    self.doc(member.doc.as_deref());
                    self.line(&format!("{} = {},", property_name(&member.name), member.value));
                }
                self.depth -= 1;
                self.line("}");
            }
            Declaration::Const(c) => {
                self.line(&format!("{declare}const {}: {}", c.name, print_type(&c.ty)));
            }
        }
    }
}

fn join<T>(items: &[T], sep: &str, f: impl Fn(&T) -> String) -> String {
    items.iter().map(f).collect::<Vec<_>>().join(sep)
}

/// Prints a type expression.
///
/// ```
/// use api_decl_core::{Keyword, TypeNode};
/// use api_decl_gen::print_type;
///
/// let ty = TypeNode::Array(Box::new(TypeNode::Union(vec![
///     TypeNode::reference("LuaEntity"),
///     TypeNode::StringLiteral("none".into()),
/// ])));
/// assert_eq!(print_type(&ty), "(LuaEntity | \"none\")[]");
/// ```
pub fn print_type(ty: &TypeNode) -> String {
    match ty {
        TypeNode::Keyword(keyword) => keyword.as_str().to_string(),
        TypeNode::Reference { name, args } => {
            if args.is_empty() {
                name.clone()
            } else {
                format!("{name}<{}>", join(args, ", ", print_type))
            }
        }
        TypeNode::StringLiteral(value) => quote(value),
        TypeNode::NumberLiteral(value) => value.to_string(),
        TypeNode::Array(inner) => {
            let inner_text = print_type(inner);
            match inner.as_ref() {
                TypeNode::Union(_) | TypeNode::Intersection(_) | TypeNode::Function { .. } => {
                    format!("({inner_text})[]")
                }
                _ => format!("{inner_text}[]"),
            }
        }
        TypeNode::Tuple(elements) => format!("[{}]", join(elements, ", ", print_tuple_element)),
        TypeNode::Union(options) => {
            if options.is_empty() {
                "never".to_string()
            } else {
                join(options, " | ", |option| match option {
                    TypeNode::Function { .. } => format!("({})", print_type(option)),
                    _ => print_type(option),
                })
            }
        }
        TypeNode::Intersection(parts) => join(parts, " & ", |part| match part {
            TypeNode::Union(_) | TypeNode::Function { .. } => format!("({})", print_type(part)),
            _ => print_type(part),
        }),
        TypeNode::Function { params, ret } => format!(
            "({}) => {}",
            join(params, ", ", print_param),
            print_return(ret.as_deref())
        ),
        TypeNode::Literal(members) => {
            if members.is_empty() {
                "{}".to_string()
            } else {
                format!("{{ {} }}", join(members, "; ", print_member))
            }
        }
    }
}

fn print_return(ret: Option<&TypeNode>) -> String {
    ret.map(print_type).unwrap_or_else(|| "void".to_string())
}

fn print_param(param: &Param) -> String {
    let rest = if param.rest { "..." } else { "" };
    let optional = if param.optional { "?" } else { "" };
    format!("{rest}{}{optional}: {}", param.name, print_type(&param.ty))
}

fn print_tuple_element(element: &TupleElement) -> String {
    let optional = if element.optional { "?" } else { "" };
    if element.name.is_empty() {
        format!("{}{optional}", print_type(&element.ty))
    } else {
        format!("{}{optional}: {}", element.name, print_type(&element.ty))
    }
}

/// Prints one member without its documentation or trailing separator.
pub fn print_member(member: &Member) -> String {
    match member {
        Member::Property(p) => {
            let readonly = if p.readonly { "readonly " } else { "" };
            let optional = if p.optional { "?" } else { "" };
            format!(
                "{readonly}{}{optional}: {}",
                property_name(&p.name),
                print_type(&p.ty)
            )
        }
        Member::Setter(s) => format!("set {}({})", property_name(&s.name), print_param(&s.param)),
        Member::Method(m) => format!(
            "{}({}): {}",
            property_name(&m.name),
            join(&m.params, ", ", print_param),
            print_return(m.ret.as_ref())
        ),
        Member::Call(c) => format!(
            "({}): {}",
            join(&c.params, ", ", print_param),
            print_return(c.ret.as_ref())
        ),
        Member::Index(i) => {
            let readonly = if i.readonly { "readonly " } else { "" };
            format!(
                "{readonly}[{}: {}]: {}",
                i.key_name,
                print_type(&i.key),
                print_type(&i.value)
            )
        }
    }
}

fn is_identifier(name: &str) -> bool {
    IDENTIFIER_RE.is_match(name)
}

fn property_name(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        quote(name)
    }
}

fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use api_decl_core::{
        CallSig, EnumDecl, EnumMember, IndexSig, InterfaceDecl, Keyword, MethodSig,
        NamespaceDecl, PropertySig, SetterSig,
    };

    use super::*;

    fn number() -> TypeNode {
        TypeNode::Keyword(Keyword::Number)
    }

    #[test]
    fn test_print_interface_members() {
        let mut iface = InterfaceDecl::new("LuaEntity");
        iface.extends = vec![TypeNode::reference("LuaControl"), TypeNode::reference("LuaObjectBase")];
        iface.doc = Some("An entity.\n\n@see https://example.com/LuaEntity.html".into());
        iface.members = vec![
            Member::Property(PropertySig {
                name: "name".into(),
                ty: TypeNode::Keyword(Keyword::String),
                optional: false,
                readonly: true,
                doc: Some("Name of the entity.".into()),
            }),
            Member::Setter(SetterSig {
                name: "speed".into(),
                param: Param::new("value", number()),
                doc: None,
            }),
            Member::Method(MethodSig {
                name: "get_inventory".into(),
                params: vec![Param::new("index", TypeNode::reference("defines.inventory"))],
                ret: Some(TypeNode::reference("LuaInventory").or_undefined()),
                doc: None,
            }),
            Member::Call(CallSig {
                params: vec![Param {
                    name: "args".into(),
                    ty: TypeNode::Array(Box::new(TypeNode::Keyword(Keyword::Any))),
                    optional: false,
                    rest: true,
                }],
                ret: None,
                doc: None,
            }),
            Member::property("item-name", number()),
        ];

        let text = print_declarations(&[Declaration::Interface(iface)]);
        let expected = "\
/**
 * An entity.
 *
 * @see https://example.com/LuaEntity.html
 */
interface LuaEntity extends LuaControl, LuaObjectBase {
    /** Name of the entity. */
    readonly name: string;
    set speed(value: number);
    get_inventory(index: defines.inventory): LuaInventory | undefined;
    (...args: any[]): void;
    \"item-name\": number;
}
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_print_constants_tree() {
        let tree = Declaration::Namespace(NamespaceDecl {
            name: "defines".into(),
            body: vec![Declaration::Enum(EnumDecl {
                name: "direction".into(),
                members: vec![
                    EnumMember {
                        name: "north".into(),
                        value: 0,
                        doc: None,
                    },
                    EnumMember {
                        name: "east".into(),
                        value: 1,
                        doc: None,
                    },
                ],
                doc: None,
            })],
            doc: None,
        });
        assert_eq!(
            print_declarations(&[tree]),
            "declare namespace defines {\n    enum direction {\n        north = 0,\n        east = 1,\n    }\n}\n"
        );
    }

    #[test]
    fn test_print_composite_types() {
        let tuple = TypeNode::Tuple(vec![
            TupleElement {
                name: "x".into(),
                ty: number(),
                optional: false,
            },
            TupleElement {
                name: "y".into(),
                ty: number(),
                optional: true,
            },
        ]);
        assert_eq!(print_type(&tuple), "[x: number, y?: number]");

        let literal = TypeNode::Literal(vec![Member::Index(IndexSig {
            key_name: "index".into(),
            key: number(),
            value: TypeNode::reference("LuaItemStack"),
            readonly: true,
        })]);
        assert_eq!(print_type(&literal), "{ readonly [index: number]: LuaItemStack }");

        let func = TypeNode::Function {
            params: vec![Param::new("arg1", TypeNode::reference("EventData"))],
            ret: None,
        };
        assert_eq!(
            print_type(&TypeNode::Union(vec![func, TypeNode::Keyword(Keyword::Undefined)])),
            "((arg1: EventData) => void) | undefined"
        );

        let both = TypeNode::Intersection(vec![
            TypeNode::reference("A"),
            TypeNode::Union(vec![TypeNode::reference("B"), TypeNode::reference("C")]),
        ]);
        assert_eq!(print_type(&both), "A & (B | C)");
        assert_eq!(print_type(&TypeNode::Union(Vec::new())), "never");
        assert_eq!(print_type(&TypeNode::StringLiteral("a\"b".into())), "\"a\\\"b\"");
    }

    #[test]
    fn test_json_format_roundtrips() {
        let decls = vec![Declaration::alias("uint", number())];
        let json = format_declarations(&decls, OutputFormat::Json).unwrap();
        let back: Vec<Declaration> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, decls);
    }

    #[test]
    fn test_yaml_format_uses_map_form() {
        let decls = vec![Declaration::alias(
            "Position",
            TypeNode::generic("Record", vec![TypeNode::Keyword(Keyword::String), number()]),
        )];
        let yaml = format_declarations(&decls, OutputFormat::Yaml).unwrap();
        assert!(!yaml.contains('!'), "{yaml}");
        assert!(yaml.contains("reference:"), "{yaml}");

        let back: Vec<Declaration> = serde_yaml::with::singleton_map_recursive::deserialize(
            serde_yaml::Deserializer::from_str(&yaml),
        )
        .unwrap();
        assert_eq!(back, decls);
    }

    #[test]
    fn test_doc_terminator_is_escaped() {
        let decl = Declaration::alias("X", number()).with_doc(Some("ends */ early".into()));
        assert_eq!(
            print_declarations(&[decl]),
            "/** ends *\\/ early */\ntype X = number\n"
        );
    }
}
