//! Concepts.
//!
//! | Category         | Output                                              |
//! |------------------|-----------------------------------------------------|
//! | `concept`        | the override as written, else `any` + advisory      |
//! | `union`          | union of the mapped options                         |
//! | `struct`         | interface over the attributes                       |
//! | `flag`           | interface of optional booleans, one per option      |
//! | `table`/`filter` | interface over the parameters, or variant expansion |
//! | `enum`           | union of string literals                            |
//! | `table_or_array` | union of a type literal and a tuple                 |
//!
//! Interface-shaped categories accept a structural override (merged) or a
//! type alias override (used as written). Alias-shaped categories accept only
//! a type alias override.

use api_decl_core::{
    Concept, ConceptKind, Declaration, InterfaceDecl, Keyword, Member, MemberShape, NamedOption,
    Parameter, PropertySig, TupleElement, TypeNode, UnionOption, sorted_by_order,
};
use api_decl_store::{ManualOverride, OverrideKind};
use tracing::debug;

use super::{entity_doc, verbatim};
use crate::context::{GenContext, Session};
use crate::diagnostics::{Advisory, Diagnostics};
use crate::error::Result;
use crate::links::{DocLinkResolver, DocSource};
use crate::merge::{
    append_unconsumed, find_override, merge_attribute, merge_member, merge_parameters,
};
use crate::text::quoted_literals;
use crate::types::map_type;
use crate::variants::{VariantShape, expand_variants};

pub fn synthesize(ctx: &GenContext, session: &mut Session) -> Result<Vec<Declaration>> {
    let mut out = Vec::new();
    for concept in sorted_by_order(&ctx.schema.concepts) {
        let decls = synthesize_concept(ctx, session, concept)?;
        debug!(
            concept = %concept.name,
            category = concept.kind.category(),
            declarations = decls.len(),
            "synthesized concept"
        );
        out.extend(decls);
    }
    Ok(out)
}

fn synthesize_concept(
    ctx: &GenContext,
    session: &mut Session,
    concept: &Concept,
) -> Result<Vec<Declaration>> {
    let name = concept.name.as_str();
    let doc = entity_doc(
        ctx,
        &mut session.diagnostics,
        name,
        &concept.description,
        &concept.notes,
        &concept.examples,
    )?;

    match &concept.kind {
        ConceptKind::Concept => {
            let ovr = find_override(
                ctx,
                &mut session.consumed,
                name,
                &[OverrideKind::StructuralType, OverrideKind::TypeAlias],
            )?;
            match ovr {
                Some(ovr) => Ok(vec![verbatim(ovr, doc)]),
                None => {
                    session
                        .diagnostics
                        .record(Advisory::MissingConceptDefinition {
                            name: name.to_string(),
                        });
                    Ok(vec![
                        Declaration::alias(name, TypeNode::Keyword(Keyword::Any)).with_doc(doc),
                    ])
                }
            }
        }
        ConceptKind::Union { options } => alias_concept(ctx, session, name, doc, |diag| {
            union_options(ctx, diag, name, options)
        }),
        ConceptKind::Enum { options } => {
            alias_concept(ctx, session, name, doc, |_| Ok(enum_options(options)))
        }
        ConceptKind::TableOrArray { parameters } => {
            alias_concept(ctx, session, name, doc, |diag| {
                table_or_array(ctx, diag, name, parameters)
            })
        }
        ConceptKind::Struct { attributes } => {
            structural_concept(ctx, session, name, doc, |session, ovr| {
                sorted_by_order(attributes)
                    .into_iter()
                    .map(|attr| merge_attribute(ctx, session, name, ovr, attr))
                    .collect()
            })
        }
        ConceptKind::Flag { options } => {
            structural_concept(ctx, session, name, doc, |session, ovr| {
                flag_members(ctx, session, name, ovr, options)
            })
        }
        ConceptKind::Table(shape) | ConceptKind::Filter(shape) => {
            if shape.variant_parameter_groups.is_empty() {
                return structural_concept(ctx, session, name, doc, |session, ovr| {
                    merge_parameters(ctx, session, name, ovr, &shape.parameters)
                });
            }
            if let Some(ovr) =
                find_override(ctx, &mut session.consumed, name, &[OverrideKind::TypeAlias])?
            {
                return Ok(vec![verbatim(ovr, doc)]);
            }
            let description = shape
                .variant_parameter_description
                .as_deref()
                .unwrap_or(&concept.description);
            expand_variants(
                ctx,
                &mut session.diagnostics,
                VariantShape {
                    name,
                    parameters: &shape.parameters,
                    groups: &shape.variant_parameter_groups,
                    description: Some(description),
                },
                doc,
            )
        }
    }
}

/// A concept that becomes a type alias.
fn alias_concept(
    ctx: &GenContext,
    session: &mut Session,
    name: &str,
    doc: Option<String>,
    build: impl FnOnce(&mut Diagnostics) -> Result<TypeNode>,
) -> Result<Vec<Declaration>> {
    if let Some(ovr) = find_override(ctx, &mut session.consumed, name, &[OverrideKind::TypeAlias])?
    {
        return Ok(vec![verbatim(ovr, doc)]);
    }
    let ty = build(&mut session.diagnostics)?;
    Ok(vec![Declaration::alias(name, ty).with_doc(doc)])
}

/// A concept that becomes an interface, merged with a structural override.
fn structural_concept(
    ctx: &GenContext,
    session: &mut Session,
    name: &str,
    doc: Option<String>,
    build: impl FnOnce(&mut Session, Option<&ManualOverride>) -> Result<Vec<Member>>,
) -> Result<Vec<Declaration>> {
    let ovr = find_override(
        ctx,
        &mut session.consumed,
        name,
        &[OverrideKind::StructuralType, OverrideKind::TypeAlias],
    )?;
    if let Some(ovr) = ovr.filter(|o| o.kind() == OverrideKind::TypeAlias) {
        return Ok(vec![verbatim(ovr, doc)]);
    }

    let mut iface = InterfaceDecl::new(name);
    iface.members = build(session, ovr)?;
    append_unconsumed(name, ovr, &session.consumed, &mut iface.members);
    if let Some(ovr) = ovr {
        iface.extends = ovr.supertypes().to_vec();
    }
    iface.doc = doc;
    Ok(vec![Declaration::Interface(iface)])
}

/// Union options. A `string` option whose description quotes tokens becomes
/// one string literal per token.
fn union_options(
    ctx: &GenContext,
    diag: &mut Diagnostics,
    name: &str,
    options: &[UnionOption],
) -> Result<TypeNode> {
    let mut nodes = Vec::with_capacity(options.len());
    for option in sorted_by_order(options) {
        if option.ty.as_name() == Some("string") {
            let literals = quoted_literals(&option.description);
            if !literals.is_empty() {
                nodes.extend(literals.into_iter().map(TypeNode::StringLiteral));
                continue;
            }
        }
        nodes.push(map_type(ctx, diag, name, &option.ty)?);
    }
    Ok(TypeNode::union(nodes))
}

fn enum_options(options: &[NamedOption]) -> TypeNode {
    TypeNode::union(
        sorted_by_order(options)
            .into_iter()
            .map(|option| TypeNode::StringLiteral(option.name.clone()))
            .collect(),
    )
}

fn flag_members(
    ctx: &GenContext,
    session: &mut Session,
    name: &str,
    ovr: Option<&ManualOverride>,
    options: &[NamedOption],
) -> Result<Vec<Member>> {
    let links = DocLinkResolver::new(ctx);
    let mut members = Vec::with_capacity(options.len());
    for option in sorted_by_order(options) {
        let context = format!("{name}.{}", option.name);
        let doc = links.doc(
            &mut session.diagnostics,
            &context,
            DocSource::text(&option.description),
        )?;
        members.push(merge_member(
            name,
            ovr,
            &mut session.consumed,
            &option.name,
            MemberShape::Property,
            doc,
            || {
                Ok(Member::Property(PropertySig {
                    name: option.name.clone(),
                    ty: TypeNode::Keyword(Keyword::Boolean),
                    optional: true,
                    readonly: false,
                    doc: None,
                }))
            },
        )?);
    }
    Ok(members)
}

/// Named-field literal or positional tuple over the same parameters.
///
/// Only a trailing run of optional parameters is marked optional in the
/// tuple; an optional parameter before a required one is widened with
/// `undefined` instead.
fn table_or_array(
    ctx: &GenContext,
    diag: &mut Diagnostics,
    name: &str,
    parameters: &[Parameter],
) -> Result<TypeNode> {
    let links = DocLinkResolver::new(ctx);
    let sorted = sorted_by_order(parameters);
    let last_required = sorted.iter().rposition(|param| !param.optional);

    let mut fields = Vec::with_capacity(sorted.len());
    let mut elements = Vec::with_capacity(sorted.len());
    for (idx, param) in sorted.into_iter().enumerate() {
        let context = format!("{name}.{}", param.name);
        let ty = map_type(ctx, diag, &context, &param.ty)?;
        let doc = links.doc(diag, &context, DocSource::text(&param.description))?;

        let trailing = last_required.is_none_or(|last| idx > last);
        let element = if param.optional && !trailing {
            TupleElement {
                name: param.name.clone(),
                ty: ty.clone().or_undefined(),
                optional: false,
            }
        } else {
            TupleElement {
                name: param.name.clone(),
                ty: ty.clone(),
                optional: param.optional,
            }
        };
        elements.push(element);
        fields.push(Member::Property(PropertySig {
            name: param.name.clone(),
            ty,
            optional: param.optional,
            readonly: false,
            doc,
        }));
    }
    Ok(TypeNode::Union(vec![
        TypeNode::Literal(fields),
        TypeNode::Tuple(elements),
    ]))
}

#[cfg(test)]
mod tests {
    use api_decl_store::GeneratorConfig;

    use super::*;
    use crate::error::GenerateError;
    use crate::testing;

    fn run(concepts: &str, overrides: &str) -> (Result<Vec<Declaration>>, Session) {
        let schema = testing::schema(&format!(r#""concepts":{concepts}"#));
        let overrides = testing::overrides(overrides);
        let config = GeneratorConfig::default();
        let ctx = GenContext::new(&schema, &overrides, &config);
        let mut session = Session::new();
        let result = synthesize(&ctx, &mut session);
        (result, session)
    }

    fn property(member: &Member) -> &PropertySig {
        match member {
            Member::Property(p) => p,
            other => panic!("expected property, got {}", other.shape()),
        }
    }

    #[test]
    fn test_flag_options_are_independent_optional_booleans() {
        let (decls, _) = run(
            r#"[{"name":"MouseButtonFlags","order":0,"description":"","category":"flag",
                "options":[{"name":"b","order":1,"description":""},{"name":"a","order":0,"description":""}]}]"#,
            "[]",
        );
        let decls = decls.unwrap();
        let Declaration::Interface(flags) = &decls[0] else {
            panic!("expected interface");
        };
        assert_eq!(flags.members.len(), 2);
        for (member, expected) in flags.members.iter().zip(["a", "b"]) {
            let p = property(member);
            assert_eq!(p.name, expected);
            assert!(p.optional);
            assert_eq!(p.ty, TypeNode::Keyword(Keyword::Boolean));
        }
    }

    #[test]
    fn test_table_or_array_is_literal_or_tuple() {
        let (decls, _) = run(
            r#"[{"name":"Vector","order":0,"description":"","category":"table_or_array",
                "parameters":[
                  {"name":"x","order":0,"description":"","type":"number","optional":false},
                  {"name":"y","order":1,"description":"","type":"number","optional":true}]}]"#,
            "[]",
        );
        let decls = decls.unwrap();
        let Declaration::TypeAlias(alias) = &decls[0] else {
            panic!("expected alias");
        };
        let TypeNode::Union(options) = &alias.ty else {
            panic!("expected union");
        };
        let [TypeNode::Literal(fields), TypeNode::Tuple(elements)] = options.as_slice() else {
            panic!("expected literal and tuple");
        };
        assert!(!property(&fields[0]).optional);
        assert!(property(&fields[1]).optional);
        assert_eq!(
            elements,
            &vec![
                TupleElement {
                    name: "x".into(),
                    ty: TypeNode::reference("number"),
                    optional: false,
                },
                TupleElement {
                    name: "y".into(),
                    ty: TypeNode::reference("number"),
                    optional: true,
                },
            ]
        );
    }

    #[test]
    fn test_optional_before_required_is_widened_in_tuple() {
        let (decls, _) = run(
            r#"[{"name":"Pair","order":0,"description":"","category":"table_or_array",
                "parameters":[
                  {"name":"a","order":0,"description":"","type":"uint","optional":true},
                  {"name":"b","order":1,"description":"","type":"uint","optional":false}]}]"#,
            "[]",
        );
        let decls = decls.unwrap();
        let Declaration::TypeAlias(alias) = &decls[0] else {
            panic!("expected alias");
        };
        let TypeNode::Union(options) = &alias.ty else {
            panic!("expected union");
        };
        let TypeNode::Tuple(elements) = &options[1] else {
            panic!("expected tuple");
        };
        assert!(!elements[0].optional);
        assert_eq!(elements[0].ty, TypeNode::reference("uint").or_undefined());
    }

    #[test]
    fn test_enum_and_union_with_quoted_literals() {
        let (decls, _) = run(
            r#"[{"name":"Alignment","order":0,"description":"","category":"enum",
                 "options":[{"name":"left","order":0,"description":""},{"name":"right","order":1,"description":""}]},
                {"name":"ItemOrFluid","order":1,"description":"","category":"union",
                 "options":[{"order":0,"description":"Either \"item\" or \"fluid\".","type":"string"},
                            {"order":1,"description":"","type":"LuaItemPrototype"}]}]"#,
            "[]",
        );
        let decls = decls.unwrap();
        assert_eq!(
            decls[0],
            Declaration::alias(
                "Alignment",
                TypeNode::Union(vec![
                    TypeNode::StringLiteral("left".into()),
                    TypeNode::StringLiteral("right".into()),
                ])
            )
            .with_doc(Some(
                "@see https://lua-api.factorio.com/latest/concepts.html#Alignment".into()
            ))
        );
        let Declaration::TypeAlias(union) = &decls[1] else {
            panic!("expected alias");
        };
        assert_eq!(
            union.ty,
            TypeNode::Union(vec![
                TypeNode::StringLiteral("item".into()),
                TypeNode::StringLiteral("fluid".into()),
                TypeNode::reference("LuaItemPrototype"),
            ])
        );
    }

    #[test]
    fn test_plain_concept_needs_override() {
        let (decls, session) = run(
            r#"[{"name":"LocalisedString","order":0,"description":"","category":"concept"},
                {"name":"MapPosition","order":1,"description":"","category":"concept"}]"#,
            r#"[{"declaration":{"kind":"type_alias","name":"MapPosition","ty":{"reference":{"name":"Position"}}}}]"#,
        );
        let decls = decls.unwrap();
        assert!(matches!(
            &decls[0],
            Declaration::TypeAlias(a) if a.ty == TypeNode::Keyword(Keyword::Any)
        ));
        assert!(matches!(
            &decls[1],
            Declaration::TypeAlias(a) if a.ty == TypeNode::reference("Position")
        ));
        assert_eq!(
            session.diagnostics.advisories(),
            &[Advisory::MissingConceptDefinition {
                name: "LocalisedString".into()
            }]
        );
    }

    #[test]
    fn test_struct_merges_structural_override() {
        let (decls, session) = run(
            r#"[{"name":"Color","order":0,"description":"","category":"struct","attributes":[
                {"name":"r","order":0,"description":"","type":"float","read":true,"write":true,"optional":true},
                {"name":"g","order":1,"description":"","type":"float","read":true,"write":true,"optional":true}]}]"#,
            r#"[{"declaration":{"kind":"interface","name":"Color","members":[
                {"kind":"property","name":"g","ty":{"keyword":"number"},"optional":true},
                {"kind":"property","name":"a","ty":{"keyword":"number"},"optional":true}]}}]"#,
        );
        let decls = decls.unwrap();
        let Declaration::Interface(color) = &decls[0] else {
            panic!("expected interface");
        };
        let names: Vec<&str> = color.members.iter().filter_map(Member::name).collect();
        assert_eq!(names, vec!["r", "g", "a"]);
        assert_eq!(property(&color.members[1]).ty, TypeNode::Keyword(Keyword::Number));
        assert!(session.consumed.is_member_consumed("Color", "g"));
    }

    #[test]
    fn test_union_rejects_structural_override() {
        let (result, _) = run(
            r#"[{"name":"U","order":0,"description":"","category":"union","options":[]}]"#,
            r#"[{"declaration":{"kind":"interface","name":"U"}}]"#,
        );
        assert!(matches!(
            result,
            Err(GenerateError::OverrideKindMismatch { ref entity, .. }) if entity == "U"
        ));
    }

    #[test]
    fn test_table_with_variant_groups_expands() {
        let (decls, _) = run(
            r#"[{"name":"Filter","order":0,"description":"","category":"table",
                "parameters":[{"name":"filter","order":0,"description":"","type":"string","optional":false}],
                "variant_parameter_groups":[
                  {"name":"type","order":0,"description":"","parameters":[
                    {"name":"type","order":0,"description":"","type":"string","optional":false}]},
                  {"name":"name","order":1,"description":"","parameters":[
                    {"name":"name","order":0,"description":"","type":"string","optional":false}]}],
                "variant_parameter_description":"Applies to variants depending on `filter`:"}]"#,
            "[]",
        );
        let names: Vec<String> = decls
            .unwrap()
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        assert_eq!(names, vec!["BaseFilter", "TypeFilter", "NameFilter", "Filter"]);
    }
}
