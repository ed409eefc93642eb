//! Schema document model.
//!
//! This module defines the in-memory view of a runtime API schema document:
//! builtin types, classes, concepts, events, the `defines` constants tree and
//! global objects. The types deserialize directly from the JSON document with
//! [`serde`]; closed tag sets (complex types, concept categories, operators)
//! are Rust enums, so an unknown tag fails at load time with the tag named in
//! the error.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Application identifier the synthesizer understands.
pub const SUPPORTED_APPLICATION: &str = "factorio";

/// API stage the synthesizer understands.
pub const SUPPORTED_STAGE: &str = "runtime";

/// Schema `api_version` the synthesizer understands.
pub const SUPPORTED_API_VERSION: u32 = 3;

/// A complete schema document.
///
/// # Examples
///
/// ```
/// use api_decl_core::SchemaDocument;
///
/// let doc: SchemaDocument = serde_json::from_str(r#"{
///     "application": "factorio",
///     "stage": "runtime",
///     "api_version": 3,
///     "builtin_types": [{ "name": "uint", "order": 0, "description": "" }]
/// }"#).unwrap();
/// assert_eq!(doc.builtin_types[0].name, "uint");
/// assert!(doc.classes.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub application: String,
    pub stage: String,
    #[serde(default)]
    pub application_version: String,
    pub api_version: u32,
    #[serde(default)]
    pub builtin_types: Vec<BuiltinType>,
    #[serde(default)]
    pub classes: Vec<Class>,
    #[serde(default)]
    pub concepts: Vec<Concept>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub defines: Vec<Define>,
    #[serde(default)]
    pub global_objects: Vec<GlobalObject>,
}

impl SchemaDocument {
    /// Finds a class by name.
    pub fn find_class(&self, name: &str) -> Option<&Class> {
        self.classes.iter().find(|c| c.name == name)
    }

    /// Finds a concept by name.
    pub fn find_concept(&self, name: &str) -> Option<&Concept> {
        self.concepts.iter().find(|c| c.name == name)
    }

    /// Collects every qualified constants-tree path below `root`.
    ///
    /// Both namespace nodes and enumeration values are included, e.g.
    /// `defines.direction` and `defines.direction.north`.
    ///
    /// # Examples
    ///
    /// ```
    /// use api_decl_core::{Define, NamedOption, SchemaDocument};
    ///
    /// let mut doc: SchemaDocument = serde_json::from_str(
    ///     r#"{"application":"factorio","stage":"runtime","api_version":3}"#,
    /// ).unwrap();
    /// doc.defines.push(Define {
    ///     name: "direction".into(),
    ///     order: 0,
    ///     description: String::new(),
    ///     values: vec![NamedOption::new("north", 0)],
    ///     subkeys: Vec::new(),
    /// });
    /// assert_eq!(
    ///     doc.define_paths("defines"),
    ///     vec!["defines.direction".to_string(), "defines.direction.north".to_string()],
    /// );
    /// ```
    pub fn define_paths(&self, root: &str) -> Vec<String> {
        let mut paths = Vec::new();
        for define in &self.defines {
            define.collect_paths(root, &mut paths);
        }
        paths
    }
}

/// A builtin (primitive) type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinType {
    pub name: String,
    pub order: u32,
    #[serde(default)]
    pub description: String,
}

/// A named, ordered option without a type (flag bits, enum values,
/// constants-tree values).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedOption {
    pub name: String,
    pub order: u32,
    #[serde(default)]
    pub description: String,
}

impl NamedOption {
    pub fn new(name: &str, order: u32) -> Self {
        Self {
            name: name.to_string(),
            order,
            description: String::new(),
        }
    }
}

/// A typed parameter of a method, event, table or function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub order: u32,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    #[serde(default)]
    pub optional: bool,
}

impl Parameter {
    /// Creates a required parameter.
    pub fn required(name: &str, order: u32, ty: TypeExpr) -> Self {
        Self {
            name: name.to_string(),
            order,
            description: String::new(),
            ty,
            optional: false,
        }
    }

    /// Creates an optional parameter.
    pub fn optional(name: &str, order: u32, ty: TypeExpr) -> Self {
        Self {
            optional: true,
            ..Self::required(name, order, ty)
        }
    }
}

/// A named group of parameters that only applies for one variant of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantParameterGroup {
    pub name: String,
    pub order: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

/// An attribute of a class or struct concept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub order: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub write: bool,
    #[serde(default)]
    pub optional: bool,
}

impl Attribute {
    /// Creates a read-only attribute.
    pub fn read_only(name: &str, order: u32, ty: TypeExpr) -> Self {
        Self {
            name: name.to_string(),
            order,
            description: String::new(),
            notes: Vec::new(),
            examples: Vec::new(),
            ty,
            read: true,
            write: false,
            optional: false,
        }
    }

    /// Creates a read/write attribute.
    pub fn read_write(name: &str, order: u32, ty: TypeExpr) -> Self {
        Self {
            write: true,
            ..Self::read_only(name, order, ty)
        }
    }

    /// Creates a write-only attribute.
    pub fn write_only(name: &str, order: u32, ty: TypeExpr) -> Self {
        Self {
            read: false,
            write: true,
            ..Self::read_only(name, order, ty)
        }
    }

    /// Whether the attribute can be assigned but never read.
    pub fn is_write_only(&self) -> bool {
        self.write && !self.read
    }
}

/// A return value of a method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnValue {
    pub order: u32,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    #[serde(default)]
    pub optional: bool,
}

/// A class method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    pub order: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub variant_parameter_groups: Vec<VariantParameterGroup>,
    #[serde(default)]
    pub variant_parameter_description: Option<String>,
    #[serde(default)]
    pub variadic_type: Option<TypeExpr>,
    #[serde(default)]
    pub takes_table: bool,
    #[serde(default)]
    pub table_is_optional: bool,
    #[serde(default)]
    pub return_values: Vec<ReturnValue>,
}

impl Method {
    /// Creates a method without parameters or return values.
    pub fn new(name: &str, order: u32) -> Self {
        Self {
            name: name.to_string(),
            order,
            description: String::new(),
            notes: Vec::new(),
            examples: Vec::new(),
            parameters: Vec::new(),
            variant_parameter_groups: Vec::new(),
            variant_parameter_description: None,
            variadic_type: None,
            takes_table: false,
            table_is_optional: false,
            return_values: Vec::new(),
        }
    }

    /// Adds a parameter.
    pub fn with_param(mut self, param: Parameter) -> Self {
        self.parameters.push(param);
        self
    }

    /// Adds a required return value of the given type.
    pub fn returning(mut self, ty: TypeExpr) -> Self {
        let order = self.return_values.len() as u32;
        self.return_values.push(ReturnValue {
            order,
            description: String::new(),
            ty,
            optional: false,
        });
        self
    }
}

/// A class operator. The document encodes operators as objects tagged by
/// `name`; call operators carry method fields, length and index operators
/// carry attribute fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawOperator", into = "RawOperator")]
pub enum Operator {
    Call(Method),
    Length(Attribute),
    Index(Attribute),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawOperator {
    name: String,
    #[serde(default)]
    order: u32,
    #[serde(default)]
    description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    variadic_type: Option<TypeExpr>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    return_values: Vec<ReturnValue>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    ty: Option<TypeExpr>,
    #[serde(default)]
    read: bool,
    #[serde(default)]
    write: bool,
    #[serde(default)]
    optional: bool,
}

impl TryFrom<RawOperator> for Operator {
    type Error = String;

    fn try_from(raw: RawOperator) -> Result<Self, Self::Error> {
        let attribute = |raw: RawOperator| -> Result<Attribute, String> {
            let ty = raw
                .ty
                .ok_or_else(|| format!("operator `{}` is missing its type", raw.name))?;
            Ok(Attribute {
                name: raw.name,
                order: raw.order,
                description: raw.description,
                notes: Vec::new(),
                examples: Vec::new(),
                ty,
                read: raw.read,
                write: raw.write,
                optional: raw.optional,
            })
        };

        match raw.name.as_str() {
            "call" => Ok(Operator::Call(Method {
                parameters: raw.parameters,
                variadic_type: raw.variadic_type,
                return_values: raw.return_values,
                description: raw.description,
                ..Method::new("call", raw.order)
            })),
            "length" => attribute(raw).map(Operator::Length),
            "index" => attribute(raw).map(Operator::Index),
            other => Err(format!("unknown operator `{other}`")),
        }
    }
}

impl From<Operator> for RawOperator {
    fn from(op: Operator) -> Self {
        let from_attribute = |a: Attribute| RawOperator {
            name: a.name,
            order: a.order,
            description: a.description,
            parameters: Vec::new(),
            variadic_type: None,
            return_values: Vec::new(),
            ty: Some(a.ty),
            read: a.read,
            write: a.write,
            optional: a.optional,
        };
        match op {
            Operator::Call(m) => RawOperator {
                name: "call".to_string(),
                order: m.order,
                description: m.description,
                parameters: m.parameters,
                variadic_type: m.variadic_type,
                return_values: m.return_values,
                ty: None,
                read: false,
                write: false,
                optional: false,
            },
            Operator::Length(a) => from_attribute(Attribute {
                name: "length".to_string(),
                ..a
            }),
            Operator::Index(a) => from_attribute(Attribute {
                name: "index".to_string(),
                ..a
            }),
        }
    }
}

/// A runtime class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    pub order: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub base_classes: Vec<String>,
    #[serde(default)]
    pub methods: Vec<Method>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub operators: Vec<Operator>,
}

impl Class {
    /// Creates an empty class.
    pub fn new(name: &str, order: u32) -> Self {
        Self {
            name: name.to_string(),
            order,
            description: String::new(),
            notes: Vec::new(),
            examples: Vec::new(),
            base_classes: Vec::new(),
            methods: Vec::new(),
            attributes: Vec::new(),
            operators: Vec::new(),
        }
    }

    pub fn find_method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn find_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn call_operator(&self) -> Option<&Method> {
        self.operators.iter().find_map(|op| match op {
            Operator::Call(m) => Some(m),
            _ => None,
        })
    }

    pub fn length_operator(&self) -> Option<&Attribute> {
        self.operators.iter().find_map(|op| match op {
            Operator::Length(a) => Some(a),
            _ => None,
        })
    }

    pub fn index_operator(&self) -> Option<&Attribute> {
        self.operators.iter().find_map(|op| match op {
            Operator::Index(a) => Some(a),
            _ => None,
        })
    }
}

/// Shared shape of `table` and `filter` concepts and inline `table` types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableShape {
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub variant_parameter_groups: Vec<VariantParameterGroup>,
    #[serde(default)]
    pub variant_parameter_description: Option<String>,
}

/// One option of a `union` concept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnionOption {
    pub order: u32,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
}

/// Category-specific content of a concept.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum ConceptKind {
    /// Described only in prose; needs a manual override.
    Concept,
    Union { options: Vec<UnionOption> },
    Struct { attributes: Vec<Attribute> },
    Flag { options: Vec<NamedOption> },
    Table(TableShape),
    Filter(TableShape),
    Enum { options: Vec<NamedOption> },
    TableOrArray { parameters: Vec<Parameter> },
}

impl ConceptKind {
    /// The category tag as written in the schema document.
    pub fn category(&self) -> &'static str {
        match self {
            ConceptKind::Concept => "concept",
            ConceptKind::Union { .. } => "union",
            ConceptKind::Struct { .. } => "struct",
            ConceptKind::Flag { .. } => "flag",
            ConceptKind::Table(_) => "table",
            ConceptKind::Filter(_) => "filter",
            ConceptKind::Enum { .. } => "enum",
            ConceptKind::TableOrArray { .. } => "table_or_array",
        }
    }
}

/// A concept (named shared type).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concept {
    pub name: String,
    pub order: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(flatten)]
    pub kind: ConceptKind,
}

impl Concept {
    pub fn new(name: &str, order: u32, kind: ConceptKind) -> Self {
        Self {
            name: name.to_string(),
            order,
            description: String::new(),
            notes: Vec::new(),
            examples: Vec::new(),
            kind,
        }
    }
}

/// A runtime event with its payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub order: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub data: Vec<Parameter>,
}

/// A node of the constants tree.
///
/// A node with `values` is an enumeration leaf, a node with `subkeys` is a
/// namespace. A node with neither is incomplete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Define {
    pub name: String,
    pub order: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub values: Vec<NamedOption>,
    #[serde(default)]
    pub subkeys: Vec<Define>,
}

impl Define {
    fn collect_paths(&self, prefix: &str, out: &mut Vec<String>) {
        let path = format!("{prefix}.{}", self.name);
        out.push(path.clone());
        for value in &self.values {
            out.push(format!("{path}.{}", value.name));
        }
        for child in &self.subkeys {
            child.collect_paths(&path, out);
        }
    }
}

/// A global binding available to scripts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalObject {
    pub name: String,
    pub order: u32,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
}

/// A schema type expression.
///
/// Either a bare name reference or a complex type tagged by `complex_type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypeExpr {
    Named(String),
    Complex(Box<ComplexType>),
}

impl TypeExpr {
    pub fn named(name: &str) -> Self {
        TypeExpr::Named(name.to_string())
    }

    pub fn complex(ty: ComplexType) -> Self {
        TypeExpr::Complex(Box::new(ty))
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            TypeExpr::Named(name) => Some(name),
            TypeExpr::Complex(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for TypeExpr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(name) => Ok(TypeExpr::Named(name)),
            other => ComplexType::deserialize(other)
                .map(TypeExpr::complex)
                .map_err(de::Error::custom),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named(name) => write!(f, "{name}"),
            TypeExpr::Complex(complex) => match complex.as_ref() {
                ComplexType::Array { value } => write!(f, "array[{value}]"),
                ComplexType::Dictionary { key, value } => write!(f, "dictionary[{key} -> {value}]"),
                ComplexType::Variant { options } => {
                    let parts: Vec<String> = options.iter().map(|o| o.to_string()).collect();
                    write!(f, "{}", parts.join(" or "))
                }
                ComplexType::Function { .. } => write!(f, "function"),
                ComplexType::LazyLoadedValue { value } => write!(f, "LuaLazyLoadedValue[{value}]"),
                ComplexType::CustomTable { key, value } => {
                    write!(f, "LuaCustomTable[{key} -> {value}]")
                }
                ComplexType::Table(_) => write!(f, "table"),
            },
        }
    }
}

/// Complex (structured) type expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "complex_type")]
pub enum ComplexType {
    #[serde(rename = "array")]
    Array { value: TypeExpr },
    #[serde(rename = "dictionary")]
    Dictionary { key: TypeExpr, value: TypeExpr },
    #[serde(rename = "variant")]
    Variant { options: Vec<TypeExpr> },
    #[serde(rename = "function")]
    Function { parameters: Vec<TypeExpr> },
    #[serde(rename = "LuaLazyLoadedValue")]
    LazyLoadedValue { value: TypeExpr },
    #[serde(rename = "LuaCustomTable")]
    CustomTable { key: TypeExpr, value: TypeExpr },
    #[serde(rename = "table")]
    Table(TableShape),
}
