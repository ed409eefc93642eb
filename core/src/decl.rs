//! Target declaration AST.
//!
//! Synthesized declarations and hand-authored overrides share this model.
//! Everything is serde-serializable so overrides can be written as JSON or
//! YAML and synthesized output can be dumped as JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Built-in keyword types of the target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Keyword {
    Any,
    Unknown,
    Boolean,
    Number,
    String,
    Undefined,
    Void,
    Object,
}

impl Keyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Any => "any",
            Keyword::Unknown => "unknown",
            Keyword::Boolean => "boolean",
            Keyword::Number => "number",
            Keyword::String => "string",
            Keyword::Undefined => "undefined",
            Keyword::Void => "void",
            Keyword::Object => "object",
        }
    }
}

/// A type expression in the target language.
///
/// # Examples
///
/// ```
/// use api_decl_core::{Keyword, TypeNode};
///
/// let ty = TypeNode::generic("Record", vec![TypeNode::Keyword(Keyword::String), TypeNode::reference("LuaEntity")]);
/// assert!(matches!(ty, TypeNode::Reference { ref name, ref args } if name == "Record" && args.len() == 2));
///
/// let opt = TypeNode::reference("LuaEntity").or_undefined();
/// assert_eq!(opt, TypeNode::Union(vec![TypeNode::reference("LuaEntity"), TypeNode::Keyword(Keyword::Undefined)]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeNode {
    Keyword(Keyword),
    Reference {
        name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<TypeNode>,
    },
    StringLiteral(String),
    NumberLiteral(i64),
    Array(Box<TypeNode>),
    Tuple(Vec<TupleElement>),
    Union(Vec<TypeNode>),
    Intersection(Vec<TypeNode>),
    Function {
        params: Vec<Param>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ret: Option<Box<TypeNode>>,
    },
    /// Anonymous structural type.
    Literal(Vec<Member>),
}

impl TypeNode {
    pub fn reference(name: &str) -> Self {
        TypeNode::Reference {
            name: name.to_string(),
            args: Vec::new(),
        }
    }

    pub fn generic(name: &str, args: Vec<TypeNode>) -> Self {
        TypeNode::Reference {
            name: name.to_string(),
            args,
        }
    }

    /// Builds a union, collapsing a single option to itself.
    pub fn union(mut options: Vec<TypeNode>) -> Self {
        if options.len() == 1 {
            options.remove(0)
        } else {
            TypeNode::Union(options)
        }
    }

    /// Widens the type with `undefined`.
    pub fn or_undefined(self) -> Self {
        match self {
            TypeNode::Union(mut options) => {
                options.push(TypeNode::Keyword(Keyword::Undefined));
                TypeNode::Union(options)
            }
            other => TypeNode::Union(vec![other, TypeNode::Keyword(Keyword::Undefined)]),
        }
    }

    /// The referenced name, when this is a plain or generic reference.
    pub fn reference_name(&self) -> Option<&str> {
        match self {
            TypeNode::Reference { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// A named element of a tuple type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TupleElement {
    pub name: String,
    pub ty: TypeNode,
    #[serde(default)]
    pub optional: bool,
}

/// A function or method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: TypeNode,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub rest: bool,
}

impl Param {
    pub fn new(name: &str, ty: TypeNode) -> Self {
        Self {
            name: name.to_string(),
            ty,
            optional: false,
            rest: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySig {
    pub name: String,
    pub ty: TypeNode,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetterSig {
    pub name: String,
    pub param: Param,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSig {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ret: Option<TypeNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSig {
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ret: Option<TypeNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSig {
    pub key_name: String,
    pub key: TypeNode,
    pub value: TypeNode,
    #[serde(default)]
    pub readonly: bool,
}

/// A member of an interface or type literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Member {
    Property(PropertySig),
    Setter(SetterSig),
    Method(MethodSig),
    Call(CallSig),
    Index(IndexSig),
}

/// The syntactic shape of a member, used to check overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberShape {
    Property,
    Setter,
    Method,
    Call,
    Index,
}

impl fmt::Display for MemberShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MemberShape::Property => "property",
            MemberShape::Setter => "setter",
            MemberShape::Method => "method",
            MemberShape::Call => "call signature",
            MemberShape::Index => "index signature",
        };
        f.write_str(label)
    }
}

impl Member {
    /// Creates a property member.
    pub fn property(name: &str, ty: TypeNode) -> Self {
        Member::Property(PropertySig {
            name: name.to_string(),
            ty,
            optional: false,
            readonly: false,
            doc: None,
        })
    }

    /// Name of a named member; call and index signatures are anonymous.
    pub fn name(&self) -> Option<&str> {
        match self {
            Member::Property(p) => Some(&p.name),
            Member::Setter(s) => Some(&s.name),
            Member::Method(m) => Some(&m.name),
            Member::Call(_) | Member::Index(_) => None,
        }
    }

    pub fn shape(&self) -> MemberShape {
        match self {
            Member::Property(_) => MemberShape::Property,
            Member::Setter(_) => MemberShape::Setter,
            Member::Method(_) => MemberShape::Method,
            Member::Call(_) => MemberShape::Call,
            Member::Index(_) => MemberShape::Index,
        }
    }

    pub fn doc(&self) -> Option<&str> {
        match self {
            Member::Property(p) => p.doc.as_deref(),
            Member::Setter(s) => s.doc.as_deref(),
            Member::Method(m) => m.doc.as_deref(),
            Member::Call(c) => c.doc.as_deref(),
            Member::Index(_) => None,
        }
    }

    /// Replaces the member documentation. Index signatures carry none.
    pub fn with_doc(mut self, doc: Option<String>) -> Self {
        match &mut self {
            Member::Property(p) => p.doc = doc,
            Member::Setter(s) => s.doc = doc,
            Member::Method(m) => m.doc = doc,
            Member::Call(c) => c.doc = doc,
            Member::Index(_) => {}
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<TypeNode>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl InterfaceDecl {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            extends: Vec::new(),
            members: Vec::new(),
            doc: None,
        }
    }

    pub fn find_member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name() == Some(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeAliasDecl {
    pub name: String,
    pub ty: TypeNode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceDecl {
    pub name: String,
    #[serde(default)]
    pub body: Vec<Declaration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDecl {
    pub name: String,
    #[serde(default)]
    pub members: Vec<EnumMember>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstDecl {
    pub name: String,
    pub ty: TypeNode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

/// A top-level or namespaced declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Declaration {
    Interface(InterfaceDecl),
    TypeAlias(TypeAliasDecl),
    Namespace(NamespaceDecl),
    Enum(EnumDecl),
    Const(ConstDecl),
}

impl Declaration {
    /// Creates a type alias declaration.
    pub fn alias(name: &str, ty: TypeNode) -> Self {
        Declaration::TypeAlias(TypeAliasDecl {
            name: name.to_string(),
            ty,
            doc: None,
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Declaration::Interface(d) => &d.name,
            Declaration::TypeAlias(d) => &d.name,
            Declaration::Namespace(d) => &d.name,
            Declaration::Enum(d) => &d.name,
            Declaration::Const(d) => &d.name,
        }
    }

    pub fn doc(&self) -> Option<&str> {
        match self {
            Declaration::Interface(d) => d.doc.as_deref(),
            Declaration::TypeAlias(d) => d.doc.as_deref(),
            Declaration::Namespace(d) => d.doc.as_deref(),
            Declaration::Enum(d) => d.doc.as_deref(),
            Declaration::Const(d) => d.doc.as_deref(),
        }
    }

    /// Replaces the declared name.
    pub fn with_name(mut self, name: &str) -> Self {
        let slot = match &mut self {
            Declaration::Interface(d) => &mut d.name,
            Declaration::TypeAlias(d) => &mut d.name,
            Declaration::Namespace(d) => &mut d.name,
            Declaration::Enum(d) => &mut d.name,
            Declaration::Const(d) => &mut d.name,
        };
        *slot = name.to_string();
        self
    }

    fn doc_mut(&mut self) -> &mut Option<String> {
        match self {
            Declaration::Interface(d) => &mut d.doc,
            Declaration::TypeAlias(d) => &mut d.doc,
            Declaration::Namespace(d) => &mut d.doc,
            Declaration::Enum(d) => &mut d.doc,
            Declaration::Const(d) => &mut d.doc,
        }
    }

    /// Removes and returns the documentation.
    pub fn take_doc(&mut self) -> Option<String> {
        self.doc_mut().take()
    }

    /// Replaces the documentation.
    pub fn with_doc(mut self, doc: Option<String>) -> Self {
        *self.doc_mut() = doc;
        self
    }

    /// Short label of the declaration kind, for error messages.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Declaration::Interface(_) => "interface",
            Declaration::TypeAlias(_) => "type alias",
            Declaration::Namespace(_) => "namespace",
            Declaration::Enum(_) => "enum",
            Declaration::Const(_) => "const",
        }
    }
}
