//! Schema type expressions to target type nodes.
//!
//! | Schema                          | Target                               |
//! |---------------------------------|--------------------------------------|
//! | name                            | named reference                      |
//! | `array`                         | `T[]`                                |
//! | `dictionary` (indexable key)    | `Record<K, V>`                       |
//! | `dictionary` (other key)        | `LuaTable<K, V>` plus an advisory    |
//! | `variant`                       | union, option order kept             |
//! | `function`                      | `(arg1: A, ...) => void`             |
//! | `LuaLazyLoadedValue`            | `LuaLazyLoadedValue<T>`              |
//! | `LuaCustomTable`                | `LuaCustomTable<K, V>`               |
//! | `table`                         | type literal over sorted parameters  |

use api_decl_core::{
    ComplexType, Member, Param, Parameter, PropertySig, TypeExpr, TypeNode, sorted_by_order,
};

use crate::context::GenContext;
use crate::diagnostics::{Advisory, Diagnostics};
use crate::error::Result;
use crate::links::{DocLinkResolver, DocSource};

/// Native map type for indexable keys.
pub const MAP_TYPE: &str = "Record";
/// Fallback map type for keys the native map cannot index.
pub const TABLE_TYPE: &str = "LuaTable";
pub const LAZY_VALUE_TYPE: &str = "LuaLazyLoadedValue";
pub const CUSTOM_TABLE_TYPE: &str = "LuaCustomTable";

/// Maps a schema type expression.
///
/// `context` is the entity path used in advisories.
pub fn map_type(
    ctx: &GenContext,
    diag: &mut Diagnostics,
    context: &str,
    ty: &TypeExpr,
) -> Result<TypeNode> {
    match ty {
        TypeExpr::Named(name) => Ok(TypeNode::reference(name)),
        TypeExpr::Complex(complex) => map_complex(ctx, diag, context, complex),
    }
}

fn map_complex(
    ctx: &GenContext,
    diag: &mut Diagnostics,
    context: &str,
    complex: &ComplexType,
) -> Result<TypeNode> {
    let node = match complex {
        ComplexType::Array { value } => {
            TypeNode::Array(Box::new(map_type(ctx, diag, context, value)?))
        }
        ComplexType::Dictionary { key, value } => {
            let key_node = map_type(ctx, diag, context, key)?;
            let value_node = map_type(ctx, diag, context, value)?;
            if is_indexable(ctx, key) {
                TypeNode::generic(MAP_TYPE, vec![key_node, value_node])
            } else {
                diag.record(Advisory::NonIndexableKey {
                    context: context.to_string(),
                    key: key.to_string(),
                });
                TypeNode::generic(TABLE_TYPE, vec![key_node, value_node])
            }
        }
        ComplexType::Variant { options } => {
            let options = options
                .iter()
                .map(|option| map_type(ctx, diag, context, option))
                .collect::<Result<Vec<_>>>()?;
            TypeNode::union(options)
        }
        ComplexType::Function { parameters } => {
            let mut params = Vec::with_capacity(parameters.len());
            for (idx, param) in parameters.iter().enumerate() {
                let ty = map_type(ctx, diag, context, param)?;
                params.push(Param::new(&format!("arg{}", idx + 1), ty));
            }
            TypeNode::Function { params, ret: None }
        }
        ComplexType::LazyLoadedValue { value } => {
            TypeNode::generic(LAZY_VALUE_TYPE, vec![map_type(ctx, diag, context, value)?])
        }
        ComplexType::CustomTable { key, value } => TypeNode::generic(
            CUSTOM_TABLE_TYPE,
            vec![
                map_type(ctx, diag, context, key)?,
                map_type(ctx, diag, context, value)?,
            ],
        ),
        ComplexType::Table(shape) => {
            TypeNode::Literal(parameter_members(ctx, diag, context, &shape.parameters)?)
        }
    };
    Ok(node)
}

/// Whether a key type can index the native map type: `string`, `number`,
/// a registered numeric builtin or a constants-tree reference.
pub fn is_indexable(ctx: &GenContext, key: &TypeExpr) -> bool {
    match key.as_name() {
        Some(name) => {
            name == "string"
                || name == "number"
                || ctx.config.is_numeric_builtin(name)
                || ctx.is_define(name)
        }
        None => false,
    }
}

/// One optional-aware property per parameter, in explicit order.
pub fn parameter_members(
    ctx: &GenContext,
    diag: &mut Diagnostics,
    context: &str,
    parameters: &[Parameter],
) -> Result<Vec<Member>> {
    sorted_by_order(parameters)
        .into_iter()
        .map(|param| parameter_property(ctx, diag, context, param))
        .collect()
}

/// A property member for one parameter, documented from its description.
pub fn parameter_property(
    ctx: &GenContext,
    diag: &mut Diagnostics,
    context: &str,
    param: &Parameter,
) -> Result<Member> {
    let member_context = format!("{context}.{}", param.name);
    let ty = map_type(ctx, diag, &member_context, &param.ty)?;
    let doc = DocLinkResolver::new(ctx).doc(
        diag,
        &member_context,
        DocSource::text(&param.description),
    )?;
    Ok(Member::Property(PropertySig {
        name: param.name.clone(),
        ty,
        optional: param.optional,
        readonly: false,
        doc,
    }))
}

#[cfg(test)]
mod tests {
    use api_decl_core::SchemaDocument;
    use api_decl_store::{GeneratorConfig, ManualOverrideStore};

    use super::*;
    use crate::testing;

    fn schema() -> SchemaDocument {
        testing::schema(
            r#""defines":[{"name":"inventory","order":0,"description":"",
                "values":[{"name":"chest","order":0,"description":""}]}]"#,
        )
    }

    fn expr(json: &str) -> TypeExpr {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_map_named_array_and_variant() {
        let schema = schema();
        let overrides = ManualOverrideStore::empty();
        let config = GeneratorConfig::default();
        let ctx = GenContext::new(&schema, &overrides, &config);
        let mut diag = Diagnostics::new();

        let ty = expr(
            r#"{"complex_type":"array","value":{"complex_type":"variant","options":["string","LuaEntity"]}}"#,
        );
        assert_eq!(
            map_type(&ctx, &mut diag, "x", &ty).unwrap(),
            TypeNode::Array(Box::new(TypeNode::Union(vec![
                TypeNode::reference("string"),
                TypeNode::reference("LuaEntity"),
            ])))
        );
    }

    #[test]
    fn test_dictionary_keys() {
        let schema = schema();
        let overrides = ManualOverrideStore::empty();
        let config = GeneratorConfig::default();
        let ctx = GenContext::new(&schema, &overrides, &config);
        let mut diag = Diagnostics::new();

        for key in ["string", "uint", "defines.inventory"] {
            let ty = expr(&format!(
                r#"{{"complex_type":"dictionary","key":"{key}","value":"boolean"}}"#
            ));
            let node = map_type(&ctx, &mut diag, "x", &ty).unwrap();
            assert_eq!(node.reference_name(), Some(MAP_TYPE), "key {key}");
        }
        assert!(diag.is_empty());

        let ty = expr(r#"{"complex_type":"dictionary","key":"LuaEntity","value":"boolean"}"#);
        let node = map_type(&ctx, &mut diag, "LuaSurface.find", &ty).unwrap();
        assert_eq!(node.reference_name(), Some(TABLE_TYPE));
        assert_eq!(
            diag.advisories(),
            &[Advisory::NonIndexableKey {
                context: "LuaSurface.find".into(),
                key: "LuaEntity".into(),
            }]
        );
    }

    #[test]
    fn test_function_parameters_are_positional() {
        let schema = schema();
        let overrides = ManualOverrideStore::empty();
        let config = GeneratorConfig::default();
        let ctx = GenContext::new(&schema, &overrides, &config);
        let mut diag = Diagnostics::new();

        let ty = expr(r#"{"complex_type":"function","parameters":["EventData","uint"]}"#);
        let TypeNode::Function { params, ret } = map_type(&ctx, &mut diag, "x", &ty).unwrap()
        else {
            panic!("expected function type");
        };
        let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["arg1", "arg2"]);
        assert!(ret.is_none());
    }

    #[test]
    fn test_wrappers_and_inline_table() {
        let schema = schema();
        let overrides = ManualOverrideStore::empty();
        let config = GeneratorConfig::default();
        let ctx = GenContext::new(&schema, &overrides, &config);
        let mut diag = Diagnostics::new();

        let lazy = expr(r#"{"complex_type":"LuaLazyLoadedValue","value":"LuaEntity"}"#);
        assert_eq!(
            map_type(&ctx, &mut diag, "x", &lazy).unwrap(),
            TypeNode::generic(LAZY_VALUE_TYPE, vec![TypeNode::reference("LuaEntity")])
        );

        let table = expr(
            r#"{"complex_type":"table","parameters":[
                {"name":"b","order":1,"description":"","type":"uint","optional":true},
                {"name":"a","order":0,"description":"","type":"string","optional":false}]}"#,
        );
        let TypeNode::Literal(members) = map_type(&ctx, &mut diag, "x", &table).unwrap() else {
            panic!("expected type literal");
        };
        let names: Vec<Option<&str>> = members.iter().map(Member::name).collect();
        assert_eq!(names, vec![Some("a"), Some("b")]);
        assert!(matches!(&members[1], Member::Property(p) if p.optional));
    }
}
