//! Builtin types.
//!
//! Native builtins already exist in the target language and emit nothing.
//! Numeric builtins alias `number`. Anything else needs an override; without
//! one it becomes `any` with an advisory.

use api_decl_core::{Declaration, Keyword, TypeNode, sorted_by_order};
use api_decl_store::OverrideKind;
use tracing::debug;

use super::{entity_doc, verbatim};
use crate::context::{GenContext, Session};
use crate::diagnostics::Advisory;
use crate::error::Result;
use crate::merge::find_override;

pub fn synthesize(ctx: &GenContext, session: &mut Session) -> Result<Vec<Declaration>> {
    let mut out = Vec::new();
    for builtin in sorted_by_order(&ctx.schema.builtin_types) {
        let name = builtin.name.as_str();
        let ovr = find_override(
            ctx,
            &mut session.consumed,
            name,
            &[OverrideKind::StructuralType, OverrideKind::TypeAlias],
        )?;
        if ovr.is_none() && ctx.config.is_native_builtin(name) {
            debug!(builtin = name, "native builtin, skipped");
            continue;
        }

        let doc = entity_doc(
            ctx,
            &mut session.diagnostics,
            name,
            &builtin.description,
            &[],
            &[],
        )?;
        let decl = if let Some(ovr) = ovr {
            verbatim(ovr, doc)
        } else if ctx.config.is_numeric_builtin(name) {
            Declaration::alias(name, TypeNode::Keyword(Keyword::Number)).with_doc(doc)
        } else {
            session
                .diagnostics
                .record(Advisory::MissingBuiltinDefinition {
                    name: name.to_string(),
                });
            Declaration::alias(name, TypeNode::Keyword(Keyword::Any)).with_doc(doc)
        };
        debug!(builtin = name, kind = decl.kind_label(), "synthesized builtin");
        out.push(decl);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use api_decl_store::GeneratorConfig;

    use super::*;
    use crate::testing;

    #[test]
    fn test_builtin_kinds() {
        let schema = testing::schema(
            r#""builtin_types":[
                {"name":"uint","order":2,"description":"32-bit unsigned."},
                {"name":"string","order":0,"description":""},
                {"name":"LuaObject","order":3,"description":""},
                {"name":"table","order":1,"description":""}]"#,
        );
        let overrides = testing::overrides(
            r#"[{"declaration":{"kind":"type_alias","name":"table","ty":{"keyword":"object"}}}]"#,
        );
        let config = GeneratorConfig::default();
        let ctx = GenContext::new(&schema, &overrides, &config);
        let mut session = Session::new();

        let decls = synthesize(&ctx, &mut session).unwrap();
        let names: Vec<&str> = decls.iter().map(Declaration::name).collect();
        assert_eq!(names, vec!["table", "uint", "LuaObject"]);

        assert_eq!(
            decls[0],
            Declaration::alias("table", TypeNode::Keyword(Keyword::Object)).with_doc(Some(
                "@see https://lua-api.factorio.com/latest/builtin-types.html#table".into()
            ))
        );
        assert!(matches!(
            &decls[1],
            Declaration::TypeAlias(a) if a.ty == TypeNode::Keyword(Keyword::Number)
        ));
        assert!(session.consumed.is_entity_consumed("table"));
        assert_eq!(
            session.diagnostics.advisories(),
            &[Advisory::MissingBuiltinDefinition {
                name: "LuaObject".into()
            }]
        );
    }

    #[test]
    fn test_namespace_override_is_rejected() {
        let schema =
            testing::schema(r#""builtin_types":[{"name":"table","order":0,"description":""}]"#);
        let overrides = testing::overrides(
            r#"[{"declaration":{"kind":"namespace","name":"table","body":[]}}]"#,
        );
        let config = GeneratorConfig::default();
        let ctx = GenContext::new(&schema, &overrides, &config);
        let mut session = Session::new();

        assert!(synthesize(&ctx, &mut session).is_err());
    }
}
