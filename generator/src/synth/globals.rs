//! Global objects, as `declare const` bindings.

use api_decl_core::{ConstDecl, Declaration, sorted_by_order};

use super::entity_doc;
use crate::context::{GenContext, Session};
use crate::error::Result;
use crate::types::map_type;

pub fn synthesize(ctx: &GenContext, session: &mut Session) -> Result<Vec<Declaration>> {
    let mut out = Vec::new();
    for global in sorted_by_order(&ctx.schema.global_objects) {
        let ty = map_type(ctx, &mut session.diagnostics, &global.name, &global.ty)?;
        let doc = entity_doc(
            ctx,
            &mut session.diagnostics,
            &global.name,
            &global.description,
            &[],
            &[],
        )?;
        out.push(Declaration::Const(ConstDecl {
            name: global.name.clone(),
            ty,
            doc,
        }));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use api_decl_core::TypeNode;
    use api_decl_store::GeneratorConfig;

    use super::*;
    use crate::testing;

    #[test]
    fn test_globals_in_order() {
        let schema = testing::schema(
            r#""global_objects":[
                {"name":"script","order":1,"description":"","type":"LuaBootstrap"},
                {"name":"game","order":0,"description":"","type":"LuaGameScript"}]"#,
        );
        let overrides = testing::overrides("[]");
        let config = GeneratorConfig::default();
        let ctx = GenContext::new(&schema, &overrides, &config);
        let mut session = Session::new();

        let decls = synthesize(&ctx, &mut session).unwrap();
        assert_eq!(decls.len(), 2);
        let Declaration::Const(game) = &decls[0] else {
            panic!("expected const");
        };
        assert_eq!(game.name, "game");
        assert_eq!(game.ty, TypeNode::reference("LuaGameScript"));
    }
}
