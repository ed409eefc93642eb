//! Events.
//!
//! Each event becomes `interface <PascalName>Event` over its data
//! parameters. Overrides are keyed by the interface name.

use api_decl_core::{Declaration, InterfaceDecl, sorted_by_order};
use api_decl_store::OverrideKind;
use tracing::debug;

use super::entity_doc;
use crate::context::{GenContext, Session};
use crate::error::Result;
use crate::merge::{append_unconsumed, find_override, merge_parameters};
use crate::text::pascal_case;

pub fn synthesize(ctx: &GenContext, session: &mut Session) -> Result<Vec<Declaration>> {
    let mut out = Vec::new();
    for event in sorted_by_order(&ctx.schema.events) {
        let name = format!("{}Event", pascal_case(&event.name));
        let ovr = find_override(
            ctx,
            &mut session.consumed,
            &name,
            &[OverrideKind::StructuralType],
        )?;
        let doc = entity_doc(
            ctx,
            &mut session.diagnostics,
            &event.name,
            &event.description,
            &event.notes,
            &event.examples,
        )?;

        let mut iface = InterfaceDecl::new(&name);
        iface.members = merge_parameters(ctx, session, &name, ovr, &event.data)?;
        append_unconsumed(&name, ovr, &session.consumed, &mut iface.members);
        if let Some(ovr) = ovr {
            iface.extends = ovr.supertypes().to_vec();
        }
        iface.doc = doc;

        debug!(event = %event.name, members = iface.members.len(), "synthesized event");
        out.push(Declaration::Interface(iface));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use api_decl_core::Member;
    use api_decl_store::GeneratorConfig;

    use super::*;
    use crate::testing;

    #[test]
    fn test_event_interface() {
        let schema = testing::schema(
            r#""events":[
                {"name":"on_tick","order":1,"description":"Every tick.","data":[
                   {"name":"tick","order":1,"description":"","type":"uint","optional":false},
                   {"name":"name","order":0,"description":"","type":"defines.events","optional":false}]},
                {"name":"on_player_died","order":0,"description":"","data":[]}]"#,
        );
        let overrides = testing::overrides("[]");
        let config = GeneratorConfig::default();
        let ctx = GenContext::new(&schema, &overrides, &config);
        let mut session = Session::new();

        let decls = synthesize(&ctx, &mut session).unwrap();
        let names: Vec<&str> = decls.iter().map(Declaration::name).collect();
        assert_eq!(names, vec!["OnPlayerDiedEvent", "OnTickEvent"]);

        let Declaration::Interface(tick) = &decls[1] else {
            panic!("expected interface");
        };
        let members: Vec<Option<&str>> = tick.members.iter().map(Member::name).collect();
        assert_eq!(members, vec![Some("name"), Some("tick")]);
        assert!(
            tick.doc
                .as_deref()
                .is_some_and(|d| d.starts_with("Every tick.") && d.contains("events.html#on_tick"))
        );
    }

    #[test]
    fn test_event_override_adds_members() {
        let schema = testing::schema(
            r#""events":[{"name":"on_tick","order":0,"description":"","data":[
                {"name":"tick","order":0,"description":"","type":"uint","optional":false}]}]"#,
        );
        let overrides = testing::overrides(
            r#"[{"declaration":{"kind":"interface","name":"OnTickEvent",
                 "extends":[{"reference":{"name":"EventData"}}],
                 "members":[{"kind":"property","name":"mod_name","ty":{"keyword":"string"},"optional":true}]}}]"#,
        );
        let config = GeneratorConfig::default();
        let ctx = GenContext::new(&schema, &overrides, &config);
        let mut session = Session::new();

        let decls = synthesize(&ctx, &mut session).unwrap();
        let Declaration::Interface(tick) = &decls[0] else {
            panic!("expected interface");
        };
        assert_eq!(tick.extends[0].reference_name(), Some("EventData"));
        let members: Vec<Option<&str>> = tick.members.iter().map(Member::name).collect();
        assert_eq!(members, vec![Some("tick"), Some("mod_name")]);
        assert!(session.consumed.is_entity_consumed("OnTickEvent"));
    }
}
