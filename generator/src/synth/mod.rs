//! Declaration synthesis, one module per schema category.
//!
//! Categories run in a fixed order: builtins, constants tree, events,
//! classes, concepts, global objects. Within a category, entities follow
//! their explicit order field. Overrides no category claimed are emitted
//! last, as written, with their documentation restored.

pub mod builtins;
pub mod classes;
pub mod concepts;
pub mod defines;
pub mod events;
pub mod globals;

use api_decl_core::Declaration;
use api_decl_store::ManualOverride;
use tracing::info;

use crate::context::{ConsumedSet, GenContext, Session};
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::links::{DocLinkResolver, DocSource};
use crate::report::CategoryCounts;

/// Runs every category and the unmatched-override pass.
pub fn synthesize_all(
    ctx: &GenContext,
    session: &mut Session,
) -> Result<(Vec<Declaration>, CategoryCounts)> {
    let mut out = Vec::new();
    let counts = CategoryCounts {
        builtins: emit(&mut out, "builtins", builtins::synthesize(ctx, session)?),
        defines: emit(&mut out, "defines", defines::synthesize(ctx, session)?),
        events: emit(&mut out, "events", events::synthesize(ctx, session)?),
        classes: emit(&mut out, "classes", classes::synthesize(ctx, session)?),
        concepts: emit(&mut out, "concepts", concepts::synthesize(ctx, session)?),
        globals: emit(&mut out, "globals", globals::synthesize(ctx, session)?),
        unmatched_overrides: emit(
            &mut out,
            "unmatched overrides",
            unmatched_overrides(ctx, &session.consumed),
        ),
    };
    Ok((out, counts))
}

fn emit(out: &mut Vec<Declaration>, phase: &str, decls: Vec<Declaration>) -> usize {
    let count = decls.len();
    info!(phase, count, "synthesized");
    out.extend(decls);
    count
}

/// Overrides no synthesis step consumed, in store order.
pub fn unmatched_overrides(ctx: &GenContext, consumed: &ConsumedSet) -> Vec<Declaration> {
    ctx.overrides
        .iter()
        .filter(|ovr| !consumed.is_entity_consumed(ovr.name()))
        .map(ManualOverride::to_declaration_with_doc)
        .collect()
}

/// Documentation for a top-level entity, with a `@see` link to its page.
pub(crate) fn entity_doc(
    ctx: &GenContext,
    diag: &mut Diagnostics,
    name: &str,
    description: &str,
    notes: &[String],
    examples: &[String],
) -> Result<Option<String>> {
    DocLinkResolver::new(ctx).doc(
        diag,
        name,
        DocSource {
            description,
            notes,
            examples,
            see: Some(name),
        },
    )
}

/// An override used in place of a synthesized declaration. Schema
/// documentation wins over the override's own.
pub(crate) fn verbatim(ovr: &ManualOverride, doc: Option<String>) -> Declaration {
    let doc = doc.or_else(|| ovr.doc().map(String::from));
    ovr.declaration().clone().with_doc(doc)
}
