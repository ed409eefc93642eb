//! The constants tree.
//!
//! Every node is one of three things:
//!
//! - a leaf, whose values become an enum numbered `0..n` by sorted position
//!   (values carried in the schema are ignored);
//! - an interior node, which becomes a namespace of its children;
//! - neither, which becomes `any` with an advisory.
//!
//! The whole tree sits in one implicit root namespace. Overrides are keyed
//! by the qualified path (`defines.events`) and must keep the node's shape.

use api_decl_core::{
    Declaration, Define, EnumDecl, EnumMember, Keyword, NamespaceDecl, TypeNode, sorted_by_order,
};
use api_decl_store::OverrideKind;
use tracing::debug;

use super::{entity_doc, verbatim};
use crate::context::{GenContext, Session};
use crate::diagnostics::Advisory;
use crate::error::{GenerateError, Result};
use crate::links::{DocLinkResolver, DocSource};
use crate::merge::find_override;

/// Synthesizes the root namespace, or nothing for an empty tree.
pub fn synthesize(ctx: &GenContext, session: &mut Session) -> Result<Vec<Declaration>> {
    if ctx.schema.defines.is_empty() {
        return Ok(Vec::new());
    }
    let root = ctx.config.constants_root.as_str();
    let mut body = Vec::new();
    for define in sorted_by_order(&ctx.schema.defines) {
        body.extend(synthesize_node(ctx, session, root, define)?);
    }
    Ok(vec![Declaration::Namespace(NamespaceDecl {
        name: root.to_string(),
        body,
        doc: None,
    })])
}

fn synthesize_node(
    ctx: &GenContext,
    session: &mut Session,
    parent: &str,
    define: &Define,
) -> Result<Vec<Declaration>> {
    let path = format!("{parent}.{}", define.name);
    let doc = entity_doc(
        ctx,
        &mut session.diagnostics,
        &path,
        &define.description,
        &[],
        &[],
    )?;

    let is_interior = !define.subkeys.is_empty();
    let is_leaf = !define.values.is_empty();

    if let Some(ovr) = find_override(
        ctx,
        &mut session.consumed,
        &path,
        &[OverrideKind::NamespaceOrEnumeration],
    )? {
        let fits = match ovr.declaration() {
            Declaration::Namespace(_) => !is_leaf || is_interior,
            Declaration::Enum(_) => !is_interior,
            _ => false,
        };
        if !fits {
            return Err(GenerateError::OverrideKindMismatch {
                entity: path,
                expected: if is_interior { "namespace" } else { "enum" }.to_string(),
                found: ovr.declaration().kind_label().to_string(),
            });
        }
        debug!(define = %path, "constants node from override");
        return Ok(vec![verbatim(ovr, doc).with_name(&define.name)]);
    }

    let mut out = Vec::new();
    if is_leaf {
        out.push(Declaration::Enum(leaf_enum(ctx, session, &path, define, doc.clone())?));
    }
    if is_interior {
        let mut body = Vec::new();
        for child in sorted_by_order(&define.subkeys) {
            body.extend(synthesize_node(ctx, session, &path, child)?);
        }
        out.push(Declaration::Namespace(NamespaceDecl {
            name: define.name.clone(),
            body,
            doc: if is_leaf { None } else { doc.clone() },
        }));
    }
    if out.is_empty() {
        session
            .diagnostics
            .record(Advisory::MissingConstantDefinition { path: path.clone() });
        out.push(Declaration::alias(&define.name, TypeNode::Keyword(Keyword::Any)).with_doc(doc));
    }
    debug!(define = %path, declarations = out.len(), "synthesized constants node");
    Ok(out)
}

fn leaf_enum(
    ctx: &GenContext,
    session: &mut Session,
    path: &str,
    define: &Define,
    doc: Option<String>,
) -> Result<EnumDecl> {
    let links = DocLinkResolver::new(ctx);
    let mut members = Vec::with_capacity(define.values.len());
    for (position, value) in sorted_by_order(&define.values).into_iter().enumerate() {
        let context = format!("{path}.{}", value.name);
        let value_doc = links.doc(
            &mut session.diagnostics,
            &context,
            DocSource::text(&value.description),
        )?;
        members.push(EnumMember {
            name: value.name.clone(),
            value: position as i64,
            doc: value_doc,
        });
    }
    Ok(EnumDecl {
        name: define.name.clone(),
        members,
        doc,
    })
}
