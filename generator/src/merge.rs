//! Merging manual overrides into synthesized declarations.
//!
//! For every schema member the enclosing override is asked for a member of
//! the same name. A found member must have the shape the schema member
//! requires and is then used as written; otherwise the member is synthesized
//! from schema data. Used overrides and members are recorded in the
//! [`ConsumedSet`] so the final pass emits only what nothing claimed.

use api_decl_core::{
    Attribute, Member, MemberShape, Param, Parameter, PropertySig, SetterSig, sorted_by_order,
};
use api_decl_store::{ManualOverride, OverrideKind};

use crate::context::{ConsumedSet, GenContext, Session};
use crate::diagnostics::Diagnostics;
use crate::error::{GenerateError, Result};
use crate::links::{DocLinkResolver, DocSource};
use crate::types::map_type;

/// Looks up the override for `entity` and checks its kind.
///
/// A found override is marked consumed.
///
/// # Errors
///
/// Returns [`GenerateError::OverrideKindMismatch`] when the override kind is
/// not in `allowed`.
pub fn find_override<'c>(
    ctx: &'c GenContext,
    consumed: &mut ConsumedSet,
    entity: &str,
    allowed: &[OverrideKind],
) -> Result<Option<&'c ManualOverride>> {
    let Some(ovr) = ctx.overrides.get(entity) else {
        return Ok(None);
    };
    if !allowed.contains(&ovr.kind()) {
        let expected: Vec<String> = allowed.iter().map(|kind| kind.to_string()).collect();
        return Err(GenerateError::OverrideKindMismatch {
            entity: entity.to_string(),
            expected: expected.join(" or "),
            found: ovr.declaration().kind_label().to_string(),
        });
    }
    consumed.mark_entity(entity);
    Ok(Some(ovr))
}

/// Resolves one member against the enclosing override.
///
/// The override member wins when present; it keeps its own documentation if
/// it has any, else takes `doc`. Without one, `synthesize` builds the member
/// and `doc` is attached.
///
/// # Errors
///
/// Returns [`GenerateError::MemberShapeMismatch`] when the override member
/// has another shape than `expected`.
pub fn merge_member(
    entity: &str,
    ovr: Option<&ManualOverride>,
    consumed: &mut ConsumedSet,
    name: &str,
    expected: MemberShape,
    doc: Option<String>,
    synthesize: impl FnOnce() -> Result<Member>,
) -> Result<Member> {
    if let Some(member) = ovr.and_then(|o| o.member(name)) {
        let found = member.shape();
        if found != expected {
            return Err(GenerateError::MemberShapeMismatch {
                entity: entity.to_string(),
                member: name.to_string(),
                expected,
                found,
            });
        }
        consumed.mark_member(entity, name);
        let member = member.clone();
        return Ok(if member.doc().is_some() {
            member
        } else {
            member.with_doc(doc)
        });
    }
    Ok(synthesize()?.with_doc(doc))
}

/// Appends the members of `ovr` that no schema member claimed, in override
/// order. Call and index signatures are never claimed by name, so they are
/// always carried over.
pub fn append_unconsumed(
    entity: &str,
    ovr: Option<&ManualOverride>,
    consumed: &ConsumedSet,
    members: &mut Vec<Member>,
) {
    let Some(ovr) = ovr else {
        return;
    };
    for member in ovr.members() {
        let claimed = member
            .name()
            .is_some_and(|name| consumed.is_member_consumed(entity, name));
        if !claimed {
            members.push(member.clone());
        }
    }
}

/// The member shape an attribute must take: write-only attributes are
/// setters, everything else is a property.
pub fn attribute_shape(attr: &Attribute) -> MemberShape {
    if attr.is_write_only() {
        MemberShape::Setter
    } else {
        MemberShape::Property
    }
}

/// Synthesizes an attribute member from schema data, without documentation.
pub fn synthesize_attribute(
    ctx: &GenContext,
    diag: &mut Diagnostics,
    entity: &str,
    attr: &Attribute,
) -> Result<Member> {
    let context = format!("{entity}.{}", attr.name);
    let ty = map_type(ctx, diag, &context, &attr.ty)?;
    let ty = if attr.optional { ty.or_undefined() } else { ty };

    let member = if attr.is_write_only() {
        Member::Setter(SetterSig {
            name: attr.name.clone(),
            param: Param::new("value", ty),
            doc: None,
        })
    } else {
        Member::Property(PropertySig {
            name: attr.name.clone(),
            ty,
            optional: false,
            readonly: !attr.write,
            doc: None,
        })
    };
    Ok(member)
}

/// Documents and merges one attribute.
pub fn merge_attribute(
    ctx: &GenContext,
    session: &mut Session,
    entity: &str,
    ovr: Option<&ManualOverride>,
    attr: &Attribute,
) -> Result<Member> {
    let context = format!("{entity}.{}", attr.name);
    let doc = DocLinkResolver::new(ctx).doc(
        &mut session.diagnostics,
        &context,
        DocSource {
            description: &attr.description,
            notes: &attr.notes,
            examples: &attr.examples,
            see: None,
        },
    )?;

    let Session {
        consumed,
        diagnostics,
    } = session;
    merge_member(
        entity,
        ovr,
        consumed,
        &attr.name,
        attribute_shape(attr),
        doc,
        || synthesize_attribute(ctx, diagnostics, entity, attr),
    )
}

/// Merges one property per parameter, in explicit order.
pub fn merge_parameters(
    ctx: &GenContext,
    session: &mut Session,
    entity: &str,
    ovr: Option<&ManualOverride>,
    parameters: &[Parameter],
) -> Result<Vec<Member>> {
    let mut members = Vec::with_capacity(parameters.len());
    for param in sorted_by_order(parameters) {
        let context = format!("{entity}.{}", param.name);
        let doc = DocLinkResolver::new(ctx).doc(
            &mut session.diagnostics,
            &context,
            DocSource::text(&param.description),
        )?;

        let Session {
            consumed,
            diagnostics,
        } = &mut *session;
        members.push(merge_member(
            entity,
            ovr,
            consumed,
            &param.name,
            MemberShape::Property,
            doc,
            || {
                let ty = map_type(ctx, diagnostics, &context, &param.ty)?;
                Ok(Member::Property(PropertySig {
                    name: param.name.clone(),
                    ty,
                    optional: param.optional,
                    readonly: false,
                    doc: None,
                }))
            },
        )?);
    }
    Ok(members)
}
