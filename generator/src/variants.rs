//! Variant parameter group expansion.
//!
//! A parameter table with variant groups expands into:
//!
//! 1. `Base<Name>`: an interface over the shared parameters;
//! 2. one `<Group><Name>` interface per group, extending the base;
//! 3. `type <Name> = <Group1><Name> | <Group2><Name> | ...`.
//!
//! When the description names a discriminator field (``depending on
//! `field`:``), every group interface narrows that field to the group's own
//! name, as a string literal or, for qualified constants, as a reference to
//! the constant.

use api_decl_core::{
    Declaration, InterfaceDecl, Member, Parameter, PropertySig, TypeNode, VariantParameterGroup,
    sorted_by_order,
};

use crate::context::GenContext;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::text::{discriminator_field, pascal_case};
use crate::types::parameter_property;

/// Input of one expansion.
#[derive(Debug, Clone, Copy)]
pub struct VariantShape<'s> {
    pub name: &'s str,
    pub parameters: &'s [Parameter],
    pub groups: &'s [VariantParameterGroup],
    pub description: Option<&'s str>,
}

/// Expands a variant shape into base, group and union declarations.
///
/// `doc` is attached to the union alias.
pub fn expand_variants(
    ctx: &GenContext,
    diag: &mut Diagnostics,
    shape: VariantShape<'_>,
    doc: Option<String>,
) -> Result<Vec<Declaration>> {
    let discriminator = shape.description.and_then(discriminator_field);
    let base_name = format!("Base{}", shape.name);

    let mut base = InterfaceDecl::new(&base_name);
    for param in sorted_by_order(shape.parameters) {
        if discriminator.as_deref() == Some(param.name.as_str()) {
            continue;
        }
        base.members
            .push(parameter_property(ctx, diag, shape.name, param)?);
    }

    let mut decls = vec![Declaration::Interface(base)];
    let mut options = Vec::new();
    for group in sorted_by_order(shape.groups) {
        let label = group.name.rsplit('.').next().unwrap_or(&group.name);
        let group_name = format!("{}{}", pascal_case(label), shape.name);
        let context = format!("{}.{}", shape.name, group.name);

        let mut iface = InterfaceDecl::new(&group_name);
        iface.extends.push(TypeNode::reference(&base_name));
        if let Some(field) = &discriminator {
            let narrowed = if ctx.is_define(&group.name) {
                TypeNode::reference(&group.name)
            } else {
                TypeNode::StringLiteral(group.name.clone())
            };
            iface.members.push(Member::Property(PropertySig {
                name: field.clone(),
                ty: narrowed,
                optional: false,
                readonly: false,
                doc: None,
            }));
        }
        for param in sorted_by_order(&group.parameters) {
            iface
                .members
                .push(parameter_property(ctx, diag, &context, param)?);
        }

        options.push(TypeNode::reference(&group_name));
        decls.push(Declaration::Interface(iface));
    }

    let union = if options.is_empty() {
        TypeNode::reference(&base_name)
    } else {
        TypeNode::union(options)
    };
    decls.push(Declaration::alias(shape.name, union).with_doc(doc));
    Ok(decls)
}
