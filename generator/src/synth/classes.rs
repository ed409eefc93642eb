//! Runtime classes.
//!
//! A class becomes one interface whose supertypes are its schema base
//! classes followed by the override's supertypes. Members come in a fixed
//! order: call signature, methods, attributes, `length`, then whatever the
//! override adds.
//!
//! Classes whose override extends `ReadonlyArray<T>` or `Array<T>` are
//! array-like and split into three declarations:
//!
//! ```text
//! interface LuaInventoryMembers { ... }
//! type LuaInventoryIndex = { readonly [index: number]: LuaItemStack };
//! type LuaInventory = LuaInventoryMembers & LuaInventoryIndex;
//! ```
//!
//! Classes carrying `help()`, `valid: boolean` and `object_name: string`
//! extend the shared marker interface instead of repeating the three.

use api_decl_core::{
    Attribute, CallSig, Class, Declaration, IndexSig, InterfaceDecl, Keyword, Member, MemberShape,
    Method, MethodSig, Param, Parameter, PropertySig, ReturnValue, TupleElement, TypeNode,
    sorted_by_order,
};
use api_decl_store::{ManualOverride, OverrideKind};
use tracing::debug;

use super::entity_doc;
use crate::context::{GenContext, Session};
use crate::diagnostics::{Advisory, Diagnostics};
use crate::error::{GenerateError, Result};
use crate::links::{DocLinkResolver, DocSource};
use crate::merge::{append_unconsumed, find_override, merge_attribute, merge_member};
use crate::text::pascal_case;
use crate::types::{map_type, parameter_members};
use crate::variants::{VariantShape, expand_variants};

pub const HELP_METHOD: &str = "help";
pub const VALID_ATTRIBUTE: &str = "valid";
pub const OBJECT_NAME_ATTRIBUTE: &str = "object_name";
/// Wrapper for the length of classes that are not array-like.
pub const LENGTH_WRAPPER: &str = "LuaLengthMethod";
/// Wrapper for methods returning several values.
pub const MULTI_RETURN: &str = "LuaMultiReturn";

const ARRAY_SUPERTYPES: [&str; 2] = ["ReadonlyArray", "Array"];
const LENGTH_MEMBER: &str = "length";

/// Synthesizes every class, followed by the marker interface when some
/// class carries the full triad and no override supplies the marker.
pub fn synthesize(ctx: &GenContext, session: &mut Session) -> Result<Vec<Declaration>> {
    let marker_name = ctx.config.marker_supertype.as_str();
    let mut out = Vec::new();
    let mut marker = None;

    for class in sorted_by_order(&ctx.schema.classes) {
        let triad = has_triad(class);
        if triad && marker.is_none() && !ctx.overrides.contains(marker_name) {
            marker = Some(marker_interface(ctx, session, marker_name, class)?);
        }
        let decls = synthesize_class(ctx, session, class, triad)?;
        debug!(
            class = %class.name,
            triad,
            declarations = decls.len(),
            "synthesized class"
        );
        out.extend(decls);
    }
    out.extend(marker.into_iter().flatten());
    Ok(out)
}

/// Whether a class carries the help method, a boolean `valid` and a string
/// `object_name`.
pub fn has_triad(class: &Class) -> bool {
    class.find_method(HELP_METHOD).is_some()
        && class
            .find_attribute(VALID_ATTRIBUTE)
            .is_some_and(|attr| attr.ty.as_name() == Some("boolean"))
        && class
            .find_attribute(OBJECT_NAME_ATTRIBUTE)
            .is_some_and(|attr| attr.ty.as_name() == Some("string"))
}

fn is_triad_member(name: &str) -> bool {
    name == HELP_METHOD || name == VALID_ATTRIBUTE || name == OBJECT_NAME_ATTRIBUTE
}

fn is_array_supertype(ty: &TypeNode) -> bool {
    matches!(
        ty,
        TypeNode::Reference { name, args }
            if args.len() == 1 && ARRAY_SUPERTYPES.contains(&name.as_str())
    )
}

/// The marker interface, built from the first class carrying the triad.
fn marker_interface(
    ctx: &GenContext,
    session: &mut Session,
    marker_name: &str,
    class: &Class,
) -> Result<Vec<Declaration>> {
    let mut decls = Vec::new();
    let mut iface = InterfaceDecl::new(marker_name);
    if let Some(help) = class.find_method(HELP_METHOD) {
        iface
            .members
            .push(merge_method(ctx, session, marker_name, None, help, &mut decls)?);
    }
    for name in [VALID_ATTRIBUTE, OBJECT_NAME_ATTRIBUTE] {
        if let Some(attr) = class.find_attribute(name) {
            iface
                .members
                .push(merge_attribute(ctx, session, marker_name, None, attr)?);
        }
    }
    iface.doc = Some("Members shared by every runtime object.".to_string());
    debug!(marker = marker_name, from = %class.name, "synthesized marker supertype");
    decls.push(Declaration::Interface(iface));
    Ok(decls)
}

fn synthesize_class(
    ctx: &GenContext,
    session: &mut Session,
    class: &Class,
    triad: bool,
) -> Result<Vec<Declaration>> {
    let name = class.name.as_str();
    let ovr = find_override(
        ctx,
        &mut session.consumed,
        name,
        &[OverrideKind::StructuralType],
    )?;
    let doc = entity_doc(
        ctx,
        &mut session.diagnostics,
        name,
        &class.description,
        &class.notes,
        &class.examples,
    )?;
    let array_like = ovr.is_some_and(|o| o.supertypes().iter().any(is_array_supertype));

    let mut extends: Vec<TypeNode> = class
        .base_classes
        .iter()
        .map(|base| TypeNode::reference(base))
        .collect();
    if triad {
        extends.push(TypeNode::reference(&ctx.config.marker_supertype));
    }
    if let Some(ovr) = ovr {
        extends.extend(
            ovr.supertypes()
                .iter()
                .filter(|ty| !is_array_supertype(ty))
                .cloned(),
        );
    }

    // Declarations the members depend on, emitted ahead of the class.
    let mut out = Vec::new();
    let mut members = Vec::new();

    if let Some(call) = class.call_operator() {
        members.push(call_member(ctx, &mut session.diagnostics, name, call, &mut out)?);
    }
    for method in sorted_by_order(&class.methods) {
        if triad && is_triad_member(&method.name) {
            continue;
        }
        members.push(merge_method(ctx, session, name, ovr, method, &mut out)?);
    }
    for attr in sorted_by_order(&class.attributes) {
        if triad && is_triad_member(&attr.name) {
            continue;
        }
        members.push(merge_attribute(ctx, session, name, ovr, attr)?);
    }
    if let Some(length) = class.length_operator() {
        members.push(length_member(ctx, session, name, ovr, length, array_like)?);
    }
    append_unconsumed(name, ovr, &session.consumed, &mut members);

    let index = if array_like {
        index_type(ctx, &mut session.diagnostics, class, ovr)?
    } else {
        None
    };
    let Some(index) = index else {
        if array_like {
            session.diagnostics.record(Advisory::MissingIndexShape {
                class: name.to_string(),
            });
        }
        let mut iface = InterfaceDecl::new(name);
        iface.extends = extends;
        iface.members = members;
        iface.doc = doc;
        out.push(Declaration::Interface(iface));
        return Ok(out);
    };

    let members_name = format!("{name}Members");
    let index_name = format!("{name}Index");
    let mut iface = InterfaceDecl::new(&members_name);
    iface.extends = extends;
    iface.members = members;
    out.push(Declaration::Interface(iface));
    out.push(Declaration::alias(&index_name, index));
    out.push(
        Declaration::alias(
            name,
            TypeNode::Intersection(vec![
                TypeNode::reference(&members_name),
                TypeNode::reference(&index_name),
            ]),
        )
        .with_doc(doc),
    );
    Ok(out)
}

/// The indexed half of an array-like class: the override's index shape if
/// it has one, else `{ readonly [index: number]: T }` over the index
/// operator.
fn index_type(
    ctx: &GenContext,
    diag: &mut Diagnostics,
    class: &Class,
    ovr: Option<&ManualOverride>,
) -> Result<Option<TypeNode>> {
    if let Some(shape) = ovr.and_then(ManualOverride::index_shape) {
        return match shape {
            TypeNode::Literal(members) if matches!(members.as_slice(), [Member::Index(_)]) => {
                Ok(Some(shape.clone()))
            }
            TypeNode::Reference { .. } => Ok(Some(shape.clone())),
            _ => Err(GenerateError::UnsupportedIndexShape {
                class: class.name.clone(),
            }),
        };
    }
    let Some(index) = class.index_operator() else {
        return Ok(None);
    };
    let context = format!("{}.index", class.name);
    let value = map_type(ctx, diag, &context, &index.ty)?;
    Ok(Some(TypeNode::Literal(vec![Member::Index(IndexSig {
        key_name: "index".to_string(),
        key: TypeNode::Keyword(Keyword::Number),
        value,
        readonly: true,
    })])))
}

fn method_doc(
    ctx: &GenContext,
    diag: &mut Diagnostics,
    context: &str,
    method: &Method,
) -> Result<Option<String>> {
    DocLinkResolver::new(ctx).doc(
        diag,
        context,
        DocSource {
            description: &method.description,
            notes: &method.notes,
            examples: &method.examples,
            see: None,
        },
    )
}

fn merge_method(
    ctx: &GenContext,
    session: &mut Session,
    class_name: &str,
    ovr: Option<&ManualOverride>,
    method: &Method,
    extra: &mut Vec<Declaration>,
) -> Result<Member> {
    let context = format!("{class_name}.{}", method.name);
    let doc = method_doc(ctx, &mut session.diagnostics, &context, method)?;

    let Session {
        consumed,
        diagnostics,
    } = session;
    merge_member(
        class_name,
        ovr,
        consumed,
        &method.name,
        MemberShape::Method,
        doc,
        || {
            let (params, ret) = signature(ctx, diagnostics, class_name, method, extra)?;
            Ok(Member::Method(MethodSig {
                name: method.name.clone(),
                params,
                ret,
                doc: None,
            }))
        },
    )
}

fn call_member(
    ctx: &GenContext,
    diag: &mut Diagnostics,
    class_name: &str,
    call: &Method,
    extra: &mut Vec<Declaration>,
) -> Result<Member> {
    let context = format!("{class_name}.operator ()");
    let doc = method_doc(ctx, diag, &context, call)?;
    let (params, ret) = signature(ctx, diag, class_name, call, extra)?;
    Ok(Member::Call(CallSig { params, ret, doc }))
}

fn length_member(
    ctx: &GenContext,
    session: &mut Session,
    class_name: &str,
    ovr: Option<&ManualOverride>,
    length: &Attribute,
    array_like: bool,
) -> Result<Member> {
    let context = format!("{class_name}.operator #");
    let doc = DocLinkResolver::new(ctx).doc(
        &mut session.diagnostics,
        &context,
        DocSource::text(&length.description),
    )?;

    let Session {
        consumed,
        diagnostics,
    } = session;
    merge_member(
        class_name,
        ovr,
        consumed,
        LENGTH_MEMBER,
        MemberShape::Property,
        doc,
        || {
            let ty = map_type(ctx, diagnostics, &context, &length.ty)?;
            let ty = if array_like {
                ty
            } else {
                TypeNode::generic(LENGTH_WRAPPER, vec![ty])
            };
            Ok(Member::Property(PropertySig {
                name: LENGTH_MEMBER.to_string(),
                ty,
                optional: false,
                readonly: true,
                doc: None,
            }))
        },
    )
}

/// Parameters and return type of a method or call operator.
fn signature(
    ctx: &GenContext,
    diag: &mut Diagnostics,
    class_name: &str,
    method: &Method,
    extra: &mut Vec<Declaration>,
) -> Result<(Vec<Param>, Option<TypeNode>)> {
    let context = format!("{class_name}.{}", method.name);
    let mut params = if method.takes_table {
        vec![table_param(ctx, diag, class_name, method, extra)?]
    } else {
        positional_params(ctx, diag, &context, &method.parameters)?
    };
    if let Some(variadic) = &method.variadic_type {
        let ty = map_type(ctx, diag, &context, variadic)?;
        params.push(Param {
            name: "args".to_string(),
            ty: TypeNode::Array(Box::new(ty)),
            optional: false,
            rest: true,
        });
    }
    let ret = return_type(ctx, diag, &context, &method.return_values)?;
    Ok((params, ret))
}

/// The single `params` object of a method taking a table.
fn table_param(
    ctx: &GenContext,
    diag: &mut Diagnostics,
    class_name: &str,
    method: &Method,
    extra: &mut Vec<Declaration>,
) -> Result<Param> {
    let context = format!("{class_name}.{}", method.name);
    let ty = if method.variant_parameter_groups.is_empty() {
        TypeNode::Literal(parameter_members(ctx, diag, &context, &method.parameters)?)
    } else {
        let params_name = format!("{class_name}{}Params", pascal_case(&method.name));
        extra.extend(expand_variants(
            ctx,
            diag,
            VariantShape {
                name: &params_name,
                parameters: &method.parameters,
                groups: &method.variant_parameter_groups,
                description: method.variant_parameter_description.as_deref(),
            },
            None,
        )?);
        TypeNode::reference(&params_name)
    };
    Ok(Param {
        name: "params".to_string(),
        ty,
        optional: method.table_is_optional,
        rest: false,
    })
}

/// Positional parameters. Only a trailing run of optional parameters is
/// marked optional; earlier ones are widened with `undefined`.
fn positional_params(
    ctx: &GenContext,
    diag: &mut Diagnostics,
    context: &str,
    parameters: &[Parameter],
) -> Result<Vec<Param>> {
    let sorted = sorted_by_order(parameters);
    let last_required = sorted.iter().rposition(|param| !param.optional);
    let mut params = Vec::with_capacity(sorted.len());
    for (idx, param) in sorted.into_iter().enumerate() {
        let ty = map_type(ctx, diag, &format!("{context}.{}", param.name), &param.ty)?;
        let trailing = last_required.is_none_or(|last| idx > last);
        let (ty, optional) = match (param.optional, trailing) {
            (true, false) => (ty.or_undefined(), false),
            (optional, _) => (ty, optional),
        };
        params.push(Param {
            name: param.name.clone(),
            ty,
            optional,
            rest: false,
        });
    }
    Ok(params)
}

fn return_type(
    ctx: &GenContext,
    diag: &mut Diagnostics,
    context: &str,
    returns: &[ReturnValue],
) -> Result<Option<TypeNode>> {
    let mut mapped = Vec::with_capacity(returns.len());
    for ret in sorted_by_order(returns) {
        let ty = map_type(ctx, diag, context, &ret.ty)?;
        mapped.push(if ret.optional { ty.or_undefined() } else { ty });
    }
    Ok(match mapped.len() {
        0 => None,
        1 => mapped.pop(),
        _ => Some(TypeNode::generic(
            MULTI_RETURN,
            vec![TypeNode::Tuple(
                mapped
                    .into_iter()
                    .map(|ty| TupleElement {
                        name: String::new(),
                        ty,
                        optional: false,
                    })
                    .collect(),
            )],
        )),
    })
}
