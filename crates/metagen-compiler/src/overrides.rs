//! Override compatibility and vtable slot decisions.
//!
//! An overriding method shares its ancestor's vtable slot only when the
//! two can be called through the same ABI. When the representation of an
//! argument or of the result changes, the overrider gets a new slot.

use indexmap::IndexMap;
use metagen_core::{DeclId, DeclKind, MethodId, Type};

use crate::ModuleCtx;
use crate::lowering::{Position, TypeLowering};

/// Whether `method` can occupy `overridden`'s vtable slot.
pub fn is_compatible_override(cx: &ModuleCtx, method: MethodId, overridden: MethodId) -> bool {
    let lowering = cx.lowering();
    let uncurry_level = cx.program.method(overridden).uncurry_level;
    let mut overriding_ty = &cx.program.method(method).ty;
    let mut overridden_ty = &cx.program.method(overridden).ty;

    for _ in 0..=uncurry_level {
        match (overridden_ty, overriding_ty) {
            (
                Type::Function {
                    input: base_input,
                    result: base_result,
                },
                Type::Function { input, result },
            ) => {
                if !compatible(&lowering, base_input, input, Position::Explosion) {
                    return false;
                }
                overridden_ty = base_result.as_ref();
                overriding_ty = result.as_ref();
            }
            _ => return overridden_ty == overriding_ty,
        }
    }

    compatible_result(&lowering, overridden_ty, overriding_ty)
}

fn compatible(
    lowering: &TypeLowering,
    overridden: &Type,
    overriding: &Type,
    position: Position,
) -> bool {
    if overridden == overriding || lowering.is_class_type(overridden) {
        return true;
    }
    match (overridden, overriding) {
        (Type::Tuple(base), Type::Tuple(derived)) => {
            base.len() == derived.len()
                && base
                    .iter()
                    .zip(derived)
                    .all(|(b, d)| compatible(lowering, &b.ty, &d.ty, position))
        }
        (
            Type::Function {
                input: base_input,
                result: base_result,
            },
            Type::Function { input, result },
        ) => {
            compatible(lowering, base_input, input, Position::Explosion)
                && compatible_result(lowering, base_result, result)
        }
        _ => !lowering.differs_by_abstraction(overridden, overriding, position),
    }
}

fn compatible_result(lowering: &TypeLowering, overridden: &Type, overriding: &Type) -> bool {
    if overridden == overriding {
        return true;
    }
    let overridden_indirect = lowering.requires_indirect_result(overridden);
    let overriding_indirect = lowering.requires_indirect_result(overriding);
    match (overridden_indirect, overriding_indirect) {
        (false, false) => compatible(lowering, overridden, overriding, Position::Explosion),
        (true, true) => compatible(lowering, overridden, overriding, Position::Memory),
        _ => false,
    }
}

/// Methods of foreign classes are dispatched by the foreign runtime and
/// have no native vtable entry.
pub fn has_vtable_entry(cx: &ModuleCtx, method: MethodId) -> bool {
    let owner = cx.program.decl(cx.program.method(method).owner);
    owner.kind == DeclKind::Class && !owner.foreign
}

/// Whether `method` gets a vtable slot of its own.
pub fn requires_new_slot(cx: &ModuleCtx, method: MethodId) -> bool {
    for overridden in cx.program.override_chain(method) {
        if !has_vtable_entry(cx, overridden) {
            return true;
        }
        if is_compatible_override(cx, method, overridden) {
            return false;
        }
    }
    true
}

/// The most-root ancestor whose slot a virtual call to `method` uses.
///
/// Compatibility is transitive, so each compatible ancestor becomes the
/// reference point for the next comparison.
pub fn find_overridden_function(cx: &ModuleCtx, method: MethodId) -> MethodId {
    let mut slot_owner = method;
    for overridden in cx.program.override_chain(method) {
        if !has_vtable_entry(cx, overridden) {
            break;
        }
        if is_compatible_override(cx, slot_owner, overridden) {
            slot_owner = overridden;
        }
    }
    slot_owner
}

/// Final overrider of every method visible in `class`'s vtable.
///
/// Walks the chain most-derived first so the most-derived compatible
/// implementation wins each slot.
pub fn final_overriders(cx: &ModuleCtx, class: DeclId) -> IndexMap<MethodId, MethodId> {
    let mut finals = IndexMap::new();
    for &c in cx.program.class_chain(class).iter().rev() {
        let decl = cx.program.decl(c);
        if decl.foreign {
            break;
        }
        for &method in &decl.methods {
            let implementation = *finals.entry(method).or_insert(method);
            let mut slot_owner = method;
            for overridden in cx.program.override_chain(method) {
                if !has_vtable_entry(cx, overridden) {
                    break;
                }
                if is_compatible_override(cx, slot_owner, overridden) {
                    finals.entry(overridden).or_insert(implementation);
                    slot_owner = overridden;
                }
            }
        }
    }
    finals
}
