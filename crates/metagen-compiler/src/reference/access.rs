//! Loads from metadata records at offsets found by the field locator.

use metagen_core::{ArchetypeId, DeclId, DeclKind, FieldId, MethodId};

use crate::function::FunctionCtx;
use crate::ir::Operand;
use crate::locate::{LocateTarget, locate};
use crate::overrides::find_overridden_function;
use crate::{EmitError, Result};

fn load_slot(
    f: &mut FunctionCtx,
    decl: DeclId,
    target: LocateTarget,
    metadata: Operand,
) -> Result<Operand> {
    let cx = *f.module();
    let index = locate(&cx, decl, target)?;
    Ok(Operand::Value(f.load(metadata, index)))
}

fn ensure_class(f: &FunctionCtx, decl: DeclId) -> Result<()> {
    let program = f.module().program;
    if program.decl(decl).kind == DeclKind::Class {
        Ok(())
    } else {
        Err(EmitError::NotAClass(program.decl_name(decl).to_owned()))
    }
}

/// Metadata of the type enclosing `decl`, read from `decl`'s metadata.
pub fn emit_parent_metadata_ref(
    f: &mut FunctionCtx,
    decl: DeclId,
    metadata: Operand,
) -> Result<Operand> {
    load_slot(f, decl, LocateTarget::Parent, metadata)
}

pub fn emit_argument_metadata_ref(
    f: &mut FunctionCtx,
    decl: DeclId,
    archetype: ArchetypeId,
    metadata: Operand,
) -> Result<Operand> {
    load_slot(f, decl, LocateTarget::GenericArgument(archetype), metadata)
}

pub fn emit_argument_witness_table_ref(
    f: &mut FunctionCtx,
    decl: DeclId,
    archetype: ArchetypeId,
    protocol: DeclId,
    metadata: Operand,
) -> Result<Operand> {
    let target = LocateTarget::WitnessTable {
        archetype,
        protocol,
    };
    load_slot(f, decl, target, metadata)
}

pub fn emit_value_witness_table_ref(
    f: &mut FunctionCtx,
    decl: DeclId,
    metadata: Operand,
) -> Result<Operand> {
    load_slot(f, decl, LocateTarget::ValueWitnessTable, metadata)
}

/// Runtime offset of a stored property of `class`, read from its metadata.
pub fn emit_class_field_offset(
    f: &mut FunctionCtx,
    class: DeclId,
    field: FieldId,
    metadata: Operand,
) -> Result<Operand> {
    ensure_class(f, class)?;
    load_slot(f, class, LocateTarget::FieldOffset(field), metadata)
}

/// Implementation pointer for a virtual call to `method` through an
/// instance whose metadata is `metadata`.
///
/// The slot belongs to the most-root compatible ancestor of `method`, so
/// it is located in that ancestor's class layout.
pub fn emit_virtual_method_value(
    f: &mut FunctionCtx,
    method: MethodId,
    metadata: Operand,
) -> Result<Operand> {
    let cx = *f.module();
    let slot_owner = find_overridden_function(&cx, method);
    let class = cx.program.method(slot_owner).owner;
    ensure_class(f, class)?;
    load_slot(f, class, LocateTarget::Method(slot_owner), metadata)
}
