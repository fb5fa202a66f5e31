//! Metadata references: code that produces a pointer to a type's metadata
//! at run time.
//!
//! Constant metadata is referenced by address. Everything else goes
//! through a runtime call whose result is cached in the function, so two
//! references to the same type in one function share a single call.

mod access;
mod generic_args;

#[cfg(test)]
mod access_tests;

use metagen_abi::{GlobalRef, RuntimeFn};
use metagen_core::{DeclId, DeclKind, TupleElement, Type};

use crate::build::{builtin_metadata, needs_runtime_init};
use crate::function::{FunctionCtx, LocalDataKind};
use crate::ir::{Callee, Operand};
use crate::{EmitError, Result};

pub use access::{
    emit_argument_metadata_ref, emit_argument_witness_table_ref, emit_class_field_offset,
    emit_parent_metadata_ref, emit_value_witness_table_ref, emit_virtual_method_value,
};
pub use generic_args::{GenericArguments, collect_generic_arguments};

/// Emit a reference to `ty`'s metadata.
pub fn emit_type_metadata_ref(f: &mut FunctionCtx, ty: &Type) -> Result<Operand> {
    let cx = *f.module();
    match ty {
        Type::Builtin(builtin) => Ok(Operand::Global(builtin_metadata(&cx, *builtin))),
        Type::Nominal(decl) => Ok(emit_nominal_ref(f, ty, *decl)),
        Type::BoundGeneric { decl, args } => emit_generic_ref(f, ty, *decl, args),
        Type::Archetype(archetype) => f
            .lookup_local(ty, LocalDataKind::Metadata)
            .ok_or_else(|| {
                let name = cx.program.resolve(cx.program.archetype(*archetype).name);
                EmitError::UnboundArchetype(name.to_owned())
            }),
        Type::Tuple(elements) => emit_tuple_ref(f, ty, elements),
        Type::Function { input, result } => cached(f, ty, |f| {
            let input = emit_type_metadata_ref(f, input)?;
            let result = emit_type_metadata_ref(f, result)?;
            Ok(f.call(
                Callee::Runtime(RuntimeFn::GetFunctionMetadata),
                vec![input, result],
            ))
        }),
        Type::Metatype(instance) => cached(f, ty, |f| {
            let instance = emit_type_metadata_ref(f, instance)?;
            Ok(f.call(
                Callee::Runtime(RuntimeFn::GetMetatypeMetadata),
                vec![instance],
            ))
        }),
        Type::GenericFunction { .. }
        | Type::PolymorphicFunction { .. }
        | Type::Module(_)
        | Type::Array { .. }
        | Type::DependentMember { .. }
        | Type::ProtocolComposition(_)
        | Type::GenericParam { .. }
        | Type::LValue(_) => {
            f.unimplemented(format!(
                "metadata reference for {} type `{}`",
                ty.shape_name(),
                cx.program.display(ty)
            ));
            Ok(Operand::Undef)
        }
    }
}

/// Run `emit` unless `ty`'s metadata is already cached, caching the call
/// result it returns.
fn cached(
    f: &mut FunctionCtx,
    ty: &Type,
    emit: impl FnOnce(&mut FunctionCtx) -> Result<crate::ir::ValueId>,
) -> Result<Operand> {
    if let Some(value) = f.lookup_local(ty, LocalDataKind::Metadata) {
        return Ok(value);
    }
    let value = Operand::Value(emit(f)?);
    f.set_local(ty.clone(), LocalDataKind::Metadata, value.clone());
    Ok(value)
}

fn emit_nominal_ref(f: &mut FunctionCtx, ty: &Type, decl: DeclId) -> Operand {
    let cx = *f.module();
    let d = cx.program.decl(decl);
    if d.kind == DeclKind::Class && d.foreign {
        return cached_infallible(f, ty, |f| {
            f.call(
                Callee::Runtime(RuntimeFn::GetForeignClassMetadata),
                vec![Operand::Global(GlobalRef::ForeignClass(decl))],
            )
        });
    }
    if needs_runtime_init(&cx, decl) {
        return cached_infallible(f, ty, |f| {
            f.call(Callee::Global(GlobalRef::MetadataAccessor(decl)), vec![])
        });
    }
    Operand::Global(GlobalRef::TypeMetadata(decl))
}

fn cached_infallible(
    f: &mut FunctionCtx,
    ty: &Type,
    emit: impl FnOnce(&mut FunctionCtx) -> crate::ir::ValueId,
) -> Operand {
    if let Some(value) = f.lookup_local(ty, LocalDataKind::Metadata) {
        return value;
    }
    let value = Operand::Value(emit(f));
    f.set_local(ty.clone(), LocalDataKind::Metadata, value.clone());
    value
}

fn emit_generic_ref(
    f: &mut FunctionCtx,
    ty: &Type,
    decl: DeclId,
    args: &[Type],
) -> Result<Operand> {
    cached(f, ty, |f| {
        let arguments = collect_generic_arguments(f, decl, args)?;
        let buffer = arguments.store_to_buffer(f);
        Ok(f.call(
            Callee::Runtime(RuntimeFn::GetGenericMetadata),
            vec![
                Operand::Global(GlobalRef::Template(decl)),
                Operand::Value(buffer),
            ],
        ))
    })
}

fn emit_tuple_ref(
    f: &mut FunctionCtx,
    ty: &Type,
    elements: &[TupleElement],
) -> Result<Operand> {
    match elements {
        [] => return Ok(Operand::Global(GlobalRef::EmptyTupleMetadata)),
        [single] => return emit_type_metadata_ref(f, &single.ty),
        _ => {}
    }
    cached(f, ty, |f| {
        let metadata = elements
            .iter()
            .map(|e| emit_type_metadata_ref(f, &e.ty))
            .collect::<Result<Vec<_>>>()?;
        let labels = match tuple_labels(f, elements) {
            Some(labels) => Operand::Global(GlobalRef::TupleLabels(labels)),
            None => Operand::Null,
        };

        if let Some(constructor) = RuntimeFn::tuple_constructor(elements.len()) {
            let mut args = metadata;
            args.push(labels);
            args.push(Operand::Null);
            return Ok(f.call(Callee::Runtime(constructor), args));
        }

        let buffer = f.alloca(elements.len() as u32);
        for (i, element) in metadata.into_iter().enumerate() {
            f.store(element, Operand::Value(buffer), i as i64);
        }
        Ok(f.call(
            Callee::Runtime(RuntimeFn::GetTupleMetadata),
            vec![
                Operand::Int(elements.len() as i64),
                Operand::Value(buffer),
                labels,
                Operand::Null,
            ],
        ))
    })
}

/// Each label followed by a space, or a lone space for an unlabeled
/// element; `None` when no element is labeled.
fn tuple_labels(f: &FunctionCtx, elements: &[TupleElement]) -> Option<String> {
    if elements.iter().all(|e| e.label.is_none()) {
        return None;
    }
    let program = f.module().program;
    let mut labels = String::new();
    for element in elements {
        if let Some(label) = element.label {
            labels.push_str(program.resolve(label));
        }
        labels.push(' ');
    }
    Some(labels)
}

/// Emit a reference to `protocol`'s witness table for `ty`.
pub fn emit_witness_table_ref(
    f: &mut FunctionCtx,
    ty: &Type,
    protocol: DeclId,
) -> Result<Operand> {
    let cx = *f.module();
    match ty {
        Type::Archetype(archetype) => f
            .lookup_local(ty, LocalDataKind::WitnessTable(protocol))
            .ok_or_else(|| EmitError::UnboundWitnessTable {
                archetype: cx
                    .program
                    .resolve(cx.program.archetype(*archetype).name)
                    .to_owned(),
                protocol: cx.program.decl_name(protocol).to_owned(),
            }),
        Type::Nominal(conforming) => Ok(Operand::Global(GlobalRef::WitnessTable {
            conforming: *conforming,
            protocol,
        })),
        _ => {
            f.unimplemented(format!(
                "witness table for `{}` conforming to `{}`",
                cx.program.display(ty),
                cx.program.decl_name(protocol)
            ));
            Ok(Operand::Undef)
        }
    }
}

/// Emit a metatype value for `instance`, or nothing when the metatype is
/// trivial.
pub fn emit_metatype_ref(
    f: &mut FunctionCtx,
    instance: &Type,
) -> Result<Option<Operand>> {
    if f.module().lowering().has_trivial_metatype(instance) {
        return Ok(None);
    }
    emit_type_metadata_ref(f, instance).map(Some)
}

/// The metadata object describing instances of a class, as stored in
/// their headers. Foreign classes use their class object directly.
pub fn emit_class_heap_metadata_ref(
    f: &mut FunctionCtx,
    class: &Type,
) -> Result<Operand> {
    let cx = *f.module();
    if let Type::Nominal(decl) = class {
        let d = cx.program.decl(*decl);
        if d.kind == DeclKind::Class && d.foreign {
            return Ok(Operand::Global(GlobalRef::ForeignClass(*decl)));
        }
    }
    emit_type_metadata_ref(f, class)
}
