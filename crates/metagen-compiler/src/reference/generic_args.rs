//! Instantiation arguments for a generic declaration.

use metagen_core::{DeclId, SubstitutionMap, Type};

use super::{emit_type_metadata_ref, emit_witness_table_ref};
use crate::function::FunctionCtx;
use crate::ir::{Operand, ValueId};
use crate::layout::template_arguments;
use crate::Result;

/// One value per entry of the declaration's template argument buffer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenericArguments {
    pub values: Vec<Operand>,
}

impl GenericArguments {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Spill the arguments into a stack buffer, one word each.
    pub fn store_to_buffer(self, f: &mut FunctionCtx) -> ValueId {
        let buffer = f.alloca(self.values.len() as u32);
        for (i, value) in self.values.into_iter().enumerate() {
            f.store(value, Operand::Value(buffer), i as i64);
        }
        buffer
    }
}

/// Bind `decl`'s template arguments to `args`, in buffer order.
///
/// Entries that mention a parameter `args` leaves unbound are `undef`.
pub fn collect_generic_arguments(
    f: &mut FunctionCtx,
    decl: DeclId,
    args: &[Type],
) -> Result<GenericArguments> {
    let program = f.module().program;
    let subs = program.substitutions(decl, args);
    let complete = subs.len() == program.decl(decl).generic_params.len();
    let mut values = Vec::new();
    for argument in template_arguments(program, decl) {
        if !complete && mentions_unbound(&argument.ty, &subs) {
            values.push(Operand::Undef);
            continue;
        }
        let bound = argument.ty.substitute(&subs);
        let value = match argument.protocol {
            None => emit_type_metadata_ref(f, &bound)?,
            Some(protocol) => emit_witness_table_ref(f, &bound, protocol)?,
        };
        values.push(value);
    }
    Ok(GenericArguments { values })
}

/// Entry types only mention the template's own archetypes, so erasing the
/// bound ones leaves an archetype exactly when one is unbound.
fn mentions_unbound(ty: &Type, subs: &SubstitutionMap) -> bool {
    let erased: SubstitutionMap = subs.keys().map(|&a| (a, Type::unit())).collect();
    ty.substitute(&erased).contains_archetype()
}
