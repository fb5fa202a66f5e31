//! Fill routines: copy instantiation arguments into a fresh copy of a
//! template and finish its dependent value-witness table.

use metagen_abi::{FillOp, RuntimeFn, WordSize};
use metagen_core::DeclId;

use crate::ModuleCtx;
use crate::function::FunctionCtx;
use crate::ir::{Callee, Function, Operand};

/// A value-witness table computed at instantiation from the tail slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DependentWitnessInit {
    /// Slot reserved for the table itself.
    pub table_slot: usize,
    /// The record's value-witness slot, which is pointed at the table.
    pub vwt_slot: usize,
    pub initializer: RuntimeFn,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FillRoutine {
    pub decl: DeclId,
    pub ops: Vec<FillOp>,
    pub address_point: usize,
    pub dependent_vwt: Option<DependentWitnessInit>,
}

impl FillRoutine {
    /// Lower to a function taking the record copy and the argument buffer.
    pub fn lower(&self, cx: &ModuleCtx) -> Function {
        let name = format!("fill_{}", cx.program.decl_name(self.decl));
        let mut f = FunctionCtx::new(cx, name);
        let record = Operand::Value(f.param());
        let args = Operand::Value(f.param());

        for op in &self.ops {
            let value = f.load(args.clone(), i64::from(op.from));
            f.store(Operand::Value(value), record.clone(), i64::from(op.to));
        }

        if let Some(init) = self.dependent_vwt {
            let table = f.slot_address(record.clone(), init.table_slot as i64);
            f.store(Operand::Value(table), record.clone(), init.vwt_slot as i64);
            let metadata = f.slot_address(record, self.address_point as i64);
            f.call_void(
                Callee::Runtime(init.initializer),
                vec![Operand::Value(metadata)],
            );
        }

        f.ret(None);
        f.finish().0
    }

    /// Execute the routine against a record copy held in `record`, which
    /// lives at `record_address`.
    ///
    /// Returns each runtime initializer called with the metadata address it
    /// was passed, or `None` without touching `record` when an operation
    /// indexes past `args` or `record`.
    pub fn apply(
        &self,
        record: &mut [u64],
        args: &[u64],
        record_address: u64,
        word: WordSize,
    ) -> Option<Vec<(RuntimeFn, u64)>> {
        let in_bounds = self
            .ops
            .iter()
            .all(|op| (op.from as usize) < args.len() && (op.to as usize) < record.len())
            && self.dependent_vwt.is_none_or(|init| init.vwt_slot < record.len());
        if !in_bounds {
            return None;
        }

        let slot_address = |slot: usize| record_address + (slot * word.bytes()) as u64;
        for op in &self.ops {
            record[op.to as usize] = args[op.from as usize];
        }
        let mut calls = Vec::new();
        if let Some(init) = self.dependent_vwt {
            record[init.vwt_slot] = slot_address(init.table_slot);
            calls.push((init.initializer, slot_address(self.address_point)));
        }
        Some(calls)
    }
}
