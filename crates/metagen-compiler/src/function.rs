//! Per-function code generation session.
//!
//! A [`FunctionCtx`] owns the instruction stream being built, the
//! metadata already bound in the function (generic parameters passed in by
//! the caller) and a cache of references computed so far, so each type's
//! metadata is obtained at most once per function.

use std::collections::HashMap;

use metagen_core::{ArchetypeId, DeclId, Type};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::ir::{Callee, Function, Inst, Operand, ValueId};
use crate::ModuleCtx;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum LocalDataKind {
    Metadata,
    WitnessTable(DeclId),
}

#[derive(Clone, Debug, Default)]
pub struct LocalReferenceCache {
    entries: HashMap<(Type, LocalDataKind), Operand>,
}

impl LocalReferenceCache {
    pub fn get(&self, ty: &Type, kind: LocalDataKind) -> Option<&Operand> {
        self.entries.get(&(ty.clone(), kind))
    }

    pub fn insert(&mut self, ty: Type, kind: LocalDataKind, value: Operand) {
        self.entries.insert((ty, kind), value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct FunctionCtx<'a> {
    cx: ModuleCtx<'a>,
    name: String,
    params: Vec<ValueId>,
    body: Vec<Inst>,
    next_value: u32,
    cache: LocalReferenceCache,
    diagnostics: Diagnostics,
}

impl<'a> FunctionCtx<'a> {
    pub fn new(cx: &ModuleCtx<'a>, name: impl Into<String>) -> Self {
        Self {
            cx: *cx,
            name: name.into(),
            params: Vec::new(),
            body: Vec::new(),
            next_value: 0,
            cache: LocalReferenceCache::default(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// A function generic over `decl`'s parameters: one metadata parameter
    /// per archetype, then one witness-table parameter per requirement, in
    /// instantiation-argument order.
    pub fn in_generic_context(cx: &ModuleCtx<'a>, name: impl Into<String>, decl: DeclId) -> Self {
        let mut f = Self::new(cx, name);
        let params = cx.program.decl(decl).generic_params.clone();
        for &archetype in &params {
            let value = f.param();
            f.bind_archetype_metadata(archetype, Operand::Value(value));
        }
        for &archetype in &params {
            for &protocol in &cx.program.archetype(archetype).conforms_to {
                if cx.program.requires_witness_table(protocol) {
                    let value = f.param();
                    f.bind_witness_table(archetype, protocol, Operand::Value(value));
                }
            }
        }
        f
    }

    pub fn module(&self) -> &ModuleCtx<'a> {
        &self.cx
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[ValueId] {
        &self.params
    }

    pub fn body(&self) -> &[Inst] {
        &self.body
    }

    pub fn cache(&self) -> &LocalReferenceCache {
        &self.cache
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    fn fresh(&mut self) -> ValueId {
        let id = ValueId::new(self.next_value);
        self.next_value += 1;
        id
    }

    pub fn param(&mut self) -> ValueId {
        let id = self.fresh();
        self.params.push(id);
        id
    }

    pub fn bind_archetype_metadata(&mut self, archetype: ArchetypeId, value: Operand) {
        self.cache
            .insert(Type::Archetype(archetype), LocalDataKind::Metadata, value);
    }

    pub fn bind_witness_table(&mut self, archetype: ArchetypeId, protocol: DeclId, value: Operand) {
        self.cache.insert(
            Type::Archetype(archetype),
            LocalDataKind::WitnessTable(protocol),
            value,
        );
    }

    pub fn lookup_local(&self, ty: &Type, kind: LocalDataKind) -> Option<Operand> {
        let found = self.cache.get(ty, kind).cloned();
        if found.is_some() {
            tracing::trace!(function = %self.name, ?kind, "local reference cache hit");
        }
        found
    }

    pub fn set_local(&mut self, ty: Type, kind: LocalDataKind, value: Operand) {
        self.cache.insert(ty, kind, value);
    }

    pub fn call(&mut self, callee: Callee, args: Vec<Operand>) -> ValueId {
        if let Callee::Runtime(runtime) = &callee {
            debug_assert_eq!(args.len(), runtime.arity(), "{}", runtime.symbol());
            debug_assert!(runtime.returns_metadata(), "{}", runtime.symbol());
        }
        let dest = self.fresh();
        self.body.push(Inst::Call {
            dest: Some(dest),
            callee,
            args,
        });
        dest
    }

    pub fn call_void(&mut self, callee: Callee, args: Vec<Operand>) {
        if let Callee::Runtime(runtime) = &callee {
            debug_assert_eq!(args.len(), runtime.arity(), "{}", runtime.symbol());
            debug_assert!(!runtime.returns_metadata(), "{}", runtime.symbol());
        }
        self.body.push(Inst::Call {
            dest: None,
            callee,
            args,
        });
    }

    pub fn alloca(&mut self, words: u32) -> ValueId {
        let dest = self.fresh();
        self.body.push(Inst::Alloca { dest, words });
        dest
    }

    pub fn load(&mut self, base: Operand, index: i64) -> ValueId {
        let dest = self.fresh();
        self.body.push(Inst::Load { dest, base, index });
        dest
    }

    pub fn store(&mut self, value: Operand, base: Operand, index: i64) {
        self.body.push(Inst::Store { value, base, index });
    }

    pub fn slot_address(&mut self, base: Operand, index: i64) -> ValueId {
        let dest = self.fresh();
        self.body.push(Inst::SlotAddress { dest, base, index });
        dest
    }

    pub fn ret(&mut self, value: Option<Operand>) {
        self.body.push(Inst::Return(value));
    }

    /// Report a type shape or conformance with no metadata support.
    pub fn unimplemented(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(function = %self.name, "unimplemented: {message}");
        self.diagnostics.push(Diagnostic::unimplemented(message));
    }

    pub fn finish(self) -> (Function, Diagnostics) {
        (
            Function {
                name: self.name,
                params: self.params,
                body: self.body,
            },
            self.diagnostics,
        )
    }
}
