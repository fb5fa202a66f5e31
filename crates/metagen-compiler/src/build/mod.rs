//! Metadata record and template building.
//!
//! A [`RecordBuilder`] walks a declaration's layout order and produces the
//! value of each slot. Kind-specific values (flags and value witnesses)
//! come from a small hook table selected by declaration kind; everything
//! else is shared. Templates wrap the same builder and additionally record
//! where each instantiation argument goes.

mod fill;
mod template;

#[cfg(test)]
mod build_tests;

use indexmap::IndexMap;
use metagen_abi::{
    FieldValue, GlobalRef, MetadataField, MetadataKind, MetadataRecord, PendingRelocation,
    RecordSlot, VTableOffset,
};
use metagen_core::{ArchetypeId, BuiltinType, DeclId, DeclKind, MethodId, Type};

use crate::layout::{LayoutOrder, LayoutVisitor};
use crate::overrides::final_overriders;
use crate::{EmitError, ModuleCtx};

pub use fill::{DependentWitnessInit, FillRoutine};
pub use template::{BuiltTemplate, build_template};

/// Values that differ by declaration kind.
struct KindHooks {
    flags: fn(&ModuleCtx, DeclId) -> FieldValue,
    value_witnesses: fn(&ModuleCtx, DeclId) -> FieldValue,
}

static CLASS_HOOKS: KindHooks = KindHooks {
    flags: |_, decl| FieldValue::Address(GlobalRef::Metaclass(decl)),
    value_witnesses: |cx, decl| {
        if cx.program.has_foreign_ancestry(decl) {
            FieldValue::Address(GlobalRef::UnknownObjectWitnesses)
        } else {
            FieldValue::Address(GlobalRef::NativeObjectWitnesses)
        }
    },
};

static STRUCT_HOOKS: KindHooks = KindHooks {
    flags: |_, _| FieldValue::Int(MetadataKind::Struct.as_word()),
    value_witnesses: |_, decl| FieldValue::Address(GlobalRef::ValueWitnesses(decl)),
};

static ENUM_HOOKS: KindHooks = KindHooks {
    flags: |_, _| FieldValue::Int(MetadataKind::Enum.as_word()),
    value_witnesses: |_, decl| FieldValue::Address(GlobalRef::ValueWitnesses(decl)),
};

static PROTOCOL_HOOKS: KindHooks = KindHooks {
    flags: |_, _| FieldValue::Int(MetadataKind::Existential.as_word()),
    value_witnesses: |_, _| FieldValue::Address(GlobalRef::OpaqueExistentialWitnesses),
};

fn hooks_for(kind: DeclKind) -> &'static KindHooks {
    match kind {
        DeclKind::Class => &CLASS_HOOKS,
        DeclKind::Struct => &STRUCT_HOOKS,
        DeclKind::Enum => &ENUM_HOOKS,
        DeclKind::Protocol => &PROTOCOL_HOOKS,
    }
}

/// Produces slot values while a layout order is walked.
pub(crate) struct RecordBuilder<'a> {
    cx: &'a ModuleCtx<'a>,
    decl: DeclId,
    hooks: &'static KindHooks,
    finals: IndexMap<MethodId, MethodId>,
    slots: Vec<RecordSlot>,
    pending: Vec<PendingRelocation>,
    methods: Vec<(MethodId, usize)>,
    address_point: Option<usize>,
    /// Requirement slots are written by a fill routine rather than patched.
    template: bool,
}

impl<'a> RecordBuilder<'a> {
    pub(crate) fn new(cx: &'a ModuleCtx<'a>, decl: DeclId) -> Self {
        let kind = cx.program.decl(decl).kind;
        let finals = if kind == DeclKind::Class {
            final_overriders(cx, decl)
        } else {
            IndexMap::new()
        };
        Self {
            cx,
            decl,
            hooks: hooks_for(kind),
            finals,
            slots: Vec::new(),
            pending: Vec::new(),
            methods: Vec::new(),
            address_point: None,
            template: cx.program.is_generic(decl),
        }
    }

    pub(crate) fn finish(self, order: &LayoutOrder, constant: bool) -> MetadataRecord {
        let address_point = self.address_point.unwrap_or(0);
        let word = self.cx.word().bytes() as i64;
        let vtable_offsets = self
            .methods
            .iter()
            .map(|&(method, slot)| VTableOffset {
                method,
                offset: (slot as i64 - address_point as i64) * word,
            })
            .collect();
        MetadataRecord {
            decl: self.decl,
            kind: order.kind(),
            slots: self.slots,
            address_point,
            pending: self.pending,
            vtable_offsets,
            constant,
        }
    }

    fn push(&mut self, field: MetadataField, value: FieldValue) {
        self.slots.push(RecordSlot { field, value });
    }

    fn push_pending(&mut self, field: MetadataField, target: Type, protocol: Option<DeclId>) {
        tracing::trace!(
            slot = self.slots.len(),
            target = %self.cx.program.display(&target),
            "pending relocation"
        );
        self.pending.push(PendingRelocation {
            slot: self.slots.len(),
            target,
            protocol,
        });
        self.push(field, FieldValue::Null);
    }

    fn parent(&mut self, field: MetadataField) {
        match self.cx.program.decl(self.decl).parent {
            None => self.push(field, FieldValue::Null),
            Some(parent) if !self.cx.program.is_generic(parent) => {
                self.push(field, FieldValue::Address(GlobalRef::TypeMetadata(parent)))
            }
            Some(parent) => {
                let target = self.cx.program.declared_type(parent);
                self.push_pending(field, target, None)
            }
        }
    }

    fn superclass(&mut self, field: MetadataField) {
        let value = match &self.cx.program.decl(self.decl).superclass {
            None if self.cx.config.has_interop() => FieldValue::Address(GlobalRef::RootClass(
                self.cx.config.root_class_name().to_owned(),
            )),
            None => FieldValue::Null,
            Some(Type::Nominal(superclass)) if self.cx.program.decl(*superclass).foreign => {
                FieldValue::Address(GlobalRef::ForeignClass(*superclass))
            }
            Some(Type::Nominal(superclass)) => {
                FieldValue::Address(GlobalRef::TypeMetadata(*superclass))
            }
            // TODO: fill a superclass bound to the template's own arguments
            // from the argument buffer.
            Some(bound) if self.template && bound.contains_archetype() => FieldValue::Null,
            Some(bound) => return self.push_pending(field, bound.clone(), None),
        };
        self.push(field, value);
    }

    /// Requirements of the declaration itself are left for the fill
    /// routine. Inherited ones are bound by the superclass type, and in a
    /// template are also rewritten by the fill routine.
    fn generic_argument(&mut self, field: MetadataField, archetype: ArchetypeId) {
        let Some(bound) = self.inherited_binding(archetype) else {
            return self.push(field, FieldValue::Null);
        };
        match constant_metadata(self.cx, &bound) {
            Some(global) => self.push(field, FieldValue::Address(global)),
            None if self.template => self.push(field, FieldValue::Null),
            None => self.push_pending(field, bound, None),
        }
    }

    fn generic_witness_table(
        &mut self,
        field: MetadataField,
        archetype: ArchetypeId,
        protocol: DeclId,
    ) {
        match self.inherited_binding(archetype) {
            Some(Type::Nominal(conforming)) => self.push(
                field,
                FieldValue::Address(GlobalRef::WitnessTable {
                    conforming,
                    protocol,
                }),
            ),
            Some(bound) if !self.template => self.push_pending(field, bound, Some(protocol)),
            _ => self.push(field, FieldValue::Null),
        }
    }

    /// What the superclass chain binds an ancestor's archetype to, unless
    /// it is only known per instantiation.
    fn inherited_binding(&self, archetype: ArchetypeId) -> Option<Type> {
        let owner = self.cx.program.archetype(archetype).owner;
        if owner == self.decl {
            return None;
        }
        let subs = self.cx.program.ancestor_substitutions(self.decl, owner);
        subs.get(&archetype)
            .filter(|bound| !(self.template && bound.contains_archetype()))
            .cloned()
    }
}

impl LayoutVisitor for RecordBuilder<'_> {
    type Error = EmitError;

    fn field(&mut self, slot: usize, field: MetadataField) -> Result<(), EmitError> {
        debug_assert_eq!(slot, self.slots.len());
        match field {
            MetadataField::Flags => {
                let value = (self.hooks.flags)(self.cx, self.decl);
                self.push(field, value);
            }
            MetadataField::ValueWitnessTable => {
                let value = (self.hooks.value_witnesses)(self.cx, self.decl);
                self.push(field, value);
            }
            MetadataField::Destructor => {
                self.push(field, FieldValue::Address(GlobalRef::Destructor(self.decl)))
            }
            MetadataField::Parent => self.parent(field),
            MetadataField::Superclass => self.superclass(field),
            MetadataField::NominalTypeDescriptor | MetadataField::DependentValueWitnessTable => {
                self.push(field, FieldValue::Null)
            }
            // Filled in when the class is realized at run time.
            MetadataField::FieldOffset(_) => self.push(field, FieldValue::Int(0)),
            MetadataField::Method(method) => {
                let implementation = self.finals.get(&method).copied().unwrap_or(method);
                self.methods.push((method, slot));
                self.push(field, FieldValue::Address(GlobalRef::Method(implementation)));
            }
            MetadataField::GenericArgument(archetype) => self.generic_argument(field, archetype),
            MetadataField::GenericWitnessTable {
                archetype,
                protocol,
            } => self.generic_witness_table(field, archetype, protocol),
        }
        Ok(())
    }

    fn address_point(&mut self, slot: usize) -> Result<(), EmitError> {
        self.address_point = Some(slot);
        Ok(())
    }
}

/// Build the concrete metadata record of a non-generic declaration.
pub fn build_record(cx: &ModuleCtx, decl: DeclId) -> Result<MetadataRecord, EmitError> {
    let d = cx.program.decl(decl);
    let name = cx.program.decl_name(decl);
    if d.foreign {
        return Err(EmitError::ForeignDeclaration(name.to_owned()));
    }
    if cx.program.is_generic(decl) {
        return Err(EmitError::GenericDeclaration(name.to_owned()));
    }

    let order = LayoutOrder::for_decl(cx, decl);
    let mut builder = RecordBuilder::new(cx, decl);
    let placement = order.walk(&mut builder)?;
    // Class records are completed by the runtime when the class is realized.
    let constant = d.kind != DeclKind::Class;
    let record = builder.finish(&order, constant);

    tracing::debug!(
        decl = name,
        slots = placement.slot_count,
        address_point = placement.address_point,
        pending = record.pending.len(),
        "built metadata record"
    );
    Ok(record)
}

/// Address of a type's metadata when it is a link-time constant.
pub fn constant_metadata(cx: &ModuleCtx, ty: &Type) -> Option<GlobalRef> {
    match ty {
        Type::Builtin(builtin) => Some(builtin_metadata(cx, *builtin)),
        Type::Nominal(decl) => {
            let d = cx.program.decl(*decl);
            if d.foreign || needs_runtime_init(cx, *decl) {
                None
            } else {
                Some(GlobalRef::TypeMetadata(*decl))
            }
        }
        Type::Tuple(elements) => match elements.as_slice() {
            [] => Some(GlobalRef::EmptyTupleMetadata),
            [single] => constant_metadata(cx, &single.ty),
            _ => None,
        },
        _ => None,
    }
}

pub fn builtin_metadata(cx: &ModuleCtx, builtin: BuiltinType) -> GlobalRef {
    match builtin {
        BuiltinType::Int(bits) | BuiltinType::Float(bits) => GlobalRef::IntegerMetadata(bits),
        BuiltinType::RawPointer => GlobalRef::IntegerMetadata(cx.word().bits()),
        BuiltinType::NativeObject => GlobalRef::NativeObjectMetadata,
    }
}

/// Whether a non-generic declaration's record has slots that can only be
/// written at run time, so references must go through its accessor.
pub fn needs_runtime_init(cx: &ModuleCtx, decl: DeclId) -> bool {
    let d = cx.program.decl(decl);
    if d.parent.is_some_and(|parent| cx.program.is_generic(parent)) {
        return true;
    }
    d.kind == DeclKind::Class && matches!(d.superclass, Some(Type::BoundGeneric { .. }))
}
