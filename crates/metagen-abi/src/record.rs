//! Built metadata records and generic templates.
//!
//! A record is an ordered list of word-sized slots. Slot indices are
//! absolute (template headers excluded); offsets are relative to the
//! address point and may be negative.

use metagen_core::{ArchetypeId, DeclId, FieldId, MethodId, Program, Type};

use crate::{FieldValue, GlobalRef, MetadataKind, TemplateHeader, WordSize};

/// What a slot holds. Member fields name the declaration they belong to,
/// which also identifies the declaring class in an inheritance chain.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum MetadataField {
    Flags,
    ValueWitnessTable,
    Destructor,
    Parent,
    Superclass,
    NominalTypeDescriptor,
    FieldOffset(FieldId),
    Method(MethodId),
    GenericArgument(ArchetypeId),
    GenericWitnessTable {
        archetype: ArchetypeId,
        protocol: DeclId,
    },
    DependentValueWitnessTable,
}

impl MetadataField {
    /// Whether the slot receives an instantiation argument.
    pub fn is_generic_requirement(self) -> bool {
        matches!(
            self,
            MetadataField::GenericArgument(_) | MetadataField::GenericWitnessTable { .. }
        )
    }

    pub fn describe(self, program: &Program) -> String {
        match self {
            MetadataField::Flags => "flags".to_owned(),
            MetadataField::ValueWitnessTable => "value witnesses".to_owned(),
            MetadataField::Destructor => "destructor".to_owned(),
            MetadataField::Parent => "parent".to_owned(),
            MetadataField::Superclass => "superclass".to_owned(),
            MetadataField::NominalTypeDescriptor => "descriptor".to_owned(),
            MetadataField::FieldOffset(f) => {
                let field = program.field(f);
                format!(
                    "field offset {}.{}",
                    program.decl_name(field.owner),
                    program.resolve(field.name)
                )
            }
            MetadataField::Method(m) => {
                let method = program.method(m);
                format!(
                    "method {}.{}",
                    program.decl_name(method.owner),
                    program.resolve(method.name)
                )
            }
            MetadataField::GenericArgument(a) => {
                format!("argument {}", program.resolve(program.archetype(a).name))
            }
            MetadataField::GenericWitnessTable {
                archetype,
                protocol,
            } => format!(
                "witness {}: {}",
                program.resolve(program.archetype(archetype).name),
                program.decl_name(protocol)
            ),
            MetadataField::DependentValueWitnessTable => "dependent witnesses".to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordSlot {
    pub field: MetadataField,
    pub value: FieldValue,
}

/// A null slot that must be patched once `target`'s metadata exists, or
/// its witness table for `protocol` when one is named.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingRelocation {
    pub slot: usize,
    pub target: Type,
    pub protocol: Option<DeclId>,
}

/// Byte offset of a method's virtual-table entry from the address point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VTableOffset {
    pub method: MethodId,
    pub offset: i64,
}

/// A link-time address inside an encoded record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relocation {
    pub offset: usize,
    pub target: GlobalRef,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataRecord {
    pub decl: DeclId,
    pub kind: MetadataKind,
    pub slots: Vec<RecordSlot>,
    pub address_point: usize,
    pub pending: Vec<PendingRelocation>,
    pub vtable_offsets: Vec<VTableOffset>,
    /// Whether the record may be placed in read-only memory.
    pub constant: bool,
}

impl MetadataRecord {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn size_bytes(&self, word: WordSize) -> usize {
        self.slots.len() * word.bytes()
    }

    pub fn address_point_bytes(&self, word: WordSize) -> usize {
        self.address_point * word.bytes()
    }

    /// Signed slot offset from the address point.
    pub fn offset_of(&self, slot: usize) -> i64 {
        slot as i64 - self.address_point as i64
    }

    /// Slot index of the first slot holding `field`.
    pub fn find(&self, field: MetadataField) -> Option<usize> {
        self.slots.iter().position(|s| s.field == field)
    }

    pub fn value_at_offset(&self, offset: i64) -> Option<&FieldValue> {
        let slot = usize::try_from(self.address_point as i64 + offset).ok()?;
        self.slots.get(slot).map(|s| &s.value)
    }

    /// Little-endian words; addresses are zero and listed by `relocations`.
    pub fn encode(&self, word: WordSize) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.size_bytes(word));
        for slot in &self.slots {
            let raw = match slot.value {
                FieldValue::Int(v) => v,
                FieldValue::Null | FieldValue::Address(_) => 0,
            };
            word.encode(raw, &mut bytes);
        }
        bytes
    }

    /// Address slots, with byte offsets starting at `base`.
    pub fn relocations(&self, word: WordSize, base: usize) -> Vec<Relocation> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| match &slot.value {
                FieldValue::Address(target) => Some(Relocation {
                    offset: base + i * word.bytes(),
                    target: target.clone(),
                }),
                _ => None,
            })
            .collect()
    }
}

/// Copy one instantiation argument into a record slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FillOp {
    /// Index into the instantiation argument buffer.
    pub from: u32,
    /// Destination slot, not counting the header.
    pub to: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataTemplate {
    pub header: TemplateHeader,
    pub record: MetadataRecord,
    pub fill_ops: Vec<FillOp>,
    /// Tail slot reserved for a dependent value-witness table.
    pub dependent_vwt: Option<usize>,
}

impl MetadataTemplate {
    pub fn decl(&self) -> DeclId {
        self.record.decl
    }

    pub fn encode(&self, word: WordSize) -> Vec<u8> {
        let mut bytes = self.header.encode(word);
        bytes.extend(self.record.encode(word));
        bytes
    }

    pub fn relocations(&self, word: WordSize) -> Vec<Relocation> {
        let mut relocations = vec![Relocation {
            offset: 0,
            target: self.header.fill_function.clone(),
        }];
        relocations.extend(
            self.record
                .relocations(word, TemplateHeader::encoded_len(word)),
        );
        relocations
    }
}
