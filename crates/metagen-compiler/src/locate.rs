//! Field locator: the slot offset of one field relative to the address
//! point, found by walking the same layout order the builders use.

use metagen_abi::MetadataField;
use metagen_core::{ArchetypeId, DeclId, FieldId, MethodId, Program};

use crate::layout::{LayoutOrder, LayoutVisitor};
use crate::{EmitError, LayoutError, ModuleCtx};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LocateTarget {
    Parent,
    ValueWitnessTable,
    GenericArgument(ArchetypeId),
    WitnessTable {
        archetype: ArchetypeId,
        protocol: DeclId,
    },
    FieldOffset(FieldId),
    Method(MethodId),
}

impl LocateTarget {
    fn matches(self, field: MetadataField) -> bool {
        match (self, field) {
            (LocateTarget::Parent, MetadataField::Parent)
            | (LocateTarget::ValueWitnessTable, MetadataField::ValueWitnessTable) => true,
            (LocateTarget::GenericArgument(a), MetadataField::GenericArgument(b)) => a == b,
            (
                LocateTarget::WitnessTable {
                    archetype,
                    protocol,
                },
                MetadataField::GenericWitnessTable {
                    archetype: a,
                    protocol: p,
                },
            ) => archetype == a && protocol == p,
            (LocateTarget::FieldOffset(a), MetadataField::FieldOffset(b)) => a == b,
            (LocateTarget::Method(a), MetadataField::Method(b)) => a == b,
            _ => false,
        }
    }

    fn field(self) -> MetadataField {
        match self {
            LocateTarget::Parent => MetadataField::Parent,
            LocateTarget::ValueWitnessTable => MetadataField::ValueWitnessTable,
            LocateTarget::GenericArgument(a) => MetadataField::GenericArgument(a),
            LocateTarget::WitnessTable {
                archetype,
                protocol,
            } => MetadataField::GenericWitnessTable {
                archetype,
                protocol,
            },
            LocateTarget::FieldOffset(f) => MetadataField::FieldOffset(f),
            LocateTarget::Method(m) => MetadataField::Method(m),
        }
    }

    pub fn describe(self, program: &Program) -> String {
        self.field().describe(program)
    }
}

struct FieldLocator {
    target: LocateTarget,
    found: Option<usize>,
    matches: usize,
}

impl LayoutVisitor for FieldLocator {
    type Error = LayoutError;

    fn field(&mut self, slot: usize, field: MetadataField) -> Result<(), LayoutError> {
        if self.target.matches(field) {
            self.found.get_or_insert(slot);
            self.matches += 1;
        }
        Ok(())
    }
}

/// Offset of `target` from the address point of `decl`'s metadata, in
/// words. Negative offsets precede the address point.
pub fn locate(cx: &ModuleCtx, decl: DeclId, target: LocateTarget) -> Result<i64, EmitError> {
    let order = LayoutOrder::for_decl(cx, decl);
    let offset = locate_in(&order, target).map_err(|err| match err {
        LayoutError::FieldNotFound { decl, .. } => LayoutError::FieldNotFound {
            decl,
            target: target.describe(cx.program),
        },
        LayoutError::AmbiguousField { decl, count, .. } => LayoutError::AmbiguousField {
            decl,
            target: target.describe(cx.program),
            count,
        },
        other => other,
    })?;
    Ok(offset)
}

/// Locate `target` in an explicit order.
pub fn locate_in(order: &LayoutOrder, target: LocateTarget) -> Result<i64, LayoutError> {
    let mut locator = FieldLocator {
        target,
        found: None,
        matches: 0,
    };
    let placement = order.walk(&mut locator)?;
    match (locator.found, locator.matches) {
        (Some(slot), 1) => Ok(placement.offset_of(slot)),
        (Some(_), count) => Err(LayoutError::AmbiguousField {
            decl: order.name().to_owned(),
            target: format!("{target:?}"),
            count,
        }),
        (None, _) => Err(LayoutError::FieldNotFound {
            decl: order.name().to_owned(),
            target: format!("{target:?}"),
        }),
    }
}

/// Byte offset of `target` from the address point.
pub fn locate_bytes(cx: &ModuleCtx, decl: DeclId, target: LocateTarget) -> Result<i64, EmitError> {
    Ok(locate(cx, decl, target)? * cx.word().bytes() as i64)
}
