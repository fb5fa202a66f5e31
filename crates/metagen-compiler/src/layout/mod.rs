//! Canonical metadata layout.
//!
//! Every type kind has one slot order, described once as a [`LayoutOrder`]
//! and walked by every consumer: the record builder, the template builder
//! and the field locator all fold over the same steps, so a slot's position
//! can never disagree between the code that writes a record and the code
//! that reads it.

mod order;

#[cfg(test)]
mod layout_tests;

use metagen_abi::{MetadataField, MetadataKind};
use metagen_core::DeclId;

use crate::{LayoutError, ModuleCtx};

pub use order::{TemplateArgument, generic_requirements, template_arguments};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutStep {
    /// Emit one word-sized slot.
    Field(MetadataField),
    /// The address point falls before the next slot.
    AddressPoint,
}

/// Concrete records and generic templates lay out the same kind slightly
/// differently: templates may carry a trailing dependent witness table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutMode {
    Concrete,
    Template,
}

/// Where the walk ended up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub slot_count: usize,
    pub address_point: usize,
}

impl Placement {
    /// Signed offset of `slot` from the address point.
    pub fn offset_of(&self, slot: usize) -> i64 {
        slot as i64 - self.address_point as i64
    }
}

/// Receives each step of a layout walk, in order.
pub trait LayoutVisitor {
    type Error: From<LayoutError>;

    fn field(&mut self, slot: usize, field: MetadataField) -> Result<(), Self::Error>;

    fn address_point(&mut self, _slot: usize) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Cursor {
    next_slot: usize,
    address_point: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutOrder {
    decl: DeclId,
    name: String,
    kind: MetadataKind,
    mode: LayoutMode,
    steps: Vec<LayoutStep>,
}

impl LayoutOrder {
    /// The order used for `decl`: templates for generic declarations,
    /// concrete records otherwise.
    pub fn for_decl(cx: &ModuleCtx, decl: DeclId) -> Self {
        let mode = if cx.program.is_generic(decl) {
            LayoutMode::Template
        } else {
            LayoutMode::Concrete
        };
        Self::with_mode(cx, decl, mode)
    }

    pub fn with_mode(cx: &ModuleCtx, decl: DeclId, mode: LayoutMode) -> Self {
        let kind = MetadataKind::from(cx.program.decl(decl).kind);
        let steps = order::steps(cx, decl, mode);
        Self {
            decl,
            name: cx.program.decl_name(decl).to_owned(),
            kind,
            mode,
            steps,
        }
    }

    /// A hand-written order, for walks that do not come from a declaration.
    pub fn from_steps(
        decl: DeclId,
        name: impl Into<String>,
        kind: MetadataKind,
        steps: Vec<LayoutStep>,
    ) -> Self {
        Self {
            decl,
            name: name.into(),
            kind,
            mode: LayoutMode::Concrete,
            steps,
        }
    }

    pub fn decl(&self) -> DeclId {
        self.decl
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> MetadataKind {
        self.kind
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn steps(&self) -> &[LayoutStep] {
        &self.steps
    }

    pub fn fields(&self) -> impl Iterator<Item = MetadataField> + '_ {
        self.steps.iter().filter_map(|step| match step {
            LayoutStep::Field(field) => Some(*field),
            LayoutStep::AddressPoint => None,
        })
    }

    /// Fold the steps through `visitor`, numbering slots from zero.
    ///
    /// Fails unless the address point is noted exactly once.
    pub fn walk<V: LayoutVisitor>(&self, visitor: &mut V) -> Result<Placement, V::Error> {
        let cursor = self.steps.iter().try_fold(
            Cursor::default(),
            |cursor, step| -> Result<Cursor, V::Error> {
                match *step {
                    LayoutStep::Field(field) => {
                        visitor.field(cursor.next_slot, field)?;
                        Ok(Cursor {
                            next_slot: cursor.next_slot + 1,
                            ..cursor
                        })
                    }
                    LayoutStep::AddressPoint => {
                        if cursor.address_point.is_some() {
                            return Err(LayoutError::DuplicateAddressPoint {
                                decl: self.name.clone(),
                            }
                            .into());
                        }
                        visitor.address_point(cursor.next_slot)?;
                        Ok(Cursor {
                            address_point: Some(cursor.next_slot),
                            ..cursor
                        })
                    }
                }
            },
        )?;

        let address_point = cursor.address_point.ok_or_else(|| LayoutError::MissingAddressPoint {
            decl: self.name.clone(),
        })?;
        Ok(Placement {
            slot_count: cursor.next_slot,
            address_point,
        })
    }
}
