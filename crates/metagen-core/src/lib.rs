#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Declaration and type model consumed by the metagen metadata engine.
//!
//! Two layers:
//! - **Deserialization layer** (`raw`): 1:1 mapping to the JSON program format, names as strings
//! - **Analysis layer** (`Program`): id-indexed declarations with resolved types
//!
//! Everything here is produced by the type checker and only read by the
//! engine.

pub mod colors;
mod decl;
mod interner;
mod invariants;
pub mod raw;
mod types;

#[cfg(test)]
mod types_tests;

pub use colors::Colors;
pub use decl::{
    ArchetypeDecl, ArchetypeId, DeclId, DeclKind, EnumCase, FieldDecl, FieldId, MethodDecl,
    MethodId, NominalDecl, Program,
};
pub use interner::{Interner, Symbol};
pub use raw::LoadError;
pub use types::{BuiltinType, DisplayType, SubstitutionMap, TupleElement, Type};
