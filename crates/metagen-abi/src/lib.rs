//! Binary metadata format and runtime ABI.
//!
//! This crate contains:
//! - Record format definitions (`MetadataRecord`, `MetadataTemplate`, `TemplateHeader`)
//! - Word values and the global symbols they reference (`FieldValue`, `GlobalRef`)
//! - Runtime entry points (`RuntimeFn`) and metadata kinds (`MetadataKind`)
//! - A human-readable dump

pub mod dump;
mod header;
mod kind;
mod record;
mod runtime;
mod word;

#[cfg(test)]
mod dump_tests;
#[cfg(test)]
mod header_tests;
#[cfg(test)]
mod record_tests;
#[cfg(test)]
mod runtime_tests;

pub use dump::{dump_record, dump_template};
pub use header::{HEADER_FIELD_COUNT, HeaderError, PRIVATE_DATA_WORDS, TemplateHeader};
pub use kind::MetadataKind;
pub use record::{
    FillOp, MetadataField, MetadataRecord, MetadataTemplate, PendingRelocation, RecordSlot,
    Relocation, VTableOffset,
};
pub use runtime::RuntimeFn;
pub use word::{DisplayGlobal, DisplayValue, FieldValue, GlobalRef, WordSize, WordSizeError};
