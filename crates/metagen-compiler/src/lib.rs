//! Metagen compiler: metadata layout, record building and reference emission.
//!
//! This crate turns a type-checked [`Program`](metagen_core::Program) into
//! runtime type metadata:
//! - `layout` - canonical slot order per type kind, walked as a fold
//! - `locate` - offset of a field relative to the address point
//! - `build` - concrete records, generic templates and fill routines
//! - `overrides` - vtable slot decisions for overriding methods
//! - `lowering` - the ABI shape of a type (address-only, explosion, indirect)
//! - `reference` - code that obtains metadata at run time
//! - `emit` - whole-module emission with per-declaration diagnostics

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod build;
mod config;
mod context;
pub mod diagnostics;
pub mod emit;
mod error;
pub mod function;
pub mod ir;
pub mod layout;
pub mod locate;
pub mod lowering;
pub mod overrides;
pub mod reference;

#[cfg(test)]
mod config_tests;
#[cfg(test)]
pub mod test_utils;

pub use build::{BuiltTemplate, FillRoutine, build_record, build_template};
pub use config::TargetConfig;
pub use context::ModuleCtx;
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use emit::{EmittedModule, emit_module};
pub use error::{EmitError, LayoutError};
pub use function::FunctionCtx;
pub use layout::LayoutOrder;
pub use locate::{LocateTarget, locate, locate_bytes};

/// Result type for metadata emission.
pub type Result<T> = std::result::Result<T, EmitError>;
