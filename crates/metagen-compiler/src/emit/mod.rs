//! Whole-module metadata emission.
//!
//! Every native declaration gets either a concrete record or a template
//! with its fill routine. A failure in one declaration is recorded as a
//! diagnostic and does not stop the others.

mod module;


pub use module::{EmittedModule, ModulePending, emit_module};
