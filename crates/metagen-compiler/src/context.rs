//! Module-wide emission context.

use metagen_abi::WordSize;
use metagen_core::Program;

use crate::TargetConfig;
use crate::lowering::TypeLowering;

/// The declarations being compiled and the target they are compiled for.
#[derive(Clone, Copy, Debug)]
pub struct ModuleCtx<'a> {
    pub program: &'a Program,
    pub config: &'a TargetConfig,
}

impl<'a> ModuleCtx<'a> {
    pub fn new(program: &'a Program, config: &'a TargetConfig) -> Self {
        Self { program, config }
    }

    pub fn word(&self) -> WordSize {
        self.config.word()
    }

    pub fn lowering(&self) -> TypeLowering<'a> {
        TypeLowering::new(self.program, self.config)
    }
}
