//! Target configuration for metadata emission.

use metagen_abi::WordSize;
use serde::{Deserialize, Serialize};

/// Default number of words a result may occupy before it is returned
/// indirectly.
pub const DEFAULT_MAX_DIRECT_WORDS: u32 = 3;

/// Default root class name used when foreign-runtime interop is enabled.
pub const DEFAULT_ROOT_CLASS: &str = "MetagenObject";

/// Target properties that affect layout and lowering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "snake_case")]
pub struct TargetConfig {
    pub(crate) word_size: WordSize,
    /// Interoperate with a foreign object runtime.
    pub(crate) interop: bool,
    /// Superclass stored for root classes when `interop` is on.
    pub(crate) root_class: String,
    pub(crate) max_direct_words: u32,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            word_size: WordSize::W64,
            interop: false,
            root_class: DEFAULT_ROOT_CLASS.to_owned(),
            max_direct_words: DEFAULT_MAX_DIRECT_WORDS,
        }
    }
}

impl TargetConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn word_size(mut self, word_size: WordSize) -> Self {
        self.word_size = word_size;
        self
    }

    pub fn interop(mut self, value: bool) -> Self {
        self.interop = value;
        self
    }

    pub fn root_class(mut self, name: impl Into<String>) -> Self {
        self.root_class = name.into();
        self
    }

    pub fn max_direct_words(mut self, words: u32) -> Self {
        self.max_direct_words = words;
        self
    }

    pub fn word(&self) -> WordSize {
        self.word_size
    }

    pub fn has_interop(&self) -> bool {
        self.interop
    }

    pub fn root_class_name(&self) -> &str {
        &self.root_class
    }

    pub fn direct_word_limit(&self) -> u32 {
        self.max_direct_words
    }
}
