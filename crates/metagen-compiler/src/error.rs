//! Errors raised while laying out, building or referencing metadata.

use metagen_abi::HeaderError;

/// Internal-consistency failures of a layout walk.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("layout of `{decl}` never notes its address point")]
    MissingAddressPoint { decl: String },

    #[error("layout of `{decl}` notes its address point twice")]
    DuplicateAddressPoint { decl: String },

    #[error("{target} not found in layout of `{decl}`")]
    FieldNotFound { decl: String, target: String },

    #[error("{target} found {count} times in layout of `{decl}`")]
    AmbiguousField {
        decl: String,
        target: String,
        count: usize,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EmitError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Header(#[from] HeaderError),

    #[error("archetype `{0}` has no metadata bound in this function")]
    UnboundArchetype(String),

    #[error("archetype `{archetype}` has no `{protocol}` witness table bound in this function")]
    UnboundWitnessTable { archetype: String, protocol: String },

    #[error("`{0}` is generic and has no concrete metadata record")]
    GenericDeclaration(String),

    #[error("`{0}` is not generic and has no metadata template")]
    NotGeneric(String),

    #[error("`{0}` is provided by the foreign runtime and has no native metadata")]
    ForeignDeclaration(String),

    #[error("`{0}` is not a class")]
    NotAClass(String),
}
