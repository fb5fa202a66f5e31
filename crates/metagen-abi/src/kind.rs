//! Metadata kind discriminants shared with the runtime.

/// Kind of a metadata record, as stored in its flags word.
///
/// Class metadata stores its metaclass pointer in the flags word instead;
/// any flags value above the largest kind is a class.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum MetadataKind {
    Class = 0,
    Struct = 1,
    Enum = 2,
    /// Builtin opaque value (integers, raw pointers).
    Opaque = 8,
    Tuple = 9,
    Function = 10,
    PolyFunction = 11,
    Existential = 12,
    Metatype = 13,
    /// Wrapper around a foreign runtime class.
    ForeignClassWrapper = 14,
}

impl MetadataKind {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Class),
            1 => Some(Self::Struct),
            2 => Some(Self::Enum),
            8 => Some(Self::Opaque),
            9 => Some(Self::Tuple),
            10 => Some(Self::Function),
            11 => Some(Self::PolyFunction),
            12 => Some(Self::Existential),
            13 => Some(Self::Metatype),
            14 => Some(Self::ForeignClassWrapper),
            _ => None,
        }
    }

    /// Value stored in the flags word.
    pub fn as_word(self) -> u64 {
        self as u8 as u64
    }

    pub fn is_nominal(self) -> bool {
        matches!(self, Self::Class | Self::Struct | Self::Enum)
    }

    pub fn is_class(self) -> bool {
        matches!(self, Self::Class | Self::ForeignClassWrapper)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Enum => "enum",
            Self::Opaque => "opaque",
            Self::Tuple => "tuple",
            Self::Function => "function",
            Self::PolyFunction => "polymorphic function",
            Self::Existential => "existential",
            Self::Metatype => "metatype",
            Self::ForeignClassWrapper => "foreign class wrapper",
        }
    }
}

impl From<metagen_core::DeclKind> for MetadataKind {
    fn from(kind: metagen_core::DeclKind) -> Self {
        match kind {
            metagen_core::DeclKind::Class => Self::Class,
            metagen_core::DeclKind::Struct => Self::Struct,
            metagen_core::DeclKind::Enum => Self::Enum,
            metagen_core::DeclKind::Protocol => Self::Existential,
        }
    }
}
