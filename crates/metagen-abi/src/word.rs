//! Word-sized record field values and the global symbols they point at.

use std::fmt;

use metagen_core::{DeclId, MethodId, Program};
use serde::{Deserialize, Serialize};

/// Target pointer width. Every metadata field occupies one word.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WordSize {
    W32,
    #[default]
    W64,
}

impl WordSize {
    pub fn bytes(self) -> usize {
        match self {
            WordSize::W32 => 4,
            WordSize::W64 => 8,
        }
    }

    pub fn bits(self) -> u16 {
        self.bytes() as u16 * 8
    }

    /// Little-endian encoding of `value` truncated to one word.
    pub fn encode(self, value: u64, out: &mut Vec<u8>) {
        match self {
            WordSize::W32 => out.extend_from_slice(&(value as u32).to_le_bytes()),
            WordSize::W64 => out.extend_from_slice(&value.to_le_bytes()),
        }
    }
}

impl From<WordSize> for u8 {
    fn from(word: WordSize) -> Self {
        word.bytes() as u8
    }
}

/// Link-time symbol a metadata field may point at.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum GlobalRef {
    /// Address point of a non-generic type's metadata record.
    TypeMetadata(DeclId),
    /// Metadata of the builtin integer type of the given width.
    IntegerMetadata(u16),
    NativeObjectMetadata,
    EmptyTupleMetadata,
    Template(DeclId),
    FillFunction(DeclId),
    Metaclass(DeclId),
    Destructor(DeclId),
    /// Class object of a foreign runtime class.
    ForeignClass(DeclId),
    /// Configured root class of the foreign runtime.
    RootClass(String),
    ValueWitnesses(DeclId),
    NativeObjectWitnesses,
    UnknownObjectWitnesses,
    OpaqueExistentialWitnesses,
    Method(MethodId),
    WitnessTable { conforming: DeclId, protocol: DeclId },
    /// Lazy metadata accessor of a type whose record needs runtime patching.
    MetadataAccessor(DeclId),
    /// Space-terminated tuple label string.
    TupleLabels(String),
}

impl GlobalRef {
    pub fn display<'a>(&'a self, program: &'a Program) -> DisplayGlobal<'a> {
        DisplayGlobal {
            global: self,
            program,
        }
    }
}

pub struct DisplayGlobal<'a> {
    global: &'a GlobalRef,
    program: &'a Program,
}

impl fmt::Display for DisplayGlobal<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.program;
        match self.global {
            GlobalRef::TypeMetadata(d) => write!(f, "metadata({})", p.decl_name(*d)),
            GlobalRef::IntegerMetadata(bits) => write!(f, "metadata(Builtin.Int{bits})"),
            GlobalRef::NativeObjectMetadata => f.write_str("metadata(Builtin.NativeObject)"),
            GlobalRef::EmptyTupleMetadata => f.write_str("metadata(())"),
            GlobalRef::Template(d) => write!(f, "template({})", p.decl_name(*d)),
            GlobalRef::FillFunction(d) => write!(f, "fill({})", p.decl_name(*d)),
            GlobalRef::Metaclass(d) => write!(f, "metaclass({})", p.decl_name(*d)),
            GlobalRef::Destructor(d) => write!(f, "destructor({})", p.decl_name(*d)),
            GlobalRef::ForeignClass(d) => write!(f, "class({})", p.decl_name(*d)),
            GlobalRef::RootClass(name) => write!(f, "class({name})"),
            GlobalRef::ValueWitnesses(d) => write!(f, "witnesses({})", p.decl_name(*d)),
            GlobalRef::NativeObjectWitnesses => f.write_str("witnesses(Builtin.NativeObject)"),
            GlobalRef::UnknownObjectWitnesses => f.write_str("witnesses(Builtin.UnknownObject)"),
            GlobalRef::OpaqueExistentialWitnesses => f.write_str("witnesses(existential)"),
            GlobalRef::Method(m) => {
                let method = p.method(*m);
                write!(
                    f,
                    "{}.{}",
                    p.decl_name(method.owner),
                    p.resolve(method.name)
                )
            }
            GlobalRef::WitnessTable {
                conforming,
                protocol,
            } => write!(
                f,
                "conformance({}: {})",
                p.decl_name(*conforming),
                p.decl_name(*protocol)
            ),
            GlobalRef::MetadataAccessor(d) => write!(f, "accessor({})", p.decl_name(*d)),
            GlobalRef::TupleLabels(labels) => write!(f, "labels({labels:?})"),
        }
    }
}

/// One word of a metadata record.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum FieldValue {
    Null,
    Int(u64),
    Address(GlobalRef),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn display<'a>(&'a self, program: &'a Program) -> DisplayValue<'a> {
        DisplayValue {
            value: self,
            program,
        }
    }
}

pub struct DisplayValue<'a> {
    value: &'a FieldValue,
    program: &'a Program,
}

impl fmt::Display for DisplayValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            FieldValue::Null => f.write_str("null"),
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Address(global) => write!(f, "&{}", global.display(self.program)),
        }
    }
}
