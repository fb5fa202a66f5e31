//! Runtime entry points called by emitted code.
//!
//! Argument order and count are part of the binary contract with the
//! runtime and must match what the record builders emit.

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum RuntimeFn {
    /// `(template*, arguments*) -> metadata*`; uniqued per argument tuple.
    GetGenericMetadata,
    /// `(class) -> metadata*`
    GetForeignClassMetadata,
    /// `(count, elements*, labels, proposed) -> metadata*`
    GetTupleMetadata,
    /// `(e0, e1, labels, proposed) -> metadata*`
    GetTupleMetadata2,
    /// `(e0, e1, e2, labels, proposed) -> metadata*`
    GetTupleMetadata3,
    /// `(argument, result) -> metadata*`
    GetFunctionMetadata,
    /// `(instance) -> metadata*`
    GetMetatypeMetadata,
    /// `(metadata*) -> void`
    InitStructValueWitnessTable,
    /// `(metadata*) -> void`
    InitEnumValueWitnessTable,
}

impl RuntimeFn {
    /// Linker symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            RuntimeFn::GetGenericMetadata => "metagen_getGenericMetadata",
            RuntimeFn::GetForeignClassMetadata => "metagen_getForeignClassMetadata",
            RuntimeFn::GetTupleMetadata => "metagen_getTupleMetadata",
            RuntimeFn::GetTupleMetadata2 => "metagen_getTupleMetadata2",
            RuntimeFn::GetTupleMetadata3 => "metagen_getTupleMetadata3",
            RuntimeFn::GetFunctionMetadata => "metagen_getFunctionMetadata",
            RuntimeFn::GetMetatypeMetadata => "metagen_getMetatypeMetadata",
            RuntimeFn::InitStructValueWitnessTable => "metagen_initStructValueWitnessTable",
            RuntimeFn::InitEnumValueWitnessTable => "metagen_initEnumValueWitnessTable",
        }
    }

    pub fn arity(self) -> usize {
        match self {
            RuntimeFn::GetForeignClassMetadata
            | RuntimeFn::GetMetatypeMetadata
            | RuntimeFn::InitStructValueWitnessTable
            | RuntimeFn::InitEnumValueWitnessTable => 1,
            RuntimeFn::GetGenericMetadata | RuntimeFn::GetFunctionMetadata => 2,
            RuntimeFn::GetTupleMetadata | RuntimeFn::GetTupleMetadata2 => 4,
            RuntimeFn::GetTupleMetadata3 => 5,
        }
    }

    pub fn returns_metadata(self) -> bool {
        !matches!(
            self,
            RuntimeFn::InitStructValueWitnessTable | RuntimeFn::InitEnumValueWitnessTable
        )
    }

    /// Arity-specialized tuple constructor, if one exists.
    pub fn tuple_constructor(elements: usize) -> Option<RuntimeFn> {
        match elements {
            2 => Some(RuntimeFn::GetTupleMetadata2),
            3 => Some(RuntimeFn::GetTupleMetadata3),
            _ => None,
        }
    }
}
