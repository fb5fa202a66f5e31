use std::collections::HashSet;

use crate::RuntimeFn;

#[test]
fn symbols_are_unique() {
    let every = [
        RuntimeFn::GetGenericMetadata,
        RuntimeFn::GetForeignClassMetadata,
        RuntimeFn::GetTupleMetadata,
        RuntimeFn::GetTupleMetadata2,
        RuntimeFn::GetTupleMetadata3,
        RuntimeFn::GetFunctionMetadata,
        RuntimeFn::GetMetatypeMetadata,
        RuntimeFn::InitStructValueWitnessTable,
        RuntimeFn::InitEnumValueWitnessTable,
    ];
    let symbols: HashSet<_> = every.iter().map(|f| f.symbol()).collect();
    assert_eq!(symbols.len(), every.len());
}

#[test]
fn arities_match_contract() {
    assert_eq!(RuntimeFn::GetGenericMetadata.arity(), 2);
    assert_eq!(RuntimeFn::GetForeignClassMetadata.arity(), 1);
    assert_eq!(RuntimeFn::GetTupleMetadata.arity(), 4);
    assert_eq!(RuntimeFn::GetTupleMetadata2.arity(), 4);
    assert_eq!(RuntimeFn::GetTupleMetadata3.arity(), 5);
    assert_eq!(RuntimeFn::GetFunctionMetadata.arity(), 2);
    assert_eq!(RuntimeFn::GetMetatypeMetadata.arity(), 1);
    assert_eq!(RuntimeFn::InitStructValueWitnessTable.arity(), 1);
}

#[test]
fn tuple_fast_paths() {
    assert_eq!(RuntimeFn::tuple_constructor(0), None);
    assert_eq!(RuntimeFn::tuple_constructor(1), None);
    assert_eq!(
        RuntimeFn::tuple_constructor(2),
        Some(RuntimeFn::GetTupleMetadata2)
    );
    assert_eq!(
        RuntimeFn::tuple_constructor(3),
        Some(RuntimeFn::GetTupleMetadata3)
    );
    assert_eq!(RuntimeFn::tuple_constructor(4), None);
}

#[test]
fn initializers_return_nothing() {
    assert!(!RuntimeFn::InitEnumValueWitnessTable.returns_metadata());
    assert!(RuntimeFn::GetMetatypeMetadata.returns_metadata());
}
