use indoc::indoc;
use metagen_core::Type;

use super::{
    emit_argument_metadata_ref, emit_argument_witness_table_ref, emit_class_field_offset,
    emit_parent_metadata_ref, emit_value_witness_table_ref, emit_virtual_method_value,
};
use crate::function::FunctionCtx;
use crate::ir::{Inst, Operand};
use crate::test_utils::{SubFixture, boxes, generic_subclass, hierarchy, point, with_cx};
use crate::EmitError;

fn last_load_index(f: &FunctionCtx) -> i64 {
    match f.body().last() {
        Some(Inst::Load { index, .. }) => *index,
        other => panic!("expected a load, found {other:?}"),
    }
}

#[test]
fn loads_use_located_offsets() {
    let f = boxes();
    with_cx(&f.program, |cx| {
        let mut fun = FunctionCtx::new(cx, "test");
        let metadata = Operand::Value(fun.param());

        emit_argument_metadata_ref(&mut fun, f.boxed, f.t, metadata.clone()).unwrap();
        assert_eq!(last_load_index(&fun), 2);

        emit_argument_witness_table_ref(&mut fun, f.boxed, f.t, f.equatable, metadata.clone())
            .unwrap();
        assert_eq!(last_load_index(&fun), 3);

        emit_parent_metadata_ref(&mut fun, f.boxed, metadata.clone()).unwrap();
        assert_eq!(last_load_index(&fun), -2);

        emit_value_witness_table_ref(&mut fun, f.boxed, metadata).unwrap();
        assert_eq!(last_load_index(&fun), -4);
    });
}

#[test]
fn struct_value_witnesses_sit_at_the_address_point() {
    let f = point();
    with_cx(&f.program, |cx| {
        let mut fun = FunctionCtx::new(cx, "test");
        let metadata = Operand::Value(fun.param());
        emit_value_witness_table_ref(&mut fun, f.point, metadata).unwrap();
        assert_eq!(last_load_index(&fun), 0);
    });
}

#[test]
fn virtual_calls_use_the_root_slot() {
    let f = hierarchy();
    with_cx(&f.program, |cx| {
        let mut fun = FunctionCtx::new(cx, "test");
        let metadata = Operand::Value(fun.param());

        emit_virtual_method_value(&mut fun, f.derived_f, metadata.clone()).unwrap();
        assert_eq!(last_load_index(&fun), 0);
        emit_virtual_method_value(&mut fun, f.base_g, metadata.clone()).unwrap();
        assert_eq!(last_load_index(&fun), 1);

        let count = f.program.lookup_field(f.derived, "count").unwrap();
        emit_class_field_offset(&mut fun, f.derived, count, metadata).unwrap();
        assert_eq!(last_load_index(&fun), 2);
    });
}

#[test]
fn incompatible_override_uses_its_own_slot() {
    let f = boxes();
    with_cx(&f.program, |cx| {
        let mut fun = FunctionCtx::new(cx, "test");
        let metadata = Operand::Value(fun.param());
        emit_virtual_method_value(&mut fun, f.int_get, metadata.clone()).unwrap();
        assert_eq!(last_load_index(&fun), 4);
        emit_virtual_method_value(&mut fun, f.get, metadata).unwrap();
        assert_eq!(last_load_index(&fun), 1);
    });
}

#[test]
fn field_offsets_need_a_class() {
    let f = point();
    let x = f.program.lookup_field(f.point, "x").unwrap();
    with_cx(&f.program, |cx| {
        let mut fun = FunctionCtx::new(cx, "test");
        let err = emit_class_field_offset(&mut fun, f.point, x, Operand::Null).unwrap_err();
        assert_eq!(err, EmitError::NotAClass("Point".to_owned()));
        assert!(fun.body().is_empty());
    });
}

#[test]
fn loads_from_instantiated_metadata() {
    let f = boxes();
    with_cx(&f.program, |cx| {
        let mut fun = FunctionCtx::new(cx, "test");
        let ty = Type::BoundGeneric {
            decl: f.boxed,
            args: vec![Type::Nominal(f.int_box)],
        };
        let metadata = crate::reference::emit_type_metadata_ref(&mut fun, &ty).unwrap();
        let arg = emit_argument_metadata_ref(&mut fun, f.boxed, f.t, metadata.clone()).unwrap();
        assert!(matches!(arg, Operand::Value(_)));
        match fun.body().last() {
            Some(Inst::Load { base, index, .. }) => {
                assert_eq!(base, &metadata);
                assert_eq!(*index, 2);
            }
            other => panic!("expected a load, found {other:?}"),
        }
    });
}

#[test]
fn subclass_instantiation_carries_inherited_arguments() {
    let SubFixture { boxes: f, sub, u } = generic_subclass();
    let mut p = f.program;
    let point = p.add_struct("Point");
    with_cx(&p, |cx| {
        let mut fun = FunctionCtx::new(cx, "test");
        let ty = Type::BoundGeneric {
            decl: sub,
            args: vec![Type::Nominal(point)],
        };
        let metadata = crate::reference::emit_type_metadata_ref(&mut fun, &ty).unwrap();

        emit_argument_metadata_ref(&mut fun, f.boxed, f.t, metadata.clone()).unwrap();
        assert_eq!(last_load_index(&fun), 2);
        emit_argument_witness_table_ref(&mut fun, f.boxed, f.t, f.equatable, metadata.clone())
            .unwrap();
        assert_eq!(last_load_index(&fun), 3);
        emit_argument_metadata_ref(&mut fun, sub, u, metadata).unwrap();
        assert_eq!(last_load_index(&fun), 4);

        assert_eq!(
            fun.finish().0.dump(&p),
            indoc! {"
                fn test() {
                  %0 = alloca [4 x word]
                  store &metadata(Point), %0[0]
                  store &conformance(Point: Equatable), %0[1]
                  store &metadata(Point), %0[2]
                  store &conformance(Point: Equatable), %0[3]
                  %1 = call metagen_getGenericMetadata(&template(Sub), %0)
                  %2 = load %1[2]
                  %3 = load %1[3]
                  %4 = load %1[4]
                }
            "}
        );
    });
}
