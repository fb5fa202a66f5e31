use metagen_abi::{
    FieldValue, GlobalRef, MetadataField, MetadataKind, PendingRelocation, VTableOffset,
    dump_record,
};
use metagen_core::{Colors, Program, Type};

use super::{build_record, constant_metadata, needs_runtime_init};
use crate::test_utils::{boxes, hierarchy, int, point, with_cx};
use crate::{EmitError, ModuleCtx, TargetConfig};

#[test]
fn plain_struct_record() {
    let f = point();
    with_cx(&f.program, |cx| {
        let record = build_record(cx, f.point).unwrap();
        assert_eq!(record.kind, MetadataKind::Struct);
        assert_eq!(record.address_point, 3);
        assert!(record.constant);
        assert!(record.pending.is_empty());
        let fields: Vec<_> = record.slots.iter().map(|s| s.field).collect();
        assert_eq!(
            fields,
            vec![
                MetadataField::Flags,
                MetadataField::NominalTypeDescriptor,
                MetadataField::Parent,
                MetadataField::ValueWitnessTable,
            ]
        );
        assert_eq!(record.slots[0].value, FieldValue::Int(1));
        assert_eq!(
            record.slots[3].value,
            FieldValue::Address(GlobalRef::ValueWitnesses(f.point))
        );
    });
}

#[test]
fn enum_and_protocol_flags() {
    let mut p = Program::new();
    let direction = p.add_enum("Direction");
    p.add_case(direction, "north", None);
    let drawable = p.add_protocol("Drawable");

    with_cx(&p, |cx| {
        let record = build_record(cx, direction).unwrap();
        assert_eq!(record.slots[0].value, FieldValue::Int(2));

        let record = build_record(cx, drawable).unwrap();
        assert_eq!(record.address_point, 0);
        assert_eq!(record.slots[0].value, FieldValue::Int(12));
        assert_eq!(
            record.slots[1].value,
            FieldValue::Address(GlobalRef::OpaqueExistentialWitnesses)
        );
    });
}

#[test]
fn nested_struct_points_at_parent() {
    let f = point();
    let mut p = f.program;
    let corner = p.add_struct("Corner");
    p.set_parent(corner, f.point);

    with_cx(&p, |cx| {
        let record = build_record(cx, corner).unwrap();
        assert_eq!(
            record.slots[2].value,
            FieldValue::Address(GlobalRef::TypeMetadata(f.point))
        );
        assert!(!needs_runtime_init(cx, corner));
    });
}

#[test]
fn generic_parent_is_pending() {
    let mut p = Program::new();
    let outer = p.add_struct("Outer");
    p.add_generic_param(outer, "T", &[]);
    let inner = p.add_struct("Inner");
    p.set_parent(inner, outer);

    with_cx(&p, |cx| {
        let record = build_record(cx, inner).unwrap();
        assert_eq!(record.slots[2].value, FieldValue::Null);
        assert_eq!(
            record.pending,
            vec![PendingRelocation {
                slot: 2,
                target: p.declared_type(outer),
                protocol: None,
            }]
        );
        assert!(needs_runtime_init(cx, inner));
    });
}

#[test]
fn class_record_uses_final_overriders() {
    let f = hierarchy();
    with_cx(&f.program, |cx| {
        let record = build_record(cx, f.derived).unwrap();
        assert!(!record.constant);
        assert_eq!(record.len(), 8);
        assert_eq!(
            record.slots[0].value,
            FieldValue::Address(GlobalRef::Metaclass(f.derived))
        );
        assert_eq!(
            record.slots[1].value,
            FieldValue::Address(GlobalRef::NativeObjectWitnesses)
        );
        assert_eq!(
            record.slots[4].value,
            FieldValue::Address(GlobalRef::TypeMetadata(f.base))
        );
        assert_eq!(
            record.value_at_offset(0),
            Some(&FieldValue::Address(GlobalRef::Method(f.derived_f)))
        );
        assert_eq!(
            record.value_at_offset(1),
            Some(&FieldValue::Address(GlobalRef::Method(f.base_g)))
        );
        assert_eq!(
            record.vtable_offsets,
            vec![
                VTableOffset {
                    method: f.base_f,
                    offset: 0,
                },
                VTableOffset {
                    method: f.base_g,
                    offset: 8,
                },
            ]
        );
    });
}

#[test]
fn root_class_superclass_depends_on_interop() {
    let f = hierarchy();
    with_cx(&f.program, |cx| {
        let record = build_record(cx, f.base).unwrap();
        assert_eq!(record.slots[4].value, FieldValue::Null);
    });

    let config = TargetConfig::default().interop(true).root_class("NSObject");
    let cx = ModuleCtx::new(&f.program, &config);
    let record = build_record(&cx, f.base).unwrap();
    assert_eq!(
        record.slots[4].value,
        FieldValue::Address(GlobalRef::RootClass("NSObject".to_owned()))
    );
}

#[test]
fn foreign_superclass() {
    let mut p = Program::new();
    let view = p.add_class("NSView");
    p.set_foreign(view, true);
    let canvas = p.add_class("Canvas");
    p.set_superclass(canvas, Type::Nominal(view));

    with_cx(&p, |cx| {
        let record = build_record(cx, canvas).unwrap();
        assert_eq!(
            record.slots[1].value,
            FieldValue::Address(GlobalRef::UnknownObjectWitnesses)
        );
        assert_eq!(
            record.slots[4].value,
            FieldValue::Address(GlobalRef::ForeignClass(view))
        );
        assert_eq!(
            build_record(cx, view).unwrap_err(),
            EmitError::ForeignDeclaration("NSView".to_owned())
        );
    });
}

#[test]
fn bound_generic_superclass_record() {
    let f = boxes();
    with_cx(&f.program, |cx| {
        let record = build_record(cx, f.int_box).unwrap();
        insta::assert_snapshot!(dump_record(&f.program, &record, Colors::OFF), @r"
        class IntBox (10 slots, address point 5)
            -5  flags                   &metaclass(IntBox)
            -4  value witnesses         &witnesses(Builtin.NativeObject)
            -3  destructor              &destructor(IntBox)
            -2  parent                  null
            -1  superclass              null
        >    0  field offset Box.value  0
             1  method Box.get          &Box.get
             2  argument T              &metadata(Builtin.Int64)
             3  witness T: Equatable    null
             4  method IntBox.get       &IntBox.get
          pending slot 4: Box<Builtin.Int64>
          pending slot 8: Builtin.Int64: Equatable
          vtable Box.get at +8
          vtable IntBox.get at +32
        ");
        assert!(needs_runtime_init(cx, f.int_box));
    });
}

#[test]
fn generic_declarations_have_no_concrete_record() {
    let f = boxes();
    with_cx(&f.program, |cx| {
        let err = build_record(cx, f.boxed).unwrap_err();
        assert_eq!(err.to_string(), "`Box` is generic and has no concrete metadata record");
    });
}

#[test]
fn constant_metadata_addresses() {
    let f = boxes();
    with_cx(&f.program, |cx| {
        assert_eq!(
            constant_metadata(cx, &int()),
            Some(GlobalRef::IntegerMetadata(64))
        );
        assert_eq!(
            constant_metadata(cx, &Type::unit()),
            Some(GlobalRef::EmptyTupleMetadata)
        );
        assert_eq!(
            constant_metadata(cx, &Type::tuple([int()])),
            Some(GlobalRef::IntegerMetadata(64))
        );
        assert_eq!(
            constant_metadata(cx, &Type::Nominal(f.equatable)),
            Some(GlobalRef::TypeMetadata(f.equatable))
        );
        assert_eq!(constant_metadata(cx, &Type::Nominal(f.int_box)), None);
        assert_eq!(constant_metadata(cx, &Type::tuple([int(), int()])), None);
    });
}
