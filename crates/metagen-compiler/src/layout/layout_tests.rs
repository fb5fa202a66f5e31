use metagen_abi::{MetadataField, MetadataKind};
use metagen_core::{DeclId, Program, Type};

use super::{LayoutMode, LayoutOrder, LayoutStep, LayoutVisitor, Placement};
use crate::test_utils::{boxes, hierarchy, int, point, with_cx};
use crate::LayoutError;

#[derive(Default)]
struct Recorder {
    fields: Vec<(usize, MetadataField)>,
    address_point: Option<usize>,
}

impl LayoutVisitor for Recorder {
    type Error = LayoutError;

    fn field(&mut self, slot: usize, field: MetadataField) -> Result<(), LayoutError> {
        self.fields.push((slot, field));
        Ok(())
    }

    fn address_point(&mut self, slot: usize) -> Result<(), LayoutError> {
        self.address_point = Some(slot);
        Ok(())
    }
}

fn walk(order: &LayoutOrder) -> (Recorder, Placement) {
    let mut recorder = Recorder::default();
    let placement = order.walk(&mut recorder).unwrap();
    (recorder, placement)
}

#[test]
fn struct_order() {
    let f = point();
    with_cx(&f.program, |cx| {
        let order = LayoutOrder::for_decl(cx, f.point);
        assert_eq!(order.kind(), MetadataKind::Struct);
        assert_eq!(order.mode(), LayoutMode::Concrete);
        assert_eq!(
            order.fields().collect::<Vec<_>>(),
            vec![
                MetadataField::Flags,
                MetadataField::NominalTypeDescriptor,
                MetadataField::Parent,
                MetadataField::ValueWitnessTable,
            ]
        );
        let (recorder, placement) = walk(&order);
        assert_eq!(placement.address_point, 3);
        assert_eq!(placement.slot_count, 4);
        assert_eq!(recorder.address_point, Some(3));
        assert_eq!(recorder.fields[3], (3, MetadataField::ValueWitnessTable));
    });
}

#[test]
fn class_order_extends_superclass_layout() {
    let f = hierarchy();
    with_cx(&f.program, |cx| {
        let base = LayoutOrder::for_decl(cx, f.base);
        let derived = LayoutOrder::for_decl(cx, f.derived);

        let base_fields: Vec<_> = base.fields().collect();
        let derived_fields: Vec<_> = derived.fields().collect();
        assert_eq!(&derived_fields[..base_fields.len()], &base_fields[..]);
        assert_eq!(
            &base_fields[..5],
            &[
                MetadataField::Flags,
                MetadataField::ValueWitnessTable,
                MetadataField::Destructor,
                MetadataField::Parent,
                MetadataField::Superclass,
            ]
        );

        // Derived.f reuses Base.f's slot; only the new field is appended.
        let count = f.program.lookup_field(f.derived, "count").unwrap();
        assert_eq!(
            &derived_fields[base_fields.len()..],
            &[MetadataField::FieldOffset(count)]
        );
        assert!(!derived_fields.contains(&MetadataField::Method(f.derived_f)));

        let (_, placement) = walk(&derived);
        assert_eq!(placement.address_point, 5);
        assert_eq!(placement.slot_count, 8);
    });
}

#[test]
fn generic_class_requirements_follow_members() {
    let f = boxes();
    with_cx(&f.program, |cx| {
        let order = LayoutOrder::for_decl(cx, f.boxed);
        assert_eq!(order.mode(), LayoutMode::Template);
        let value = f.program.lookup_field(f.boxed, "value").unwrap();
        let tail: Vec<_> = order.fields().skip(5).collect();
        assert_eq!(
            tail,
            vec![
                MetadataField::FieldOffset(value),
                MetadataField::Method(f.get),
                MetadataField::GenericArgument(f.t),
                MetadataField::GenericWitnessTable {
                    archetype: f.t,
                    protocol: f.equatable,
                },
            ]
        );
    });
}

#[test]
fn arguments_precede_witness_tables() {
    let mut p = Program::new();
    let hashable = p.add_protocol("Hashable");
    let comparable = p.add_protocol("Comparable");
    let foreign = p.add_protocol("NSCopying");
    p.set_foreign(foreign, true);
    let pair = p.add_struct("Pair");
    let k = p.add_generic_param(pair, "K", &[hashable, foreign]);
    let v = p.add_generic_param(pair, "V", &[comparable]);

    assert_eq!(
        super::generic_requirements(&p, pair),
        vec![
            MetadataField::GenericArgument(k),
            MetadataField::GenericArgument(v),
            MetadataField::GenericWitnessTable {
                archetype: k,
                protocol: hashable,
            },
            MetadataField::GenericWitnessTable {
                archetype: v,
                protocol: comparable,
            },
        ]
    );
}

#[test]
fn dependent_witness_slot_only_in_templates() {
    let mut p = Program::new();
    let wrapper = p.add_struct("Wrapper");
    let t = p.add_generic_param(wrapper, "T", &[]);
    p.add_field(wrapper, "value", Type::Archetype(t));

    with_cx(&p, |cx| {
        let template = LayoutOrder::with_mode(cx, wrapper, LayoutMode::Template);
        let concrete = LayoutOrder::with_mode(cx, wrapper, LayoutMode::Concrete);
        assert_eq!(
            template.fields().last(),
            Some(MetadataField::DependentValueWitnessTable)
        );
        assert_eq!(template.steps().len(), concrete.steps().len() + 1);
    });
}

#[test]
fn fixed_layout_generic_has_no_dependent_slot() {
    let mut p = Program::new();
    let tagged = p.add_struct("Tagged");
    p.add_generic_param(tagged, "Tag", &[]);
    p.add_field(tagged, "raw", int());

    with_cx(&p, |cx| {
        let order = LayoutOrder::for_decl(cx, tagged);
        assert!(!order
            .fields()
            .any(|f| f == MetadataField::DependentValueWitnessTable));
    });
}

#[test]
fn protocol_order() {
    let mut p = Program::new();
    let proto = p.add_protocol("Drawable");
    with_cx(&p, |cx| {
        let order = LayoutOrder::for_decl(cx, proto);
        assert_eq!(order.kind(), MetadataKind::Existential);
        assert_eq!(
            order.steps(),
            &[
                LayoutStep::AddressPoint,
                LayoutStep::Field(MetadataField::Flags),
                LayoutStep::Field(MetadataField::ValueWitnessTable),
            ]
        );
    });
}

#[test]
fn missing_address_point_is_an_error() {
    let order = LayoutOrder::from_steps(
        DeclId::from_raw(0),
        "Broken",
        MetadataKind::Struct,
        vec![LayoutStep::Field(MetadataField::Flags)],
    );
    let err = order.walk(&mut Recorder::default()).unwrap_err();
    assert_eq!(
        err,
        LayoutError::MissingAddressPoint {
            decl: "Broken".to_owned()
        }
    );
}

#[test]
fn duplicate_address_point_is_an_error() {
    let order = LayoutOrder::from_steps(
        DeclId::from_raw(0),
        "Broken",
        MetadataKind::Struct,
        vec![
            LayoutStep::AddressPoint,
            LayoutStep::Field(MetadataField::Flags),
            LayoutStep::AddressPoint,
        ],
    );
    let err = order.walk(&mut Recorder::default()).unwrap_err();
    assert_eq!(err.to_string(), "layout of `Broken` notes its address point twice");
}

#[test]
fn placement_offsets() {
    let placement = Placement {
        slot_count: 6,
        address_point: 2,
    };
    assert_eq!(placement.offset_of(0), -2);
    assert_eq!(placement.offset_of(2), 0);
    assert_eq!(placement.offset_of(5), 3);
}
