use metagen_core::{Colors, Program, Type};

use crate::{
    FieldValue, FillOp, GlobalRef, MetadataField, MetadataKind, MetadataRecord, MetadataTemplate,
    PendingRelocation, RecordSlot, TemplateHeader, VTableOffset, WordSize, dump_record,
    dump_template,
};

fn slot(field: MetadataField, value: FieldValue) -> RecordSlot {
    RecordSlot { field, value }
}

#[test]
fn record_dump() {
    let mut p = Program::new();
    let point = p.add_struct("Point");
    let record = MetadataRecord {
        decl: point,
        kind: MetadataKind::Struct,
        slots: vec![
            slot(MetadataField::Flags, FieldValue::Int(1)),
            slot(MetadataField::NominalTypeDescriptor, FieldValue::Null),
            slot(MetadataField::Parent, FieldValue::Null),
            slot(
                MetadataField::ValueWitnessTable,
                FieldValue::Address(GlobalRef::ValueWitnesses(point)),
            ),
        ],
        address_point: 3,
        pending: vec![],
        vtable_offsets: vec![],
        constant: true,
    };

    let out = dump_record(&p, &record, Colors::OFF);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "struct Point (4 slots, address point 3)");
    assert_eq!(lines[1], "    -3  flags                   1");
    assert_eq!(lines[2], "    -2  descriptor              null");
    assert_eq!(lines[3], "    -1  parent                  null");
    assert_eq!(lines[4], ">    0  value witnesses         &witnesses(Point)");
    assert_eq!(lines.len(), 5);
}

#[test]
fn template_dump_lists_fill_ops_and_pending() {
    let mut p = Program::new();
    let base = p.add_class("Base");
    let boxed = p.add_class("Box");
    let t = p.add_generic_param(boxed, "T", &[]);
    let get = p.add_method(boxed, "get", Type::function(Type::unit(), Type::Archetype(t)), 0);

    let record = MetadataRecord {
        decl: boxed,
        kind: MetadataKind::Class,
        slots: vec![
            slot(
                MetadataField::Flags,
                FieldValue::Address(GlobalRef::Metaclass(boxed)),
            ),
            slot(MetadataField::Superclass, FieldValue::Null),
            slot(
                MetadataField::Method(get),
                FieldValue::Address(GlobalRef::Method(get)),
            ),
            slot(MetadataField::GenericArgument(t), FieldValue::Null),
        ],
        address_point: 2,
        pending: vec![PendingRelocation {
            slot: 1,
            target: Type::Nominal(base),
            protocol: None,
        }],
        vtable_offsets: vec![VTableOffset {
            method: get,
            offset: 0,
        }],
        constant: false,
    };
    let template = MetadataTemplate {
        header: TemplateHeader::new(GlobalRef::FillFunction(boxed), 32, 1, 16).unwrap(),
        record,
        fill_ops: vec![FillOp { from: 0, to: 3 }],
        dependent_vwt: None,
    };

    let out = dump_template(&p, &template, WordSize::W64, Colors::OFF);
    insta::assert_snapshot!(out, @r"
    class Box template (size 32, args 1, address point 16, header 80 bytes)
        -2  flags                   &metaclass(Box)
        -1  superclass              null
    >    0  method Box.get          &Box.get
         1  argument T              null
      pending slot 1: Base
      vtable Box.get at +0
      fill args[0] -> slot 3
    ");
}
