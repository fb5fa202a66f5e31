use metagen_core::{Program, Type};

use crate::{
    FieldValue, FillOp, GlobalRef, MetadataField, MetadataKind, MetadataRecord, MetadataTemplate,
    PendingRelocation, RecordSlot, Relocation, TemplateHeader, WordSize,
};

fn slot(field: MetadataField, value: FieldValue) -> RecordSlot {
    RecordSlot { field, value }
}

fn point_record(p: &mut Program) -> MetadataRecord {
    let point = p.add_struct("Point");
    MetadataRecord {
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
    }
}

#[test]
fn offsets_are_relative_to_address_point() {
    let mut p = Program::new();
    let record = point_record(&mut p);

    assert_eq!(record.offset_of(0), -3);
    assert_eq!(record.offset_of(3), 0);
    assert_eq!(record.find(MetadataField::ValueWitnessTable), Some(3));
    assert_eq!(record.value_at_offset(-3), Some(&FieldValue::Int(1)));
    assert_eq!(record.value_at_offset(-4), None);
    assert_eq!(record.value_at_offset(1), None);
}

#[test]
fn encode_zeroes_addresses() {
    let mut p = Program::new();
    let record = point_record(&mut p);

    let bytes = record.encode(WordSize::W32);
    assert_eq!(bytes.len(), 16);
    assert_eq!(&bytes[0..4], &1u32.to_le_bytes());
    assert!(bytes[4..].iter().all(|&b| b == 0));

    assert_eq!(
        record.relocations(WordSize::W32, 0),
        vec![Relocation {
            offset: 12,
            target: GlobalRef::ValueWitnesses(record.decl),
        }]
    );
}

#[test]
fn template_relocations_skip_header() {
    let mut p = Program::new();
    let record = point_record(&mut p);
    let decl = record.decl;
    let template = MetadataTemplate {
        header: TemplateHeader::new(GlobalRef::FillFunction(decl), 32, 0, 24).unwrap(),
        record,
        fill_ops: vec![],
        dependent_vwt: None,
    };

    let relocations = template.relocations(WordSize::W64);
    assert_eq!(relocations[0].offset, 0);
    assert_eq!(relocations[0].target, GlobalRef::FillFunction(decl));
    assert_eq!(relocations[1].offset, 80 + 24);
    assert_eq!(template.encode(WordSize::W64).len(), 80 + 32);
    assert_eq!(template.decl(), decl);
}

#[test]
fn generic_requirements() {
    let mut p = Program::new();
    let s = p.add_struct("S");
    let proto = p.add_protocol("P");
    let t = p.add_generic_param(s, "T", &[proto]);

    assert!(MetadataField::GenericArgument(t).is_generic_requirement());
    assert!(
        MetadataField::GenericWitnessTable {
            archetype: t,
            protocol: proto
        }
        .is_generic_requirement()
    );
    assert!(!MetadataField::Parent.is_generic_requirement());
    assert_eq!(
        MetadataField::GenericWitnessTable {
            archetype: t,
            protocol: proto
        }
        .describe(&p),
        "witness T: P"
    );
}

#[test]
fn pending_and_fill_ops_are_plain_data() {
    let op = FillOp { from: 1, to: 7 };
    assert_eq!(op, FillOp { from: 1, to: 7 });

    let pending = PendingRelocation {
        slot: 4,
        target: Type::int(8),
        protocol: None,
    };
    assert_eq!(pending.clone(), pending);
}
