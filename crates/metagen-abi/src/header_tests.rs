use metagen_core::Program;

use crate::{
    GlobalRef, HEADER_FIELD_COUNT, HeaderError, PRIVATE_DATA_WORDS, TemplateHeader, WordSize,
};

fn header() -> TemplateHeader {
    let mut p = Program::new();
    let decl = p.add_struct("Pair");
    TemplateHeader::new(GlobalRef::FillFunction(decl), 48, 3, 24).unwrap()
}

#[test]
fn field_layout_64() {
    let bytes = header().encode(WordSize::W64);

    assert_eq!(bytes.len(), 80);
    assert_eq!(TemplateHeader::encoded_len(WordSize::W64), 80);
    assert_eq!(&bytes[0..8], &[0; 8]);
    assert_eq!(&bytes[8..12], &48u32.to_le_bytes());
    assert_eq!(&bytes[12..14], &3u16.to_le_bytes());
    assert_eq!(&bytes[14..16], &24u16.to_le_bytes());
    assert!(bytes[16..].iter().all(|&b| b == 0));
}

#[test]
fn field_layout_32() {
    let bytes = header().encode(WordSize::W32);

    assert_eq!(bytes.len(), 4 + 8 + PRIVATE_DATA_WORDS * 4);
    assert_eq!(&bytes[4..8], &48u32.to_le_bytes());
    assert_eq!(&bytes[8..10], &3u16.to_le_bytes());
    assert_eq!(&bytes[10..12], &24u16.to_le_bytes());
}

#[test]
fn new_rejects_overflow() {
    let fill = GlobalRef::EmptyTupleMetadata;
    assert_eq!(
        TemplateHeader::new(fill.clone(), 16, 70_000, 0),
        Err(HeaderError::TooManyArguments(70_000))
    );
    assert_eq!(
        TemplateHeader::new(fill, 16, 1, 1 << 16),
        Err(HeaderError::AddressPointOverflow(1 << 16))
    );
}

#[test]
fn five_fields() {
    assert_eq!(HEADER_FIELD_COUNT, 5);
    assert_eq!(PRIVATE_DATA_WORDS, 8);
}
