use indoc::indoc;
use metagen_abi::WordSize;

use crate::TargetConfig;

#[test]
fn defaults() {
    let config = TargetConfig::default();
    assert_eq!(config.word(), WordSize::W64);
    assert!(!config.has_interop());
    assert_eq!(config.root_class_name(), "MetagenObject");
    assert_eq!(config.direct_word_limit(), 3);
}

#[test]
fn builder_setters() {
    let config = TargetConfig::new()
        .word_size(WordSize::W32)
        .interop(true)
        .root_class("NSObject")
        .max_direct_words(4);
    assert_eq!(config.word(), WordSize::W32);
    assert!(config.has_interop());
    assert_eq!(config.root_class_name(), "NSObject");
    assert_eq!(config.direct_word_limit(), 4);
}

#[test]
fn from_json_fills_missing_fields() {
    let config = TargetConfig::from_json(indoc! {r#"
        { "word_size": 4, "interop": true }
    "#})
    .unwrap();
    assert_eq!(config.word(), WordSize::W32);
    assert!(config.has_interop());
    assert_eq!(config.direct_word_limit(), 3);
}

#[test]
fn from_json_rejects_bad_word_size() {
    let err = TargetConfig::from_json(r#"{ "word_size": 2 }"#).unwrap_err();
    assert!(err.to_string().contains("unsupported word size 2"));
}

#[test]
fn from_json_rejects_unknown_fields() {
    assert!(TargetConfig::from_json(r#"{ "wordsize": 8 }"#).is_err());
}
