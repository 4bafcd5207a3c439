//! Tests for feature module

use super::*;

#[test]
fn test_anonymous_limits() {
    assert_eq!(Feature::Tts.anonymous_limit(), 3);
    assert_eq!(Feature::Stt.anonymous_limit(), 2);
    assert_eq!(Feature::Translate.anonymous_limit(), 3);
}

#[test]
fn test_input_limits_by_caller() {
    assert_eq!(Feature::Tts.max_input_chars(true), Some(200));
    assert_eq!(Feature::Tts.max_input_chars(false), Some(2500));
    assert_eq!(Feature::Translate.max_input_chars(true), Some(500));
    assert_eq!(Feature::Translate.max_input_chars(false), Some(1000));
    assert_eq!(Feature::Stt.max_input_chars(true), None);
}

#[test]
fn test_parse_and_display() {
    for feature in Feature::ALL {
        let parsed: Feature = feature.as_str().parse().unwrap();
        assert_eq!(parsed, feature);
        assert_eq!(feature.to_string(), feature.as_str());
    }
    assert_eq!("  TTS ".parse::<Feature>().unwrap(), Feature::Tts);
    assert!("ocr".parse::<Feature>().is_err());
}

#[test]
fn test_serde_names() {
    assert_eq!(serde_json::to_string(&Feature::Translate).unwrap(), "\"translate\"");
    let f: Feature = serde_json::from_str("\"stt\"").unwrap();
    assert_eq!(f, Feature::Stt);
}

#[test]
fn test_prepare_text_trims_and_truncates() {
    assert_eq!(Feature::Tts.prepare_text("   ", true), None);
    assert_eq!(
        Feature::Tts.prepare_text("  hello  ", true).as_deref(),
        Some("hello")
    );

    let long = "a".repeat(300);
    assert_eq!(Feature::Tts.prepare_text(&long, true).unwrap().len(), 200);
    assert_eq!(Feature::Tts.prepare_text(&long, false).unwrap().len(), 300);
}

#[test]
fn test_truncate_respects_char_boundaries() {
    let hindi = "नमस्ते दुनिया";
    let cut = truncate_chars(hindi, 3);
    assert_eq!(cut.chars().count(), 3);
    assert!(hindi.starts_with(cut));

    assert_eq!(truncate_chars("abc", 10), "abc");
    assert_eq!(truncate_chars("abc", 0), "");
}
