//! Integration tests for the named character reference table.

use quill_html::ParseErrorCode;
use quill_html::tokenizer::character_reference::resolve_numeric_reference;
use quill_html::tokenizer::named_character_references::{
    LONGEST_NAME, NAMED_CHARACTER_REFERENCES, any_entity_has_prefix, longest_match, lookup_entity,
};

#[test]
fn test_table_is_complete() {
    assert_eq!(NAMED_CHARACTER_REFERENCES.len(), 2231);
    let longest = NAMED_CHARACTER_REFERENCES
        .iter()
        .map(|(name, _)| name.len())
        .max();
    assert_eq!(longest, Some(LONGEST_NAME));
}

#[test]
fn test_legacy_names_have_both_forms() {
    assert_eq!(lookup_entity("AElig"), Some("\u{C6}"));
    assert_eq!(lookup_entity("AElig;"), Some("\u{C6}"));
    assert_eq!(lookup_entity("notin"), None);
    assert_eq!(lookup_entity("notin;"), Some("\u{2209}"));
}

#[test]
fn test_two_code_point_expansion() {
    assert_eq!(lookup_entity("acE;"), Some("\u{223E}\u{333}"));
}

#[test]
fn test_prefix_lookup() {
    assert!(any_entity_has_prefix("no"));
    assert!(any_entity_has_prefix("CounterClockwiseContourIntegral"));
    assert!(!any_entity_has_prefix("CounterClockwiseContourIntegral;"));
    assert!(!any_entity_has_prefix("zzz"));
}

#[test]
fn test_longest_match_prefers_longest_name() {
    assert_eq!(longest_match("notin;x"), Some((6, "\u{2209}")));
    assert_eq!(longest_match("notit;"), Some((3, "\u{AC}")));
    assert_eq!(longest_match("xyz"), None);
}

#[test]
fn test_numeric_resolution() {
    assert_eq!(resolve_numeric_reference(0x41), ('A', None));
    assert_eq!(
        resolve_numeric_reference(0),
        ('\u{FFFD}', Some(ParseErrorCode::NullCharacterReference))
    );
    assert_eq!(
        resolve_numeric_reference(0xD800),
        ('\u{FFFD}', Some(ParseErrorCode::SurrogateCharacterReference))
    );
    assert_eq!(
        resolve_numeric_reference(0x9F),
        ('\u{178}', Some(ParseErrorCode::ControlCharacterReference))
    );
    assert_eq!(
        resolve_numeric_reference(0xFFFF),
        ('\u{FFFF}', Some(ParseErrorCode::NoncharacterCharacterReference))
    );
}
