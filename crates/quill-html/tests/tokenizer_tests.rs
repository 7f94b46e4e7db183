//! Integration tests for the HTML tokenizer.

use quill_html::tokenizer::tokenize;
use quill_html::{
    InputStream, ParseErrorCode, Token, TokenCollector, Tokenizer, TokenizerState,
};

/// Helper to tokenize a string and return the tokens
fn tokens(input: &str) -> Vec<Token> {
    tokenize(input).tokens
}

/// Helper to collect the character data of a token stream
fn text(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter_map(|token| match token {
            Token::Character { data } => Some(*data),
            _ => None,
        })
        .collect()
}

/// Helper to collect parse error codes
fn error_codes(input: &str) -> Vec<ParseErrorCode> {
    tokenize(input).errors.iter().map(|e| e.code).collect()
}

#[test]
fn test_plain_text() {
    let tokens = tokens("Hello");
    assert_eq!(tokens.len(), 6); // 5 chars + EOF
    assert!(matches!(tokens[0], Token::Character { data: 'H' }));
    assert!(matches!(tokens[4], Token::Character { data: 'o' }));
    assert!(matches!(tokens[5], Token::EndOfFile));
}

#[test]
fn test_doctype() {
    let tokens = tokens("<!DOCTYPE html>");
    assert_eq!(tokens.len(), 2); // DOCTYPE + EOF
    match &tokens[0] {
        Token::Doctype {
            name,
            public_identifier,
            force_quirks,
            ..
        } => {
            assert_eq!(name.as_deref(), Some("html"));
            assert_eq!(public_identifier, &None);
            assert!(!force_quirks);
        }
        _ => panic!("Expected DOCTYPE token"),
    }
}

#[test]
fn test_doctype_with_identifiers() {
    let tokens = tokens(
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">"#,
    );
    match &tokens[0] {
        Token::Doctype {
            public_identifier,
            system_identifier,
            ..
        } => {
            assert_eq!(public_identifier.as_deref(), Some("-//W3C//DTD HTML 4.01//EN"));
            assert_eq!(
                system_identifier.as_deref(),
                Some("http://www.w3.org/TR/html4/strict.dtd")
            );
        }
        _ => panic!("Expected DOCTYPE token"),
    }
}

#[test]
fn test_doctype_eof_forces_quirks() {
    let collector = tokenize("<!DOCTYPE html");
    assert!(matches!(
        collector.tokens[0],
        Token::Doctype {
            force_quirks: true,
            ..
        }
    ));
    assert_eq!(collector.errors[0].code, ParseErrorCode::EofInDoctype);
}

#[test]
fn test_start_tag_lowercases_name() {
    let tokens = tokens("<DiV>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::StartTag {
            name,
            self_closing,
            attributes,
        } => {
            assert_eq!(name, "div");
            assert!(!self_closing);
            assert!(attributes.is_empty());
        }
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn test_end_tag() {
    let tokens = tokens("</div>");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].tag_name(), Some("div"));
    assert!(matches!(tokens[0], Token::EndTag { .. }));
}

#[test]
fn test_self_closing_tag() {
    let tokens = tokens("<br/>");
    match &tokens[0] {
        Token::StartTag {
            name, self_closing, ..
        } => {
            assert_eq!(name, "br");
            assert!(self_closing);
        }
        _ => panic!("Expected self-closing StartTag token"),
    }
}

#[test]
fn test_comment() {
    let tokens = tokens("<!-- hello -->");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0], Token::new_comment(" hello "));
}

#[test]
fn test_bogus_comment() {
    let collector = tokenize("<?xml version?>");
    assert_eq!(collector.tokens[0], Token::new_comment("?xml version?"));
    assert_eq!(
        collector.errors[0].code,
        ParseErrorCode::UnexpectedQuestionMarkInsteadOfTagName
    );
}

#[test]
fn test_attribute_quoting_styles() {
    let tokens = tokens(r#"<div a="1" b='2' c=3 d>"#);
    assert_eq!(tokens[0].attribute("a"), Some("1"));
    assert_eq!(tokens[0].attribute("b"), Some("2"));
    assert_eq!(tokens[0].attribute("c"), Some("3"));
    assert_eq!(tokens[0].attribute("d"), Some(""));
}

#[test]
fn test_duplicate_attribute_keeps_first() {
    let collector = tokenize(r#"<p id="a" id="b">"#);
    match &collector.tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes.len(), 1);
            assert_eq!(attributes[0].value, "a");
        }
        _ => panic!("Expected StartTag token"),
    }
    assert_eq!(collector.errors[0].code, ParseErrorCode::DuplicateAttribute);
}

#[test]
fn test_named_character_reference() {
    assert_eq!(text(&tokens("a &amp; b")), "a & b");
    assert_eq!(text(&tokens("&lt;p&gt;")), "<p>");
}

#[test]
fn test_legacy_reference_without_semicolon() {
    assert_eq!(text(&tokens("&notit;")), "\u{AC}it;");
    assert_eq!(
        error_codes("&notit;"),
        vec![ParseErrorCode::MissingSemicolonAfterCharacterReference]
    );
}

#[test]
fn test_legacy_reference_in_attribute_is_literal() {
    let tokens = tokens(r#"<a href="?a=1&copy=2">"#);
    assert_eq!(tokens[0].attribute("href"), Some("?a=1&copy=2"));
}

#[test]
fn test_unknown_named_reference() {
    assert_eq!(text(&tokens("&zzz;")), "&zzz;");
    assert_eq!(
        error_codes("&zzz;"),
        vec![ParseErrorCode::UnknownNamedCharacterReference]
    );
}

#[test]
fn test_numeric_character_references() {
    assert_eq!(text(&tokens("&#65;&#x42;")), "AB");
    assert_eq!(text(&tokens("&#0;")), "\u{FFFD}");
    assert_eq!(text(&tokens("&#x110000;")), "\u{FFFD}");
}

#[test]
fn test_c1_numeric_reference_is_remapped() {
    assert_eq!(text(&tokens("&#x80;")), "\u{20AC}");
    assert_eq!(
        error_codes("&#x80;"),
        vec![ParseErrorCode::ControlCharacterReference]
    );
}

#[test]
fn test_numeric_reference_without_digits() {
    assert_eq!(text(&tokens("&#;")), "&#;");
    assert_eq!(
        error_codes("&#;"),
        vec![ParseErrorCode::AbsenceOfDigitsInNumericCharacterReference]
    );
}

#[test]
fn test_null_in_data_is_passed_through() {
    let collector = tokenize("a\0b");
    assert_eq!(text(&collector.tokens), "a\0b");
    assert_eq!(
        collector.errors[0].code,
        ParseErrorCode::UnexpectedNullCharacter
    );
}

#[test]
fn test_newlines_are_normalised() {
    assert_eq!(text(&tokens("a\r\nb\rc")), "a\nb\nc");
}

#[test]
fn test_collector_switches_to_rawtext_for_style() {
    let tokens = tokens("<style><b></style>");
    assert_eq!(text(&tokens), "<b>");
    assert!(matches!(tokens.last(), Some(Token::EndOfFile)));
    assert_eq!(tokens[tokens.len() - 2], Token::end_tag("style"));
}

#[test]
fn test_rcdata_decodes_references() {
    let tokens = tokens("<title>a&amp;<b></title>");
    assert_eq!(text(&tokens), "a&<b>");
}

#[test]
fn test_script_data_escape() {
    let tokens = tokens("<script><!--</script>x--></script>");
    // "<!--" enters the escaped state, but a matching end tag still closes it.
    assert_eq!(tokens[1], Token::Character { data: '<' });
    assert!(tokens.contains(&Token::end_tag("script")));
}

#[test]
fn test_plaintext_swallows_everything() {
    let tokens = tokens("<plaintext></plaintext>");
    assert_eq!(text(&tokens), "</plaintext>");
}

#[test]
fn test_cdata_outside_foreign_content_is_bogus_comment() {
    let collector = tokenize("<![CDATA[x]]>");
    assert_eq!(collector.tokens[0], Token::new_comment("[CDATA[x]]"));
    assert_eq!(collector.errors[0].code, ParseErrorCode::CdataInHtmlContent);
}

#[test]
fn test_eof_in_tag() {
    let collector = tokenize("<div class=");
    assert_eq!(collector.tokens, vec![Token::EndOfFile]);
    assert_eq!(collector.errors.last().map(|e| e.code), Some(ParseErrorCode::EofInTag));
}

#[test]
fn test_stop_when_ends_early() {
    let mut tokenizer = Tokenizer::new(
        InputStream::new("<a><b><c>"),
        TokenCollector::stop_when(|token| token.tag_name() == Some("b")),
    );
    tokenizer.run();
    let collector = tokenizer.into_sink();
    assert_eq!(collector.tokens.len(), 2);
    assert_eq!(collector.tokens[1].tag_name(), Some("b"));
}

#[test]
fn test_initial_state_can_be_forced() {
    let mut tokenizer = Tokenizer::new(InputStream::new("<b>x</textarea>"), TokenCollector::new());
    tokenizer.set_state(TokenizerState::RCDATA);
    tokenizer.set_last_start_tag(Some("textarea"));
    tokenizer.run();
    let tokens = tokenizer.into_sink().tokens;
    assert_eq!(text(&tokens), "<b>x");
    assert!(tokens.contains(&Token::end_tag("textarea")));
}

#[test]
fn test_input_stream_checks_are_opt_in() {
    let mut tokenizer = Tokenizer::new(
        InputStream::new("a\u{1}b").with_codepoint_checks(true),
        TokenCollector::new(),
    );
    tokenizer.run();
    let errors = tokenizer.into_sink().errors;
    assert_eq!(
        errors[0].code,
        ParseErrorCode::ControlCharacterInInputStream
    );
    assert!(error_codes("a\u{1}b").is_empty());
}

#[test]
fn test_character_data_round_trips() {
    let input = "Plain text, with punctuation! Ümlauts, ключ, 漢字 and emoji \u{1F600}.";
    assert_eq!(text(&tokens(input)), input);
}

#[test]
fn test_legacy_reference_stops_at_longest_match() {
    assert_eq!(text(&tokens("&amp")), "&");
    assert_eq!(text(&tokens("&ampz")), "&z");
    assert_eq!(
        error_codes("&ampz"),
        vec![ParseErrorCode::MissingSemicolonAfterCharacterReference]
    );
}
