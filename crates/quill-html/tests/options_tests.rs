//! Integration tests for parser options and alternate entry points.

use std::cell::RefCell;
use std::rc::Rc;

use quill_dom::QuirksMode;
use quill_html::{
    ContextElement, HTMLParser, InputStream, ParseErrorCode, ParserOption, ParserOptions,
    decode_utf8, parse_fragment, parse_reader, parse_utf16, parse_with_options,
};

const PROLOGUE: &str = "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n";

/// Helper to parse a body fragment with `options` and return the dump below `<body>`
fn body_dump(html: &str, options: ParserOptions) -> String {
    let output = parse_with_options(&format!("<!DOCTYPE html>{html}"), options)
        .unwrap()
        .dump();
    output
        .strip_prefix(PROLOGUE)
        .expect("document prologue")
        .to_string()
}

#[test]
fn test_noscript_is_raw_text_when_scripting() {
    assert_eq!(
        body_dump("<div><noscript><p>x</p></noscript></div>", ParserOptions::default()),
        "|     <div>\n|       <noscript>\n|         \"<p>x</p>\"\n"
    );
}

#[test]
fn test_noscript_is_markup_without_scripting() {
    let options = ParserOptions::from_flags(&[ParserOption::ScriptingDisabled]);
    assert_eq!(
        body_dump("<div><noscript><p>x</p></noscript></div>", options),
        "|     <div>\n|       <noscript>\n|         <p>\n|           \"x\"\n"
    );
}

#[test]
fn test_self_closing_unknown_element() {
    assert_eq!(
        body_dump("<widget/>x", ParserOptions::default()),
        "|     <widget>\n|       \"x\"\n"
    );
    let options = ParserOptions::default().with(ParserOption::InterpretSelfClosingAnythingElse);
    assert_eq!(
        body_dump("<widget/>x", options),
        "|     <widget>\n|     \"x\"\n"
    );
}

#[test]
fn test_stray_caption_in_table_body_context() {
    let context = ContextElement::html("tbody");
    let ignored = parse_fragment(&context, "<caption>", ParserOptions::default()).unwrap();
    assert_eq!(ignored.dump(), "");

    let options = ParserOptions::default().with(ParserOption::DisableIgnoreTokenInBodyStartTag);
    let processed = parse_fragment(&context, "<caption>", options).unwrap();
    assert_eq!(processed.dump(), "| <caption>\n");
}

#[test]
fn test_input_stream_checks() {
    let quiet = parse_with_options("<!DOCTYPE html>\u{1}", ParserOptions::default()).unwrap();
    assert!(quiet.errors().is_empty());

    let checked =
        parse_with_options("<!DOCTYPE html>\u{1}", ParserOptions::default().check_input_stream(true))
            .unwrap();
    assert_eq!(
        checked.errors()[0].code,
        ParseErrorCode::ControlCharacterInInputStream
    );
}

#[test]
fn test_discarding_errors() {
    let options = ParserOptions::from_flags(&[ParserOption::DiscardErrors]);
    let document = parse_with_options("<p>x</span>", options).unwrap();
    assert!(document.errors().is_empty());
}

#[test]
fn test_error_handler_sees_discarded_errors() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let document = HTMLParser::new(ParserOptions::default().keep_errors(false))
        .with_error_handler(move |error| sink.borrow_mut().push(error.code))
        .parse_document(InputStream::new("<p>x"))
        .unwrap();
    assert!(document.errors().is_empty());
    assert_eq!(seen.borrow().first(), Some(&ParseErrorCode::MissingDoctype));
}

#[test]
fn test_utf16_lone_surrogate() {
    let units: Vec<u16> = "<!DOCTYPE html>"
        .encode_utf16()
        .chain([0xD800, u16::from(b'a')])
        .collect();
    let document = parse_utf16(&units, ParserOptions::default()).unwrap();
    assert_eq!(
        document.dump().strip_prefix(PROLOGUE),
        Some("|     \"\u{FFFD}a\"\n")
    );
    assert_eq!(
        document.errors()[0].code,
        ParseErrorCode::SurrogateInInputStream
    );
}

#[test]
fn test_reader_input_is_decoded_lossily() {
    let bytes: &[u8] = b"<!DOCTYPE html>a\xFFb";
    let document = parse_reader(bytes, ParserOptions::default()).unwrap();
    assert_eq!(
        document.dump().strip_prefix(PROLOGUE),
        Some("|     \"a\u{FFFD}b\"\n")
    );
}

#[test]
fn test_reader_drops_byte_order_mark() {
    let bytes: &[u8] = b"\xEF\xBB\xBF<!DOCTYPE html><p>x";
    let document = parse_reader(bytes, ParserOptions::default()).unwrap();
    assert_eq!(document.quirks_mode(), QuirksMode::NoQuirks);
    assert!(document.errors().is_empty());
    assert_eq!(
        document.dump().strip_prefix(PROLOGUE),
        Some("|     <p>\n|       \"x\"\n")
    );
}

#[test]
fn test_utf16_drops_byte_order_mark() {
    let units: Vec<u16> = "\u{FEFF}<!DOCTYPE html>x".encode_utf16().collect();
    let document = parse_utf16(&units, ParserOptions::default()).unwrap();
    assert_eq!(document.quirks_mode(), QuirksMode::NoQuirks);
    assert_eq!(
        document.dump().strip_prefix(PROLOGUE),
        Some("|     \"x\"\n")
    );
}

#[test]
fn test_only_leading_byte_order_mark_is_dropped() {
    assert_eq!(decode_utf8(b"\xEF\xBB\xBFa\xEF\xBB\xBF"), "a\u{FEFF}");
}
