//! Browser-accurate HTML parsing.
//!
//! # Scope
//!
//! This crate implements:
//! - **Input stream** ([WHATWG § 13.2.3](https://html.spec.whatwg.org/multipage/parsing.html#the-input-byte-stream))
//!   - Newline normalisation, UTF-16 decoding, codepoint validation
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - All tokenizer states, including script data escapes and CDATA sections
//!   - Named and numeric character references
//! - **Tree construction** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - All 23 insertion modes
//!   - Adoption agency algorithm, foster parenting, templates
//!   - SVG and MathML foreign content
//! - **Fragment parsing** ([WHATWG § 13.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments))
//!
//! Malformed markup never fails a parse. Every recovery is reported as a
//! [`ParseError`] on the result; an `Err` means API misuse or an I/O failure.
//!
//! ```
//! let document = quill_html::parse("<p>Hello<b>world").unwrap();
//! assert_eq!(
//!     document.dump(),
//!     "| <html>\n|   <head>\n|   <body>\n|     <p>\n|       \"Hello\"\n|       <b>\n|         \"world\"\n"
//! );
//! ```

/// Parse results.
pub mod document;
/// Fatal errors and parse error codes.
pub mod error;
/// The preprocessed input stream.
pub mod input;
/// Parser configuration.
pub mod options;
/// Tree construction.
pub mod parser;
/// The tokenizer.
pub mod tokenizer;

use std::borrow::Cow;
use std::io::Read;

pub use document::{Document, Fragment};
pub use error::{HtmlError, ParseError, ParseErrorCode, Result};
pub use input::InputStream;
pub use options::{ParserOption, ParserOptions};
pub use parser::{ContextElement, HTMLParser, InsertionMode, dump_tree};
pub use tokenizer::{Token, TokenCollector, TokenSink, TokenSinkResult, Tokenizer, TokenizerState};

/// Parse a complete document with default options.
///
/// # Errors
///
/// See [`HTMLParser::parse_document`].
pub fn parse(input: &str) -> Result<Document> {
    parse_with_options(input, ParserOptions::default())
}

/// Parse a complete document.
///
/// # Errors
///
/// See [`HTMLParser::parse_document`].
pub fn parse_with_options(input: &str, options: ParserOptions) -> Result<Document> {
    HTMLParser::new(options).parse_document(InputStream::new(input))
}

/// [Encoding § 4.1](https://encoding.spec.whatwg.org/#utf-8-decode)
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const UTF16_BOM: u16 = 0xFEFF;

/// Read a UTF-8 byte stream to the end and parse it. A leading byte order mark
/// is dropped and invalid sequences become U+FFFD.
///
/// # Errors
///
/// Returns [`HtmlError::Io`] if reading fails.
pub fn parse_reader(mut reader: impl Read, options: ParserOptions) -> Result<Document> {
    let mut bytes = Vec::new();
    let _ = reader.read_to_end(&mut bytes)?;
    parse_with_options(&decode_utf8(&bytes), options)
}

/// Decode UTF-8 bytes the way a browser does: a leading byte order mark is
/// dropped and invalid sequences become U+FFFD.
///
/// ```
/// assert_eq!(quill_html::decode_utf8(b"\xEF\xBB\xBFa\xFF"), "a\u{FFFD}");
/// ```
#[must_use]
pub fn decode_utf8(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes))
}

/// Parse a document given as UTF-16 code units. A leading byte order mark is
/// dropped. Lone surrogates become U+FFFD and raise `surrogate-in-input-stream`.
///
/// # Errors
///
/// See [`HTMLParser::parse_document`].
pub fn parse_utf16(input: &[u16], options: ParserOptions) -> Result<Document> {
    let input = input.strip_prefix(&[UTF16_BOM]).unwrap_or(input);
    HTMLParser::new(options).parse_document(InputStream::from_utf16(input))
}

/// Parse `input` as the contents of `context`.
///
/// ```
/// use quill_html::{ContextElement, ParserOptions, parse_fragment};
///
/// let fragment =
///     parse_fragment(&ContextElement::html("div"), "<li>a", ParserOptions::default()).unwrap();
/// assert_eq!(fragment.dump(), "| <li>\n|   \"a\"\n");
/// ```
///
/// # Errors
///
/// See [`HTMLParser::parse_fragment`].
pub fn parse_fragment(
    context: &ContextElement,
    input: &str,
    options: ParserOptions,
) -> Result<Fragment> {
    HTMLParser::new(options).parse_fragment(context, InputStream::new(input))
}
