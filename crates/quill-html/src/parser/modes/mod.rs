//! Insertion mode rules.
//!
//! [§ 13.2.6.4 The rules for parsing tokens in HTML content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhtml)
//!
//! Each handler takes the token by reference and reports through
//! [`ProcessResult`](super::core::ProcessResult) whether it must be reprocessed.

mod after;
mod body;
mod head;
mod initial;
mod select;
mod table;
mod template;

/// "U+0009 CHARACTER TABULATION, U+000A LINE FEED (LF), U+000C FORM FEED (FF),
/// U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
pub(super) const fn is_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
}
