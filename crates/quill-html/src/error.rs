//! Error types for the HTML parser.
//!
//! Two kinds of failure exist and they never mix:
//!
//! - [`ParseError`]: malformed markup. Always recovered, reported through the
//!   side channel, never returned as `Err`.
//! - [`HtmlError`]: API misuse and broken internal invariants. Returned to the
//!   caller as `Err`.

use std::fmt;

use quill_dom::DomError;
use strum_macros::{Display, IntoStaticStr};
use thiserror::Error;

/// Fatal conditions surfaced to the caller of a parse entry point.
#[derive(Debug, Error)]
pub enum HtmlError {
    /// A tree mutation was rejected by the DOM.
    #[error("tree mutation failed: {0}")]
    Dom(#[from] DomError),

    /// Reading the input stream failed.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// The tree constructor reached a state the algorithm rules out, such as
    /// popping an empty stack of open elements or a reprocess loop that never
    /// settles.
    #[error("internal parser invariant violated: {0}")]
    InvariantViolation(&'static str),

    /// A fragment context descriptor could not be understood.
    #[error("unknown fragment context element `{0}`")]
    UnknownContextElement(String),
}

/// Result alias for the parser's fallible entry points.
pub type Result<T> = std::result::Result<T, HtmlError>;

/// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
///
/// The `Display` form is the kebab-case error code used by the standard, e.g.
/// `unexpected-null-character`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum ParseErrorCode {
    // ----- input stream -----
    /// A C0 or C1 control other than ASCII whitespace or NULL.
    ControlCharacterInInputStream,
    /// A Unicode noncharacter.
    NoncharacterInInputStream,
    /// A lone UTF-16 surrogate.
    SurrogateInInputStream,

    // ----- tokenizer -----
    /// `&#...;` naming a C0/C1 control.
    ControlCharacterReference,
    /// `</...` followed by whitespace and attributes.
    EndTagWithAttributes,
    /// `</.../>`
    EndTagWithTrailingSolidus,
    /// A repeated attribute name on one tag.
    DuplicateAttribute,
    /// `<!DOCTYPE` cut off by end of input.
    EofInDoctype,
    /// End of input inside a CDATA section.
    EofInCdata,
    /// End of input inside a comment.
    EofInComment,
    /// End of input inside a script comment-like section.
    EofInScriptHtmlCommentLikeText,
    /// End of input inside a tag.
    EofInTag,
    /// End of input right after `</`.
    EofBeforeTagName,
    /// `--!>` closing a comment.
    IncorrectlyClosedComment,
    /// `<!` not followed by a comment, doctype or CDATA opener.
    IncorrectlyOpenedComment,
    /// `<!DOCTYPE` followed by an unrecognised keyword.
    InvalidCharacterSequenceAfterDoctypeName,
    /// `<` followed by a character that cannot start a tag name.
    InvalidFirstCharacterOfTagName,
    /// `<x a=>`
    MissingAttributeValue,
    /// `<!DOCTYPE>`
    MissingDoctypeName,
    /// `<!DOCTYPE html PUBLIC>`
    MissingDoctypePublicIdentifier,
    /// `<!DOCTYPE html SYSTEM>`
    MissingDoctypeSystemIdentifier,
    /// `</>`
    MissingEndTagName,
    /// Public identifier without a leading quote.
    MissingQuoteBeforeDoctypePublicIdentifier,
    /// System identifier without a leading quote.
    MissingQuoteBeforeDoctypeSystemIdentifier,
    /// Named reference not terminated by `;`.
    MissingSemicolonAfterCharacterReference,
    /// `PUBLIC"..."` without whitespace.
    MissingWhitespaceAfterDoctypePublicKeyword,
    /// `SYSTEM"..."` without whitespace.
    MissingWhitespaceAfterDoctypeSystemKeyword,
    /// `<!DOCTYPEhtml>`
    MissingWhitespaceBeforeDoctypeName,
    /// `<a b=""c>`
    MissingWhitespaceBetweenAttributes,
    /// Two identifiers without whitespace between them.
    MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
    /// `<!--<!--`
    NestedComment,
    /// `&#xFDD0;` and friends.
    NoncharacterCharacterReference,
    /// `&#;` or `&#x;`
    AbsenceOfDigitsInNumericCharacterReference,
    /// `<![CDATA[` in HTML content.
    CdataInHtmlContent,
    /// `&#x110000;`
    CharacterReferenceOutsideUnicodeRange,
    /// `&#0;`
    NullCharacterReference,
    /// `&#xD800;`
    SurrogateCharacterReference,
    /// `<!-->`
    AbruptClosingOfEmptyComment,
    /// `>` inside a doctype public identifier.
    AbruptDoctypePublicIdentifier,
    /// `>` inside a doctype system identifier.
    AbruptDoctypeSystemIdentifier,
    /// `&unknown;`
    UnknownNamedCharacterReference,
    /// `"`, `'`, `<` or `=` in an attribute name.
    UnexpectedCharacterInAttributeName,
    /// `"`, `'`, `<`, `=` or `` ` `` in an unquoted attribute value.
    UnexpectedCharacterInUnquotedAttributeValue,
    /// Junk after a doctype system identifier.
    UnexpectedCharacterAfterDoctypeSystemIdentifier,
    /// `<a =b>`
    UnexpectedEqualsSignBeforeAttributeName,
    /// U+0000 in the input.
    UnexpectedNullCharacter,
    /// `<?`
    UnexpectedQuestionMarkInsteadOfTagName,
    /// `<a / b>`
    UnexpectedSolidusInTag,

    // ----- tree construction -----
    /// A token arrived in the initial mode without a preceding doctype.
    MissingDoctype,
    /// A doctype whose name or identifiers are not the conforming forms.
    NonConformingDoctype,
    /// A doctype token after the initial mode.
    UnexpectedDoctype,
    /// A start tag the current insertion mode ignores or repairs.
    UnexpectedStartTag,
    /// An end tag the current insertion mode ignores or repairs.
    UnexpectedEndTag,
    /// Non-whitespace character data where none is allowed.
    UnexpectedCharacter,
    /// Character data foster-parented out of a table.
    UnexpectedCharacterInTable,
    /// Element content foster-parented out of a table.
    FosterParentedContent,
    /// An end tag closing an element while others remain open.
    MisnestedTag,
    /// Formatting elements unwound by the adoption agency algorithm.
    AdoptionAgencyRepair,
    /// `/>` on an HTML element that is not void.
    NonVoidHtmlElementStartTagWithTrailingSolidus,
    /// Elements still open when the input ended.
    EofWithUnclosedElements,
    /// A comment or token after the document has been closed.
    UnexpectedTokenAfterBody,
    /// A start tag breaks out of foreign content.
    UnexpectedHtmlElementInForeignContent,
}

impl ParseErrorCode {
    /// The kebab-case code as a static string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// One recovered markup error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// What went wrong.
    pub code: ParseErrorCode,
    /// Character offset into the normalised input.
    pub position: usize,
    /// Extra context, typically the offending tag name.
    pub detail: Option<String>,
}

impl ParseError {
    /// An error with no extra detail.
    #[must_use]
    pub const fn new(code: ParseErrorCode, position: usize) -> Self {
        Self {
            code,
            position,
            detail: None,
        }
    }

    /// Attach a detail string.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.code, self.position)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({detail})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_display_as_kebab_case() {
        assert_eq!(
            ParseErrorCode::UnexpectedNullCharacter.to_string(),
            "unexpected-null-character"
        );
        assert_eq!(
            ParseErrorCode::EofInScriptHtmlCommentLikeText.as_str(),
            "eof-in-script-html-comment-like-text"
        );
    }

    #[test]
    fn parse_error_display_includes_detail() {
        let error = ParseError::new(ParseErrorCode::UnexpectedEndTag, 12).with_detail("p");
        assert_eq!(error.to_string(), "unexpected-end-tag at 12 (p)");
    }
}
