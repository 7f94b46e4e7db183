//! Document mode selection from the DOCTYPE token.
//!
//! [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)

use quill_dom::QuirksMode;

/// Public identifiers starting with any of these put the document in quirks
/// mode. Compared ASCII case-insensitively.
const QUIRKS_PUBLIC_ID_PREFIXES: &[&str] = &[
    "+//silmaril//dtd html pro v0r11 19970101//",
    "-//as//dtd html 3.0 aswedit + extensions//",
    "-//advasoft ltd//dtd html 3.0 aswedit + extensions//",
    "-//ietf//dtd html 2.0 level 1//",
    "-//ietf//dtd html 2.0 level 2//",
    "-//ietf//dtd html 2.0 strict level 1//",
    "-//ietf//dtd html 2.0 strict level 2//",
    "-//ietf//dtd html 2.0 strict//",
    "-//ietf//dtd html 2.0//",
    "-//ietf//dtd html 2.1e//",
    "-//ietf//dtd html 3.0//",
    "-//ietf//dtd html 3.2 final//",
    "-//ietf//dtd html 3.2//",
    "-//ietf//dtd html 3//",
    "-//ietf//dtd html level 0//",
    "-//ietf//dtd html level 1//",
    "-//ietf//dtd html level 2//",
    "-//ietf//dtd html level 3//",
    "-//ietf//dtd html strict level 0//",
    "-//ietf//dtd html strict level 1//",
    "-//ietf//dtd html strict level 2//",
    "-//ietf//dtd html strict level 3//",
    "-//ietf//dtd html strict//",
    "-//ietf//dtd html//",
    "-//metrius//dtd metrius presentational//",
    "-//microsoft//dtd internet explorer 2.0 html strict//",
    "-//microsoft//dtd internet explorer 2.0 html//",
    "-//microsoft//dtd internet explorer 2.0 tables//",
    "-//microsoft//dtd internet explorer 3.0 html strict//",
    "-//microsoft//dtd internet explorer 3.0 html//",
    "-//microsoft//dtd internet explorer 3.0 tables//",
    "-//netscape comm. corp.//dtd html//",
    "-//netscape comm. corp.//dtd strict html//",
    "-//o'reilly and associates//dtd html 2.0//",
    "-//o'reilly and associates//dtd html extended 1.0//",
    "-//o'reilly and associates//dtd html extended relaxed 1.0//",
    "-//sq//dtd html 2.0 hotmetal + extensions//",
    "-//softquad software//dtd hotmetal pro 6.0::19990601::extensions to html 4.0//",
    "-//softquad//dtd hotmetal pro 4.0::19971010::extensions to html 4.0//",
    "-//spyglass//dtd html 2.0 extended//",
    "-//sun microsystems corp.//dtd hotjava html//",
    "-//sun microsystems corp.//dtd hotjava strict html//",
    "-//w3c//dtd html 3 1995-03-24//",
    "-//w3c//dtd html 3.2 draft//",
    "-//w3c//dtd html 3.2 final//",
    "-//w3c//dtd html 3.2//",
    "-//w3c//dtd html 3.2s draft//",
    "-//w3c//dtd html 4.0 frameset//",
    "-//w3c//dtd html 4.0 transitional//",
    "-//w3c//dtd html experimental 19960712//",
    "-//w3c//dtd html experimental 970421//",
    "-//w3c//dtd w3 html//",
    "-//w3o//dtd w3 html 3.0//",
    "-//webtechs//dtd mozilla html 2.0//",
    "-//webtechs//dtd mozilla html//",
];

/// Public identifiers matched exactly (ASCII case-insensitively).
const QUIRKS_PUBLIC_IDS: &[&str] = &[
    "-//w3o//dtd w3 html strict 3.0//en//",
    "-/w3c/dtd html 4.0 transitional/en",
    "html",
];

const QUIRKS_SYSTEM_ID: &str = "http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd";

/// Quirks when the system identifier is missing, limited quirks otherwise.
const HTML4_PUBLIC_ID_PREFIXES: &[&str] = &[
    "-//w3c//dtd html 4.01 frameset//",
    "-//w3c//dtd html 4.01 transitional//",
];

const LIMITED_QUIRKS_PUBLIC_ID_PREFIXES: &[&str] = &[
    "-//w3c//dtd xhtml 1.0 frameset//",
    "-//w3c//dtd xhtml 1.0 transitional//",
];

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value.len() >= prefix.len()
        && value.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Document mode for a DOCTYPE token. `iframe srcdoc` documents are not
/// modelled, so the checks always apply.
#[must_use]
pub fn quirks_mode_for_doctype(
    name: Option<&str>,
    public_identifier: Option<&str>,
    system_identifier: Option<&str>,
    force_quirks: bool,
) -> QuirksMode {
    // "The force-quirks flag is set to on."
    // "The name is not "html"."
    if force_quirks || name != Some("html") {
        return QuirksMode::Quirks;
    }

    if let Some(public) = public_identifier {
        if QUIRKS_PUBLIC_IDS
            .iter()
            .any(|id| public.eq_ignore_ascii_case(id))
            || QUIRKS_PUBLIC_ID_PREFIXES
                .iter()
                .any(|prefix| starts_with_ignore_case(public, prefix))
        {
            return QuirksMode::Quirks;
        }
        // "The system identifier is missing and the public identifier starts
        // with: ..."
        if system_identifier.is_none()
            && HTML4_PUBLIC_ID_PREFIXES
                .iter()
                .any(|prefix| starts_with_ignore_case(public, prefix))
        {
            return QuirksMode::Quirks;
        }
    }

    if system_identifier.is_some_and(|system| system.eq_ignore_ascii_case(QUIRKS_SYSTEM_ID)) {
        return QuirksMode::Quirks;
    }

    // "Otherwise, if the document is not an iframe srcdoc document, and the
    // parser cannot change the mode flag is false, and the DOCTYPE token
    // matches one of the conditions in the following list, then then set the
    // Document to limited-quirks mode"
    if let Some(public) = public_identifier
        && (LIMITED_QUIRKS_PUBLIC_ID_PREFIXES
            .iter()
            .any(|prefix| starts_with_ignore_case(public, prefix))
            || (system_identifier.is_some()
                && HTML4_PUBLIC_ID_PREFIXES
                    .iter()
                    .any(|prefix| starts_with_ignore_case(public, prefix))))
    {
        return QuirksMode::LimitedQuirks;
    }

    QuirksMode::NoQuirks
}

/// "If the DOCTYPE token's name is not "html", or the token's public
/// identifier is not missing, or the token's system identifier is neither
/// missing nor "about:legacy-compat", then there is a parse error."
#[must_use]
pub fn is_conforming_doctype(
    name: Option<&str>,
    public_identifier: Option<&str>,
    system_identifier: Option<&str>,
) -> bool {
    name == Some("html")
        && public_identifier.is_none()
        && system_identifier.is_none_or(|system| system == "about:legacy-compat")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html5_doctype_is_no_quirks() {
        assert_eq!(
            quirks_mode_for_doctype(Some("html"), None, None, false),
            QuirksMode::NoQuirks
        );
        assert!(is_conforming_doctype(Some("html"), None, Some("about:legacy-compat")));
    }

    #[test]
    fn legacy_public_identifiers_trigger_quirks() {
        assert_eq!(
            quirks_mode_for_doctype(
                Some("html"),
                Some("-//W3C//DTD HTML 4.0 Transitional//EN"),
                None,
                false
            ),
            QuirksMode::Quirks
        );
        assert_eq!(
            quirks_mode_for_doctype(
                Some("html"),
                Some("-//W3C//DTD HTML 4.01 Transitional//EN"),
                None,
                false
            ),
            QuirksMode::Quirks
        );
    }

    #[test]
    fn html4_with_system_identifier_is_limited_quirks() {
        assert_eq!(
            quirks_mode_for_doctype(
                Some("html"),
                Some("-//W3C//DTD HTML 4.01 Transitional//EN"),
                Some("http://www.w3.org/TR/html4/loose.dtd"),
                false
            ),
            QuirksMode::LimitedQuirks
        );
        assert_eq!(
            quirks_mode_for_doctype(
                Some("html"),
                Some("-//W3C//DTD XHTML 1.0 Strict//EN"),
                None,
                false
            ),
            QuirksMode::NoQuirks
        );
    }

    #[test]
    fn force_quirks_or_other_name_is_quirks() {
        assert_eq!(
            quirks_mode_for_doctype(Some("html"), None, None, true),
            QuirksMode::Quirks
        );
        assert_eq!(
            quirks_mode_for_doctype(Some("svg"), None, None, false),
            QuirksMode::Quirks
        );
        assert!(!is_conforming_doctype(Some("html"), Some(""), None));
    }
}
