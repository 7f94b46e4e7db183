//! Integration tests for misnested formatting elements.

use quill_html::{ParseErrorCode, parse};

const PROLOGUE: &str = "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n";

/// Helper to parse a body fragment and return the dump below `<body>`
fn body_dump(html: &str) -> String {
    let output = parse(&format!("<!DOCTYPE html>{html}")).unwrap().dump();
    output
        .strip_prefix(PROLOGUE)
        .expect("document prologue")
        .to_string()
}

#[test]
fn test_formatting_element_split_across_block() {
    assert_eq!(
        body_dump("<b><p>x</b>y"),
        "|     <b>\n|     <p>\n|       <b>\n|         \"x\"\n|       \"y\"\n"
    );
}

#[test]
fn test_anchor_closed_inside_paragraph() {
    assert_eq!(
        body_dump("<a>1<p>2</a>3</p>"),
        "|     <a>\n|       \"1\"\n|     <p>\n|       <a>\n|         \"2\"\n|       \"3\"\n"
    );
}

#[test]
fn test_nested_anchor_closes_outer() {
    assert_eq!(
        body_dump("<a>1<a>2"),
        "|     <a>\n|       \"1\"\n|     <a>\n|       \"2\"\n"
    );
}

#[test]
fn test_misnested_inline_elements() {
    assert_eq!(
        body_dump("<b>1<i>2</b>3</i>"),
        "|     <b>\n|       \"1\"\n|       <i>\n|         \"2\"\n|     <i>\n|       \"3\"\n"
    );
}

#[test]
fn test_only_unclosed_formatting_is_reopened() {
    assert_eq!(
        body_dump("<b><i>x</b>y</i>"),
        "|     <b>\n|       <i>\n|         \"x\"\n|     <i>\n|       \"y\"\n"
    );
}

#[test]
fn test_formatting_reconstructed_after_block() {
    assert_eq!(
        body_dump("<p><b>x</p><p>y"),
        "|     <p>\n|       <b>\n|         \"x\"\n|     <p>\n|       <b>\n|         \"y\"\n"
    );
}

#[test]
fn test_attributes_are_cloned() {
    assert_eq!(
        body_dump(r#"<b class="k"><p>x</b>y"#),
        "|     <b>\n|       class=\"k\"\n|     <p>\n|       <b>\n|         class=\"k\"\n|         \"x\"\n|       \"y\"\n"
    );
}

#[test]
fn test_end_tag_without_open_element_is_ignored() {
    let document = parse("<!DOCTYPE html><p>x</b>").unwrap();
    assert!(
        document
            .errors()
            .iter()
            .any(|e| e.code == ParseErrorCode::UnexpectedEndTag)
    );
    assert_eq!(
        document.dump().strip_prefix(PROLOGUE),
        Some("|     <p>\n|       \"x\"\n")
    );
}

#[test]
fn test_noahs_ark_limits_reconstructed_duplicates() {
    // Four b elements in the first paragraph, only three reopened in the second.
    assert_eq!(
        body_dump("<p><b><b><b><b><p>x"),
        "|     <p>\n|       <b>\n|         <b>\n|           <b>\n|             <b>\n\
         |     <p>\n|       <b>\n|         <b>\n|           <b>\n|             \"x\"\n"
    );
}
