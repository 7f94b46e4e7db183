//! Integration tests for table parsing and foster parenting.

use quill_html::{ContextElement, ParseErrorCode, ParserOptions, parse, parse_fragment};

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
fn test_implied_tbody() {
    assert_eq!(
        body_dump("<table><tr><td>a</td></tr></table>"),
        "|     <table>\n|       <tbody>\n|         <tr>\n|           <td>\n|             \"a\"\n"
    );
}

#[test]
fn test_cells_close_each_other() {
    assert_eq!(
        body_dump("<table><tr><td>a<td>b</table>"),
        "|     <table>\n|       <tbody>\n|         <tr>\n|           <td>\n|             \"a\"\n|           <td>\n|             \"b\"\n"
    );
}

#[test]
fn test_text_in_table_is_foster_parented() {
    let document = parse("<!DOCTYPE html><table>x</table>").unwrap();
    assert_eq!(
        document.dump().strip_prefix(PROLOGUE),
        Some("|     \"x\"\n|     <table>\n")
    );
    assert!(
        document
            .errors()
            .iter()
            .any(|e| e.code == ParseErrorCode::FosterParentedContent
                || e.code == ParseErrorCode::UnexpectedCharacterInTable)
    );
}

#[test]
fn test_whitespace_in_table_stays_in_table() {
    assert_eq!(
        body_dump("<table> <tr></tr></table>"),
        "|     <table>\n|       \" \"\n|       <tbody>\n|         <tr>\n"
    );
}

#[test]
fn test_element_in_table_is_foster_parented() {
    assert_eq!(
        body_dump("<table><tr><div>x</div><td>y</table>"),
        "|     <div>\n|       \"x\"\n|     <table>\n|       <tbody>\n|         <tr>\n|           <td>\n|             \"y\"\n"
    );
}

#[test]
fn test_caption_and_colgroup() {
    assert_eq!(
        body_dump("<table><caption>c</caption><col></table>"),
        "|     <table>\n|       <caption>\n|         \"c\"\n|       <colgroup>\n|         <col>\n"
    );
}

#[test]
fn test_caption_end_tag_without_open_caption_is_ignored() {
    let fragment = parse_fragment(
        &ContextElement::html("caption"),
        "x</caption>y",
        ParserOptions::default(),
    )
    .unwrap();
    assert_eq!(fragment.dump(), "| \"xy\"\n");
    assert_eq!(fragment.errors()[0].code, ParseErrorCode::UnexpectedEndTag);
}

#[test]
fn test_nested_table_start_closes_outer() {
    assert_eq!(
        body_dump("<table><table>"),
        "|     <table>\n|     <table>\n"
    );
}

#[test]
fn test_hidden_input_stays_in_table() {
    assert_eq!(
        body_dump(r#"<table><input type="hidden"></table>"#),
        "|     <table>\n|       <input>\n|         type=\"hidden\"\n"
    );
}

#[test]
fn test_select_in_cell() {
    assert_eq!(
        body_dump("<table><tr><td><select><option>a</td>b"),
        "|     \"b\"\n|     <table>\n|       <tbody>\n|         <tr>\n|           <td>\n|             <select>\n|               <option>\n|                 \"a\"\n"
    );
}
