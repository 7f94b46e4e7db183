//! Integration tests for document tree construction.

use quill_dom::{NodeId, NodeType, QuirksMode};
use quill_html::{Document, ParseErrorCode, parse};

/// Helper to parse a document and return its html5lib dump
fn dump(html: &str) -> String {
    parse(html).expect("parse never fails on markup").dump()
}

/// Helper to find the first element with the given tag name (depth-first)
fn find_element(document: &Document, tag: &str) -> Option<NodeId> {
    let tree = document.tree();
    let mut pending = vec![NodeId::ROOT];
    while let Some(id) = pending.pop() {
        if let Some(node) = tree.get(id) {
            if let NodeType::Element(data) = &node.node_type
                && data.tag_name == tag
            {
                return Some(id);
            }
            pending.extend(node.children.iter().rev());
        }
    }
    None
}

#[test]
fn test_minimal_document() {
    assert_eq!(
        dump("<!DOCTYPE html><p>Hello"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n|     <p>\n|       \"Hello\"\n"
    );
}

#[test]
fn test_empty_input_builds_skeleton() {
    assert_eq!(dump(""), "| <html>\n|   <head>\n|   <body>\n");
}

#[test]
fn test_missing_doctype_is_quirks() {
    let document = parse("<p>x").unwrap();
    assert_eq!(document.quirks_mode(), QuirksMode::Quirks);
    assert_eq!(document.errors()[0].code, ParseErrorCode::MissingDoctype);
}

#[test]
fn test_html5_doctype_is_no_quirks() {
    let document = parse("<!DOCTYPE html>").unwrap();
    assert_eq!(document.quirks_mode(), QuirksMode::NoQuirks);
    assert!(document.errors().is_empty());
}

#[test]
fn test_legacy_doctypes_select_quirks_modes() {
    let quirks = parse(r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN">"#).unwrap();
    assert_eq!(quirks.quirks_mode(), QuirksMode::Quirks);

    let limited = parse(
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">"#,
    )
    .unwrap();
    assert_eq!(limited.quirks_mode(), QuirksMode::LimitedQuirks);
}

#[test]
fn test_doctype_identifiers_are_dumped() {
    let output = dump(r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01//EN" "">"#);
    assert!(output.starts_with("| <!DOCTYPE html \"-//W3C//DTD HTML 4.01//EN\" \"\">\n"));
}

#[test]
fn test_comment_before_html() {
    assert_eq!(
        dump("<!--c--><!DOCTYPE html>"),
        "| <!-- c -->\n| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n"
    );
}

#[test]
fn test_head_content() {
    assert_eq!(
        dump("<!DOCTYPE html><title>T</title><p>x"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|     <title>\n|       \"T\"\n|   <body>\n|     <p>\n|       \"x\"\n"
    );
}

#[test]
fn test_whitespace_after_head_goes_to_html() {
    assert_eq!(
        dump("<!DOCTYPE html><html><head></head> <body></body></html>"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   \" \"\n|   <body>\n"
    );
}

#[test]
fn test_implied_paragraph_end() {
    assert_eq!(
        dump("<!DOCTYPE html><p>a<p>b"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n|     <p>\n|       \"a\"\n|     <p>\n|       \"b\"\n"
    );
}

#[test]
fn test_implied_list_item_end() {
    assert_eq!(
        dump("<!DOCTYPE html><ul><li>a<li>b</ul>"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n|     <ul>\n|       <li>\n|         \"a\"\n|       <li>\n|         \"b\"\n"
    );
}

#[test]
fn test_attributes_are_sorted_in_dump() {
    assert_eq!(
        dump(r#"<!DOCTYPE html><div title="t" class="c" id="i"></div>"#),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n|     <div>\n|       class=\"c\"\n|       id=\"i\"\n|       title=\"t\"\n"
    );
}

#[test]
fn test_text_is_coalesced() {
    let document = parse("<!DOCTYPE html><p>a&amp;b</p>").unwrap();
    let p = find_element(&document, "p").expect("p element");
    let children = document.tree().children(p);
    assert_eq!(children.len(), 1);
    assert!(matches!(
        &document.tree().get(children[0]).unwrap().node_type,
        NodeType::Text(text) if text == "a&b"
    ));
}

#[test]
fn test_textarea_drops_leading_newline() {
    assert_eq!(
        dump("<!DOCTYPE html><textarea>\nx</textarea>"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n|     <textarea>\n|       \"x\"\n"
    );
}

#[test]
fn test_script_is_raw_text() {
    assert_eq!(
        dump("<!DOCTYPE html><script>a<b</script>"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|     <script>\n|       \"a<b\"\n|   <body>\n"
    );
}

#[test]
fn test_template_contents() {
    assert_eq!(
        dump("<!DOCTYPE html><template><p>x</template>"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|     <template>\n|       content\n|         <p>\n|           \"x\"\n|   <body>\n"
    );
}

#[test]
fn test_frameset_document() {
    assert_eq!(
        dump("<!DOCTYPE html><frameset><frame></frameset>"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <frameset>\n|     <frame>\n"
    );
}

#[test]
fn test_stray_end_tag_is_reported() {
    let document = parse("<!DOCTYPE html><p>x</span>").unwrap();
    assert!(
        document
            .errors()
            .iter()
            .any(|e| e.code == ParseErrorCode::UnexpectedEndTag)
    );
    assert_eq!(
        document.dump(),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n|     <p>\n|       \"x\"\n"
    );
}

#[test]
fn test_second_html_tag_merges_attributes() {
    assert_eq!(
        dump(r#"<!DOCTYPE html><html lang="en"><body><html id="x" lang="fr">"#),
        "| <!DOCTYPE html>\n| <html>\n|   id=\"x\"\n|   lang=\"en\"\n|   <head>\n|   <body>\n"
    );
}

#[test]
fn test_content_after_body_end_goes_into_body() {
    assert_eq!(
        dump("<!DOCTYPE html><body></body>x"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n|     \"x\"\n"
    );
}

#[test]
fn test_comment_after_html_end() {
    assert_eq!(
        dump("<!DOCTYPE html></html><!--c-->"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n| <!-- c -->\n"
    );
}

#[test]
fn test_document_element() {
    let document = parse("<!DOCTYPE html>").unwrap();
    let html = document.document_element().expect("html element");
    assert_eq!(find_element(&document, "html"), Some(html));
}
