//! Integration tests for fragment parsing.

use quill_dom::{DomTree, Namespace, NodeId, NodeType};
use quill_html::{ContextElement, HtmlError, ParserOptions, parse_fragment};

/// Helper to parse `html` in the context named by `context` and dump it
fn fragment_dump(context: &str, html: &str) -> String {
    let context: ContextElement = context.parse().expect("valid context");
    parse_fragment(&context, html, ParserOptions::default())
        .expect("parse never fails on markup")
        .dump()
}

/// Helper to write nodes back out as markup. Enough for HTML elements and text.
fn to_markup(tree: &DomTree, ids: &[NodeId], out: &mut String) {
    for &id in ids {
        let Some(node) = tree.get(id) else { continue };
        match &node.node_type {
            NodeType::Element(data) => {
                out.push('<');
                out.push_str(&data.tag_name);
                for attr in data.attrs.iter() {
                    out.push_str(&format!(" {}=\"{}\"", attr.name, attr.value.replace('&', "&amp;").replace('"', "&quot;")));
                }
                out.push('>');
                if !matches!(data.tag_name.as_str(), "br" | "img" | "hr" | "input") {
                    to_markup(tree, &node.children, out);
                    out.push_str(&format!("</{}>", data.tag_name));
                }
            }
            NodeType::Text(text) => {
                out.push_str(&text.replace('&', "&amp;").replace('<', "&lt;"));
            }
            NodeType::Comment(text) => out.push_str(&format!("<!--{text}-->")),
            _ => {}
        }
    }
}

#[test]
fn test_div_context() {
    assert_eq!(
        fragment_dump("div", "<p>a</p>b"),
        "| <p>\n|   \"a\"\n| \"b\"\n"
    );
}

#[test]
fn test_fragment_has_no_html_wrapper() {
    let fragment = parse_fragment(&ContextElement::html("div"), "x<br>", ParserOptions::default()).unwrap();
    assert_eq!(fragment.nodes().len(), 2);
    let first = fragment.tree().get(fragment.nodes()[0]).unwrap();
    assert!(matches!(&first.node_type, NodeType::Text(text) if text == "x"));
}

#[test]
fn test_row_context() {
    assert_eq!(fragment_dump("tr", "<td>x"), "| <td>\n|   \"x\"\n");
}

#[test]
fn test_table_context_inserts_tbody() {
    assert_eq!(
        fragment_dump("table", "x<tr>"),
        "| \"x\"\n| <tbody>\n|   <tr>\n"
    );
}

#[test]
fn test_template_context() {
    assert_eq!(fragment_dump("template", "<td>x"), "| <td>\n|   \"x\"\n");
}

#[test]
fn test_select_context() {
    assert_eq!(
        fragment_dump("select", "<option>a<option>b"),
        "| <option>\n|   \"a\"\n| <option>\n|   \"b\"\n"
    );
}

#[test]
fn test_textarea_context_is_rcdata() {
    assert_eq!(fragment_dump("textarea", "<b>&amp;"), "| \"<b>&\"\n");
}

#[test]
fn test_plaintext_context() {
    assert_eq!(
        fragment_dump("plaintext", "</plaintext><b>"),
        "| \"</plaintext><b>\"\n"
    );
}

#[test]
fn test_svg_context() {
    assert_eq!(fragment_dump("svg svg", "<path/>"), "| <svg path>\n");

    let context = ContextElement::svg("svg");
    let fragment = parse_fragment(&context, "<circle/>", ParserOptions::default()).unwrap();
    let circle = fragment.tree().get(fragment.nodes()[0]).unwrap();
    match &circle.node_type {
        NodeType::Element(data) => assert_eq!(data.namespace, Namespace::Svg),
        _ => panic!("Expected an element"),
    }
}

#[test]
fn test_form_context_ignores_nested_form() {
    assert_eq!(fragment_dump("form", "<form><input>"), "| <input>\n");
}

#[test]
fn test_stray_paragraph_end_creates_element() {
    let fragment = parse_fragment(&ContextElement::html("div"), "</p>", ParserOptions::default()).unwrap();
    assert_eq!(fragment.dump(), "| <p>\n");
    assert!(!fragment.errors().is_empty());
}

#[test]
fn test_invalid_context_name() {
    assert!(matches!(
        "".parse::<ContextElement>(),
        Err(HtmlError::UnknownContextElement(_))
    ));
}

#[test]
fn test_foster_parenting_inside_div_context() {
    assert_eq!(
        fragment_dump("div", "<table>foo<tr><td>bar</td></tr></table>"),
        "| \"foo\"\n| <table>\n|   <tbody>\n|     <tr>\n|       <td>\n|         \"bar\"\n"
    );
}

#[test]
fn test_nested_table_tag_in_table_context_is_ignored() {
    assert_eq!(
        fragment_dump("table", "<table>foo<tr><td>bar</td></tr></table>"),
        "| \"foo\"\n| <tbody>\n|   <tr>\n|     <td>\n|       \"bar\"\n"
    );
}

#[test]
fn test_reparsing_written_out_fragment_is_stable() {
    let context = ContextElement::html("div");
    let input = r#"<p class="a&b">a<b>b<p>c</b>d<ul><li>e<li>f &lt; g</ul><br>"#;
    let first = parse_fragment(&context, input, ParserOptions::default()).unwrap();

    let mut markup = String::new();
    to_markup(first.tree(), first.nodes(), &mut markup);
    let second = parse_fragment(&context, &markup, ParserOptions::default()).unwrap();

    assert_eq!(second.dump(), first.dump());
    assert!(second.errors().is_empty());
}
