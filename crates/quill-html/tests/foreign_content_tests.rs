//! Integration tests for SVG and MathML content.

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
fn test_svg_names_are_case_adjusted() {
    assert_eq!(
        body_dump(r#"<svg viewbox="0 0 1 1"><lineargradient/></svg>"#),
        "|     <svg svg>\n|       viewBox=\"0 0 1 1\"\n|       <svg linearGradient>\n"
    );
}

#[test]
fn test_xlink_attribute_namespace() {
    assert_eq!(
        body_dump(r##"<svg><a xlink:href="#x"/></svg>"##),
        "|     <svg svg>\n|       <svg a>\n|         xlink href=\"#x\"\n"
    );
}

#[test]
fn test_html_start_tag_breaks_out() {
    let document = parse("<!DOCTYPE html><svg><p>x").unwrap();
    assert_eq!(
        document.dump().strip_prefix(PROLOGUE),
        Some("|     <svg svg>\n|     <p>\n|       \"x\"\n")
    );
    assert!(
        document
            .errors()
            .iter()
            .any(|e| e.code == ParseErrorCode::UnexpectedHtmlElementInForeignContent)
    );
}

#[test]
fn test_font_breaks_out_only_with_presentational_attributes() {
    assert_eq!(
        body_dump("<svg><font>x"),
        "|     <svg svg>\n|       <svg font>\n|         \"x\"\n"
    );
    assert_eq!(
        body_dump(r#"<svg><font color="red">x"#),
        "|     <svg svg>\n|     <font>\n|       color=\"red\"\n|       \"x\"\n"
    );
}

#[test]
fn test_mathml_text_integration_point() {
    assert_eq!(
        body_dump("<math><mi><b>x</b></mi></math>"),
        "|     <math math>\n|       <math mi>\n|         <b>\n|           \"x\"\n"
    );
}

#[test]
fn test_annotation_xml_html_integration_point() {
    assert_eq!(
        body_dump(r#"<math><annotation-xml encoding="text/html"><div>y</div></annotation-xml></math>"#),
        "|     <math math>\n|       <math annotation-xml>\n|         encoding=\"text/html\"\n|         <div>\n|           \"y\"\n"
    );
}

#[test]
fn test_foreign_object_contains_html() {
    assert_eq!(
        body_dump("<svg><foreignObject><p>x</p></foreignObject></svg>"),
        "|     <svg svg>\n|       <svg foreignObject>\n|         <p>\n|           \"x\"\n"
    );
}

#[test]
fn test_cdata_section_in_svg() {
    assert_eq!(
        body_dump("<svg><![CDATA[a<b]]></svg>"),
        "|     <svg svg>\n|       \"a<b\"\n"
    );
}

#[test]
fn test_self_closing_math() {
    assert_eq!(
        body_dump("<math/>x"),
        "|     <math math>\n|     \"x\"\n"
    );
}

#[test]
fn test_mathml_definition_url_is_adjusted() {
    assert_eq!(
        body_dump(r#"<math definitionurl="u"></math>"#),
        "|     <math math>\n|       definitionURL=\"u\"\n"
    );
}

#[test]
fn test_end_tag_matches_case_insensitively() {
    assert_eq!(
        body_dump("<svg><foreignObject></foreignobject>x</svg>"),
        "|     <svg svg>\n|       <svg foreignObject>\n|       \"x\"\n"
    );
}
