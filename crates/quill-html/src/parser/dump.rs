//! Tree dump in the html5lib tree-construction test format.

use core::fmt::Write as _;

use quill_dom::{DomTree, Namespace, NodeId, NodeType};

/// Render every child of the Document node, one line per node.
///
/// ```text
/// | <!DOCTYPE html>
/// | <html>
/// |   <head>
/// |   <body>
/// |     <svg svg>
/// |       viewBox="0 0 1 1"
/// ```
///
/// Elements outside the HTML namespace carry a `svg ` or `math ` prefix,
/// attributes are sorted by name and listed one level below their element,
/// and the children of a `template` are listed under a `content` line.
#[must_use]
pub fn dump_tree(tree: &DomTree) -> String {
    let mut out = String::new();
    for &child in tree.children(NodeId::ROOT) {
        dump_node(tree, child, 0, &mut out);
    }
    out
}

fn dump_node(tree: &DomTree, id: NodeId, depth: usize, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let indent = "  ".repeat(depth);
    match &node.node_type {
        NodeType::Document => {}
        NodeType::DocumentType(doctype) => {
            let _ = write!(out, "| {indent}<!DOCTYPE {}", doctype.name);
            if !doctype.public_id.is_empty() || !doctype.system_id.is_empty() {
                let _ = write!(out, " \"{}\" \"{}\"", doctype.public_id, doctype.system_id);
            }
            out.push_str(">\n");
        }
        NodeType::Comment(data) => {
            let _ = writeln!(out, "| {indent}<!-- {data} -->");
        }
        NodeType::Text(data) => {
            let _ = writeln!(out, "| {indent}\"{data}\"");
        }
        NodeType::Element(element) => {
            match element.namespace {
                Namespace::Html => {
                    let _ = writeln!(out, "| {indent}<{}>", element.tag_name);
                }
                namespace => {
                    let _ = writeln!(out, "| {indent}<{namespace} {}>", element.tag_name);
                }
            }

            let mut attributes: Vec<(String, &str)> = element
                .attrs
                .iter()
                .map(|attr| {
                    let name = match attr.namespace {
                        Some(namespace) => format!("{namespace} {}", attr.local_name()),
                        None => attr.name.clone(),
                    };
                    (name, attr.value.as_str())
                })
                .collect();
            attributes.sort_unstable();
            for (name, value) in attributes {
                let _ = writeln!(out, "| {indent}  {name}=\"{value}\"");
            }

            let mut child_depth = depth + 1;
            if element.is_html("template") {
                let _ = writeln!(out, "| {indent}  content");
                child_depth += 1;
            }
            for &child in &node.children {
                dump_node(tree, child, child_depth, out);
            }
        }
    }
}
