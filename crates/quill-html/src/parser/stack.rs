//! The stack of open elements.
//!
//! [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)

use quill_dom::{Namespace, NodeId};

use super::core::{HTMLParser, InsertionMode};

/// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#special)
///
/// HTML elements in the "special" category.
const SPECIAL_HTML_ELEMENTS: &[&str] = &[
    "address", "applet", "area", "article", "aside", "base", "basefont", "bgsound",
    "blockquote", "body", "br", "button", "caption", "center", "col", "colgroup", "dd",
    "details", "dir", "div", "dl", "dt", "embed", "fieldset", "figcaption", "figure", "footer",
    "form", "frame", "frameset", "h1", "h2", "h3", "h4", "h5", "h6", "head", "header", "hgroup",
    "hr", "html", "iframe", "img", "input", "keygen", "li", "link", "listing", "main",
    "marquee", "menu", "meta", "nav", "noembed", "noframes", "noscript", "object", "ol", "p",
    "param", "plaintext", "pre", "script", "search", "section", "select", "source", "style",
    "summary", "table", "tbody", "td", "template", "textarea", "tfoot", "th", "thead", "title",
    "tr", "track", "ul", "wbr", "xmp",
];

/// "MathML mi, MathML mo, MathML mn, MathML ms, MathML mtext, and MathML
/// annotation-xml; and SVG foreignObject, SVG desc, and SVG title."
const SPECIAL_MATHML_ELEMENTS: &[&str] = &["mi", "mo", "mn", "ms", "mtext", "annotation-xml"];
const SPECIAL_SVG_ELEMENTS: &[&str] = &["foreignObject", "desc", "title"];

/// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-scope)
///
/// HTML elements terminating the default scope.
const DEFAULT_SCOPE_HTML_ELEMENTS: &[&str] = &[
    "applet", "caption", "html", "table", "td", "th", "marquee", "object", "template",
];

/// [§ 13.2.6.3 Closing elements that have implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
pub(super) const IMPLIED_END_TAG_ELEMENTS: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
];

/// "generate all implied end tags thoroughly"
const THOROUGH_IMPLIED_END_TAG_ELEMENTS: &[&str] = &[
    "caption", "colgroup", "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
    "tbody", "td", "tfoot", "th", "thead", "tr",
];

/// Elements that may stay open at end of body without a parse error.
pub(super) const ALLOWED_OPEN_AT_END_OF_BODY: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc", "tbody", "td",
    "tfoot", "th", "thead", "tr", "body", "html",
];

/// Which "has an element in ... scope" variant to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Scope {
    /// "has an element in scope"
    Default,
    /// "has an element in list item scope": default plus `ol` and `ul`.
    ListItem,
    /// "has an element in button scope": default plus `button`.
    Button,
    /// "has an element in table scope": `html`, `table`, `template`.
    Table,
    /// "has an element in select scope": everything except `optgroup` and
    /// `option`.
    Select,
}

impl HTMLParser {
    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#special)
    pub(super) fn is_special_element(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(|e| {
            let names = match e.namespace {
                Namespace::Html => SPECIAL_HTML_ELEMENTS,
                Namespace::MathMl => SPECIAL_MATHML_ELEMENTS,
                Namespace::Svg => SPECIAL_SVG_ELEMENTS,
                _ => return false,
            };
            names.contains(&e.tag_name.as_str())
        })
    }

    /// True if `id` ends the search for `scope`.
    fn terminates_scope(&self, id: NodeId, scope: Scope) -> bool {
        let Some(element) = self.element(id) else {
            return false;
        };
        let name = element.tag_name.as_str();
        let in_default_scope = || match element.namespace {
            Namespace::Html => DEFAULT_SCOPE_HTML_ELEMENTS.contains(&name),
            Namespace::MathMl => SPECIAL_MATHML_ELEMENTS.contains(&name),
            Namespace::Svg => SPECIAL_SVG_ELEMENTS.contains(&name),
            _ => false,
        };
        let is_html = element.namespace == Namespace::Html;
        match scope {
            Scope::Default => in_default_scope(),
            Scope::ListItem => in_default_scope() || (is_html && matches!(name, "ol" | "ul")),
            Scope::Button => in_default_scope() || (is_html && name == "button"),
            Scope::Table => is_html && matches!(name, "html" | "table" | "template"),
            Scope::Select => !(is_html && matches!(name, "optgroup" | "option")),
        }
    }

    /// [§ 13.2.4.2 has an element in the specific scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
    ///
    /// "1. Initialize node to be the current node (the bottommost node of the
    /// stack).
    /// 2. If node is the target node, terminate in a match state.
    /// 3. Otherwise, if node is one of the element types in list, terminate in
    /// a failure state.
    /// 4. Otherwise, set node to the previous entry in the stack of open
    /// elements and return to step 2."
    fn has_matching_element_in_scope(&self, scope: Scope, is_target: impl Fn(NodeId) -> bool) -> bool {
        for &id in self.stack_of_open_elements.iter().rev() {
            if is_target(id) {
                return true;
            }
            if self.terminates_scope(id, scope) {
                return false;
            }
        }
        false
    }

    /// "has a `tag_name` element in scope" for an HTML element name.
    pub(super) fn has_element_in_scope_of(&self, tag_name: &str, scope: Scope) -> bool {
        self.has_matching_element_in_scope(scope, |id| self.is_html_element(id, tag_name))
    }

    /// "has an element in scope"
    pub(super) fn has_element_in_scope(&self, tag_name: &str) -> bool {
        self.has_element_in_scope_of(tag_name, Scope::Default)
    }

    /// "has an element in button scope"
    pub(super) fn has_element_in_button_scope(&self, tag_name: &str) -> bool {
        self.has_element_in_scope_of(tag_name, Scope::Button)
    }

    /// "has an element in table scope"
    pub(super) fn has_element_in_table_scope(&self, tag_name: &str) -> bool {
        self.has_element_in_scope_of(tag_name, Scope::Table)
    }

    /// True if any HTML element named in `names` is in `scope`.
    pub(super) fn has_any_element_in_scope(&self, names: &[&str], scope: Scope) -> bool {
        self.has_matching_element_in_scope(scope, |id| self.is_html_element_in(id, names))
    }

    /// "has ... in scope" for a particular node rather than a tag name.
    pub(super) fn has_node_in_scope(&self, node: NodeId) -> bool {
        self.has_matching_element_in_scope(Scope::Default, |id| id == node)
    }

    /// True if `id` is on the stack of open elements.
    pub(super) fn is_on_stack(&self, id: NodeId) -> bool {
        self.stack_of_open_elements.contains(&id)
    }

    /// True if an HTML element with this name is anywhere on the stack.
    pub(super) fn stack_contains(&self, tag_name: &str) -> bool {
        self.stack_of_open_elements
            .iter()
            .any(|&id| self.is_html_element(id, tag_name))
    }

    /// "Pop elements from the stack of open elements until an HTML element
    /// with the same tag name has been popped from the stack."
    pub(super) fn pop_until_tag(&mut self, tag_name: &str) {
        while let Some(id) = self.stack_of_open_elements.pop() {
            if self.is_html_element(id, tag_name) {
                break;
            }
        }
    }

    /// Pop until an HTML element named in `names` has been popped.
    pub(super) fn pop_until_one_of(&mut self, names: &[&str]) {
        while let Some(id) = self.stack_of_open_elements.pop() {
            if self.is_html_element_in(id, names) {
                break;
            }
        }
    }

    /// Pop until `node` itself has been popped.
    pub(super) fn pop_until_node(&mut self, node: NodeId) {
        while let Some(id) = self.stack_of_open_elements.pop() {
            if id == node {
                break;
            }
        }
    }

    /// Remove `node` from the stack wherever it is.
    pub(super) fn remove_from_stack(&mut self, node: NodeId) {
        self.stack_of_open_elements.retain(|&id| id != node);
    }

    /// [§ 13.2.6.3 Closing elements that have implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#closing-elements-that-have-implied-end-tags)
    ///
    /// "while the current node is a dd element, a dt element, an li element,
    /// an optgroup element, an option element, a p element, an rb element, an
    /// rp element, an rt element, or an rtc element, the UA must pop the
    /// current node off the stack of open elements."
    ///
    /// `except` names the element excluded from the list, if any.
    pub(super) fn generate_implied_end_tags(&mut self, except: Option<&str>) {
        while let Some(current) = self.current_node() {
            let Some(name) = self.tag_name(current) else {
                break;
            };
            if except == Some(name)
                || !self.is_html_element_in(current, IMPLIED_END_TAG_ELEMENTS)
            {
                break;
            }
            let _ = self.stack_of_open_elements.pop();
        }
    }

    /// "generate all implied end tags thoroughly"
    pub(super) fn generate_all_implied_end_tags_thoroughly(&mut self) {
        while self.current_node_is_one_of(THOROUGH_IMPLIED_END_TAG_ELEMENTS) {
            let _ = self.stack_of_open_elements.pop();
        }
    }

    /// [§ 13.2.6.4.9](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-context)
    ///
    /// "while the current node is not a table, template, or html element, pop
    /// elements from the stack of open elements."
    pub(super) fn clear_stack_back_to_table_context(&mut self) {
        self.clear_stack_back_to(&["table", "template", "html"]);
    }

    /// [§ 13.2.6.4.13](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-body-context)
    pub(super) fn clear_stack_back_to_table_body_context(&mut self) {
        self.clear_stack_back_to(&["tbody", "tfoot", "thead", "template", "html"]);
    }

    /// [§ 13.2.6.4.14](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-row-context)
    pub(super) fn clear_stack_back_to_table_row_context(&mut self) {
        self.clear_stack_back_to(&["tr", "template", "html"]);
    }

    fn clear_stack_back_to(&mut self, names: &[&str]) {
        while let Some(current) = self.current_node() {
            if self.is_html_element_in(current, names) {
                break;
            }
            let _ = self.stack_of_open_elements.pop();
        }
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#close-a-p-element)
    ///
    /// "Generate implied end tags, except for p elements. If the current node
    /// is not a p element, then this is a parse error. Pop elements from the
    /// stack of open elements until a p element has been popped from the
    /// stack."
    pub(super) fn close_p_element(&mut self) {
        self.generate_implied_end_tags(Some("p"));
        if !self.current_node_is("p") {
            self.parse_error_with(crate::error::ParseErrorCode::UnexpectedEndTag, "p");
        }
        self.pop_until_tag("p");
    }

    /// Close a `p` element if one is in button scope. Shared by the many
    /// in-body start tags that begin with that step.
    pub(super) fn close_p_element_in_button_scope(&mut self) {
        if self.has_element_in_button_scope("p") {
            self.close_p_element();
        }
    }

    /// [§ 13.2.4.1 Reset the insertion mode appropriately](https://html.spec.whatwg.org/multipage/parsing.html#reset-the-insertion-mode-appropriately)
    pub(super) fn reset_insertion_mode_appropriately(&mut self) {
        // STEP 1: "Let last be false."
        // STEP 2: "Let node be the last node in the stack of open elements."
        for index in (0..self.stack_of_open_elements.len()).rev() {
            let mut node = self.stack_of_open_elements[index];

            // STEP 3: "Loop: If node is the first node in the stack of open
            // elements, then set last to true, and, if the parser was created
            // as part of the HTML fragment parsing algorithm (fragment case),
            // set node to the context element passed to that algorithm."
            let last = index == 0;
            if last && let Some(context) = self.context_element {
                node = context;
            }

            let Some(name) = self
                .element(node)
                .filter(|e| e.namespace == Namespace::Html)
                .map(|e| e.tag_name.clone())
            else {
                if last {
                    break;
                }
                continue;
            };

            let mode = match name.as_str() {
                // STEP 4: "If node is a select element"
                "select" => Some(self.select_insertion_mode(index, last)),
                // STEP 5: "If node is a td or th element and last is false"
                "td" | "th" if !last => Some(InsertionMode::InCell),
                "tr" => Some(InsertionMode::InRow),
                "tbody" | "thead" | "tfoot" => Some(InsertionMode::InTableBody),
                "caption" => Some(InsertionMode::InCaption),
                "colgroup" => Some(InsertionMode::InColumnGroup),
                "table" => Some(InsertionMode::InTable),
                // STEP 11: "If node is a template element, then switch the
                // insertion mode to the current template insertion mode"
                "template" => Some(
                    self.template_insertion_modes
                        .last()
                        .copied()
                        .unwrap_or(InsertionMode::InTemplate),
                ),
                // STEP 12: "If node is a head element and last is false"
                "head" if !last => Some(InsertionMode::InHead),
                "body" => Some(InsertionMode::InBody),
                "frameset" => Some(InsertionMode::InFrameset),
                // STEP 15: "If node is an html element"
                "html" => Some(if self.head_element_pointer.is_none() {
                    InsertionMode::BeforeHead
                } else {
                    InsertionMode::AfterHead
                }),
                _ => None,
            };
            if let Some(mode) = mode {
                self.switch_mode(mode);
                return;
            }
            // STEP 16: "If last is true, then switch the insertion mode to
            // "in body" and return. (fragment case)"
            if last {
                break;
            }
        }
        self.switch_mode(InsertionMode::InBody);
    }

    /// STEP 4 of "reset the insertion mode appropriately": a select inside a
    /// table is "in select in table".
    fn select_insertion_mode(&self, select_index: usize, last: bool) -> InsertionMode {
        // STEP 4.1: "If last is true, jump to the step below labeled done."
        if !last {
            // STEP 4.2-4.6: walk the ancestors of the select.
            for &ancestor in self.stack_of_open_elements[..select_index].iter().rev() {
                if self.is_html_element(ancestor, "template") {
                    break;
                }
                if self.is_html_element(ancestor, "table") {
                    return InsertionMode::InSelectInTable;
                }
            }
        }
        // STEP 4.7: "Done: Switch the insertion mode to "in select" and return."
        InsertionMode::InSelect
    }
}
