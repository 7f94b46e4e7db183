use quill_dom::{DomTree, ElementData, Namespace, NodeId};
use strum_macros::Display;
use tracing::{debug, trace};

use super::context::ContextElement;
use crate::document::{Document, Fragment};
use crate::error::{HtmlError, ParseError, ParseErrorCode, Result};
use crate::input::InputStream;
use crate::options::ParserOptions;
use crate::tokenizer::{Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerState};

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary operation
/// of the tree construction stage."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum InsertionMode {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    Initial,
    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    BeforeHtml,
    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    BeforeHead,
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    InHeadNoscript,
    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    AfterHead,
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    Text,
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    InTable,
    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    InTableText,
    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    InCaption,
    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolgroup)
    InColumnGroup,
    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intbody)
    InTableBody,
    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intr)
    InRow,
    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd)
    InCell,
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    InSelect,
    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    InSelectInTable,
    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    InTemplate,
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    AfterBody,
    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    InFrameset,
    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    AfterFrameset,
    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    AfterAfterBody,
    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    AfterAfterFrameset,
}

/// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
///
/// "The list of active formatting elements... is used to handle mis-nested
/// formatting element tags."
///
/// The list contains entries that are either elements or markers.
#[derive(Debug, Clone)]
pub enum ActiveFormattingElement {
    /// A formatting element entry.
    Element {
        /// The element in the DOM tree.
        node_id: NodeId,
        /// The token the element was created for, kept to recreate the
        /// element during reconstruction and the adoption agency algorithm.
        token: Token,
    },
    /// "A marker is an entry in the list of active formatting elements that is
    /// distinct from any element."
    ///
    /// Pushed when entering applet, object, marquee, template, td, th and
    /// caption.
    Marker,
}

/// What the tree constructor does with a token once a rule has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ProcessResult {
    /// The token has been fully handled.
    Done,
    /// "Reprocess the token": run the dispatcher again with the (already
    /// switched) current insertion mode.
    Reprocess,
    /// "Process the token using the rules for the X insertion mode" without
    /// changing the current insertion mode.
    UseRulesFor(InsertionMode),
}

/// Reprocessing of a single token is bounded by this plus the depth of the
/// stack of open elements; every legitimate reprocess chain either pops an
/// element or settles within a few steps.
const MAX_REPROCESS_STEPS: usize = 32;

/// Callback receiving every parse error as it is raised.
pub type ParseErrorHandler = Box<dyn FnMut(&ParseError)>;

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// The HTML parser builds a DOM tree from the tokens the tokenizer pushes into
/// it. One instance handles one parse.
pub struct HTMLParser {
    /// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
    pub(super) insertion_mode: InsertionMode,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#original-insertion-mode)
    /// Remembered when switching to "text" or "in table text".
    pub(super) original_insertion_mode: InsertionMode,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#stack-of-template-insertion-modes)
    pub(super) template_insertion_modes: Vec<InsertionMode>,

    /// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    pub(super) stack_of_open_elements: Vec<NodeId>,

    /// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
    pub(super) active_formatting_elements: Vec<ActiveFormattingElement>,

    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#the-element-pointers)
    pub(super) head_element_pointer: Option<NodeId>,

    /// "The form element pointer points to the last form element that was
    /// opened and whose end tag has not yet been seen."
    pub(super) form_element_pointer: Option<NodeId>,

    /// [§ 13.2.4.5 Other parsing state flags](https://html.spec.whatwg.org/multipage/parsing.html#frameset-ok-flag)
    pub(super) frameset_ok: bool,

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    pub(super) foster_parenting: bool,

    /// [§ 13.2.6.4.10](https://html.spec.whatwg.org/multipage/parsing.html#concept-pending-table-char-tokens)
    pub(super) pending_table_character_tokens: String,

    /// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#concept-frag-parse-context)
    /// The context element, held as a detached node of `tree`.
    pub(super) context_element: Option<NodeId>,

    /// DOM tree under construction. `NodeId::ROOT` is the Document node.
    pub(super) tree: DomTree,

    pub(super) options: ParserOptions,

    /// Set by a rule that needs the tokenizer in another state; handed back
    /// to the tokenizer with the answer for the current token.
    pub(super) pending_tokenizer_state: Option<TokenizerState>,

    /// "If the next token is a U+000A LINE FEED (LF) character token, then
    /// ignore that token and move on to the next one."
    pub(super) ignore_next_line_feed: bool,

    pub(super) self_closing_acknowledged: bool,

    /// Character offset of the token being processed.
    position: usize,
    errors: Vec<ParseError>,
    error_handler: Option<ParseErrorHandler>,
    fatal: Option<HtmlError>,
}

impl HTMLParser {
    /// Create a parser with the given options.
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        Self {
            insertion_mode: InsertionMode::Initial,
            original_insertion_mode: InsertionMode::Initial,
            template_insertion_modes: Vec::new(),
            stack_of_open_elements: Vec::new(),
            active_formatting_elements: Vec::new(),
            head_element_pointer: None,
            form_element_pointer: None,
            frameset_ok: true,
            foster_parenting: false,
            pending_table_character_tokens: String::new(),
            context_element: None,
            tree: DomTree::new(),
            options,
            pending_tokenizer_state: None,
            ignore_next_line_feed: false,
            self_closing_acknowledged: false,
            position: 0,
            errors: Vec::new(),
            error_handler: None,
            fatal: None,
        }
    }

    /// Observe every parse error as it is raised, in addition to (or, with
    /// `keep_errors` off, instead of) collecting them on the result.
    #[must_use]
    pub fn with_error_handler(mut self, handler: impl FnMut(&ParseError) + 'static) -> Self {
        self.error_handler = Some(Box::new(handler));
        self
    }

    /// The insertion mode the parser is currently in.
    #[must_use]
    pub const fn insertion_mode(&self) -> InsertionMode {
        self.insertion_mode
    }

    /// [§ 13.2 Parsing HTML documents](https://html.spec.whatwg.org/multipage/parsing.html#parsing)
    ///
    /// Parse a whole document.
    ///
    /// # Errors
    ///
    /// Returns an error only when a tree mutation is rejected or an internal
    /// invariant breaks; malformed markup never fails.
    pub fn parse_document(self, input: InputStream) -> Result<Document> {
        let input = input.with_codepoint_checks(self.options.check_input_stream);
        let mut tokenizer = Tokenizer::new(input, self);
        tokenizer.run();
        let (tree, errors) = tokenizer.into_sink().finish()?;
        Ok(Document::new(tree, errors))
    }

    /// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
    ///
    /// # Errors
    ///
    /// As for [`HTMLParser::parse_document`].
    pub fn parse_fragment(mut self, context: &ContextElement, input: InputStream) -> Result<Fragment> {
        let input = input.with_codepoint_checks(self.options.check_input_stream);

        // STEP 4: "Let root be the result of creating an element given
        // document, "html", and the HTML namespace."
        // STEP 5: "Append root to document."
        let root = self
            .tree
            .alloc(quill_dom::NodeType::Element(ElementData::html(
                "html",
                quill_dom::AttributesMap::new(),
            )));
        self.tree.append_child(NodeId::ROOT, root)?;

        // STEP 6: "Set up the parser's stack of open elements so that it
        // contains just the single element root."
        self.stack_of_open_elements.push(root);

        let context_id = self.tree.alloc(quill_dom::NodeType::Element(ElementData {
            tag_name: context.tag_name().to_string(),
            namespace: context.namespace(),
            attrs: context.attributes().iter().cloned().collect(),
        }));
        self.context_element = Some(context_id);

        // STEP 7: "If context is a template element, then push "in template"
        // onto the stack of template insertion modes."
        if context.is_html("template") {
            self.template_insertion_modes.push(InsertionMode::InTemplate);
        }

        // STEP 9: "Reset the parser's insertion mode appropriately."
        self.reset_insertion_mode_appropriately();

        // STEP 10: "Set the parser's form element pointer to the nearest node
        // to context that is a form element (going straight up the ancestor
        // chain, and including the element itself, if it is a form element)."
        if context.is_html("form") {
            self.form_element_pointer = Some(context_id);
        }

        let initial_state = context.tokenizer_state(self.options.scripting_enabled);
        trace!(context = %context, state = %initial_state, mode = %self.insertion_mode, "fragment parse");

        let mut tokenizer = Tokenizer::new(input, self);
        tokenizer.set_state(initial_state);
        if initial_state != TokenizerState::Data {
            tokenizer.set_last_start_tag(Some(context.tag_name()));
        }
        tokenizer.run();
        let (mut tree, errors) = tokenizer.into_sink().finish()?;

        // STEP 14: "Return root's children, in tree order."
        tree.move_children(root, NodeId::ROOT)?;
        tree.remove_child(NodeId::ROOT, root)?;
        Ok(Fragment::new(tree, errors))
    }

    fn finish(self) -> Result<(DomTree, Vec<ParseError>)> {
        if let Some(error) = self.fatal {
            return Err(error);
        }
        Ok((self.tree, self.errors))
    }

    /// [§ 13.2.6 Tree construction dispatcher](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    ///
    /// Runs the rules for `token`, following "reprocess" and "process using
    /// the rules for" instructions until the token settles.
    fn dispatch(&mut self, token: &Token) -> Result<()> {
        let budget = MAX_REPROCESS_STEPS
            + self.stack_of_open_elements.len()
            + self.template_insertion_modes.len();
        let mut forced_mode = None;

        for _ in 0..budget {
            let result = match forced_mode.take() {
                Some(mode) => self.process_using_rules_for(mode, token)?,
                None if self.use_foreign_content_rules(token) => {
                    self.process_in_foreign_content(token)?
                }
                None => self.process_using_rules_for(self.insertion_mode, token)?,
            };
            match result {
                ProcessResult::Done => return Ok(()),
                ProcessResult::Reprocess => {}
                ProcessResult::UseRulesFor(mode) => forced_mode = Some(mode),
            }
        }
        Err(HtmlError::InvariantViolation(
            "token was reprocessed without settling",
        ))
    }

    /// Run the rules for `mode`, following any "process the token using the
    /// rules for" hand-off, without going back through the dispatcher. Used
    /// where the caller has to undo state afterwards, such as foster
    /// parenting.
    pub(super) fn process_nested(
        &mut self,
        mode: InsertionMode,
        token: &Token,
    ) -> Result<ProcessResult> {
        let mut mode = mode;
        for _ in 0..MAX_REPROCESS_STEPS {
            match self.process_using_rules_for(mode, token)? {
                ProcessResult::UseRulesFor(next) => mode = next,
                result => return Ok(result),
            }
        }
        Err(HtmlError::InvariantViolation(
            "rule hand-offs did not settle",
        ))
    }

    /// Dispatch on insertion mode.
    pub(super) fn process_using_rules_for(
        &mut self,
        mode: InsertionMode,
        token: &Token,
    ) -> Result<ProcessResult> {
        match mode {
            InsertionMode::Initial => self.handle_initial_mode(token),
            InsertionMode::BeforeHtml => self.handle_before_html_mode(token),
            InsertionMode::BeforeHead => self.handle_before_head_mode(token),
            InsertionMode::InHead => self.handle_in_head_mode(token),
            InsertionMode::InHeadNoscript => self.handle_in_head_noscript_mode(token),
            InsertionMode::AfterHead => self.handle_after_head_mode(token),
            InsertionMode::InBody => self.handle_in_body_mode(token),
            InsertionMode::Text => self.handle_text_mode(token),
            InsertionMode::InTable => self.handle_in_table_mode(token),
            InsertionMode::InTableText => self.handle_in_table_text_mode(token),
            InsertionMode::InCaption => self.handle_in_caption_mode(token),
            InsertionMode::InColumnGroup => self.handle_in_column_group_mode(token),
            InsertionMode::InTableBody => self.handle_in_table_body_mode(token),
            InsertionMode::InRow => self.handle_in_row_mode(token),
            InsertionMode::InCell => self.handle_in_cell_mode(token),
            InsertionMode::InSelect => self.handle_in_select_mode(token),
            InsertionMode::InSelectInTable => self.handle_in_select_in_table_mode(token),
            InsertionMode::InTemplate => self.handle_in_template_mode(token),
            InsertionMode::AfterBody => self.handle_after_body_mode(token),
            InsertionMode::InFrameset => self.handle_in_frameset_mode(token),
            InsertionMode::AfterFrameset => self.handle_after_frameset_mode(token),
            InsertionMode::AfterAfterBody => self.handle_after_after_body_mode(token),
            InsertionMode::AfterAfterFrameset => self.handle_after_after_frameset_mode(token),
        }
    }

    /// "Switch the insertion mode to X".
    pub(super) fn switch_mode(&mut self, mode: InsertionMode) {
        if self.insertion_mode != mode {
            trace!(from = %self.insertion_mode, to = %mode, "insertion mode");
        }
        self.insertion_mode = mode;
    }

    /// Ask the tokenizer to continue in `state` after the current token.
    pub(super) fn switch_tokenizer_to(&mut self, state: TokenizerState) {
        trace!(%state, "tokenizer state command");
        self.pending_tokenizer_state = Some(state);
    }

    /// [§ 13.2.6.2](https://html.spec.whatwg.org/multipage/parsing.html#acknowledge-self-closing-flag)
    ///
    /// "Acknowledge the token's self-closing flag".
    pub(super) const fn acknowledge_self_closing_flag(&mut self) {
        self.self_closing_acknowledged = true;
    }

    /// Report a tree construction parse error at the current token.
    pub(super) fn parse_error(&mut self, code: ParseErrorCode) {
        self.report(ParseError::new(code, self.position));
    }

    /// Report a parse error carrying the offending tag name or character.
    pub(super) fn parse_error_with(&mut self, code: ParseErrorCode, detail: &str) {
        self.report(ParseError::new(code, self.position).with_detail(detail));
    }

    fn report(&mut self, error: ParseError) {
        debug!(code = %error.code, position = error.position, detail = ?error.detail, "parse error");
        if let Some(handler) = self.error_handler.as_mut() {
            handler(&error);
        }
        if self.options.keep_errors {
            self.errors.push(error);
        }
    }

    /// Element data of a node, if it is an element.
    pub(super) fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.tree.as_element(id)
    }

    /// True for an HTML element with this local name.
    pub(super) fn is_html_element(&self, id: NodeId, tag_name: &str) -> bool {
        self.element(id).is_some_and(|e| e.is_html(tag_name))
    }

    /// True for an HTML element whose local name is in `names`.
    pub(super) fn is_html_element_in(&self, id: NodeId, names: &[&str]) -> bool {
        self.element(id)
            .is_some_and(|e| e.namespace == Namespace::Html && names.contains(&e.tag_name.as_str()))
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#current-node)
    ///
    /// "The current node is the bottommost node in this stack of open elements."
    pub(super) fn current_node(&self) -> Option<NodeId> {
        self.stack_of_open_elements.last().copied()
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#adjusted-current-node)
    ///
    /// "The adjusted current node is the context element if the parser was
    /// created as part of the HTML fragment parsing algorithm and the stack of
    /// open elements has only one element in it (fragment case); otherwise,
    /// the adjusted current node is the current node."
    pub(super) fn adjusted_current_node(&self) -> Option<NodeId> {
        match self.context_element {
            Some(context) if self.stack_of_open_elements.len() == 1 => Some(context),
            _ => self.current_node(),
        }
    }

    /// True when the current node is an HTML element with this name.
    pub(super) fn current_node_is(&self, tag_name: &str) -> bool {
        self.current_node()
            .is_some_and(|id| self.is_html_element(id, tag_name))
    }

    /// True when the current node is an HTML element named in `names`.
    pub(super) fn current_node_is_one_of(&self, names: &[&str]) -> bool {
        self.current_node()
            .is_some_and(|id| self.is_html_element_in(id, names))
    }

    /// Local name of an element node.
    pub(super) fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag_name.as_str())
    }
}

impl TokenSink for HTMLParser {
    fn process_token(&mut self, token: Token, position: usize) -> TokenSinkResult {
        if self.fatal.is_some() {
            return TokenSinkResult::Stop;
        }
        self.position = position;

        // [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
        // pre, listing and textarea drop one leading newline.
        if std::mem::take(&mut self.ignore_next_line_feed)
            && matches!(token, Token::Character { data: '\n' })
        {
            return TokenSinkResult::Continue;
        }

        self.self_closing_acknowledged = false;
        if let Err(error) = self.dispatch(&token) {
            debug!(%error, "tree construction aborted");
            self.fatal = Some(error);
            return TokenSinkResult::Stop;
        }

        // [§ 13.2.6.2](https://html.spec.whatwg.org/multipage/parsing.html#acknowledge-self-closing-flag)
        // "When a start tag token is emitted with its self-closing flag set, if
        // the flag is not acknowledged when it is processed by the tree
        // construction stage, that is a
        // non-void-html-element-start-tag-with-trailing-solidus parse error."
        if let Token::StartTag {
            name,
            self_closing: true,
            ..
        } = &token
            && !self.self_closing_acknowledged
        {
            self.parse_error_with(
                ParseErrorCode::NonVoidHtmlElementStartTagWithTrailingSolidus,
                name,
            );
        }

        match self.pending_tokenizer_state.take() {
            Some(state) => TokenSinkResult::SwitchState(state),
            None => TokenSinkResult::Continue,
        }
    }

    fn parse_error(&mut self, error: ParseError) {
        self.report(error);
    }

    fn cdata_section_allowed(&self) -> bool {
        self.adjusted_current_node()
            .and_then(|id| self.element(id))
            .is_some_and(|e| e.namespace != Namespace::Html)
    }
}
