use ampersand_common::warning::warn_once;
use ampersand_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeType};

use crate::tokenizer::{Attribute, Token};

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements: area, base, br, col, embed, hr, img, input, link, meta,
/// source, track, wbr"
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
///
/// "If the stack of open elements has a p element in button scope, then close
/// a p element." Start tags that trigger it.
const CLOSES_P: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "details",
    "dialog",
    "div",
    "dl",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hgroup",
    "hr",
    "main",
    "menu",
    "nav",
    "ol",
    "p",
    "pre",
    "search",
    "section",
    "summary",
    "table",
    "ul",
];

/// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-scope)
const DEFAULT_SCOPE: &[&str] = &[
    "applet", "caption", "html", "table", "td", "th", "marquee", "object", "template",
];

/// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-button-scope)
const BUTTON_SCOPE: &[&str] = &[
    "applet", "caption", "html", "table", "td", "th", "marquee", "object", "template", "button",
];

/// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-list-item-scope)
const LIST_ITEM_SCOPE: &[&str] = &[
    "applet", "caption", "html", "table", "td", "th", "marquee", "object", "template", "ol",
    "ul",
];

/// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-table-scope)
const TABLE_SCOPE: &[&str] = &["html", "table", "template"];

/// Table structure whose end tags are matched in table scope.
const TABLE_PARTS: &[&str] = &[
    "table", "caption", "colgroup", "thead", "tbody", "tfoot", "tr", "td", "th",
];

/// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
///
/// A recoverable tree construction problem. Parsing always continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// Description of the parse error.
    pub message: String,
    /// Index into the token stream where this error was encountered.
    pub token_index: usize,
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// Builds a [`DomTree`] from a token stream.
///
/// There are no insertion modes. The builder keeps the stack of open
/// elements and applies the implied end tags that table and list markup
/// relies on: a new cell closes the open cell, a new row closes the open
/// row, and so on. `html`, `head` and `body` are never synthesized, and
/// nothing is foster-parented, so the tree mirrors the source markup.
pub struct HTMLParser {
    /// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    ///
    /// Stores `NodeId`s into the arena.
    stack_of_open_elements: Vec<NodeId>,

    /// DOM tree with parent/sibling pointers.
    /// `NodeId::ROOT` (index 0) is the Document node.
    tree: DomTree,

    /// Input tokens from the tokenizer.
    tokens: Vec<Token>,

    /// Current position in token stream.
    token_index: usize,

    /// Set once the end-of-file token has been processed.
    stopped: bool,

    /// Parse issues encountered during parsing.
    issues: Vec<ParseIssue>,
}

impl HTMLParser {
    /// Create a new parser from a token stream.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            stack_of_open_elements: Vec::new(),
            tree: DomTree::new(),
            tokens,
            token_index: 0,
            stopped: false,
            issues: Vec::new(),
        }
    }

    /// Run the parser and return the DOM tree.
    #[must_use]
    pub fn run(self) -> DomTree {
        self.run_with_issues().0
    }

    /// Run the parser and return both the `DomTree` and any parse issues.
    #[must_use]
    pub fn run_with_issues(mut self) -> (DomTree, Vec<ParseIssue>) {
        let tokens = std::mem::take(&mut self.tokens);
        for token in &tokens {
            if self.stopped {
                break;
            }
            self.process_token(token);
            self.token_index += 1;
        }
        (self.tree, self.issues)
    }

    /// Record a parse warning.
    ///
    /// Logs via the common warning system and stores the issue for the caller.
    fn parse_warning(&mut self, message: &str) {
        warn_once("HTML Parser", message);
        self.issues.push(ParseIssue {
            message: message.to_string(),
            token_index: self.token_index,
        });
    }

    fn process_token(&mut self, token: &Token) {
        match token {
            // Quirks mode never changes how tables are built here.
            Token::Doctype { .. } => {}
            Token::StartTag {
                name,
                self_closing,
                attributes,
            } => self.handle_start_tag(name, *self_closing, attributes),
            Token::EndTag { name, .. } => self.handle_end_tag(name),
            Token::Comment { data } => self.insert_comment(data),
            Token::Character { data } => self.insert_character(*data),
            Token::EndOfFile => {
                // [§ 13.2.6.5 Stopping parsing](https://html.spec.whatwg.org/multipage/parsing.html#stop-parsing)
                // "Pop all the nodes off the stack of open elements."
                self.stack_of_open_elements.clear();
                self.stopped = true;
            }
        }
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    ///
    /// "The appropriate place for inserting a node" is the end of the current
    /// node, or the Document when nothing is open.
    fn current_node(&self) -> NodeId {
        self.stack_of_open_elements
            .last()
            .copied()
            .unwrap_or(NodeId::ROOT)
    }

    /// Get the tag name of a node (local name of the element).
    fn get_tag_name(&self, id: NodeId) -> Option<&str> {
        self.tree.as_element(id).map(|data| data.tag_name.as_str())
    }

    fn handle_start_tag(&mut self, name: &str, self_closing: bool, attributes: &[Attribute]) {
        match name {
            // [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inrow)
            // "A start tag whose tag name is one of: "th", "td" - Clear the stack
            // back to a table row context."
            "td" | "th" => self.close_cell(),
            // [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intablebody)
            "tr" => {
                self.close_cell();
                self.close_in_table_scope(&["tr"]);
            }
            // [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
            "thead" | "tbody" | "tfoot" | "caption" | "colgroup" => {
                self.close_cell();
                self.close_in_table_scope(&["tr"]);
                self.close_in_table_scope(&["thead", "tbody", "tfoot", "caption", "colgroup"]);
            }
            // "If the stack of open elements has an li element in list item scope..."
            "li" => {
                if self.has_element_in_specific_scope("li", LIST_ITEM_SCOPE) {
                    self.close_p_in_button_scope();
                    self.pop_until_one_of(&["li"]);
                }
            }
            "dt" | "dd" => {
                for open in ["dt", "dd"] {
                    if self.has_element_in_specific_scope(open, DEFAULT_SCOPE) {
                        self.pop_until_one_of(&[open]);
                    }
                }
            }
            // "If the current node is an option element, pop the current node
            // off the stack of open elements."
            "option" => {
                if self.get_tag_name(self.current_node()) == Some("option") {
                    let _ = self.stack_of_open_elements.pop();
                }
            }
            _ => {}
        }

        if CLOSES_P.contains(&name) || name == "li" || name == "dt" || name == "dd" {
            self.close_p_in_button_scope();
        }

        let element_id = self.insert_html_element(name, attributes);

        // [§ 13.1.2.1 Start tags](https://html.spec.whatwg.org/multipage/syntax.html#start-tags)
        // "if the element is one of the void elements ... then there may be a
        // single U+002F SOLIDUS character (/)". On other HTML elements the flag
        // is a non-void-html-element-start-tag-with-trailing-solidus parse error
        // and is ignored.
        if VOID_ELEMENTS.contains(&name) {
            return;
        }
        if self_closing {
            self.parse_warning(&format!(
                "non-void-html-element-start-tag-with-trailing-solidus: <{name}/>"
            ));
        }
        self.stack_of_open_elements.push(element_id);
    }

    fn handle_end_tag(&mut self, name: &str) {
        // [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
        // "An end tag whose tag name is "br" - Parse error. Drop the attributes
        // from the token, and act as described in the next entry; i.e. act as
        // if this was a "br" start tag token with no attributes."
        if name == "br" {
            self.parse_warning("end tag </br> treated as <br>");
            let _ = self.insert_html_element("br", &[]);
            return;
        }

        let scope = if TABLE_PARTS.contains(&name) {
            TABLE_SCOPE
        } else if name == "li" {
            LIST_ITEM_SCOPE
        } else if name == "p" {
            BUTTON_SCOPE
        } else {
            DEFAULT_SCOPE
        };

        if self.has_element_in_specific_scope(name, scope) {
            self.pop_until_one_of(&[name]);
        } else {
            // "If the stack of open elements does not have an element in scope
            // that is an HTML element with the same tag name as that of the
            // token, then this is a parse error; ignore the token."
            self.parse_warning(&format!("unexpected end tag </{name}> ignored"));
        }
    }

    /// [§ 13.2.6.4.15 Close the cell](https://html.spec.whatwg.org/multipage/parsing.html#close-the-cell)
    ///
    /// "Pop elements from the stack of open elements stack until a td element
    /// or a th element has been popped from the stack."
    fn close_cell(&mut self) {
        if self.has_element_in_specific_scope("td", TABLE_SCOPE)
            || self.has_element_in_specific_scope("th", TABLE_SCOPE)
        {
            self.pop_until_one_of(&["td", "th"]);
        }
    }

    /// Pop up to and including the innermost of `tag_names` if one is open
    /// in table scope.
    fn close_in_table_scope(&mut self, tag_names: &[&str]) {
        if tag_names
            .iter()
            .any(|tag| self.has_element_in_specific_scope(tag, TABLE_SCOPE))
        {
            self.pop_until_one_of(tag_names);
        }
    }

    /// [§ 13.2.6.4.7 Close a p element](https://html.spec.whatwg.org/multipage/parsing.html#close-a-p-element)
    fn close_p_in_button_scope(&mut self) {
        if self.has_element_in_specific_scope("p", BUTTON_SCOPE) {
            self.pop_until_one_of(&["p"]);
        }
    }

    /// Pop elements until one of the given tag names is found (inclusive).
    fn pop_until_one_of(&mut self, tag_names: &[&str]) {
        while let Some(id) = self.stack_of_open_elements.pop() {
            if self
                .get_tag_name(id)
                .is_some_and(|name| tag_names.contains(&name))
            {
                break;
            }
        }
    }

    /// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-scope)
    ///
    /// STEP 1: "Initialize node to be the current node (the bottommost node
    ///          of the stack)."
    ///
    /// STEP 2: "If node is the target node, terminate in a match state."
    ///
    /// STEP 3: "Otherwise, if node is one of the element types in list,
    ///          terminate in a failure state."
    ///
    /// STEP 4: "Otherwise, set node to the previous entry in the stack of
    ///          open elements and return to step 2."
    fn has_element_in_specific_scope(&self, tag_name: &str, scope_markers: &[&str]) -> bool {
        for &node_id in self.stack_of_open_elements.iter().rev() {
            if let Some(node_tag) = self.get_tag_name(node_id) {
                if node_tag == tag_name {
                    return true;
                }
                if scope_markers.contains(&node_tag) {
                    return false;
                }
            }
        }
        false
    }

    /// [§ 13.2.6.1 Insert an HTML element](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    ///
    /// Creates the element and appends it to the current node. The caller
    /// decides whether it goes on the stack of open elements.
    fn insert_html_element(&mut self, name: &str, attributes: &[Attribute]) -> NodeId {
        let attrs: AttributesMap = attributes
            .iter()
            .map(|attr| (attr.name.clone(), attr.value.clone()))
            .collect();
        let element_id = self.tree.alloc(NodeType::Element(ElementData {
            tag_name: name.to_string(),
            attrs,
        }));
        let parent_id = self.current_node();
        self.tree.append_child(parent_id, element_id);
        element_id
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    ///
    /// "If there is a Text node immediately before the adjusted insertion
    /// location, then append data to that Text node's data."
    fn insert_character(&mut self, c: char) {
        let parent_id = self.current_node();
        // "The Document node cannot have Text node children".
        if parent_id == NodeId::ROOT && c.is_ascii_whitespace() {
            return;
        }

        if let Some(last_id) = self.tree.last_child(parent_id)
            && let Some(node) = self.tree.get_mut(last_id)
            && let NodeType::Text(ref mut text_data) = node.node_type
        {
            text_data.push(c);
            return;
        }

        let text_id = self.tree.alloc(NodeType::Text(String::from(c)));
        self.tree.append_child(parent_id, text_id);
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    fn insert_comment(&mut self, data: &str) {
        let parent_id = self.current_node();
        let comment_id = self.tree.alloc(NodeType::Comment(data.to_string()));
        self.tree.append_child(parent_id, comment_id);
    }
}
