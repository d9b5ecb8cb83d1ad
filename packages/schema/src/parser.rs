//! # HTML → Document Parser
//!
//! General-purpose, schema-driven conversion of an HTML tree into document
//! nodes. Each known tag maps to a node kind or a mark; unknown elements are
//! transparent and only contribute their children.
//!
//! Placement follows the content rules of the open nodes:
//! - inline content arriving in a block context opens an implicit paragraph
//! - content a textblock can't hold closes the textblock first
//! - whitespace collapses outside `pre`, whitespace-only text between blocks
//!   is dropped
//!
//! Element nesting is capped at [`MAX_NESTING`]; anything deeper is
//! flattened to its text.

use crate::html::{self, element_name};
use crate::node::{Attrs, Mark, MarkKind, Node, NodeKind};
use crate::schema::{Schema, CELL_PASSTHROUGH_ATTRS};
use markup5ever_rcdom::{Handle, NodeData};
use serde_json::Value;
use tracing::debug;

/// Elements that end the current implicit paragraph even though they don't
/// map to a node
const BLOCK_BOUNDARIES: &[&str] = &[
    "address", "article", "aside", "center", "dd", "details", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "header", "li", "main", "nav", "ol", "section",
    "summary", "ul",
];

/// Elements whose content never becomes document content
const IGNORED: &[&str] = &["head", "script", "style", "template", "title", "meta", "link", "noscript"];

/// Deepest element nesting the parser recurses into
pub const MAX_NESTING: usize = 256;

/// Converts a `<table>` element found at the given nesting level. `None`
/// drops the table.
pub type TableHook<'h> = &'h dyn Fn(&Handle, usize) -> Option<Node>;

pub struct DomParser<'s> {
    schema: &'s Schema,
}

impl<'s> DomParser<'s> {
    pub fn from_schema(schema: &'s Schema) -> Self {
        Self { schema }
    }

    /// Parse the children of `root` into a `doc` node
    pub fn parse(&self, root: &Handle) -> Node {
        let mut cx = ParseContext::new(self.schema, 0, None);
        cx.add_children(root);
        let content = cx.finish();

        self.schema
            .create_and_fill(NodeKind::Doc, None, content)
            .unwrap_or_else(|| {
                debug!("parsed content does not fit doc, falling back to an empty document");
                Node::raw(
                    NodeKind::Doc,
                    Attrs::new(),
                    vec![Node::raw(NodeKind::Paragraph, Attrs::new(), vec![])],
                )
            })
    }

    /// Parse an HTML string into a `doc` node
    pub fn parse_html(&self, html: &str) -> Node {
        let dom = html::parse_html(html);
        self.parse(&html::body(&dom))
    }

    /// Parse a single node (element or text) and its subtree into block nodes
    pub fn parse_slice(&self, handle: &Handle) -> Vec<Node> {
        let mut cx = ParseContext::new(self.schema, 0, None);
        cx.add_dom(handle);
        cx.finish()
    }

    /// Like [`parse_slice`](Self::parse_slice), but `<table>` elements are
    /// handed to `tables` instead of the per-tag rules. `nesting` is the
    /// element depth already used by the caller and counts against
    /// [`MAX_NESTING`].
    pub fn parse_slice_with_tables(
        &self,
        handle: &Handle,
        nesting: usize,
        tables: TableHook<'_>,
    ) -> Vec<Node> {
        let mut cx = ParseContext::new(self.schema, nesting, Some(tables));
        cx.add_dom(handle);
        cx.finish()
    }
}

/// Attributes of a `td`/`th` element
pub fn cell_attrs(handle: &Handle) -> Attrs {
    let mut attrs = Attrs::new();

    for span in ["colspan", "rowspan"] {
        let value = html::attr(handle, span)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(1);
        attrs.insert(span.to_string(), Value::from(value));
    }

    let colwidth = html::attr(handle, "data-colwidth").and_then(|raw| {
        let widths: Option<Vec<Value>> = raw
            .split(',')
            .map(|w| w.trim().parse::<u64>().ok().map(Value::from))
            .collect();
        widths
    });
    attrs.insert("colwidth".to_string(), colwidth.map(Value::Array).unwrap_or(Value::Null));

    for name in CELL_PASSTHROUGH_ATTRS {
        attrs.insert(name.to_string(), string_attr(handle, name));
    }

    attrs
}

/// Attribute as a JSON string, null when absent or empty
fn string_attr(handle: &Handle, name: &str) -> Value {
    match html::attr(handle, name) {
        Some(value) if !value.is_empty() => Value::String(value),
        _ => Value::Null,
    }
}

fn styled_attrs(handle: &Handle, names: &[&str]) -> Attrs {
    names
        .iter()
        .map(|name| (name.to_string(), string_attr(handle, name)))
        .collect()
}

struct OpenNode {
    kind: NodeKind,
    attrs: Attrs,
    content: Vec<Node>,
    /// Opened by the parser rather than by an element
    implicit: bool,
}

struct ParseContext<'s, 'h> {
    schema: &'s Schema,
    stack: Vec<OpenNode>,
    marks: Vec<Mark>,
    nesting: usize,
    tables: Option<TableHook<'h>>,
}

impl<'s, 'h> ParseContext<'s, 'h> {
    fn new(schema: &'s Schema, nesting: usize, tables: Option<TableHook<'h>>) -> Self {
        Self {
            schema,
            stack: vec![OpenNode {
                kind: NodeKind::Doc,
                attrs: Attrs::new(),
                content: Vec::new(),
                implicit: false,
            }],
            marks: Vec::new(),
            nesting,
            tables,
        }
    }

    fn finish(mut self) -> Vec<Node> {
        self.close_to(1);
        self.stack.pop().map(|root| root.content).unwrap_or_default()
    }

    fn add_children(&mut self, handle: &Handle) {
        for child in html::children(handle) {
            self.add_dom(&child);
        }
    }

    fn add_dom(&mut self, handle: &Handle) {
        match &handle.data {
            NodeData::Text { .. } => {
                if let Some(text) = html::text(handle) {
                    self.add_text(&text);
                }
            }
            NodeData::Element { .. } if self.nesting >= MAX_NESTING => {
                debug!(nesting = self.nesting, "markup nested too deeply, keeping its text only");
                self.add_flattened(handle);
            }
            NodeData::Element { .. } => {
                self.nesting += 1;
                self.add_element(handle);
                self.nesting -= 1;
            }
            NodeData::Document => self.add_children(handle),
            _ => {}
        }
    }

    /// Add the text of a subtree without recursing
    fn add_flattened(&mut self, handle: &Handle) {
        let mut pending = vec![handle.clone()];
        while let Some(node) = pending.pop() {
            match &node.data {
                NodeData::Text { .. } => {
                    if let Some(text) = html::text(&node) {
                        self.add_text(&text);
                    }
                }
                NodeData::Element { .. } => {
                    let ignored = element_name(&node).is_some_and(|tag| IGNORED.contains(&tag.as_str()));
                    if !ignored {
                        pending.extend(html::children(&node).into_iter().rev());
                    }
                }
                _ => {}
            }
        }
    }

    fn add_table(&mut self, handle: &Handle, tables: TableHook<'h>) {
        match tables(handle, self.nesting) {
            Some(table) => {
                if self.find_place(NodeKind::Table) {
                    self.push_child(table);
                } else {
                    debug!("dropping table without a valid place");
                }
            }
            None => debug!("table converted to nothing"),
        }
    }

    fn add_element(&mut self, handle: &Handle) {
        let Some(tag) = element_name(handle) else {
            return;
        };

        match tag.as_str() {
            t if IGNORED.contains(&t) => {}
            "p" => self.add_block(handle, NodeKind::Paragraph, Attrs::new()),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = tag[1..].parse::<u64>().unwrap_or(1);
                let attrs = Attrs::from([("level".to_string(), Value::from(level))]);
                self.add_block(handle, NodeKind::Heading, attrs);
            }
            "blockquote" => self.add_block(handle, NodeKind::Blockquote, Attrs::new()),
            "pre" => self.add_block(handle, NodeKind::CodeBlock, Attrs::new()),
            "div" => {
                let attrs = styled_attrs(handle, &["style", "class", "align"]);
                self.add_block(handle, NodeKind::Div, attrs);
            }
            "table" => match self.tables {
                Some(tables) => self.add_table(handle, tables),
                None => self.add_block(handle, NodeKind::Table, Attrs::new()),
            },
            "tr" => self.add_block(handle, NodeKind::TableRow, Attrs::new()),
            "td" => self.add_block(handle, NodeKind::TableCell, cell_attrs(handle)),
            "th" => self.add_block(handle, NodeKind::TableHeader, cell_attrs(handle)),
            "span" => {
                let attrs = styled_attrs(handle, &["style", "class"]);
                self.add_block(handle, NodeKind::Span, attrs);
            }
            "hr" => self.add_leaf(NodeKind::HorizontalRule, Attrs::new()),
            "br" => {
                if self.top_kind() == NodeKind::CodeBlock {
                    self.add_text("\n");
                } else {
                    self.add_leaf(NodeKind::HardBreak, Attrs::new());
                }
            }
            "img" => {
                if html::attr(handle, "src").is_some() {
                    let attrs = styled_attrs(
                        handle,
                        &["src", "alt", "title", "style", "width", "height", "class"],
                    );
                    self.add_leaf(NodeKind::Image, attrs);
                }
            }
            "em" | "i" => self.add_marked(handle, Mark::new(MarkKind::Em)),
            "strong" | "b" => self.add_marked(handle, Mark::new(MarkKind::Strong)),
            "code" => self.add_marked(handle, Mark::new(MarkKind::Code)),
            "a" => match html::attr(handle, "href") {
                Some(href) => {
                    let title = html::attr(handle, "title");
                    self.add_marked(handle, Mark::link(href, title));
                }
                None => self.add_children(handle),
            },
            t if BLOCK_BOUNDARIES.contains(&t) => {
                self.close_implicit();
                self.add_children(handle);
                self.close_implicit();
            }
            _ => self.add_children(handle),
        }
    }

    fn top(&self) -> &OpenNode {
        // The root is never popped before finish()
        &self.stack[self.stack.len() - 1]
    }

    fn top_kind(&self) -> NodeKind {
        self.top().kind
    }

    fn add_block(&mut self, handle: &Handle, kind: NodeKind, attrs: Attrs) {
        let Some(depth) = self.open(kind, attrs) else {
            debug!(kind = %kind, "no place for element, parsing its children in place");
            self.add_children(handle);
            return;
        };
        self.add_children(handle);
        self.close_to(depth);
    }

    fn add_marked(&mut self, handle: &Handle, mark: Mark) {
        let saved = self.marks.clone();
        self.marks = mark.add_to_set(&self.marks);
        self.add_children(handle);
        self.marks = saved;
    }

    fn add_leaf(&mut self, kind: NodeKind, attrs: Attrs) {
        let attrs = match self.schema.compute_attrs(kind, Some(attrs)) {
            Ok(attrs) => attrs,
            Err(err) => {
                debug!(%err, "dropping leaf node");
                return;
            }
        };
        if self.find_place(kind) {
            self.push_child(Node::raw(kind, attrs, Vec::new()));
        } else {
            debug!(kind = %kind, "dropping leaf node without a valid place");
        }
    }

    fn add_text(&mut self, raw: &str) {
        if self.top_kind() == NodeKind::CodeBlock {
            if !raw.is_empty() {
                self.push_child(Node::raw_text(raw.to_string(), Vec::new()));
            }
            return;
        }

        let mut text = collapse_whitespace(raw);
        let in_inline_context = self.schema.spec(self.top_kind()).content.allows(NodeKind::Text);

        if text.trim_matches(' ').is_empty() && !in_inline_context {
            return;
        }
        if !self.find_place(NodeKind::Text) {
            debug!("dropping text without a valid place");
            return;
        }
        if self.ends_with_space() {
            text = text.trim_start_matches(' ').to_string();
            if text.is_empty() {
                return;
            }
        }

        let marks = if self.schema.spec(self.top_kind()).marks {
            self.marks.clone()
        } else {
            Vec::new()
        };
        self.push_child(Node::raw_text(text, marks));
    }

    /// Whether the open inline container is empty or its text ends in a space
    fn ends_with_space(&self) -> bool {
        match self.top().content.last() {
            None => true,
            Some(last) => match &last.text {
                Some(text) => text.ends_with(' '),
                None => last.kind == NodeKind::HardBreak,
            },
        }
    }

    fn push_child(&mut self, node: Node) {
        if let Some(top) = self.stack.last_mut() {
            top.content.push(node);
        }
    }

    /// Open a node for an element. Returns the stack length to close back to.
    fn open(&mut self, kind: NodeKind, attrs: Attrs) -> Option<usize> {
        if !self.find_place(kind) {
            return None;
        }
        let depth = self.stack.len();
        self.stack.push(OpenNode {
            kind,
            attrs,
            content: Vec::new(),
            implicit: false,
        });
        Some(depth)
    }

    /// Make the top of the stack accept `kind`, opening an implicit paragraph
    /// or closing textblocks as needed
    fn find_place(&mut self, kind: NodeKind) -> bool {
        loop {
            let top_kind = self.top_kind();
            let rule = &self.schema.spec(top_kind).content;

            if rule.allows(kind) {
                return true;
            }
            if kind.is_inline() && rule.allows(NodeKind::Paragraph) {
                self.stack.push(OpenNode {
                    kind: NodeKind::Paragraph,
                    attrs: Attrs::new(),
                    content: Vec::new(),
                    implicit: true,
                });
                continue;
            }

            let top = self.top();
            let closable = self.stack.len() > 1
                && (top.implicit || matches!(top_kind, NodeKind::Span) || is_textblock(top_kind));
            if !closable {
                return false;
            }
            self.close_top();
        }
    }

    /// End an implicit paragraph sitting on top of the stack
    fn close_implicit(&mut self) {
        while self.stack.len() > 1 && self.top().implicit {
            self.close_top();
        }
    }

    fn close_to(&mut self, depth: usize) {
        while self.stack.len() > depth.max(1) {
            self.close_top();
        }
    }

    fn close_top(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        let Some(mut open) = self.stack.pop() else {
            return;
        };

        if is_textblock(open.kind) || open.kind == NodeKind::Span {
            trim_trailing_space(&mut open.content);
        }
        if open.implicit && open.content.is_empty() {
            return;
        }

        match self.schema.create_and_fill(open.kind, Some(open.attrs), open.content) {
            Some(node) => self.push_child(node),
            None => debug!(kind = %open.kind, "dropping node whose content does not fit the schema"),
        }
    }
}

fn is_textblock(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Paragraph | NodeKind::Heading | NodeKind::CodeBlock | NodeKind::Div
    )
}

/// Collapse runs of HTML whitespace into single spaces. Non-breaking spaces
/// are content and stay.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        if matches!(ch, ' ' | '\t' | '\n' | '\r' | '\u{c}') {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

fn trim_trailing_space(content: &mut Vec<Node>) {
    let Some(last) = content.last_mut() else {
        return;
    };
    let Some(text) = last.text.as_mut() else {
        return;
    };
    let trimmed_len = text.trim_end_matches(' ').len();
    text.truncate(trimmed_len);
    if text.is_empty() {
        content.pop();
    }
}
