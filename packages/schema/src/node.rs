//! # Document Nodes
//!
//! The typed tree the editor works on. Nodes are plain values: the schema
//! decides which trees are valid, the node types only carry data.
//!
//! The JSON shape (`type`, `attrs`, `content`, `text`, `marks`) matches the
//! document format browser editors exchange, so a serialized [`Node`] can be
//! handed to JavaScript as-is.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Node attributes, keyed by attribute name
pub type Attrs = BTreeMap<String, Value>;

/// Every node kind the schema knows about, in registry order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Doc,
    Paragraph,
    Blockquote,
    HorizontalRule,
    Heading,
    CodeBlock,
    Text,
    Image,
    HardBreak,
    Div,
    Span,
    Table,
    TableRow,
    TableCell,
    TableHeader,
}

impl NodeKind {
    pub const ALL: [NodeKind; 15] = [
        NodeKind::Doc,
        NodeKind::Paragraph,
        NodeKind::Blockquote,
        NodeKind::HorizontalRule,
        NodeKind::Heading,
        NodeKind::CodeBlock,
        NodeKind::Text,
        NodeKind::Image,
        NodeKind::HardBreak,
        NodeKind::Div,
        NodeKind::Span,
        NodeKind::Table,
        NodeKind::TableRow,
        NodeKind::TableCell,
        NodeKind::TableHeader,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Doc => "doc",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Blockquote => "blockquote",
            NodeKind::HorizontalRule => "horizontal_rule",
            NodeKind::Heading => "heading",
            NodeKind::CodeBlock => "code_block",
            NodeKind::Text => "text",
            NodeKind::Image => "image",
            NodeKind::HardBreak => "hard_break",
            NodeKind::Div => "div",
            NodeKind::Span => "span",
            NodeKind::Table => "table",
            NodeKind::TableRow => "table_row",
            NodeKind::TableCell => "table_cell",
            NodeKind::TableHeader => "table_header",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// Cells are the only kinds a paste can be scoped to
    pub fn is_table_cell(self) -> bool {
        matches!(self, NodeKind::TableCell | NodeKind::TableHeader)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mark kinds, in rank order (marks on a text node are kept sorted by rank)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkKind {
    Link,
    Em,
    Strong,
    Code,
}

impl MarkKind {
    pub fn name(self) -> &'static str {
        match self {
            MarkKind::Link => "link",
            MarkKind::Em => "em",
            MarkKind::Strong => "strong",
            MarkKind::Code => "code",
        }
    }
}

/// Inline formatting attached to a text node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    #[serde(rename = "type")]
    pub kind: MarkKind,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: Attrs,
}

impl Mark {
    pub fn new(kind: MarkKind) -> Self {
        Self {
            kind,
            attrs: Attrs::new(),
        }
    }

    pub fn link(href: impl Into<String>, title: Option<String>) -> Self {
        let mut attrs = Attrs::new();
        attrs.insert("href".to_string(), Value::String(href.into()));
        attrs.insert(
            "title".to_string(),
            title.map(Value::String).unwrap_or(Value::Null),
        );
        Self {
            kind: MarkKind::Link,
            attrs,
        }
    }

    /// Add this mark to a set, replacing a mark of the same kind and keeping rank order
    pub fn add_to_set(self, set: &[Mark]) -> Vec<Mark> {
        let mut marks: Vec<Mark> = set.iter().filter(|m| m.kind != self.kind).cloned().collect();
        let index = marks
            .iter()
            .position(|m| m.kind > self.kind)
            .unwrap_or(marks.len());
        marks.insert(index, self);
        marks
    }
}

/// A document node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub kind: NodeKind,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: Attrs,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<Node>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
}

impl Node {
    /// Build a node without validation. Use [`crate::Schema::node`] for checked construction.
    pub(crate) fn raw(kind: NodeKind, attrs: Attrs, content: Vec<Node>) -> Self {
        Self {
            kind,
            attrs,
            content,
            text: None,
            marks: Vec::new(),
        }
    }

    pub(crate) fn raw_text(text: String, marks: Vec<Mark>) -> Self {
        Self {
            kind: NodeKind::Text,
            attrs: Attrs::new(),
            content: Vec::new(),
            text: Some(text),
            marks,
        }
    }

    /// Same kind and attributes, different content
    pub fn copy(&self, content: Vec<Node>) -> Self {
        Self {
            kind: self.kind,
            attrs: self.attrs.clone(),
            content,
            text: None,
            marks: Vec::new(),
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }

    /// Nodes whose content is inline
    pub fn is_textblock(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Paragraph | NodeKind::Heading | NodeKind::CodeBlock | NodeKind::Div
        )
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.content.get(index)
    }

    pub fn child_count(&self) -> usize {
        self.content.len()
    }

    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    /// String attribute value, `None` for null or missing attributes
    pub fn attr_str(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).and_then(Value::as_str)
    }

    /// Concatenated text of the whole subtree
    pub fn text_content(&self) -> String {
        match &self.text {
            Some(text) => text.clone(),
            None => self.content.iter().map(Node::text_content).collect(),
        }
    }

    /// Width of this node when measured as inline content: characters for
    /// text, one for every other inline node
    pub fn inline_width(&self) -> usize {
        match &self.text {
            Some(text) => text.chars().count(),
            None => 1,
        }
    }

    /// Width of this node's inline content
    pub fn inline_len(&self) -> usize {
        self.content.iter().map(Node::inline_width).sum()
    }

    /// Inline content between two offsets, splitting text nodes at the edges
    pub fn slice_inline(&self, from: usize, to: usize) -> Vec<Node> {
        let mut out = Vec::new();
        let mut pos = 0;

        for child in &self.content {
            let width = child.inline_width();
            let start = pos;
            let end = pos + width;
            pos = end;

            if end <= from || start >= to {
                continue;
            }

            match &child.text {
                Some(text) => {
                    let cut_from = from.saturating_sub(start);
                    let cut_to = (to - start).min(width);
                    let piece: String = text
                        .chars()
                        .skip(cut_from)
                        .take(cut_to.saturating_sub(cut_from))
                        .collect();
                    if !piece.is_empty() {
                        out.push(Node::raw_text(piece, child.marks.clone()));
                    }
                }
                None => out.push(child.clone()),
            }
        }

        out
    }

    /// Depth-first search for the first node of a kind, including `self`
    pub fn find_first(&self, kind: NodeKind) -> Option<&Node> {
        if self.kind == kind {
            return Some(self);
        }
        self.content.iter().find_map(|child| child.find_first(kind))
    }

    /// Number of nodes of a kind in the subtree, including `self`
    pub fn count(&self, kind: NodeKind) -> usize {
        let own = usize::from(self.kind == kind);
        own + self.content.iter().map(|child| child.count(kind)).sum::<usize>()
    }
}

/// Merge adjacent text nodes that carry the same marks
pub fn join_text_nodes(nodes: Vec<Node>) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::with_capacity(nodes.len());

    for node in nodes {
        if let (Some(last), Some(text)) = (out.last_mut(), node.text.as_deref()) {
            if last.marks == node.marks {
                if let Some(last_text) = last.text.as_mut() {
                    last_text.push_str(text);
                    continue;
                }
            }
        }
        out.push(node);
    }

    out
}
