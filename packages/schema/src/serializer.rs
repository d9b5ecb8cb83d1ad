//! Document → HTML rendering.
//!
//! Presentation attributes are written only when they are set, so a node
//! parsed from plain markup renders back to plain markup.

use crate::node::{Mark, MarkKind, Node, NodeKind};
use serde_json::Value;

/// Options for HTML rendering
#[derive(Debug, Clone)]
pub struct SerializeOptions {
    /// Put each block on its own indented line
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: "  ".to_string(),
        }
    }
}

impl SerializeOptions {
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Default::default()
        }
    }
}

/// Render a node (a `doc` renders its children only)
pub fn serialize_node(node: &Node, options: SerializeOptions) -> String {
    let mut cx = Context::new(options);
    if node.kind == NodeKind::Doc {
        cx.blocks(&node.content);
    } else {
        cx.node(node);
    }
    cx.finish()
}

/// Render a list of sibling nodes
pub fn serialize_fragment(nodes: &[Node], options: SerializeOptions) -> String {
    let mut cx = Context::new(options);
    cx.blocks(nodes);
    cx.finish()
}

struct Context {
    options: SerializeOptions,
    depth: usize,
    buffer: String,
}

impl Context {
    fn new(options: SerializeOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn finish(self) -> String {
        if self.options.pretty {
            self.buffer.trim_end().to_string()
        } else {
            self.buffer
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn start_line(&mut self) {
        if self.options.pretty {
            for _ in 0..self.depth {
                self.buffer.push_str(&self.options.indent);
            }
        }
    }

    fn end_line(&mut self) {
        if self.options.pretty {
            self.buffer.push('\n');
        }
    }

    fn blocks(&mut self, nodes: &[Node]) {
        for node in nodes {
            self.node(node);
        }
    }

    fn node(&mut self, node: &Node) {
        if node.kind.is_inline() {
            self.inline(node);
            return;
        }

        match node.kind {
            NodeKind::Doc => self.blocks(&node.content),
            NodeKind::HorizontalRule => {
                self.start_line();
                self.add("<hr>");
                self.end_line();
            }
            NodeKind::CodeBlock => {
                self.start_line();
                self.add("<pre><code>");
                let text = node.text_content();
                self.add(&escape_text(&text));
                self.add("</code></pre>");
                self.end_line();
            }
            NodeKind::Paragraph | NodeKind::Heading | NodeKind::Div => {
                let tag = block_tag(node);
                self.start_line();
                self.add(&open_tag(&tag, &presentation_attrs(node)));
                for child in &node.content {
                    self.inline(child);
                }
                self.add(&format!("</{}>", tag));
                self.end_line();
            }
            NodeKind::Table => {
                self.container("table", &[], &node.content, Some("tbody"));
            }
            _ => {
                let tag = block_tag(node);
                let attrs = presentation_attrs(node);
                self.container(&tag, &attrs, &node.content, None);
            }
        }
    }

    fn container(&mut self, tag: &str, attrs: &[(String, String)], children: &[Node], wrapper: Option<&str>) {
        self.start_line();
        self.add(&open_tag(tag, attrs));
        self.end_line();
        self.depth += 1;

        if let Some(wrapper) = wrapper {
            self.start_line();
            self.add(&format!("<{}>", wrapper));
            self.end_line();
            self.depth += 1;
        }

        self.blocks(children);

        if let Some(wrapper) = wrapper {
            self.depth -= 1;
            self.start_line();
            self.add(&format!("</{}>", wrapper));
            self.end_line();
        }

        self.depth -= 1;
        self.start_line();
        self.add(&format!("</{}>", tag));
        self.end_line();
    }

    fn inline(&mut self, node: &Node) {
        match node.kind {
            NodeKind::Text => {
                let text = escape_text(node.text.as_deref().unwrap_or_default());
                self.add(&wrap_marks(&text, &node.marks));
            }
            NodeKind::HardBreak => self.add("<br>"),
            NodeKind::Image => self.add(&open_tag("img", &presentation_attrs(node))),
            NodeKind::Span => {
                self.add(&open_tag("span", &presentation_attrs(node)));
                for child in &node.content {
                    self.inline(child);
                }
                self.add("</span>");
            }
            _ => self.node(node),
        }
    }
}

fn block_tag(node: &Node) -> String {
    match node.kind {
        NodeKind::Paragraph => "p".to_string(),
        NodeKind::Heading => {
            let level = node.attr("level").and_then(Value::as_u64).unwrap_or(1).clamp(1, 6);
            format!("h{}", level)
        }
        NodeKind::Blockquote => "blockquote".to_string(),
        NodeKind::Div => "div".to_string(),
        NodeKind::TableRow => "tr".to_string(),
        NodeKind::TableCell => "td".to_string(),
        NodeKind::TableHeader => "th".to_string(),
        other => other.name().to_string(),
    }
}

/// HTML attributes for a node, in a stable order
fn presentation_attrs(node: &Node) -> Vec<(String, String)> {
    let mut out = Vec::new();

    let names: &[&str] = match node.kind {
        NodeKind::Image => &["src", "alt", "title", "style", "width", "height", "class"],
        NodeKind::Div => &["style", "class", "align"],
        NodeKind::Span => &["style", "class"],
        NodeKind::TableCell | NodeKind::TableHeader => {
            for span in ["colspan", "rowspan"] {
                if let Some(n) = node.attr(span).and_then(Value::as_u64) {
                    if n != 1 {
                        out.push((span.to_string(), n.to_string()));
                    }
                }
            }
            if let Some(Value::Array(widths)) = node.attr("colwidth") {
                let joined: Vec<String> = widths.iter().map(|w| w.to_string()).collect();
                out.push(("data-colwidth".to_string(), joined.join(",")));
            }
            &["style", "class", "align", "valign", "width", "height"]
        }
        _ => &[],
    };

    for name in names {
        if let Some(value) = node.attr_str(name) {
            out.push((name.to_string(), value.to_string()));
        }
    }
    out
}

fn open_tag(tag: &str, attrs: &[(String, String)]) -> String {
    let mut out = format!("<{}", tag);
    for (name, value) in attrs {
        out.push_str(&format!(" {}=\"{}\"", name, escape_attr(value)));
    }
    out.push('>');
    out
}

fn wrap_marks(text: &str, marks: &[Mark]) -> String {
    let mut out = text.to_string();
    // Innermost mark is the highest ranked one
    for mark in marks.iter().rev() {
        out = match mark.kind {
            MarkKind::Em => format!("<em>{}</em>", out),
            MarkKind::Strong => format!("<strong>{}</strong>", out),
            MarkKind::Code => format!("<code>{}</code>", out),
            MarkKind::Link => {
                let mut attrs = Vec::new();
                if let Some(href) = mark.attrs.get("href").and_then(Value::as_str) {
                    attrs.push(("href".to_string(), href.to_string()));
                }
                if let Some(title) = mark.attrs.get("title").and_then(Value::as_str) {
                    attrs.push(("title".to_string(), title.to_string()));
                }
                format!("{}{}</a>", open_tag("a", &attrs), out)
            }
        };
    }
    out
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}
