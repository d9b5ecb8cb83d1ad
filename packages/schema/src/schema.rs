//! # Node Registry
//!
//! The schema is a fixed registry: one [`NodeSpec`] per [`NodeKind`],
//! produced by a match and validated once when the schema is built.
//!
//! Besides the basic document nodes, the registry carries:
//! - styled `div` / `span` nodes and an `image` node that keep their HTML
//!   presentation attributes (style, class, align, ...)
//! - table nodes whose cells keep `style`, `class`, `align`, `valign`,
//!   `width` and `height` as pass-through data

use crate::content::{ContentRule, Group, Target};
use crate::error::{SchemaError, SchemaResult};
use crate::node::{join_text_nodes, Attrs, Mark, Node, NodeKind};
use serde_json::Value;
use std::sync::OnceLock;

const CELL_KINDS: &[NodeKind] = &[NodeKind::TableCell, NodeKind::TableHeader];

/// HTML attributes table cells pass through untouched
pub const CELL_PASSTHROUGH_ATTRS: [&str; 6] = ["style", "class", "align", "valign", "width", "height"];

/// Attribute declaration. A spec without a default is required.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrSpec {
    pub name: &'static str,
    pub default: Option<Value>,
}

impl AttrSpec {
    pub fn optional(name: &'static str) -> Self {
        Self {
            name,
            default: Some(Value::Null),
        }
    }

    pub fn with_default(name: &'static str, default: Value) -> Self {
        Self {
            name,
            default: Some(default),
        }
    }

    pub fn required(name: &'static str) -> Self {
        Self { name, default: None }
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// Registry entry for one node kind
#[derive(Debug, Clone)]
pub struct NodeSpec {
    pub kind: NodeKind,
    pub content: ContentRule,
    pub attrs: Vec<AttrSpec>,
    /// Whether text inside this node may carry marks
    pub marks: bool,
}

impl NodeSpec {
    pub fn for_kind(kind: NodeKind) -> Self {
        let inline_star = || ContentRule::zero_or_more(Target::Group(Group::Inline));
        let block_plus = || ContentRule::one_or_more(Target::Group(Group::Block));

        let (content, attrs) = match kind {
            NodeKind::Doc | NodeKind::Blockquote => (block_plus(), vec![]),
            NodeKind::Paragraph => (inline_star(), vec![]),
            NodeKind::HorizontalRule | NodeKind::Text | NodeKind::HardBreak => {
                (ContentRule::leaf(), vec![])
            }
            NodeKind::Heading => (
                inline_star(),
                vec![AttrSpec::with_default("level", Value::from(1))],
            ),
            NodeKind::CodeBlock => (ContentRule::zero_or_more(Target::Kind(NodeKind::Text)), vec![]),
            NodeKind::Image => (
                ContentRule::leaf(),
                vec![
                    AttrSpec::required("src"),
                    AttrSpec::optional("alt"),
                    AttrSpec::optional("title"),
                    AttrSpec::optional("style"),
                    AttrSpec::optional("width"),
                    AttrSpec::optional("height"),
                    AttrSpec::optional("class"),
                ],
            ),
            NodeKind::Div => (
                inline_star(),
                vec![
                    AttrSpec::optional("style"),
                    AttrSpec::optional("class"),
                    AttrSpec::optional("align"),
                ],
            ),
            NodeKind::Span => (
                ContentRule::zero_or_more(Target::Kind(NodeKind::Text)),
                vec![AttrSpec::optional("style"), AttrSpec::optional("class")],
            ),
            NodeKind::Table => (ContentRule::one_or_more(Target::Kind(NodeKind::TableRow)), vec![]),
            NodeKind::TableRow => (ContentRule::one_or_more(Target::AnyOf(CELL_KINDS)), vec![]),
            NodeKind::TableCell | NodeKind::TableHeader => {
                let mut attrs = vec![
                    AttrSpec::with_default("colspan", Value::from(1)),
                    AttrSpec::with_default("rowspan", Value::from(1)),
                    AttrSpec::optional("colwidth"),
                ];
                attrs.extend(CELL_PASSTHROUGH_ATTRS.iter().map(|name| AttrSpec::optional(*name)));
                (block_plus(), attrs)
            }
        };

        Self {
            kind,
            content,
            attrs,
            marks: kind != NodeKind::CodeBlock,
        }
    }

    pub fn has_required_attrs(&self) -> bool {
        self.attrs.iter().any(AttrSpec::is_required)
    }

    /// Can be produced out of nothing when a parent requires it
    pub fn is_fillable(&self) -> bool {
        self.kind != NodeKind::Text && !self.has_required_attrs() && self.content.accepts_empty()
    }
}

/// Document schema
#[derive(Debug, Clone)]
pub struct Schema {
    specs: Vec<NodeSpec>,
}

static STANDARD: OnceLock<SchemaResult<Schema>> = OnceLock::new();

impl Schema {
    /// Build and validate the registry
    pub fn new() -> SchemaResult<Self> {
        let schema = Self {
            specs: NodeKind::ALL.iter().map(|k| NodeSpec::for_kind(*k)).collect(),
        };
        schema.validate_registry()?;
        Ok(schema)
    }

    /// Process-wide schema, validated on first use
    pub fn standard() -> SchemaResult<&'static Schema> {
        STANDARD.get_or_init(Schema::new).as_ref().map_err(Clone::clone)
    }

    fn validate_registry(&self) -> SchemaResult<()> {
        for (index, spec) in self.specs.iter().enumerate() {
            if NodeKind::ALL[index] != spec.kind {
                return Err(SchemaError::InvalidRegistry(format!(
                    "spec for {} registered at slot of {}",
                    spec.kind,
                    NodeKind::ALL[index]
                )));
            }

            for term in &spec.content.terms {
                if term.target.candidates().next().is_none() {
                    return Err(SchemaError::InvalidRegistry(format!(
                        "content of {} references {} which matches no node kind",
                        spec.kind, term.target
                    )));
                }
            }

            let mut seen = Vec::new();
            for attr in &spec.attrs {
                if seen.contains(&attr.name) {
                    return Err(SchemaError::InvalidRegistry(format!(
                        "duplicate attribute '{}' on {}",
                        attr.name, spec.kind
                    )));
                }
                seen.push(attr.name);
            }
        }

        if !self.spec(NodeKind::Doc).content.allows(NodeKind::Paragraph) {
            return Err(SchemaError::InvalidRegistry(
                "doc must accept paragraphs".to_string(),
            ));
        }

        Ok(())
    }

    pub fn spec(&self, kind: NodeKind) -> &NodeSpec {
        &self.specs[kind as usize]
    }

    /// Resolve attributes against the spec: defaults for omitted attributes,
    /// unknown attributes dropped
    pub fn compute_attrs(&self, kind: NodeKind, attrs: Option<Attrs>) -> SchemaResult<Attrs> {
        let mut given = attrs.unwrap_or_default();
        let mut out = Attrs::new();

        for spec in &self.spec(kind).attrs {
            match given.remove(spec.name) {
                Some(value) => {
                    out.insert(spec.name.to_string(), value);
                }
                None => match &spec.default {
                    Some(default) => {
                        out.insert(spec.name.to_string(), default.clone());
                    }
                    None => return Err(SchemaError::missing_attribute(kind, spec.name)),
                },
            }
        }

        Ok(out)
    }

    /// Checked construction: content must already satisfy the rule
    pub fn node(&self, kind: NodeKind, attrs: Option<Attrs>, content: Vec<Node>) -> SchemaResult<Node> {
        if kind == NodeKind::Text {
            return Err(SchemaError::invalid_content(kind, "use Schema::text for text nodes"));
        }
        let attrs = self.compute_attrs(kind, attrs)?;
        let content = join_text_nodes(content);

        self.spec(kind)
            .content
            .validate(&content)
            .map_err(|message| SchemaError::invalid_content(kind, message))?;
        self.check_marks(kind, &content)?;

        Ok(Node::raw(kind, attrs, content))
    }

    /// Construct a node, filling in required content that was left out.
    /// Returns `None` when the content can't be made valid.
    pub fn create_and_fill(&self, kind: NodeKind, attrs: Option<Attrs>, content: Vec<Node>) -> Option<Node> {
        if kind == NodeKind::Text {
            return None;
        }
        let attrs = self.compute_attrs(kind, attrs).ok()?;
        let content = join_text_nodes(content);
        let content = self
            .spec(kind)
            .content
            .fill(content, |target| self.default_fill(target))?;

        if self.check_marks(kind, &content).is_err() {
            return None;
        }
        Some(Node::raw(kind, attrs, content))
    }

    /// Create a text node; empty text is rejected
    pub fn text(&self, text: impl Into<String>, marks: Vec<Mark>) -> SchemaResult<Node> {
        let text = text.into();
        if text.is_empty() {
            return Err(SchemaError::EmptyText);
        }
        Ok(Node::raw_text(text, marks))
    }

    /// Paragraph holding a single unmarked text leaf, or an empty paragraph
    pub fn paragraph(&self, text: &str) -> SchemaResult<Node> {
        let content = if text.is_empty() {
            vec![]
        } else {
            vec![self.text(text, vec![])?]
        };
        self.node(NodeKind::Paragraph, None, content)
    }

    fn fill_kind(&self, target: &Target) -> Option<NodeKind> {
        target.candidates().find(|k| self.spec(*k).is_fillable())
    }

    /// Node inserted when a required child is missing. Only kinds that are
    /// valid without content qualify, so filling never recurses.
    pub fn default_fill(&self, target: &Target) -> Option<Node> {
        let kind = self.fill_kind(target)?;
        let attrs = self.compute_attrs(kind, None).ok()?;
        Some(Node::raw(kind, attrs, Vec::new()))
    }

    /// Deep validation of a tree
    pub fn check(&self, node: &Node) -> SchemaResult<()> {
        if node.kind == NodeKind::Text {
            return match node.text.as_deref() {
                Some(text) if !text.is_empty() => Ok(()),
                _ => Err(SchemaError::EmptyText),
            };
        }

        for spec in &self.spec(node.kind).attrs {
            if spec.is_required() && !node.attrs.contains_key(spec.name) {
                return Err(SchemaError::missing_attribute(node.kind, spec.name));
            }
        }

        self.spec(node.kind)
            .content
            .validate(&node.content)
            .map_err(|message| SchemaError::invalid_content(node.kind, message))?;
        self.check_marks(node.kind, &node.content)?;

        node.content.iter().try_for_each(|child| self.check(child))
    }

    fn check_marks(&self, kind: NodeKind, content: &[Node]) -> SchemaResult<()> {
        if self.spec(kind).marks {
            return Ok(());
        }
        match content.iter().flat_map(|n| n.marks.iter()).next() {
            Some(mark) => Err(SchemaError::MarkNotAllowed {
                kind,
                mark: mark.kind.name().to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::MarkKind;

    fn schema() -> &'static Schema {
        Schema::standard().unwrap()
    }

    #[test]
    fn test_registry_is_valid() {
        assert!(Schema::new().is_ok());
    }

    #[test]
    fn test_cell_attrs_default_to_null() {
        let attrs = schema().compute_attrs(NodeKind::TableCell, None).unwrap();
        assert_eq!(attrs["colspan"], 1);
        assert_eq!(attrs["rowspan"], 1);
        for name in CELL_PASSTHROUGH_ATTRS {
            assert_eq!(attrs[name], Value::Null, "{} should default to null", name);
        }
    }

    #[test]
    fn test_unknown_attrs_are_dropped() {
        let mut given = Attrs::new();
        given.insert("style".to_string(), Value::from("color: red"));
        given.insert("onclick".to_string(), Value::from("alert(1)"));

        let attrs = schema().compute_attrs(NodeKind::Div, Some(given)).unwrap();
        assert_eq!(attrs["style"], "color: red");
        assert!(!attrs.contains_key("onclick"));
    }

    #[test]
    fn test_image_requires_src() {
        let err = schema().node(NodeKind::Image, None, vec![]).unwrap_err();
        assert_eq!(err, SchemaError::missing_attribute(NodeKind::Image, "src"));
    }

    #[test]
    fn test_create_and_fill_cell_adds_paragraph() {
        let cell = schema().create_and_fill(NodeKind::TableCell, None, vec![]).unwrap();
        assert_eq!(cell.child_count(), 1);
        assert_eq!(cell.content[0].kind, NodeKind::Paragraph);
        assert_eq!(cell.content[0].child_count(), 0);
    }

    #[test]
    fn test_create_and_fill_row_without_cells_fails() {
        assert!(schema().create_and_fill(NodeKind::TableRow, None, vec![]).is_none());
        assert!(schema().create_and_fill(NodeKind::Table, None, vec![]).is_none());
    }

    #[test]
    fn test_create_and_fill_rejects_wrong_children() {
        let para = schema().paragraph("x").unwrap();
        assert!(schema().create_and_fill(NodeKind::TableRow, None, vec![para]).is_none());
    }

    #[test]
    fn test_code_block_rejects_marks() {
        let bold = schema().text("x", vec![Mark::new(MarkKind::Strong)]).unwrap();
        let err = schema().node(NodeKind::CodeBlock, None, vec![bold]).unwrap_err();
        assert!(matches!(err, SchemaError::MarkNotAllowed { .. }));
    }

    #[test]
    fn test_empty_text_rejected() {
        assert_eq!(schema().text("", vec![]), Err(SchemaError::EmptyText));
    }

    #[test]
    fn test_check_walks_subtree() {
        let cell = schema().create_and_fill(NodeKind::TableCell, None, vec![]).unwrap();
        let row = schema().node(NodeKind::TableRow, None, vec![cell]).unwrap();
        let mut table = schema().node(NodeKind::Table, None, vec![row]).unwrap();
        assert!(schema().check(&table).is_ok());

        // Break the innermost cell
        table.content[0].content[0].content.clear();
        assert!(schema().check(&table).is_err());
    }
}
