//! # Transactions
//!
//! A transaction is an ordered list of steps plus the selection to set once
//! the steps are applied. Every step is a replace of a child range of one
//! parent node; applying a step yields the step that reverts it.
//!
//! Steps validate the parent's content against the schema before touching
//! the document, so a failed step leaves the document unchanged.

use crate::state::{last_textblock_path, node_at, node_at_mut, EditorState, Position, Selection};
use serde::{Deserialize, Serialize};
use tabula_schema::{Node, NodeKind, Schema, SchemaError};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Step {
    /// Replace children `from..to` of the node at `parent` with `nodes`
    Replace {
        parent: Vec<usize>,
        from: usize,
        to: usize,
        nodes: Vec<Node>,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransactionError {
    #[error("No node at path {0:?}")]
    NodeNotFound(Vec<usize>),

    #[error("Range {from}..{to} is outside a node with {len} children")]
    InvalidRange { from: usize, to: usize, len: usize },

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    #[error("Selection is not supported: {0}")]
    UnsupportedSelection(String),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}

impl Step {
    /// Apply the step and return its inverse
    pub fn apply(&self, doc: &mut Node, schema: &Schema) -> Result<Step, TransactionError> {
        match self {
            Step::Replace {
                parent,
                from,
                to,
                nodes,
            } => {
                let target = node_at_mut(doc, parent)
                    .ok_or_else(|| TransactionError::NodeNotFound(parent.clone()))?;

                let len = target.child_count();
                if from > to || *to > len {
                    return Err(TransactionError::InvalidRange {
                        from: *from,
                        to: *to,
                        len,
                    });
                }

                let mut content = target.content.clone();
                let removed: Vec<Node> = content
                    .splice(*from..*to, nodes.iter().cloned())
                    .collect();

                schema
                    .spec(target.kind)
                    .content
                    .validate(&content)
                    .map_err(|message| {
                        TransactionError::InvalidStructure(format!("{}: {}", target.kind, message))
                    })?;

                target.content = content;

                Ok(Step::Replace {
                    parent: parent.clone(),
                    from: *from,
                    to: from + nodes.len(),
                    nodes: removed,
                })
            }
        }
    }
}

/// Steps applied together as one undo step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transaction {
    pub steps: Vec<Step>,

    /// Selection after the steps, `None` keeps the current one
    pub selection: Option<Selection>,

    pub description: Option<String>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn set_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replace the current selection with `nodes`.
    ///
    /// Block nodes at a caret inside a textblock:
    /// - an empty textblock is replaced
    /// - at the start of a textblock the nodes go before it
    /// - at the end they go after it
    /// - in the middle the textblock is split around them
    ///
    /// Inline nodes are spliced into the textblock. A range selection inside
    /// one textblock, or across sibling textblocks, is deleted first.
    pub fn replace_selection_with(
        state: &EditorState,
        schema: &Schema,
        nodes: Vec<Node>,
    ) -> Result<Transaction, TransactionError> {
        let (start, end) = state.selection.range();
        let parent_path = start.path.split_last().map(|(_, rest)| rest.to_vec());

        let start_node = state
            .node_at(&start.path)
            .ok_or_else(|| TransactionError::NodeNotFound(start.path.clone()))?;

        if !start_node.is_textblock() {
            if start != end {
                return Err(TransactionError::UnsupportedSelection(
                    "range selections must start in a textblock".to_string(),
                ));
            }
            return Self::insert_at(state, schema, start, nodes);
        }

        let end_node = state
            .node_at(&end.path)
            .ok_or_else(|| TransactionError::NodeNotFound(end.path.clone()))?;
        let end_parent = end.path.split_last().map(|(_, rest)| rest.to_vec());
        if !end_node.is_textblock() || end_parent != parent_path {
            return Err(TransactionError::UnsupportedSelection(
                "selection must start and end in sibling textblocks".to_string(),
            ));
        }

        // Textblocks always have a parent, the doc itself is not one
        let parent = parent_path.unwrap_or_default();
        let from_index = start.path.last().copied().unwrap_or_default();
        let to_index = end.path.last().copied().unwrap_or_default();

        let before = start_node.slice_inline(0, start.offset);
        let after = end_node.slice_inline(end.offset, end_node.inline_len());

        if nodes.iter().all(|node| node.kind.is_inline()) {
            let inserted: usize = nodes.iter().map(Node::inline_width).sum();
            let mut content = before;
            content.extend(nodes);
            content.extend(after);
            let block = schema.node(start_node.kind, Some(start_node.attrs.clone()), content)?;

            let caret = Position::new(start.path.clone(), start.offset + inserted);
            return Ok(Transaction::new()
                .step(Step::Replace {
                    parent,
                    from: from_index,
                    to: to_index + 1,
                    nodes: vec![block],
                })
                .set_selection(Selection::caret(caret)));
        }

        let blocks = wrap_inline_runs(schema, nodes)?;
        let mut replacement = Vec::with_capacity(blocks.len() + 2);

        if !before.is_empty() {
            replacement.push(schema.node(start_node.kind, Some(start_node.attrs.clone()), before)?);
        }
        let first_inserted = from_index + replacement.len();
        replacement.extend(blocks);
        let last_inserted = from_index + replacement.len();
        if !after.is_empty() {
            replacement.push(schema.node(end_node.kind, Some(end_node.attrs.clone()), after)?);
        }
        if replacement.is_empty() {
            replacement.push(schema.node(start_node.kind, Some(start_node.attrs.clone()), vec![])?);
        }

        let selection = caret_after(&parent, &replacement, first_inserted, last_inserted, from_index);
        debug!(
            parent = ?parent,
            inserted = last_inserted - first_inserted,
            "replacing selection with block content"
        );

        Ok(Transaction::new()
            .step(Step::Replace {
                parent,
                from: from_index,
                to: to_index + 1,
                nodes: replacement,
            })
            .set_selection(selection))
    }

    /// Insert blocks at a child index of a non-textblock node
    fn insert_at(
        state: &EditorState,
        schema: &Schema,
        position: &Position,
        nodes: Vec<Node>,
    ) -> Result<Transaction, TransactionError> {
        let blocks = wrap_inline_runs(schema, nodes)?;
        let count = blocks.len();
        let parent = position.path.clone();

        let mut selection = state.selection.clone();
        if let Some(last) = blocks.last() {
            if let Some(rest) = last_textblock_path(last) {
                let mut path = parent.clone();
                path.push(position.offset + count - 1);
                path.extend(rest);
                let len = node_at(last, &path[parent.len() + 1..]).map_or(0, Node::inline_len);
                selection = Selection::caret(Position::new(path, len));
            } else {
                selection = Selection::caret(Position::new(parent.clone(), position.offset + count));
            }
        }

        Ok(Transaction::new()
            .step(Step::Replace {
                parent,
                from: position.offset,
                to: position.offset,
                nodes: blocks,
            })
            .set_selection(selection))
    }
}

/// Wrap runs of inline nodes among block nodes into paragraphs
fn wrap_inline_runs(schema: &Schema, nodes: Vec<Node>) -> Result<Vec<Node>, TransactionError> {
    let mut out = Vec::with_capacity(nodes.len());
    let mut run = Vec::new();

    for node in nodes {
        if node.kind.is_inline() {
            run.push(node);
            continue;
        }
        if !run.is_empty() {
            out.push(schema.node(NodeKind::Paragraph, None, std::mem::take(&mut run))?);
        }
        out.push(node);
    }
    if !run.is_empty() {
        out.push(schema.node(NodeKind::Paragraph, None, run)?);
    }

    Ok(out)
}

/// Caret at the end of the last textblock among the inserted blocks, or at
/// the start of whatever follows them
fn caret_after(
    parent: &[usize],
    replacement: &[Node],
    first_inserted: usize,
    last_inserted: usize,
    base: usize,
) -> Selection {
    let inserted = &replacement[first_inserted - base..last_inserted - base];

    for (offset, block) in inserted.iter().enumerate().rev() {
        if let Some(rest) = last_textblock_path(block) {
            let textblock = node_at(block, &rest).map_or(0, Node::inline_len);
            let mut path = parent.to_vec();
            path.push(first_inserted + offset);
            path.extend(rest);
            return Selection::caret(Position::new(path, textblock));
        }
    }

    let mut path = parent.to_vec();
    match replacement.get(last_inserted - base) {
        Some(_) => {
            path.push(last_inserted);
            Selection::caret(Position::new(path, 0))
        }
        None => Selection::caret(Position::new(path, last_inserted)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> &'static Schema {
        Schema::standard().unwrap()
    }

    fn state(html: &str, path: Vec<usize>, offset: usize) -> EditorState {
        let mut state = EditorState::from_html(schema(), html);
        state.selection = Selection::caret(Position::new(path, offset));
        state
    }

    fn table() -> Node {
        let cell = schema()
            .create_and_fill(NodeKind::TableCell, None, vec![])
            .unwrap();
        let row = schema().node(NodeKind::TableRow, None, vec![cell]).unwrap();
        schema().node(NodeKind::Table, None, vec![row]).unwrap()
    }

    fn apply(state: &mut EditorState, tr: &Transaction) {
        for step in &tr.steps {
            step.apply(&mut state.doc, schema()).unwrap();
        }
    }

    fn kinds(node: &Node) -> Vec<NodeKind> {
        node.content.iter().map(|n| n.kind).collect()
    }

    #[test]
    fn test_replace_empty_textblock() {
        let mut state = state("<p>a</p><p></p>", vec![1], 0);
        let tr = Transaction::replace_selection_with(&state, schema(), vec![table()]).unwrap();
        apply(&mut state, &tr);

        assert_eq!(kinds(&state.doc), vec![NodeKind::Paragraph, NodeKind::Table]);
        // Caret ends in the inserted table's cell
        assert_eq!(tr.selection.unwrap().head.path, vec![1, 0, 0, 0]);
    }

    #[test]
    fn test_split_textblock_in_the_middle() {
        let mut state = state("<p>Hello</p>", vec![0], 2);
        let tr = Transaction::replace_selection_with(&state, schema(), vec![table()]).unwrap();
        apply(&mut state, &tr);

        assert_eq!(
            kinds(&state.doc),
            vec![NodeKind::Paragraph, NodeKind::Table, NodeKind::Paragraph]
        );
        assert_eq!(state.doc.content[0].text_content(), "He");
        assert_eq!(state.doc.content[2].text_content(), "llo");
    }

    #[test]
    fn test_insert_before_at_start() {
        let mut state = state("<p>Hello</p>", vec![0], 0);
        let tr = Transaction::replace_selection_with(&state, schema(), vec![table()]).unwrap();
        apply(&mut state, &tr);
        assert_eq!(kinds(&state.doc), vec![NodeKind::Table, NodeKind::Paragraph]);
        assert_eq!(state.doc.content[1].text_content(), "Hello");
    }

    #[test]
    fn test_inline_insert_and_range_delete() {
        let mut state = state("<p>Hello world</p>", vec![0], 5);
        state.selection.head = Position::new(vec![0], 11);

        let text = schema().text("!", vec![]).unwrap();
        let tr = Transaction::replace_selection_with(&state, schema(), vec![text]).unwrap();
        apply(&mut state, &tr);

        assert_eq!(state.doc.content[0].text_content(), "Hello!");
        assert_eq!(state.doc.content[0].child_count(), 1);
        assert_eq!(tr.selection.unwrap().head, Position::new(vec![0], 6));
    }

    #[test]
    fn test_range_across_sibling_textblocks() {
        let mut state = state("<p>one</p><p>two</p><p>three</p>", vec![0], 1);
        state.selection.head = Position::new(vec![2], 2);

        let tr = Transaction::replace_selection_with(&state, schema(), vec![]).unwrap();
        apply(&mut state, &tr);

        assert_eq!(state.doc.child_count(), 1);
        assert_eq!(state.doc.content[0].text_content(), "oree");
    }

    #[test]
    fn test_step_inverse_restores_document() {
        let mut state = state("<p>Hello</p>", vec![0], 2);
        let original = state.doc.clone();
        let tr = Transaction::replace_selection_with(&state, schema(), vec![table()]).unwrap();

        let inverse = tr.steps[0].apply(&mut state.doc, schema()).unwrap();
        assert_ne!(state.doc, original);
        inverse.apply(&mut state.doc, schema()).unwrap();
        assert_eq!(state.doc, original);
    }

    #[test]
    fn test_invalid_step_leaves_document_unchanged() {
        let mut state = state("<p>only</p>", vec![0], 0);
        let original = state.doc.clone();

        let step = Step::Replace {
            parent: vec![],
            from: 0,
            to: 1,
            nodes: vec![],
        };
        let err = step.apply(&mut state.doc, schema()).unwrap_err();
        assert!(matches!(err, TransactionError::InvalidStructure(_)));
        assert_eq!(state.doc, original);

        let out_of_range = Step::Replace {
            parent: vec![],
            from: 0,
            to: 5,
            nodes: vec![],
        };
        assert!(matches!(
            out_of_range.apply(&mut state.doc, schema()),
            Err(TransactionError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_insert_at_doc_level() {
        let mut state = state("<hr>", vec![], 1);
        let tr = Transaction::replace_selection_with(&state, schema(), vec![table()]).unwrap();
        apply(&mut state, &tr);
        assert_eq!(kinds(&state.doc), vec![NodeKind::HorizontalRule, NodeKind::Table]);
        assert_eq!(tr.selection.unwrap().head.path, vec![1, 0, 0, 0]);
    }
}
