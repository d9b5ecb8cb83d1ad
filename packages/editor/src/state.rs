//! # Editor State
//!
//! A document plus a selection. Positions address a node by its path of
//! child indices from the root:
//!
//! - inside a textblock, `offset` counts inline width (characters of text,
//!   one for every other inline node)
//! - inside any other node, `offset` is a child index

use serde::{Deserialize, Serialize};
use tabula_schema::{DomParser, Node, NodeKind, Schema};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub path: Vec<usize>,
    pub offset: usize,
}

impl Position {
    pub fn new(path: Vec<usize>, offset: usize) -> Self {
        Self { path, offset }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: Position,
    pub head: Position,
}

impl Selection {
    /// Collapsed selection
    pub fn caret(position: Position) -> Self {
        Self {
            anchor: position.clone(),
            head: position,
        }
    }

    pub fn new(anchor: Position, head: Position) -> Self {
        Self { anchor, head }
    }

    /// Caret at the start of the first textblock, or at the start of the doc
    pub fn at_start(doc: &Node) -> Self {
        let path = first_textblock_path(doc).unwrap_or_default();
        Self::caret(Position::new(path, 0))
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    /// Start and end in document order
    pub fn range(&self) -> (&Position, &Position) {
        if self.anchor <= self.head {
            (&self.anchor, &self.head)
        } else {
            (&self.head, &self.anchor)
        }
    }
}

/// Document and selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorState {
    pub doc: Node,
    pub selection: Selection,
}

impl EditorState {
    /// State with the caret at the start of the document
    pub fn new(doc: Node) -> Self {
        let selection = Selection::at_start(&doc);
        Self { doc, selection }
    }

    pub fn from_html(schema: &Schema, html: &str) -> Self {
        Self::new(DomParser::from_schema(schema).parse_html(html))
    }

    pub fn node_at(&self, path: &[usize]) -> Option<&Node> {
        node_at(&self.doc, path)
    }

    /// Whether a position resolves inside the document
    pub fn is_valid_position(&self, position: &Position) -> bool {
        match self.node_at(&position.path) {
            Some(node) if node.is_textblock() => position.offset <= node.inline_len(),
            Some(node) if !node.is_text() && node.kind != NodeKind::Span => {
                position.offset <= node.child_count()
            }
            _ => false,
        }
    }

    /// Nearest node of `kind` enclosing the selection anchor, the node the
    /// anchor points into included
    pub fn ancestor(&self, kind: NodeKind) -> Option<(Vec<usize>, &Node)> {
        self.find_ancestor(|node| node.kind == kind)
    }

    /// Nearest table cell (`table_cell` or `table_header`) around the anchor
    pub fn enclosing_cell(&self) -> Option<(Vec<usize>, &Node)> {
        self.find_ancestor(|node| node.kind.is_table_cell())
    }

    fn find_ancestor<F>(&self, predicate: F) -> Option<(Vec<usize>, &Node)>
    where
        F: Fn(&Node) -> bool,
    {
        let path = &self.selection.anchor.path;
        (0..=path.len()).rev().find_map(|depth| {
            let prefix = &path[..depth];
            self.node_at(prefix)
                .filter(|node| predicate(node))
                .map(|node| (prefix.to_vec(), node))
        })
    }
}

pub fn node_at<'a>(root: &'a Node, path: &[usize]) -> Option<&'a Node> {
    path.iter().try_fold(root, |node, index| node.child(*index))
}

pub fn node_at_mut<'a>(root: &'a mut Node, path: &[usize]) -> Option<&'a mut Node> {
    path.iter()
        .try_fold(root, |node, index| node.content.get_mut(*index))
}

/// Path to the first textblock in document order, relative to `node`
pub fn first_textblock_path(node: &Node) -> Option<Vec<usize>> {
    if node.is_textblock() {
        return Some(Vec::new());
    }
    node.content.iter().enumerate().find_map(|(index, child)| {
        first_textblock_path(child).map(|mut rest| {
            rest.insert(0, index);
            rest
        })
    })
}

/// Path to the last textblock in document order, relative to `node`
pub fn last_textblock_path(node: &Node) -> Option<Vec<usize>> {
    if node.is_textblock() {
        return Some(Vec::new());
    }
    node.content.iter().enumerate().rev().find_map(|(index, child)| {
        last_textblock_path(child).map(|mut rest| {
            rest.insert(0, index);
            rest
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(html: &str) -> EditorState {
        EditorState::from_html(Schema::standard().unwrap(), html)
    }

    #[test]
    fn test_initial_caret_in_first_textblock() {
        let state = state("<hr><table><tr><td><p>cell</p></td></tr></table>");
        assert_eq!(state.selection.anchor.path, vec![1, 0, 0, 0]);
        assert_eq!(state.selection.anchor.offset, 0);
        assert!(state.selection.is_empty());
    }

    #[test]
    fn test_enclosing_cell_is_nearest() {
        let mut state = state(
            "<table><tr><td><table><tr><th>inner</th></tr></table></td></tr></table>",
        );
        state.selection = Selection::caret(Position::new(vec![0, 0, 0, 0, 0, 0, 0], 2));

        let (path, cell) = state.enclosing_cell().unwrap();
        assert_eq!(path, vec![0, 0, 0, 0, 0, 0]);
        assert_eq!(cell.kind, NodeKind::TableHeader);

        let (path, _) = state.ancestor(NodeKind::TableCell).unwrap();
        assert_eq!(path, vec![0, 0, 0]);
    }

    #[test]
    fn test_no_cell_around_plain_paragraph() {
        let state = state("<p>plain</p><table><tr><td>x</td></tr></table>");
        assert!(state.enclosing_cell().is_none());
        assert_eq!(state.ancestor(NodeKind::Doc).map(|(p, _)| p), Some(vec![]));
    }

    #[test]
    fn test_position_validity() {
        let state = state("<p>abc</p>");
        assert!(state.is_valid_position(&Position::new(vec![0], 3)));
        assert!(!state.is_valid_position(&Position::new(vec![0], 4)));
        assert!(!state.is_valid_position(&Position::new(vec![0, 0], 0)));
        assert!(state.is_valid_position(&Position::new(vec![], 1)));
        assert!(!state.is_valid_position(&Position::new(vec![3], 0)));
    }

    #[test]
    fn test_selection_range_orders_positions() {
        let a = Position::new(vec![1], 0);
        let b = Position::new(vec![0], 5);
        let selection = Selection::new(a.clone(), b.clone());
        assert_eq!(selection.range(), (&b, &a));
    }
}
