//! # HTML Table Conversion
//!
//! Builds a `table` node from a parsed `<table>` element, recursing into
//! tables nested inside cells.
//!
//! ## Rules
//!
//! - Rows are the table's own `tr` children, including those inside its
//!   direct `thead`/`tbody`/`tfoot`; rows of nested tables never leak out
//! - Cells are a row's direct `td`/`th` children and always become
//!   `table_cell`, keeping their HTML attributes
//! - Cell children are handled one by one: a nested `<table>` converts
//!   recursively, any other element goes through the general parser, text
//!   is trimmed and wrapped in a paragraph
//! - A cell with no content gets one empty paragraph
//! - A row that fails to build is dropped; a table with no rows is `None`
//!
//! The converter only reads the DOM and carries its nesting depth
//! explicitly. A table nested deeper than `max_depth` converts to `None`,
//! whether it sits directly in a cell or inside wrapper elements such as
//! `<div>` or `<center>`. Element nesting across all levels shares the
//! parser's [`MAX_NESTING`] budget.

use crate::config::DEFAULT_MAX_TABLE_DEPTH;
use tabula_schema::html::{self, child_elements, is_element};
use tabula_schema::{cell_attrs, DomParser, Handle, Node, NodeData, NodeKind, Schema, MAX_NESTING};
use tracing::{debug, instrument, warn};

const ROW_GROUPS: &[&str] = &["thead", "tbody", "tfoot"];
const CELLS: &[&str] = &["td", "th"];

/// Element levels from a table to the children of its cells (tbody, tr, td)
const CELL_NESTING: usize = 3;

pub struct TableConverter<'s> {
    schema: &'s Schema,
    parser: DomParser<'s>,
    max_depth: usize,
}

impl<'s> TableConverter<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            parser: DomParser::from_schema(schema),
            max_depth: DEFAULT_MAX_TABLE_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Convert a `<table>` element. `None` means there is nothing to insert.
    pub fn convert(&self, table: &Handle) -> Option<Node> {
        self.convert_at(table, 0, 0)
    }

    #[instrument(level = "debug", skip(self, table))]
    fn convert_at(&self, table: &Handle, depth: usize, nesting: usize) -> Option<Node> {
        if depth > self.max_depth {
            warn!(max_depth = self.max_depth, "table nested too deeply, skipping it");
            return None;
        }
        if nesting + CELL_NESTING >= MAX_NESTING {
            warn!(nesting, "table markup nested too deeply, skipping it");
            return None;
        }

        let rows = table_rows(table);
        if rows.is_empty() {
            debug!("table has no rows");
            return None;
        }

        let row_count = rows.len();
        let row_nodes: Vec<Node> = rows
            .iter()
            .enumerate()
            .filter_map(|(index, row)| {
                let node = self.convert_row(row, depth, nesting);
                if node.is_none() {
                    debug!(row = index, "dropping row that does not fit the schema");
                }
                node
            })
            .collect();

        debug!(rows = row_count, kept = row_nodes.len(), "converted table rows");
        self.schema.create_and_fill(NodeKind::Table, None, row_nodes)
    }

    fn convert_row(&self, row: &Handle, depth: usize, nesting: usize) -> Option<Node> {
        let cells = child_elements(row, CELLS)
            .iter()
            .map(|cell| self.convert_cell(cell, depth, nesting + CELL_NESTING))
            .collect::<Option<Vec<Node>>>()?;

        self.schema.create_and_fill(NodeKind::TableRow, None, cells)
    }

    /// `nesting` is the element level of the cell itself
    fn convert_cell(&self, cell: &Handle, depth: usize, nesting: usize) -> Option<Node> {
        let mut content = Vec::new();
        let nested_table = |table: &Handle, level: usize| self.convert_at(table, depth + 1, level);

        for child in html::children(cell) {
            match &child.data {
                NodeData::Element { .. } if is_element(&child, "table") => {
                    if let Some(nested) = self.convert_at(&child, depth + 1, nesting + 1) {
                        content.push(nested);
                    }
                }
                NodeData::Element { .. } => {
                    // Tables below wrapper elements come back through convert_at
                    content.extend(self.parser.parse_slice_with_tables(&child, nesting, &nested_table));
                }
                NodeData::Text { .. } => {
                    let text = html::text(&child).unwrap_or_default();
                    let text = text.trim();
                    if !text.is_empty() {
                        match self.schema.paragraph(text) {
                            Ok(paragraph) => content.push(paragraph),
                            Err(err) => debug!(%err, "skipping cell text"),
                        }
                    }
                }
                _ => {}
            }
        }

        if content.is_empty() {
            content.push(self.schema.paragraph("").ok()?);
        }

        self.schema
            .create_and_fill(NodeKind::TableCell, Some(cell_attrs(cell)), content)
    }
}

/// Rows owned by a table, in document order
fn table_rows(table: &Handle) -> Vec<Handle> {
    let mut rows = Vec::new();
    for child in html::children(table) {
        if is_element(&child, "tr") {
            rows.push(child);
        } else if ROW_GROUPS.iter().any(|tag| is_element(&child, tag)) {
            rows.extend(child_elements(&child, &["tr"]));
        }
    }
    rows
}
