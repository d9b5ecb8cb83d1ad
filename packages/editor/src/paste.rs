//! # Nested Table Paste
//!
//! Pasting HTML while the caret sits in a table cell inserts the first table
//! of the clipboard markup, nested tables included, as one transaction.
//! Anything else falls through to the default paste.

use crate::clipboard::{ClipboardData, TEXT_HTML};
use crate::config::{EditorConfig, DEFAULT_MAX_TABLE_DEPTH};
use crate::plugin::Plugin;
use crate::table_converter::TableConverter;
use crate::view::EditorView;
use tabula_schema::html;
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone)]
pub struct NestedTablePasteHandler {
    max_depth: usize,
}

impl NestedTablePasteHandler {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_TABLE_DEPTH,
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            max_depth: config.max_table_depth,
        }
    }
}

impl Default for NestedTablePasteHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for NestedTablePasteHandler {
    fn name(&self) -> &str {
        "nested-table-paste"
    }

    #[instrument(level = "debug", skip_all)]
    fn handle_paste(&self, view: &mut EditorView, clipboard: &ClipboardData) -> bool {
        if view.state().enclosing_cell().is_none() {
            debug!("caret is not in a table cell");
            return false;
        }
        let Some(markup) = clipboard.get_data(TEXT_HTML) else {
            debug!("clipboard has no html");
            return false;
        };

        let dom = html::parse_html(markup);
        let Some(table) = html::find_first_element(&dom.document, "table") else {
            debug!("clipboard html has no table");
            return false;
        };

        let converter = TableConverter::new(view.schema()).with_max_depth(self.max_depth);
        let Some(node) = converter.convert(&table) else {
            debug!("table converted to nothing");
            return false;
        };

        match view.replace_selection_with(vec![node], "paste table") {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "could not insert pasted table");
                false
            }
        }
    }
}
