//! # Editor View
//!
//! The live editor: state, history, plugins and config behind one handle.
//!
//! A view exists between [`EditorView::mount`] and [`EditorView::unmount`].
//! Everything that edits the document goes through `&mut EditorView`, so
//! there is no shared or global editor instance.

use crate::clipboard::{ClipboardData, TEXT_HTML, TEXT_PLAIN};
use crate::config::EditorConfig;
use crate::paste::NestedTablePasteHandler;
use crate::plugin::Plugin;
use crate::state::{EditorState, Selection};
use crate::transaction::{Transaction, TransactionError};
use crate::undo_stack::UndoStack;
use crate::EditorError;
use std::rc::Rc;
use tabula_schema::{html, serialize_node, DomParser, Node, Schema, SerializeOptions};
use tracing::{debug, info, instrument, warn};

/// How a paste was handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteOutcome {
    /// A plugin took over (plugin name)
    Plugin(String),
    /// The default paste inserted the clipboard content
    Default,
    /// Nothing usable on the clipboard
    Ignored,
}

impl PasteOutcome {
    pub fn handled_by_plugin(&self) -> bool {
        matches!(self, PasteOutcome::Plugin(_))
    }
}

#[derive(Debug)]
pub struct EditorView {
    /// View identifier, used in logs
    pub id: String,

    schema: &'static Schema,
    state: EditorState,
    history: UndoStack,
    plugins: Vec<Rc<dyn Plugin>>,
    config: EditorConfig,
}

impl EditorView {
    /// Create a view over the document parsed from `html`, with the nested
    /// table paste handler installed
    pub fn mount(id: impl Into<String>, html: &str, config: EditorConfig) -> Result<Self, EditorError> {
        let handler: Rc<dyn Plugin> = Rc::new(NestedTablePasteHandler::from_config(&config));
        Self::mount_with_plugins(id, html, config, vec![handler])
    }

    pub fn mount_with_plugins(
        id: impl Into<String>,
        html: &str,
        config: EditorConfig,
        plugins: Vec<Rc<dyn Plugin>>,
    ) -> Result<Self, EditorError> {
        let schema = Schema::standard()?;
        let state = EditorState::from_html(schema, html);
        let id = id.into();

        info!(view = %id, plugins = plugins.len(), "mounting editor view");

        Ok(Self {
            id,
            schema,
            state,
            history: UndoStack::with_max_levels(config.undo_levels),
            plugins,
            config,
        })
    }

    /// Tear the view down and hand back its final state
    pub fn unmount(self) -> EditorState {
        info!(view = %self.id, "unmounting editor view");
        self.state
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn add_plugin(&mut self, plugin: Rc<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    /// Apply a transaction as one undo step
    pub fn dispatch(&mut self, tr: Transaction) -> Result<(), EditorError> {
        self.history.apply(&tr, &mut self.state, self.schema)?;
        debug!(
            view = %self.id,
            steps = tr.steps.len(),
            description = tr.description.as_deref().unwrap_or(""),
            "dispatched transaction"
        );
        Ok(())
    }

    pub fn replace_selection_with(&mut self, nodes: Vec<Node>, description: &str) -> Result<(), EditorError> {
        let tr = Transaction::replace_selection_with(&self.state, self.schema, nodes)?
            .with_description(description);
        self.dispatch(tr)
    }

    pub fn set_selection(&mut self, selection: Selection) -> Result<(), EditorError> {
        for position in [&selection.anchor, &selection.head] {
            if !self.state.is_valid_position(position) {
                return Err(EditorError::InvalidSelection(format!(
                    "{:?} offset {} does not resolve in the document",
                    position.path, position.offset
                )));
            }
        }
        self.state.selection = selection;
        Ok(())
    }

    /// Run a paste through the plugins, then the default paste. A selection
    /// that cannot take pasted content (a range across table cells, say)
    /// leaves the document untouched and reports `Ignored`.
    #[instrument(skip_all, fields(view = %self.id))]
    pub fn paste(&mut self, clipboard: &ClipboardData) -> Result<PasteOutcome, EditorError> {
        let plugins = self.plugins.clone();
        for plugin in plugins {
            if plugin.handle_paste(self, clipboard) {
                info!(plugin = plugin.name(), "paste handled by plugin");
                return Ok(PasteOutcome::Plugin(plugin.name().to_string()));
            }
        }

        let nodes = self.default_paste_content(clipboard)?;
        if nodes.is_empty() {
            debug!("nothing to paste");
            return Ok(PasteOutcome::Ignored);
        }

        match self.replace_selection_with(nodes, "paste") {
            Ok(()) => Ok(PasteOutcome::Default),
            Err(EditorError::Transaction(TransactionError::UnsupportedSelection(reason))) => {
                warn!(%reason, "selection cannot take pasted content");
                Ok(PasteOutcome::Ignored)
            }
            Err(err) => Err(err),
        }
    }

    /// Clipboard HTML parsed with the general parser, else plain text as an
    /// inline run (one line) or paragraphs (several lines)
    fn default_paste_content(&self, clipboard: &ClipboardData) -> Result<Vec<Node>, EditorError> {
        if let Some(markup) = clipboard.get_data(TEXT_HTML) {
            let dom = html::parse_html(markup);
            return Ok(DomParser::from_schema(self.schema).parse_slice(&html::body(&dom)));
        }

        let Some(text) = clipboard.get_data(TEXT_PLAIN) else {
            return Ok(Vec::new());
        };

        if !text.contains('\n') {
            return Ok(vec![self.schema.text(text, vec![])?]);
        }

        text.lines()
            .map(|line| self.schema.paragraph(line).map_err(EditorError::from))
            .collect()
    }

    pub fn undo(&mut self) -> Result<bool, EditorError> {
        Ok(self.history.undo(&mut self.state, self.schema)?)
    }

    pub fn redo(&mut self) -> Result<bool, EditorError> {
        Ok(self.history.redo(&mut self.state, self.schema)?)
    }

    pub fn to_html(&self, options: SerializeOptions) -> String {
        serialize_node(&self.state.doc, options)
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string(&self.state.doc)?)
    }
}
