//! # Tabula Editor
//!
//! Editing session for Tabula documents, and the clipboard handling that
//! turns pasted HTML tables into document tables.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ schema: node registry, HTML parser          │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditorView                          │
//! │  - State + selection                        │
//! │  - Transactions with undo/redo              │
//! │  - Plugins consulted on paste               │
//! │  - Nested table paste → TableConverter      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use tabula_editor::{ClipboardData, EditorConfig, EditorView, PasteOutcome};
//!
//! let mut view = EditorView::mount("demo", "<table><tr><td></td></tr></table>", EditorConfig::default())?;
//!
//! // The caret starts in the cell, so a pasted table is converted
//! let clipboard = ClipboardData::from_parts(Some("<table><tr><td>A</td><td>B</td></tr></table>"), None);
//! let outcome = view.paste(&clipboard)?;
//! assert!(outcome.handled_by_plugin());
//!
//! // One undo step
//! view.undo()?;
//! # Ok::<(), tabula_editor::EditorError>(())
//! ```

mod clipboard;
mod config;
mod errors;
mod paste;
mod plugin;
mod state;
mod table_converter;
mod template;
mod transaction;
mod undo_stack;
mod view;

pub use clipboard::{ClipboardData, TEXT_HTML, TEXT_PLAIN};
pub use config::{EditorConfig, DEFAULT_MAX_TABLE_DEPTH};
pub use errors::EditorError;
pub use paste::NestedTablePasteHandler;
pub use plugin::Plugin;
pub use state::{EditorState, Position, Selection};
pub use table_converter::TableConverter;
pub use template::{insert_email_template, EMAIL_TEMPLATE};
pub use transaction::{Step, Transaction, TransactionError};
pub use undo_stack::{StepBatch, UndoStack};
pub use view::{EditorView, PasteOutcome};

// Re-export schema types for convenience
pub use tabula_schema::{Node, NodeKind, Schema, SerializeOptions};
