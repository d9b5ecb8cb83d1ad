//! # Tabula Schema
//!
//! Document model for the Tabula editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ html: markup → html5ever tree               │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ parser: html5ever tree → document nodes     │
//! │  - Per-tag parse rules                      │
//! │  - Implicit paragraphs, whitespace collapse │
//! │  - Every node built through the schema      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ serializer: document nodes → HTML           │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use tabula_schema::{DomParser, NodeKind, Schema};
//!
//! let schema = Schema::standard()?;
//! let doc = DomParser::from_schema(schema).parse_html("<table><tr><td></td></tr></table>");
//!
//! // Empty cells are filled with an empty paragraph
//! let cell = doc.find_first(NodeKind::TableCell).unwrap();
//! assert_eq!(cell.content[0].kind, NodeKind::Paragraph);
//! # Ok::<(), tabula_schema::SchemaError>(())
//! ```

pub mod content;
mod error;
pub mod html;
mod node;
mod parser;
mod schema;
mod serializer;

pub use content::{ContentRule, Group, Quantifier, Target};
pub use error::{SchemaError, SchemaResult};
pub use node::{join_text_nodes, Attrs, Mark, MarkKind, Node, NodeKind};
pub use parser::{cell_attrs, DomParser, TableHook, MAX_NESTING};
pub use schema::{AttrSpec, NodeSpec, Schema, CELL_PASSTHROUGH_ATTRS};
pub use serializer::{serialize_fragment, serialize_node, SerializeOptions};

// Re-export the DOM handle type so callers don't need a direct dependency
pub use markup5ever_rcdom::{Handle, NodeData, RcDom};
