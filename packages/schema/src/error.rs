use crate::node::NodeKind;
use thiserror::Error;

pub type SchemaResult<T> = Result<T, SchemaError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Invalid content for node {kind}: {message}")]
    InvalidContent { kind: NodeKind, message: String },

    #[error("Missing required attribute '{attr}' on node {kind}")]
    MissingAttribute { kind: NodeKind, attr: String },

    #[error("Mark '{mark}' is not allowed in node {kind}")]
    MarkNotAllowed { kind: NodeKind, mark: String },

    #[error("Empty text nodes are not allowed")]
    EmptyText,

    #[error("Invalid registry: {0}")]
    InvalidRegistry(String),
}

impl SchemaError {
    pub fn invalid_content(kind: NodeKind, message: impl Into<String>) -> Self {
        Self::InvalidContent {
            kind,
            message: message.into(),
        }
    }

    pub fn missing_attribute(kind: NodeKind, attr: impl Into<String>) -> Self {
        Self::MissingAttribute {
            kind,
            attr: attr.into(),
        }
    }
}
