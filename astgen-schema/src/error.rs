//! Error types for schema loading

use thiserror::Error;

/// Failure while loading the schema document. Any of these aborts the whole
/// run; a partial schema is never produced.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read schema file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse schema document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid schema entry `{node}`: {reason}")]
    InvalidEntry { node: String, reason: String },
}
