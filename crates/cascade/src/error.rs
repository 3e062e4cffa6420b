//! errors surfaced by resolution
//!
//! Every variant is terminal for the call that produced it. Nothing in this crate retries.

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The requested document, or a document named as a parent, does not exist
    #[error("document not found: {0}")]
    NotFound(String),

    /// The inheritance graph reachable from the request contains a cycle through this document
    #[error("circular dependency detected in document inheritance: {0}")]
    CircularDependency(String),

    /// Document content could not be turned into a mapping
    #[error("invalid document {name}: {detail}")]
    Validation { name: String, detail: String },

    /// Inheritance nests deeper than the configured limit
    #[error("inheritance of {name} is nested deeper than {limit} levels")]
    TooDeep { name: String, limit: usize },

    #[error("unable to read document {name}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to list documents")]
    List(#[source] std::io::Error),
}

impl Error {
    pub(crate) fn validation(name: impl Into<String>, detail: impl ToString) -> Self {
        Self::Validation {
            name: name.into(),
            detail: detail.to_string(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
