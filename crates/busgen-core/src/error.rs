//! Error types for binding generation

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for generator operations
pub type GenResult<T> = Result<T, GenError>;

/// Error type for generator operations
#[derive(Error, Debug)]
pub enum GenError {
    /// The description could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The description is not well-formed XML
    #[error("malformed introspection document: {0}")]
    Xml(#[from] roxmltree::Error),

    /// A method argument carries a direction other than `in` or `out`
    #[error("invalid direction '{value}' on argument '{arg}' of method '{member}'")]
    InvalidDirection {
        member: String,
        arg: String,
        value: String,
    },

    /// A wire type signature has no host type
    #[error("invalid type signature '{signature}': {reason}")]
    InvalidSignature { signature: String, reason: String },

    /// The destination artifact could not be written
    #[error("unable to write file {}: {source}", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generator configuration could not be parsed
    #[error("configuration error: {0}")]
    Config(String),
}

impl GenError {
    /// Shorthand for an [`GenError::InvalidSignature`].
    pub fn invalid_signature(signature: &str, reason: impl Into<String>) -> Self {
        GenError::InvalidSignature {
            signature: signature.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<toml::de::Error> for GenError {
    fn from(err: toml::de::Error) -> Self {
        GenError::Config(err.to_string())
    }
}
