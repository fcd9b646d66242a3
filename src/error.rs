//! Error types for loading, resolving, and capturing conversations

use std::path::PathBuf;

use thiserror::Error;

use crate::capture::CaptureError;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// An input file (conversation, variables, or batch data) could not be read
    #[error("Cannot read '{}': {source}", .path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The description text is not valid YAML or JSON
    #[error("Malformed conversation description: {message}")]
    MalformedDescription { message: String },

    /// Variable substitution produced values that no longer fit the
    /// description's shape
    #[error("Description is invalid after variable substitution: {message}")]
    MalformedTemplateResult { message: String },

    /// A structurally required part of the conversation is missing
    #[error("Invalid conversation: missing '{field}'")]
    InvalidConversation { field: String },

    /// The headless browser backend failed or is unavailable
    #[error(transparent)]
    Capture(#[from] CaptureError),

    /// Filesystem error while writing results
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn input_not_found(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::InputNotFound {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedDescription {
            message: message.into(),
        }
    }

    pub fn malformed_template_result(message: impl Into<String>) -> Self {
        Error::MalformedTemplateResult {
            message: message.into(),
        }
    }

    pub fn invalid_conversation(field: impl Into<String>) -> Self {
        Error::InvalidConversation {
            field: field.into(),
        }
    }
}
