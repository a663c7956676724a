//! Error types for building and rendering documents

use std::path::{Path, PathBuf};

use docweave_ooxml::OoxmlError;
use thiserror::Error;

/// A `{{type:name}}` tag whose body cannot be interpreted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagParseError {
    /// The tag body has no `:` between type and name
    #[error("tag '{{{{{0}}}}}' has no ':' between type and name")]
    MissingSeparator(String),

    /// A `header_<N>` type whose level is not 0-9
    #[error("tag type '{0}' is not header_0 to header_9")]
    InvalidHeadingLevel(String),
}

/// Errors that can occur while building or rendering a document
#[derive(Error, Debug)]
pub enum RenderError {
    /// Malformed tag in the source document
    #[error("Malformed tag: {0}")]
    TagParse(#[from] TagParseError),

    /// A tag names an entry the data mapping does not have
    #[error("No {kind} data named '{name}'")]
    MissingData {
        /// Tag type (`text`, `img`, `header`, `table`, `list`)
        kind: &'static str,
        /// Tag name that was looked up
        name: String,
    },

    /// Reading or writing a file failed
    #[error("IO error on {}: {source}", path.display())]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Error from the document backend
    #[error("Document error: {0}")]
    Ooxml(#[from] OoxmlError),

    /// Invalid `docweave.toml`
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// A data or outline file that cannot be deserialized
    #[error("Invalid data file {}: {message}", path.display())]
    Data {
        /// File involved
        path: PathBuf,
        /// Parser message
        message: String,
    },
}

impl RenderError {
    /// Attach the file path to a backend I/O failure
    pub(crate) fn at_path(path: &Path, err: OoxmlError) -> Self {
        match err {
            OoxmlError::Io(source) => RenderError::Io {
                path: path.to_path_buf(),
                source,
            },
            other => RenderError::Ooxml(other),
        }
    }
}

/// Result type for docweave operations
pub type Result<T> = std::result::Result<T, RenderError>;
