//! Error types for the grid engine.

use std::path::PathBuf;

/// Result type alias for grid operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the grid engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A page index beyond the current page count.
    #[error("page index {index} out of range: the grid has {count} page(s)")]
    PageOutOfRange { index: usize, count: usize },

    /// An item index beyond the current item count.
    #[error("item index {index} out of range: the grid has {count} item(s)")]
    ItemOutOfRange { index: usize, count: usize },

    /// A configuration value that fails validation.
    #[error("invalid value for '{field}': {message}")]
    InvalidConfig {
        field: &'static str,
        message: String,
    },

    /// File I/O error while reading a configuration file.
    #[error("failed to read config '{}': {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or schema error in a configuration document.
    #[error("failed to parse grid config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl Error {
    /// Create a page range error.
    pub fn page_out_of_range(index: usize, count: usize) -> Self {
        Self::PageOutOfRange { index, count }
    }

    /// Create an item range error.
    pub fn item_out_of_range(index: usize, count: usize) -> Self {
        Self::ItemOutOfRange { index, count }
    }

    /// Create a configuration validation error.
    pub fn invalid_config(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            message: message.into(),
        }
    }

    /// Create a configuration I/O error.
    pub fn config_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigIo {
            path: path.into(),
            source,
        }
    }
}
