//! Error types for the network module.

/// Result type alias for network operations.
pub type Result<T> = std::result::Result<T, NetError>;

/// Errors that can occur while sourcing network state.
#[derive(Debug, thiserror::Error)]
pub enum NetError {
    /// The platform interface watcher could not be started.
    #[error("failed to watch network interfaces: {0}")]
    Watch(String),

    /// Interface enumeration failed.
    #[error("failed to enumerate network interfaces: {0}")]
    Enumerate(String),
}
