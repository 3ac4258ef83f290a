use std::net::SocketAddr;

use thiserror::Error;

/// Errors that can occur while running the control panel server
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Failed to bind to address
    #[error("Failed to bind to {addr}: {source}")]
    BindFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Server stopped with an I/O error
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for network operations
pub type NetworkResult<T> = Result<T, NetworkError>;
