//! Server error types
//!
//! Only startup can fail fatally. Per-connection failures are logged inside
//! the connection task and never reach this type.

use std::net::SocketAddr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration file could not be read or deserialized
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// `PORT` is not a number in `0..=65535`
    #[error("invalid PORT '{value}': {reason}")]
    InvalidPort { value: String, reason: String },

    /// Host and port do not form a valid socket address
    #[error("invalid listen address '{addr}': {reason}")]
    InvalidAddress { addr: String, reason: String },

    /// The listening socket could not be bound
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
