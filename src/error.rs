//! Error types for cidrdb.

use thiserror::Error;

/// Error type for cidrdb operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Dotted-quad parse failed
    #[error("invalid IPv4 address: {0}")]
    InvalidAddress(String),

    /// CIDR parse failed or prefix length out of [1, 32]
    #[error("invalid CIDR: {0}")]
    InvalidCidr(String),

    /// File open/read/write failed
    #[error("store I/O error: {0}")]
    StoreIo(#[from] std::io::Error),

    /// Record stream ended mid-record
    #[error("truncated record: expected {expected} bytes, got {actual}")]
    StoreCorrupt { expected: usize, actual: usize },
}

/// Result type alias for cidrdb operations.
pub type Result<T> = std::result::Result<T, Error>;
