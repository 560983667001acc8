//! Error types for the serial line protocol.

/// Result type alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while framing serial lines.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// A line exceeded the codec's maximum length and was discarded.
    #[error("Line too long: {length} bytes exceeds maximum of {max}")]
    LineTooLong { length: usize, max: usize },

    /// A line was not valid UTF-8.
    #[error("Line is not valid UTF-8")]
    InvalidUtf8,

    /// Underlying transport failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
