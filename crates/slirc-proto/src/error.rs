//! Error types for the protocol library.
//!
//! Parsing never fails: a line that does not fit the grammar degrades to a
//! partial [`ParsedLine`](crate::ParsedLine). The only hard failures left are
//! those of the underlying I/O when the encoder is driven by a framed sink.

use thiserror::Error;

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: ProtocolError = io_err.into();
        assert_eq!(err.to_string(), "io error: pipe closed");
    }
}
