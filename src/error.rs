//! Error types for the Hamming index and digest

use std::fmt;

/// Errors that can occur while parsing, constructing, or ingesting data
/// for the Hamming index or the streaming digest.
///
/// Set-membership operations (`Add`, `Remove`, `Contains`,
/// `ShortestDistance`) never produce an `IndexError`; they report
/// membership conditions through plain return values. Only parsing,
/// construction, and digest ingestion surface errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// A hex fingerprint string was malformed: odd length, a non-hex
    /// character, or a length that is not a positive multiple of 16.
    BadHex {
        /// Human-readable reason for the rejection
        reason: String,
    },

    /// `hash_size` is not a multiple of 64.
    BadHashSize {
        /// The rejected hash size, in bits
        hash_size: usize,
    },

    /// `max_distance + 1` exceeds 255, the maximum supported block count.
    TooManyBlocks {
        /// The rejected block count (`max_distance + 1`)
        blocks: usize,
    },

    /// A byte buffer had the wrong length for the requested conversion.
    BadInput {
        /// Expected length in bytes
        expected: usize,
        /// Actual length in bytes
        actual: usize,
    },

    /// The digest reader produced fewer than 5 bytes before EOF.
    StreamTooShort,

    /// The digest reader returned a non-EOF I/O error after the initial
    /// 5-byte bootstrap window was read.
    StreamRead(String),
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexError::BadHex { reason } => write!(f, "bad hex input: {}", reason),
            IndexError::BadHashSize { hash_size } => {
                write!(f, "hash_size {} is not a multiple of 64", hash_size)
            }
            IndexError::TooManyBlocks { blocks } => {
                write!(f, "{} blocks exceeds the maximum of 255", blocks)
            }
            IndexError::BadInput { expected, actual } => write!(
                f,
                "bad input length: expected {} bytes, got {}",
                expected, actual
            ),
            IndexError::StreamTooShort => {
                write!(f, "stream ended before the 5-byte bootstrap window was read")
            }
            IndexError::StreamRead(msg) => write!(f, "stream read error: {}", msg),
        }
    }
}

impl std::error::Error for IndexError {}

/// Result type alias for index and digest operations.
pub type Result<T> = std::result::Result<T, IndexError>;
