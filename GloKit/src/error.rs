//! Error types for `GloKit`

use thiserror::Error;

/// The error type for `GloKit` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Binary Format Errors ====================
    /// The file is not a GLO file (header magic is not `GLO\0`).
    #[error("invalid GLO header: expected \"GLO\", found {0:?}")]
    InvalidGloMagic([u8; 4]),

    /// The GLO version is not supported.
    #[error("unsupported GLO version: {version:#06x} (supported: 0x0001)")]
    UnsupportedGloVersion {
        /// The version number found in the file.
        version: u16,
    },

    /// A `has_child`/`has_next` field holds something other than 0 or 1.
    #[error("invalid mesh link flag {value} at offset {offset:#x}")]
    InvalidLinkFlag {
        /// The raw flag value.
        value: u16,
        /// Byte offset of the flag.
        offset: usize,
    },

    /// Mesh `child`/`next` links nest deeper than the decoder allows.
    #[error("mesh hierarchy nested deeper than {limit} levels")]
    NestingTooDeep {
        /// The maximum nesting depth.
        limit: usize,
    },

    /// The input ended before a field or record could be read.
    #[error("truncated input: needed {needed} bytes at offset {offset:#x}, only {available} available")]
    TruncatedInput {
        /// Byte offset of the failed read.
        offset: usize,
        /// Bytes the read required.
        needed: usize,
        /// Bytes left in the buffer.
        available: usize,
    },

    /// Bytes remain after the last object was decoded.
    #[error("{remaining} trailing bytes after end of data at offset {offset:#x}")]
    TrailingData {
        /// Byte offset where decoding finished.
        offset: usize,
        /// Number of unread bytes.
        remaining: usize,
    },

    /// A sequence is too long for its 16-bit count field.
    #[error("too many {what}: {count} (maximum 65535)")]
    TooManyItems {
        /// What kind of item overflowed.
        what: &'static str,
        /// The number of items in the sequence.
        count: usize,
    },

    // ==================== Text Format Errors ====================
    /// Grammar or field-format mismatch in the text format.
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number of the offending token.
        line: usize,
        /// What was expected.
        message: String,
    },
}

/// The logical failure categories a caller can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Underlying storage failed.
    Io,
    /// Bad header or structurally invalid binary data.
    Format,
    /// Text grammar or field-format mismatch.
    Parse,
    /// Binary input ended early.
    Truncated,
}

impl Error {
    /// Shorthand for building a [`Error::Parse`].
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            message: message.into(),
        }
    }

    /// The logical category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::InvalidGloMagic(_)
            | Error::UnsupportedGloVersion { .. }
            | Error::InvalidLinkFlag { .. }
            | Error::NestingTooDeep { .. }
            | Error::TrailingData { .. }
            | Error::TooManyItems { .. } => ErrorKind::Format,
            Error::TruncatedInput { .. } => ErrorKind::Truncated,
            Error::Parse { .. } => ErrorKind::Parse,
        }
    }
}

/// A specialized Result type for `GloKit` operations.
pub type Result<T> = std::result::Result<T, Error>;
