use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A field value would corrupt the line grammar (embedded `|` or newline).
    /// Raised before anything is written.
    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Email uniqueness is the caller's responsibility: the store never
    /// checks it on write. Callers pre-check with `find_account_by_email`
    /// and report a hit with this variant.
    #[error("Account already exists for {0}")]
    DuplicateAccount(String),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Failure to decode a single log line.
///
/// Parse errors are scoped to one line: scans log and skip the offending
/// line and keep going, so this type is kept separate from [`StoreError`]
/// rather than folded into it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line does not start with a bracketed timestamp")]
    MissingTimestamp,

    #[error("malformed timestamp: {0}")]
    BadTimestamp(String),

    #[error("missing tag separator")]
    MissingTag,

    #[error("unknown tag: {0}")]
    UnknownTag(String),

    #[error("{tag}: expected at least {expected} fields, got {got}")]
    FieldCount {
        tag: String,
        expected: usize,
        got: usize,
    },

    #[error("invalid {field} field: {value}")]
    InvalidField { field: &'static str, value: String },

    #[error("line is not valid UTF-8")]
    InvalidUtf8,
}

// Custom Error Types:
//
// Ledgerfile supports custom error types through the `#[from] anyhow::Error`
// variant. Any error implementing `std::error::Error + Send + Sync + 'static`
// can be converted to `StoreError::Other`.
//
// For better control, implement `From<YourError> for StoreError` directly.
