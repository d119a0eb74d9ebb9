use thiserror::Error;

/// Raised synchronously from [`Schema::with_stream_defaults`](crate::Schema::with_stream_defaults)
/// when a required field cannot be given a usable streaming default.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("cannot default field `{path}`: {reason}")]
pub struct ModelBuildError {
    /// Dotted path of the offending field, e.g. `"address.city"`.
    pub path: String,
    /// Human-readable explanation of why no default could be produced.
    pub reason: String,
}

impl ModelBuildError {
    pub(crate) fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Raised from [`StreamingParser::parse_chunk`](crate::StreamingParser::parse_chunk)
/// whenever a chunk cannot be turned into an emission.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The character processor found the aggregated buffer was not a legal
    /// JSON prefix at the given byte offset.
    #[error("malformed JSON prefix at byte {offset}: {reason}")]
    MalformedPrefix {
        /// Byte offset into the aggregated buffer where the error was found.
        offset: usize,
        /// Description of the rule that was violated.
        reason: String,
    },

    /// The prefix completer produced a string that `serde_json` refused to
    /// decode.
    #[error("completed document failed to decode as JSON: {0}")]
    Decode(String),

    /// The decoded value did not conform to the defaulted schema.
    #[error("value at `{path}` does not satisfy the schema: {reason}")]
    SchemaMismatch {
        /// Dotted path of the offending field.
        path: String,
        /// Description of the mismatch.
        reason: String,
    },

    /// `parse_chunk` was called again after a previous call already raised
    /// an error.
    #[error("parser is poisoned by a previous error")]
    Poisoned,
}
