//! A streaming, schema-directed JSON parser for incremental LLM output.
//!
//! Feed chunks of a JSON document as they arrive and, on every chunk
//! boundary, get back either a fully-typed partial snapshot of the document
//! or a delta describing only what changed since the previous emission.

#![deny(unsafe_op_in_unsafe_fn)]

mod completer;
mod delta;
mod error;
mod processor;
mod schema;
mod state;

pub mod parser;

pub use delta::{apply_delta, compute_delta};
pub use error::{ModelBuildError, ValidationError};
pub use parser::{Mode, StreamingParser};
pub use schema::{DefaultFactory, Field, FieldKind, Schema};
pub use state::{Container, ParserState};

/// Access to the character processor and prefix completer below the schema
/// layer, for fuzzing the state machine directly.
#[cfg(feature = "fuzzing")]
pub mod fuzzing {
    pub use crate::completer::completed_document;
    pub use crate::processor::process_char;
}
