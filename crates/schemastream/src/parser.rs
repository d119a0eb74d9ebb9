//! The top-level façade: accepts chunks, emits snapshots or deltas.

use serde_json::Value;

use crate::completer::completed_document;
use crate::delta::compute_delta;
use crate::error::{ModelBuildError, ValidationError};
use crate::processor::process_char;
use crate::schema::Schema;
use crate::state::ParserState;

/// Whether a parser emits full snapshots or minimal deltas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Every emission is the complete, typed document seen so far.
    #[default]
    Snapshot,
    /// Every emission contains only what changed since the previous one.
    Delta,
}

/// Accepts chunks of a JSON document and emits typed snapshots or deltas.
///
/// # Examples
///
/// ```
/// use schemastream::{Field, FieldKind, Mode, Schema, StreamingParser};
///
/// let schema = Schema::new().field(Field::new("s", FieldKind::String));
/// let mut parser = StreamingParser::new(schema, Mode::Snapshot).unwrap();
/// let snapshot = parser.parse_chunk(r#"{"s":"abc"#).unwrap().unwrap();
/// assert_eq!(snapshot, serde_json::json!({"s": "abc"}));
/// ```
pub struct StreamingParser {
    schema: Schema,
    defaulted_schema: Schema,
    mode: Mode,
    state: ParserState,
    previous: Option<Value>,
}

impl StreamingParser {
    /// Build a parser from a user schema. Runs the schema defaulter once;
    /// fails if any required field cannot be given a usable default.
    pub fn new(schema: Schema, mode: Mode) -> Result<Self, ModelBuildError> {
        let defaulted_schema = schema.with_stream_defaults()?;
        Ok(Self {
            schema,
            defaulted_schema,
            mode,
            state: ParserState::new(),
            previous: None,
        })
    }

    /// The original, pre-defaulting user schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The streaming-relaxed schema produced at construction.
    pub fn defaulted_schema(&self) -> &Schema {
        &self.defaulted_schema
    }

    /// The current parser state, mainly useful for debugging.
    pub fn state(&self) -> &ParserState {
        &self.state
    }

    /// Feed one chunk of input. Returns `Ok(None)` if the chunk did not
    /// make the buffer completable; otherwise the snapshot or delta for
    /// this parser's mode.
    pub fn parse_chunk(&mut self, chunk: &str) -> Result<Option<Value>, ValidationError> {
        if self.state.poisoned {
            return Err(ValidationError::Poisoned);
        }

        for c in chunk.chars() {
            process_char(&mut self.state, c)?;
        }

        let Some(completion) = completed_document(&self.state) else {
            return Ok(None);
        };

        let decoded: Value = serde_json::from_str(&completion).map_err(|err| {
            self.state.poisoned = true;
            ValidationError::Decode(err.to_string())
        })?;

        let snapshot = self.defaulted_schema.validate(&decoded, "").map_err(|err| {
            self.state.poisoned = true;
            err
        })?;

        match self.mode {
            Mode::Snapshot => Ok(Some(snapshot)),
            Mode::Delta => {
                let delta = compute_delta(self.previous.as_ref(), &snapshot);
                self.previous = Some(snapshot);
                Ok(Some(delta))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, FieldKind};
    use serde_json::json;

    fn user_schema() -> Schema {
        Schema::new()
            .field(Field::new("s", FieldKind::String))
            .field(Field::new("a", FieldKind::Number).stream_default(json!(0)))
            .field(Field::new("b", FieldKind::String))
    }

    #[test]
    fn snapshot_mode_returns_defaulted_partial() {
        let mut parser = StreamingParser::new(user_schema(), Mode::Snapshot).unwrap();
        let snapshot = parser.parse_chunk(r#"{"s":"abc"#).unwrap().unwrap();
        assert_eq!(snapshot, json!({"s": "abc", "a": 0, "b": ""}));
    }

    #[test]
    fn mid_literal_chunk_yields_no_emission() {
        let mut parser = StreamingParser::new(user_schema(), Mode::Snapshot).unwrap();
        assert_eq!(parser.parse_chunk(r#"{"a": tru"#).unwrap(), None);
    }

    #[test]
    fn delta_mode_emits_only_changes() {
        let mut parser = StreamingParser::new(user_schema(), Mode::Delta).unwrap();
        let first = parser.parse_chunk(r#"{"s":"abc"#).unwrap().unwrap();
        assert_eq!(first, json!({"s": "abc", "a": 0, "b": ""}));

        let second = parser
            .parse_chunk(r#"def","a":1,"b":"xyz"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(second, json!({"s": "def", "a": 1, "b": "xyz"}));
    }

    #[test]
    fn trailing_comma_is_completed_away() {
        let schema = Schema::new().field(Field::new("key", FieldKind::String));
        let mut parser = StreamingParser::new(schema, Mode::Snapshot).unwrap();
        let snapshot = parser
            .parse_chunk(r#"{"key":"value","#)
            .unwrap()
            .unwrap();
        assert_eq!(snapshot, json!({"key": "value"}));
    }

    #[test]
    fn trailing_whitespace_after_a_number_is_completed_away() {
        let schema = Schema::new().field(Field::new("a", FieldKind::Number).stream_default(json!(0)));
        let mut parser = StreamingParser::new(schema, Mode::Snapshot).unwrap();
        let snapshot = parser.parse_chunk(r#"{"a": 1 "#).unwrap().unwrap();
        assert_eq!(snapshot, json!({"a": 1}));
    }

    #[test]
    fn malformed_prefix_poisons_the_parser() {
        let mut parser = StreamingParser::new(user_schema(), Mode::Snapshot).unwrap();
        assert!(parser.parse_chunk("}").is_err());
        assert!(parser.parse_chunk("{}").is_err());
    }

    #[test]
    fn required_field_with_no_default_fails_at_construction() {
        let schema = Schema::new().field(Field::new("n", FieldKind::Number));
        assert!(StreamingParser::new(schema, Mode::Snapshot).is_err());
    }
}
