//! Demonstrates how to react **immediately** to content-moderation feedback
//! while incrementally streaming a tool-call response from an LLM.
//!
//! In this scenario we have prompted the assistant with a *tool
//! description* that yields a JSON object describing a code snippet the
//! model has generated for us. Besides the actual snippet the object
//! carries a `moderation` field so that the model (or an upstream service)
//! can flag policy violations early on.
//!
//! The schema looks roughly as follows (abridged):
//!
//! ```text
//! {
//!   "moderation": {
//!     "decision": "allow" | "block",
//!     "reason":   string | null
//!   },
//!   "filename":   string,
//!   "language":   string,
//!   "code":       string,
//! }
//! ```
//!
//! The example streams a single JSON document, feeding it to the parser in
//! small, irregular chunks to mirror how chat-completion APIs deliver
//! partial tokens, in delta mode so that `moderation.decision` and `code`
//! arrive as incremental suffixes:
//!
//! 1. As soon as the accumulated `moderation.decision` prefixes `"block"`
//!    we abort processing and surface an error to the caller — **before**
//!    the rest of the response has even arrived.
//! 2. Each fragment of the `code` field is printed to `stdout` as soon as
//!    it becomes available, so a UI could render the snippet
//!    character-by-character.
//!
//! Run with
//!
//! ```bash
//! cargo run -p schemastream --example llm_tool_call
//! ```

#![allow(clippy::needless_raw_string_hashes)]

use schemastream::{Field, FieldKind, Mode, Schema, StreamingParser};
use serde_json::Value;

fn moderation_schema() -> Schema {
    Schema::new()
        .field(Field::new("decision", FieldKind::String))
        .field(Field::new("reason", FieldKind::String).nullable())
}

fn tool_call_schema() -> Schema {
    Schema::new()
        .field(Field::new(
            "moderation",
            FieldKind::Nested(Box::new(moderation_schema())),
        ))
        .field(Field::new("filename", FieldKind::String))
        .field(Field::new("language", FieldKind::String))
        .field(Field::new("code", FieldKind::String))
}

fn main() {
    // A *toy* assistant response streamed in ten tiny chunks. The
    // `moderation` object comes first so backend code can decide early
    // whether to continue before the rest of the payload (including the
    // potentially large code snippet) arrives. In real life this would
    // come from the network.
    let simulated_stream: [&str; 10] = [
        r#"{"moderation":{"decision":"al"#,
        r#"lo"#,
        r#"w","reason":null},"#,
        r#""filename":"example.rs","#,
        r#""language":"rust","#,
        r#""code":"use schemastream::{StreamingParser, "#,
        r#"Schema};\nfn main() {\n"#,
        r#"    let _parser = StreamingParser::new(Schema::new(), Mode::Snapshot);\n"#,
        r#"    println!(\"Hello from schemastream!\");\n}\n"#,
        r#""}"#,
    ];

    let mut parser = StreamingParser::new(tool_call_schema(), Mode::Delta).unwrap();

    let mut decision_so_far = String::new();
    let mut code_complete = false;

    for chunk in simulated_stream {
        let Some(delta) = parser.parse_chunk(chunk).unwrap() else {
            continue;
        };

        if let Some(decision_delta) = decision_suffix(&delta) {
            decision_so_far.push_str(decision_delta);
            if decision_so_far.starts_with("block") {
                eprintln!("moderation blocked the content, aborting");
                return;
            }
        }

        if let Some(code_delta) = code_suffix(&delta) {
            print!("{code_delta}");
            code_complete = true;
        }
    }

    if !code_complete {
        eprintln!("stream ended before the code field appeared");
        return;
    }
    println!();

    println!(
        "final decision: {}",
        if decision_so_far.is_empty() {
            "allow"
        } else {
            decision_so_far.as_str()
        }
    );
}

fn decision_suffix(delta: &Value) -> Option<&str> {
    delta.get("moderation")?.get("decision")?.as_str()
}

fn code_suffix(delta: &Value) -> Option<&str> {
    delta.get("code")?.as_str()
}
