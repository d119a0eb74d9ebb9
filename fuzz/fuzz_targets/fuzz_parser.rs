#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use schemastream::fuzzing::{completed_document, process_char};
use schemastream::ParserState;
use serde_json::{Map, Value};

#[derive(Debug)]
struct ArbitraryValue(Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let node_type = u.choose_index(21)?;
        let value = match node_type {
            0 => Value::Null,
            1 => Value::Bool(u.arbitrary()?),
            2 => {
                let n: f64 = u.arbitrary()?;
                Value::Number(
                    serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?,
                )
            }
            3..=10 => Value::String(u.arbitrary()?),
            11..=15 => {
                let elems: Vec<ArbitraryValue> = u.arbitrary()?;
                Value::Array(elems.into_iter().map(|v| v.0).collect())
            }
            16..=20 => {
                let m: Vec<(String, ArbitraryValue)> = u.arbitrary()?;
                Value::Object(Map::from_iter(m.into_iter().map(|(k, v)| (k, v.0))))
            }
            _ => Err(arbitrary::Error::IncorrectFormat)?,
        };
        Ok(ArbitraryValue(value))
    }
}

fn parser(data: &[u8]) {
    if data.len() < 4 {
        return;
    }

    let split_seed = u32::from_le_bytes(data[..4].try_into().unwrap()) as u64;
    let data = &data[4..];

    let Ok(value) = ArbitraryValue::arbitrary(&mut arbitrary::Unstructured::new(data)) else {
        return;
    };
    let serialized = serde_json::to_string(&value.0).expect("serde_json never fails on a Value");

    // Exercise the state machine and completer directly (below the schema
    // layer, which has no meaningful shape for fully arbitrary JSON): every
    // completable prefix must synthesize valid JSON (P1), and nothing may
    // panic.
    let mut state = ParserState::new();
    for chunk in split_into_safe_chunks(&serialized, split_seed) {
        for c in chunk.chars() {
            if process_char(&mut state, c).is_err() {
                return;
            }
        }
        if let Some(completion) = completed_document(&state) {
            serde_json::from_str::<Value>(&completion)
                .unwrap_or_else(|err| panic!("completer produced invalid JSON {completion:?}: {err}"));
        }
    }
}

fuzz_target!(|data: &[u8]| parser(data));

/// Split a UTF-8 `&str` into boundary-safe chunks using a deterministic
/// seed to pick split points.
///
/// * Each chunk is at least one byte.
/// * Every slice ends on a valid UTF-8 boundary, so it can't panic.
fn split_into_safe_chunks(serialized: &str, split_seed: u64) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let len = serialized.len();

    while start < len {
        let remaining = len - start;
        let mut size = (split_seed as usize % remaining) + 1;

        while start + size < len && !serialized.is_char_boundary(start + size) {
            size += 1;
        }

        chunks.push(&serialized[start..start + size]);
        start += size;
    }

    chunks
}
