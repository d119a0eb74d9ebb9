//! The character processor: advances a [`ParserState`] by one character,
//! failing fast on a malformed prefix.

use crate::error::ValidationError;
use crate::state::{Container, ParserState};

/// Advance `state` by consuming `c`.
///
/// Appends `c` to `state.aggregated`, updates the flags per the transition
/// rules, then records `c` as `last_char` — except for whitespace outside a
/// string or literal, which is passed through transparently.
pub fn process_char(state: &mut ParserState, c: char) -> Result<(), ValidationError> {
    if state.poisoned {
        return Err(ValidationError::Poisoned);
    }

    let offset = state.aggregated.len();
    state.aggregated.push(c);

    match dispatch(state, c, offset) {
        Ok(touch_last_char) => {
            if touch_last_char {
                state.last_char = Some(c);
            }
            Ok(())
        }
        Err(err) => {
            state.poisoned = true;
            Err(err)
        }
    }
}

/// Returns whether `last_char` should be updated for this character.
fn dispatch(state: &mut ParserState, c: char, offset: usize) -> Result<bool, ValidationError> {
    if state.is_inside_string {
        process_string_char(state, c);
        return Ok(true);
    }

    if state.parsing_literal_or_number {
        if c == ',' || c == '}' || c == ']' || c.is_whitespace() {
            state.parsing_literal_or_number = false;
            return process_structural(state, c, offset);
        }
        return Ok(true);
    }

    process_structural(state, c, offset)
}

fn process_string_char(state: &mut ParserState, c: char) {
    if state.escape_pending {
        state.escape_pending = false;
        return;
    }
    if c == '\\' {
        state.escape_pending = true;
        return;
    }
    if c == '"' {
        if state.inside_key_string {
            state.inside_key_string = false;
            state.recently_finished_key = true;
        } else {
            state.is_inside_string = false;
        }
        return;
    }
    // ordinary string content, nothing else to track
}

fn process_structural(
    state: &mut ParserState,
    c: char,
    offset: usize,
) -> Result<bool, ValidationError> {
    if c.is_whitespace() {
        return Ok(false);
    }

    match c {
        '{' => {
            if !value_expected(state) {
                return Err(malformed(offset, "'{' is not valid where a value is not expected"));
            }
            state.container_stack.push(Container::Object);
            state.expecting_key = true;
            state.just_saw_colon = false;
            Ok(true)
        }
        '[' => {
            if !value_expected(state) {
                return Err(malformed(offset, "'[' is not valid where a value is not expected"));
            }
            state.container_stack.push(Container::Array);
            state.just_saw_colon = false;
            state.expecting_key = false;
            Ok(true)
        }
        '}' => {
            match state.container_stack.pop() {
                Some(Container::Object) => {}
                Some(other) => {
                    state.container_stack.push(other);
                    return Err(malformed(offset, "'}' does not match innermost container"));
                }
                None => return Err(malformed(offset, "'}' with no open container")),
            }
            state.just_saw_colon = false;
            state.expecting_key = false;
            state.recently_finished_key = false;
            Ok(true)
        }
        ']' => {
            match state.container_stack.pop() {
                Some(Container::Array) => {}
                Some(other) => {
                    state.container_stack.push(other);
                    return Err(malformed(offset, "']' does not match innermost container"));
                }
                None => return Err(malformed(offset, "']' with no open container")),
            }
            Ok(true)
        }
        '"' => {
            if state.expecting_key {
                state.inside_key_string = true;
                state.expecting_key = false;
            }
            state.is_inside_string = true;
            state.just_saw_colon = false;
            Ok(true)
        }
        ':' => {
            if !state.recently_finished_key {
                return Err(malformed(offset, "':' without a preceding key"));
            }
            state.recently_finished_key = false;
            state.just_saw_colon = true;
            Ok(true)
        }
        ',' => {
            state.just_saw_colon = false;
            if matches!(state.container_stack.last(), Some(Container::Object)) {
                state.expecting_key = true;
            }
            Ok(true)
        }
        _ => {
            // digit, '-', '+', '.', 't', 'f', 'n', or any other
            // literal-starting character
            state.parsing_literal_or_number = true;
            state.just_saw_colon = false;
            Ok(true)
        }
    }
}

/// A value (string, literal, object, or array) may legally begin here: at
/// the top of the document, right after a colon, or as an array element.
fn value_expected(state: &ParserState) -> bool {
    state.container_stack.is_empty()
        || state.just_saw_colon
        || matches!(state.container_stack.last(), Some(Container::Array))
}

fn malformed(offset: usize, reason: &str) -> ValidationError {
    ValidationError::MalformedPrefix {
        offset,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &str) -> ParserState {
        let mut state = ParserState::new();
        for c in input.chars() {
            process_char(&mut state, c).expect("valid prefix");
        }
        state
    }

    #[test]
    fn tracks_simple_object() {
        let state = run(r#"{"s":"abc"#);
        assert!(state.is_inside_string);
        assert!(!state.inside_key_string);
        assert_eq!(state.container_stack.len(), 1);
    }

    #[test]
    fn key_string_then_colon() {
        let state = run(r#"{"s""#);
        assert!(state.recently_finished_key);
        let state = run(r#"{"s":"#);
        assert!(state.just_saw_colon);
        assert!(!state.recently_finished_key);
    }

    #[test]
    fn rejects_close_brace_without_open() {
        let mut state = ParserState::new();
        assert!(process_char(&mut state, '}').is_err());
    }

    #[test]
    fn rejects_mismatched_close() {
        let mut state = ParserState::new();
        process_char(&mut state, '{').unwrap();
        assert!(process_char(&mut state, ']').is_err());
    }

    #[test]
    fn rejects_colon_without_key() {
        let mut state = ParserState::new();
        process_char(&mut state, '{').unwrap();
        assert!(process_char(&mut state, ':').is_err());
    }

    #[test]
    fn whitespace_does_not_disturb_flags() {
        let state = run("{\"k\" : ");
        assert!(state.just_saw_colon);
    }

    #[test]
    fn literal_terminates_on_comma() {
        let state = run(r#"{"a":1,"#);
        assert!(!state.parsing_literal_or_number);
        assert!(state.expecting_key);
    }

    #[test]
    fn nested_array_of_objects() {
        let state = run(r#"{"a":[{"b":1},{"#);
        assert_eq!(state.container_stack.len(), 3);
    }

    #[test]
    fn even_backslash_run_leaves_no_pending_escape() {
        // Four backslashes form two complete escaped pairs; nothing is
        // left dangling.
        let input = format!("{{\"k\":\"val{}", "\\".repeat(4));
        let state = run(&input);
        assert!(state.is_inside_string);
        assert!(!state.escape_pending);
    }

    #[test]
    fn odd_backslash_run_leaves_a_pending_escape() {
        // Three backslashes: one complete pair plus one dangling backslash
        // that will consume whatever character comes next.
        let input = format!("{{\"k\":\"val{}", "\\".repeat(3));
        let state = run(&input);
        assert!(state.is_inside_string);
        assert!(state.escape_pending);
    }

    #[test]
    fn escaped_quote_keeps_string_open() {
        let state = run(r#"{"k":"abc\""#);
        assert!(state.is_inside_string);
    }

    #[test]
    fn just_saw_colon_clears_at_the_start_of_a_literal() {
        // A literal value that begins right after a colon clears
        // `just_saw_colon` on its very first character, same as the other
        // value-starting arms, so trailing whitespace afterward doesn't
        // leave the flag stale.
        let state = run(r#"{"a":1"#);
        assert!(!state.just_saw_colon);
    }

    #[test]
    fn whitespace_after_a_literal_does_not_revive_just_saw_colon() {
        let state = run(r#"{"a": 1 "#);
        assert!(!state.just_saw_colon);
        assert!(!state.parsing_literal_or_number);
    }
}
