//! The prefix completer: given a [`ParserState`], synthesizes the smallest
//! completion that turns the aggregated buffer into a valid JSON document.

use crate::state::{Container, ParserState};

/// Produce the full completed JSON document for `state`, or `None` if the
/// buffer is not yet completable (e.g. mid-key, mid-colon, or mid-literal).
///
/// This returns the *whole* document rather than a bare suffix: trailing
/// commas and dangling backslashes cannot be undone by pure concatenation,
/// so the completer works from a copy of `aggregated` and trims it before
/// appending closers.
pub fn completed_document(state: &ParserState) -> Option<String> {
    if state.inside_key_string {
        return None;
    }
    if state.just_saw_colon && !state.is_inside_string && !state.parsing_literal_or_number {
        return None;
    }
    if state.parsing_literal_or_number {
        return None;
    }

    let mut out = state.aggregated.clone();

    if state.is_inside_string {
        // inside_key_string is false here (checked above)
        if state.escape_pending {
            // a lone trailing backslash can't be completed literally; drop it
            out.pop();
        }
        out.push('"');
        close_containers(&mut out, &state.container_stack);
        return Some(out);
    }

    if state.last_char == Some(',') {
        out.pop();
    }
    close_containers(&mut out, &state.container_stack);
    Some(out)
}

fn close_containers(out: &mut String, stack: &[Container]) {
    for container in stack.iter().rev() {
        out.push(match container {
            Container::Object => '}',
            Container::Array => ']',
        });
    }
}
