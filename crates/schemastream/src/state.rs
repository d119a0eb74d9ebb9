//! The cursor record the character processor mutates one character at a
//! time. See [`crate::processor::process_char`].

/// A structural token currently open on the container stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// An open `{`.
    Object,
    /// An open `[`.
    Array,
}

/// Where the cursor sits in a JSON document seen so far.
///
/// # Invariants
///
/// - At most one of `is_inside_string` and `parsing_literal_or_number` is
///   `true`.
/// - `inside_key_string` implies `is_inside_string`.
/// - `recently_finished_key` and `just_saw_colon` are mutually exclusive.
/// - `expecting_key` is `true` iff the innermost container is an object and
///   the cursor is positioned where a key must start.
#[derive(Debug, Clone, Default)]
pub struct ParserState {
    /// The full accumulated input seen so far.
    pub aggregated: String,
    /// The most recent non-lookahead, non-whitespace character consumed.
    pub last_char: Option<char>,
    /// Currently between the quotes of a JSON string.
    pub is_inside_string: bool,
    /// The open string is an object key.
    pub inside_key_string: bool,
    /// The next non-whitespace token must open an object key.
    pub expecting_key: bool,
    /// Cursor is inside a numeric or `true`/`false`/`null` literal.
    pub parsing_literal_or_number: bool,
    /// The most recently processed non-whitespace token was `:`.
    pub just_saw_colon: bool,
    /// The most recently processed non-whitespace token was a key's closing
    /// quote.
    pub recently_finished_key: bool,
    /// Open containers, outermost first.
    pub container_stack: Vec<Container>,
    /// Tracks whether the previous character inside a string was an
    /// unescaped backslash, so that runs of backslashes toggle escape
    /// parity correctly instead of being read off `last_char` alone.
    pub(crate) escape_pending: bool,
    /// Set once the processor rejects a character; the parser must not be
    /// advanced further.
    pub(crate) poisoned: bool,
}

impl ParserState {
    /// A fresh state at the start of a document.
    pub fn new() -> Self {
        Self::default()
    }

    /// The document is syntactically complete: no open containers, no
    /// dangling string or literal, and not mid-key or mid-colon.
    pub fn is_closed(&self) -> bool {
        self.container_stack.is_empty()
            && !self.is_inside_string
            && !self.parsing_literal_or_number
            && !self.expecting_key
            && !self.just_saw_colon
            && !self.recently_finished_key
    }
}
