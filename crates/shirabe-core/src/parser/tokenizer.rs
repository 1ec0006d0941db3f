//! # Tokenizer
//!
//! Splits a standardized release title into ordered, trimmed tokens.
//!
//! The scan is an explicit two-state machine: at every position the
//! delimiters are tried in priority order, and either one matches
//! (`AtDelimiter`) or the cursor moves one character forward (`InToken`).

/// A token extracted from a standardized title with positional information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The trimmed token text
    pub text: String,
    /// Byte offset of the first trimmed character in the standardized input
    pub start: usize,
    /// Byte offset one past the last trimmed character
    pub end: usize,
    /// Token index in the sequence
    pub index: usize,
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Delimiters in the order they are tried at each scan position.
///
/// There is no single-space delimiter, so `" - "` can never be fragmented.
pub const DELIMITERS: &[&str] = &["[", "]", " - ", "  "];

/// What the scanner sees at the current cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Ordinary character belonging to the pending span.
    InToken,
    /// A delimiter starts here.
    AtDelimiter(&'static str),
}

/// Tokenizer for standardized release titles.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer;

impl Tokenizer {
    /// Create a new tokenizer instance.
    pub fn new() -> Self {
        Self
    }

    /// Tokenize a standardized title into a sequence of tokens.
    ///
    /// Adjacent delimiters collapse; no emitted token is empty or
    /// whitespace-only, and tokens keep their order of appearance.
    ///
    /// # Examples
    /// ```
    /// use shirabe_core::parser::Tokenizer;
    ///
    /// let tokens = Tokenizer::new().tokenize("[Lilith-Raws] Mushoku Tensei - 11 [1080p]");
    /// let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
    /// assert_eq!(texts, ["Lilith-Raws", "Mushoku Tensei", "11", "1080p"]);
    /// ```
    pub fn tokenize(&self, input: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut start = 0;
        let mut cursor = 0;

        while cursor < input.len() {
            match Self::state_at(input, cursor) {
                ScanState::AtDelimiter(delimiter) => {
                    Self::flush(input, start, cursor, &mut tokens);
                    cursor += delimiter.len();
                    start = cursor;
                }
                ScanState::InToken => {
                    cursor += input[cursor..].chars().next().map_or(1, char::len_utf8);
                }
            }
        }

        Self::flush(input, start, input.len(), &mut tokens);
        tokens
    }

    /// Tokenize and keep only the token texts.
    pub fn texts(&self, input: &str) -> Vec<String> {
        self.tokenize(input).into_iter().map(|t| t.text).collect()
    }

    fn state_at(input: &str, cursor: usize) -> ScanState {
        let rest = &input[cursor..];
        DELIMITERS
            .iter()
            .find(|d| rest.starts_with(**d))
            .map_or(ScanState::InToken, |d| ScanState::AtDelimiter(*d))
    }

    /// Emits `input[start..end]` as a token if anything is left after trimming.
    fn flush(input: &str, start: usize, end: usize, tokens: &mut Vec<Token>) {
        let span = &input[start..end];
        let text = span.trim();
        if text.is_empty() {
            return;
        }

        let token_start = start + (span.len() - span.trim_start().len());
        let token_end = token_start + text.len();
        if let Some(prev) = tokens.last() {
            debug_assert!(
                prev.end <= token_start,
                "overlapping token spans: {}..{} and {token_start}..{token_end}",
                prev.start,
                prev.end
            );
        }

        tokens.push(Token {
            text: text.to_string(),
            start: token_start,
            end: token_end,
            index: tokens.len(),
        });
    }
}
