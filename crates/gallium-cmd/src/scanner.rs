//! Sticky string scanner.
//!
//! A [`Scanner`] holds a cursor into a string and advances it by matching
//! caller-supplied regular expressions at exactly the cursor position. The
//! caller hands [`Scanner::advance`] an ordered list of `(tag, pattern)`
//! alternatives; the first pattern that matches starting at the cursor wins
//! and the cursor moves past the full match. A pattern that would only match
//! further ahead loses - the scanner never searches forward.
//!
//! This is the tokenizing substrate for the whole-message parser in
//! [`crate::dispatcher`].

use regex::Regex;

/// One matched token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Tag of the pattern that matched.
    pub kind: &'static str,
    /// Cursor offset (in bytes) where the match started.
    pub position: usize,
    /// Capture group texts; index 0 is the whole match. Groups that did not
    /// participate in the match are empty strings.
    pub captures: Vec<String>,
}

impl Token {
    /// The whole matched text.
    pub fn text(&self) -> &str {
        &self.captures[0]
    }
}

/// Cursor-anchored tokenizer over a borrowed string.
#[derive(Debug)]
pub struct Scanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Create a scanner positioned at the start of `text`.
    pub fn new(text: &'a str) -> Self {
        Scanner { text, pos: 0 }
    }

    /// Current cursor offset in bytes.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// True once the cursor has reached the end of the input.
    pub fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// The unconsumed remainder of the input.
    pub fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    /// Advance the cursor by `n` bytes without matching, for tokens the
    /// caller recognized out of band. Clamped to the end of the input; `n`
    /// must land on a character boundary.
    pub fn skip(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.text.len());
    }

    /// Try each pattern in order; the first one that matches starting at
    /// exactly the current cursor produces a [`Token`] and advances the
    /// cursor past the whole match. Returns `None` when no candidate matches
    /// at the cursor.
    ///
    /// Patterns that can match the empty string will produce a token without
    /// advancing the cursor; callers using such patterns in a loop are
    /// responsible for their own termination.
    pub fn advance(&mut self, patterns: &[(&'static str, &Regex)]) -> Option<Token> {
        for (kind, pattern) in patterns {
            let Some(caps) = pattern.captures_at(self.text, self.pos) else {
                continue;
            };
            let whole = caps.get(0).expect("capture 0 always participates");
            if whole.start() != self.pos {
                // Matched further ahead; sticky semantics reject it.
                continue;
            }
            let captures = caps
                .iter()
                .map(|group| group.map_or_else(String::new, |m| m.as_str().to_owned()))
                .collect();
            let token = Token {
                kind,
                position: self.pos,
                captures,
            };
            self.pos = whole.end();
            return Some(token);
        }
        None
    }
}
