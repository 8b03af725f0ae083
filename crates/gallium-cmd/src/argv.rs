//! Argument-vector tokenizer.
//!
//! [`decode`] splits a command line into a flat list of argument strings.
//! Tokens are separated by runs of whitespace; within a token, quoting
//! takes priority:
//!
//! 1. a span fenced by `"`, `'`, or a run of one-or-more backticks, closed
//!    by the next occurrence of the same delimiter (backtick count must
//!    match) - contents are taken verbatim, no escape processing;
//! 2. an angle-bracket span `<...>` whose inner text is a URL with a scheme -
//!    the brackets are stripped; if the inner text is not a URL the whole
//!    span including the brackets becomes one literal token;
//! 3. a plain run of non-whitespace characters.
//!
//! An unclosed quote or bracket is not an error; the opening character just
//! becomes part of a plain token. Tokenization never fails - at worst it
//! stops at the end of the input.

use url::Url;

/// Split a command line into argument strings.
pub fn decode(line: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut rest = line.trim_start();
    while !rest.is_empty() {
        let (token, after) = next_token(rest);
        out.push(token);
        rest = after.trim_start();
    }
    out
}

fn next_token(rest: &str) -> (String, &str) {
    match rest.chars().next() {
        Some(delim @ ('"' | '\'')) => {
            if let Some(span) = quoted_span(rest, delim) {
                return span;
            }
        }
        Some('`') => {
            if let Some(span) = fenced_span(rest) {
                return span;
            }
        }
        Some('<') => {
            if let Some(span) = angle_span(rest) {
                return span;
            }
        }
        _ => {}
    }
    bare_word(rest)
}

fn bare_word(rest: &str) -> (String, &str) {
    let end = rest
        .char_indices()
        .find(|(_, c)| c.is_whitespace())
        .map_or(rest.len(), |(i, _)| i);
    (rest[..end].to_owned(), &rest[end..])
}

/// Span fenced by a single quote character. The inner text must be at least
/// one character; an empty or unclosed quote falls back to a bare word.
fn quoted_span(rest: &str, delim: char) -> Option<(String, &str)> {
    let body = &rest[delim.len_utf8()..];
    let close = body.find(delim)?;
    if close == 0 {
        return None;
    }
    Some((body[..close].to_owned(), &body[close + delim.len_utf8()..]))
}

/// Span fenced by a run of backticks; the closing run must have the same
/// length as the opening one.
fn fenced_span(rest: &str) -> Option<(String, &str)> {
    let fence_len = rest.chars().take_while(|&c| c == '`').count();
    let fence = &rest[..fence_len];
    let body = &rest[fence_len..];
    let close = body.find(fence)?;
    if close == 0 {
        return None;
    }
    Some((body[..close].to_owned(), &body[close + fence_len..]))
}

/// `<...>` span. URLs lose the brackets; anything else keeps them and is
/// returned whole (even across spaces) as one literal token.
fn angle_span(rest: &str) -> Option<(String, &str)> {
    let body = &rest[1..];
    let close = body.find('>')?;
    let inner = &body[..close];
    let after = &body[close + 1..];
    if Url::parse(inner).is_ok() {
        Some((inner.to_owned(), after))
    } else {
        Some((rest[..close + 2].to_owned(), after))
    }
}
