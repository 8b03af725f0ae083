//! Value converters.
//!
//! A converter is a pure `fn(&str) -> Result<ArgValue, String>` attached to a
//! parameter; it validates the raw token and produces the typed value bound
//! onto the invocation. The error string is shown to the user verbatim as a
//! bad-parameter message.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use crate::args::ArgValue;

/// Accept anything as text.
pub fn string(raw: &str) -> Result<ArgValue, String> {
    Ok(ArgValue::Str(raw.to_owned()))
}

/// A simple identifier: letters, digits, and dashes.
pub fn name(raw: &str) -> Result<ArgValue, String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^[-a-zA-Z0-9]+$").expect("static pattern"));
    if re.is_match(raw) {
        Ok(ArgValue::Str(raw.to_owned()))
    } else {
        Err("Not a valid name.".to_owned())
    }
}

/// A hex UUID in 8-4-4-4-12 form.
pub fn uuid(raw: &str) -> Result<ArgValue, String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
            .expect("static pattern")
    });
    if re.is_match(raw) {
        Ok(ArgValue::Str(raw.to_owned()))
    } else {
        Err("That's not a real UUID.".to_owned())
    }
}

/// A signed integer.
pub fn int(raw: &str) -> Result<ArgValue, String> {
    raw.parse::<i64>()
        .map(ArgValue::Int)
        .map_err(|_| "Must be an integer.".to_owned())
}

/// An absolute URL (scheme required).
pub fn url(raw: &str) -> Result<ArgValue, String> {
    Url::parse(raw)
        .map(ArgValue::Url)
        .map_err(|_| "That isn't a URL at all.".to_owned())
}
