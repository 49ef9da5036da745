//! Response rendering for the classify endpoint.
//!
//! Bodies are pretty-printed with two-space indentation, except that every
//! two-integer array (entity positions) stays on one line as `[start,end]`.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    // Raw newlines never occur inside JSON strings, so this only sees structure
    static ref PRETTY_PAIR: Regex = Regex::new(r"\[\n\s*(\d+),\n\s*(\d+)\n\s*\]").unwrap();
}

/// Pretty JSON with compact integer pairs.
pub fn to_pretty_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let pretty = serde_json::to_string_pretty(value)?;
    Ok(PRETTY_PAIR.replace_all(&pretty, "[$1,$2]").into_owned())
}
