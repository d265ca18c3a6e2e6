//! Name legalization, styling and collision resolution.
//!
//! Every emitted identifier goes through [`style`]: camel-case the raw
//! string, capitalize it, then [`legalize`] it. Collisions are resolved by
//! [`dedupe`] inside a [`registry::Scope`].
pub mod legalize;
pub mod registry;

use std::collections::HashSet;

use heck::ToLowerCamelCase;

pub use legalize::legalize;
pub use registry::{Names, Scope};

/// Prefix applied on each retry after a collision.
pub const RETRY_PREFIX: &str = "Other";

/// `legalize(capitalize(camelCase(raw)))`.
pub fn style(raw: &str) -> String {
    legalize(&capitalize(&raw.to_lower_camel_case()))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The "Other" retry: prefix and restyle.
pub fn other_prefixed(name: &str) -> String {
    style(&format!("{RETRY_PREFIX}{name}"))
}

/// Apply `retry` to `candidate` until it is not in `taken`.
pub fn dedupe(candidate: String, taken: &HashSet<String>, retry: impl Fn(&str) -> String) -> String {
    let mut name = candidate;
    while taken.contains(&name) {
        name = retry(&name);
    }
    name
}

/// Escape `raw` for a C# regular string literal (without the quotes).
pub fn csharp_string_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            ' '..='~' => out.push(c),
            _ => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{unit:04X}"));
                }
            }
        }
    }
    out
}
