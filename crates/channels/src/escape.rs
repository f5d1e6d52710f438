//! Query-string escaping for outbound API calls.

use url::form_urlencoded::byte_serialize;

/// Escape `s` for use as a query value. Spaces become `+`.
pub fn query_escape(s: &str) -> String {
    byte_serialize(s.as_bytes()).collect()
}

/// Like [`query_escape`] but spaces become `%20`.
///
/// A literal `+` in the input is already escaped to `%2B`, so every `+` in
/// the escaped form stands for a space.
pub fn query_escape_percent_spaces(s: &str) -> String {
    query_escape(s).replace('+', "%20")
}
