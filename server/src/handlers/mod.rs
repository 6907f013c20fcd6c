//! Route handlers, one module per resource.

pub mod auth;
pub mod meta;
pub mod students;
pub mod users;

/// Read a record id the way a lenient integer parser does: surrounding
/// whitespace is ignored and parsing stops at the first non-digit, so `"12abc"`
/// is `12`. No leading digits means no id.
pub(crate) fn parse_id(raw: &str) -> Option<u64> {
    let trimmed = raw.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}
