//! Identifier derivation
//!
//! Harness resources are addressed by an identifier that is derived from the
//! human readable name the user supplies on the command line.

use super::error::ApiError;
use std::collections::BTreeMap;

/// Maximum identifier length accepted by the API
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// Derive an API identifier from a display name.
///
/// One leading ASCII digit is dropped, then one leading `$`. Spaces and dashes
/// both become `_` and the result is lowercased and capped at
/// [`MAX_IDENTIFIER_LEN`] characters. The remote API may normalize further,
/// so the identifier it echoes back is the authoritative one.
pub fn derive_identifier(name: &str) -> Result<String, ApiError> {
    let mut rest = name;

    match rest.chars().next() {
        None => {
            return Err(ApiError::InvalidArgument(
                "name must not be empty".to_string(),
            ))
        }
        Some(c) if c.is_ascii_digit() => rest = &rest[c.len_utf8()..],
        Some(_) => {}
    }

    let rest = rest.strip_prefix('$').unwrap_or(rest);

    let identifier = rest
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            other => other,
        })
        .flat_map(char::to_lowercase)
        .take(MAX_IDENTIFIER_LEN)
        .collect();

    Ok(identifier)
}

/// Parse `key:value` tag flags into a map.
///
/// Empty entries are skipped. Only the first `:` separates key from value.
pub fn parse_tags<S: AsRef<str>>(tags: &[S]) -> Result<BTreeMap<String, String>, ApiError> {
    let mut map = BTreeMap::new();
    for tag in tags.iter().map(AsRef::as_ref).filter(|t| !t.is_empty()) {
        let (key, value) = tag.split_once(':').ok_or_else(|| {
            ApiError::InvalidArgument(format!(
                "tag '{}' should be of format 'key:value'",
                tag
            ))
        })?;
        map.insert(key.to_string(), value.to_string());
    }
    Ok(map)
}
