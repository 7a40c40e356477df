//! Board identifier extraction from pasted dashboard URLs.

use regex::Regex;

/// Extracts a board identifier from a Foreplay board URL, or accepts a bare identifier.
///
/// Returns `None` for input that is neither; callers treat that as invalid input.
///
/// ```
/// use boardscribe::extract_board_id;
///
/// assert_eq!(
///     extract_board_id("https://app.foreplay.co/boards/abc-123").as_deref(),
///     Some("abc-123")
/// );
/// assert_eq!(extract_board_id("abc-123").as_deref(), Some("abc-123"));
/// assert_eq!(extract_board_id("https://app.foreplay.co/"), None);
/// ```
pub fn extract_board_id(input: &str) -> Option<String> {
    let input = input.trim();
    let from_url = Regex::new(r"/boards/([a-zA-Z0-9_-]+)").ok()?;
    if let Some(id) = from_url.captures(input).and_then(|caps| caps.get(1)) {
        return Some(id.as_str().to_string());
    }

    let bare = Regex::new(r"^[a-zA-Z0-9_-]+$").ok()?;
    if bare.is_match(input) {
        return Some(input.to_string());
    }
    None
}
