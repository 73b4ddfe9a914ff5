//! Log sanitization utilities
//!
//! Keeps provider response bodies and credentials from being written to
//! debug/error logs in full.

/// Maximum number of bytes of a body included in log output.
const TRUNCATE_LIMIT: usize = 256;

/// Number of trailing characters of a secret left visible.
const VISIBLE_SECRET_CHARS: usize = 4;

/// Largest char boundary at or below `index`.
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    (0..=index).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}

/// Truncate a response body for logging, noting the original length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// Mask a secret, keeping only its last few characters.
///
/// Short secrets are masked entirely.
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= VISIBLE_SECRET_CHARS * 2 {
        return "****".to_string();
    }
    let tail: String = secret.chars().skip(count - VISIBLE_SECRET_CHARS).collect();
    format!("****{tail}")
}
