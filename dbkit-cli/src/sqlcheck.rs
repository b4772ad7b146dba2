//! Regex classifier for read-only SQL statements

use once_cell::sync::Lazy;
use regex::Regex;

static FORBIDDEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(DROP|DELETE|INSERT|UPDATE|ALTER|CREATE|TRUNCATE)\b").unwrap()
});
static SELECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bSELECT\b").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Check whether a query is a SELECT with no mutating statements
pub fn is_select_only(query: &str) -> bool {
    let simplified = WHITESPACE.replace_all(query.trim(), " ");
    !FORBIDDEN.is_match(&simplified) && SELECT.is_match(&simplified)
}
