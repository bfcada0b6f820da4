//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use std::sync::OnceLock;
use chrono::{DateTime, Utc};
use regex::Regex;

/// Format a timestamp the way record rows carry it
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+$").expect("email pattern is valid"))
}

/// Validate email format: `local@domain.tld` with no `@` inside the parts
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Quote a value for a CSV row when it contains separators, quotes or newlines
pub fn escape_csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Join values into one CSV line terminated by a newline
pub fn csv_line<S: AsRef<str>>(fields: &[S]) -> String {
    let mut line = fields
        .iter()
        .map(|field| escape_csv_field(field.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}
