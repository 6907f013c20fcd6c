//! Small formatting helpers used by the views.

use chrono::{DateTime, Datelike, Local, NaiveDate};
use serde_json::{Map, Value};

use crate::composables::rules;

pub const DEFAULT_TRUNCATE: usize = 50;
pub const DEFAULT_DATE_FORMAT: &str = "DD/MM/YYYY";

/// Cut `text` to `length` characters and append `...` when it was longer.
pub fn truncate(text: &str, length: usize) -> String {
    if text.chars().count() <= length {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(length).collect();
    cut.push_str("...");
    cut
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

/// Format a ten digit number as `(123) 456-7890`. Anything else is returned
/// unchanged.
pub fn format_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != 10 {
        return phone.to_string();
    }
    format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..])
}

pub fn is_valid_email(email: &str) -> bool {
    rules::email_pattern().is_some_and(|pattern| pattern.is_match(email))
}

/// Render `date` through a `DD`/`MM`/`YYYY` template. Each token is
/// replaced once.
pub fn format_date(date: impl Datelike, format: &str) -> String {
    format
        .replacen("DD", &format!("{:02}", date.day()), 1)
        .replacen("MM", &format!("{:02}", date.month()), 1)
        .replacen("YYYY", &date.year().to_string(), 1)
}

/// Parse `raw` (RFC 3339 timestamp, shown in local time, or a plain
/// `YYYY-MM-DD` date) and format it. Empty or unparseable input gives an
/// empty string.
pub fn format_date_str(raw: &str, format: &str) -> String {
    let raw = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return format_date(timestamp.with_timezone(&Local), format);
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => format_date(date, format),
        Err(_) => String::new(),
    }
}

/// Drop the `null` members of a JSON object.
pub fn clean_object(object: Map<String, Value>) -> Map<String, Value> {
    object.into_iter().filter(|(_, value)| !value.is_null()).collect()
}

/// Format `amount` as currency with Spanish conventions: decimal comma, `.`
/// thousands separator from five integer digits up, and the symbol after a
/// non-breaking space (`1234,56 €`, `12.345,60 US$`).
pub fn format_currency(amount: f64, currency: &str) -> String {
    let symbol = match currency.to_ascii_uppercase().as_str() {
        "EUR" => "€".to_string(),
        "USD" => "US$".to_string(),
        "GBP" => "GB£".to_string(),
        "MXN" => "MXN".to_string(),
        other => other.to_string(),
    };

    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let int_part = if int_part.len() > 4 { group_thousands(int_part) } else { int_part.to_string() };
    let sign = if amount < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') { "-" } else { "" };

    format!("{sign}{int_part},{frac_part}\u{a0}{symbol}")
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    grouped
}
