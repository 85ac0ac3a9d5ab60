//! Syntactic checks for visitor contact details
//!
//! Email acceptance is syntax only: one local part, one `@`, a domain with a
//! dot-delimited final segment, and no whitespace. Deliverability is never
//! checked. Phone acceptance is an optional `+` followed by 10-14 digits.

use regex::Regex;
use std::sync::OnceLock;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^@ \t\r\n]+@[^@ \t\r\n]+\.[^@ \t\r\n]+$").expect("email pattern is valid")
    })
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\+?[0-9]{10,14}$").expect("phone pattern is valid"))
}

pub fn is_valid_email(text: &str) -> bool {
    email_pattern().is_match(text)
}

pub fn is_valid_phone(text: &str) -> bool {
    phone_pattern().is_match(text)
}

/// Case-insensitive "yes" to the phone opt-in question
pub fn is_affirmative(text: &str) -> bool {
    text.eq_ignore_ascii_case("yes")
}

/// Visitor asked for our contact details instead of giving a phone number
pub fn asks_for_contact(text: &str) -> bool {
    let lowered = text.to_lowercase();
    lowered.contains("contact") || lowered.contains("how to reach")
}
