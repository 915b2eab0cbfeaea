//! Field validators shared by request DTOs and domain services

use once_cell::sync::Lazy;
use regex::Regex;

/// Exactly ten ASCII digits
static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{10}$").expect("Invalid phone regex")
});

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex")
});

/// Check if a string is not blank
pub fn not_empty(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Check a contact phone number: ten digits, nothing else
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

/// Basic email shape check
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email.trim())
}

/// Canonical form used for storage and comparison
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
