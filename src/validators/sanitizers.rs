//! Text cleaning applied to user input before validation and hand-off.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::contact::ContactFormData;

lazy_static! {
    /// Opening, closing and self-closing tags, attributes included
    static ref HTML_TAG_PATTERN: Regex = Regex::new(r"<[^>]*>").unwrap();

    static ref MULTI_WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

const DANGEROUS_CHARS: [char; 4] = ['<', '>', '"', '\''];

/// Strips HTML tags and the characters `< > " '`, then trims.
///
/// Idempotent: the output contains no angle brackets, so a second pass is a no-op.
pub fn sanitize_input(raw: &str) -> String {
    let without_tags = HTML_TAG_PATTERN.replace_all(raw, "");
    without_tags
        .chars()
        .filter(|c| !DANGEROUS_CHARS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

pub fn normalize_whitespace(value: &str) -> String {
    MULTI_WHITESPACE.replace_all(value.trim(), " ").to_string()
}

/// Sanitizes every field of a contact form; `materia` stays absent when it was absent.
pub fn sanitize_contact_form(data: &ContactFormData) -> ContactFormData {
    ContactFormData {
        name: sanitize_input(&data.name),
        phone: sanitize_input(&data.phone),
        email: sanitize_input(&data.email),
        subject: sanitize_input(&data.subject),
        message: sanitize_input(&data.message),
        materia: data.materia.as_deref().map(sanitize_input),
    }
}
