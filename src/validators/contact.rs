//! Single-field validators for the public contact form.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::result::ValidationResult;

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$").unwrap();

    /// Letters from any script, spaces and apostrophes
    static ref FULL_NAME_REGEX: Regex = Regex::new(r"^[\p{L}\s'’]+$").unwrap();
}

pub const EMAIL_MAX_LEN: usize = 100;
pub const PHONE_MIN_DIGITS: usize = 10;
pub const PHONE_MAX_DIGITS: usize = 15;
pub const NAME_MIN_LEN: usize = 8;
pub const NAME_MAX_LEN: usize = 100;
pub const SUBJECT_MIN_LEN: usize = 6;
pub const SUBJECT_MAX_LEN: usize = 200;
pub const MESSAGE_MIN_LEN: usize = 20;
pub const MESSAGE_MAX_LEN: usize = 2000;

fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Structural email rule shared by the required and optional variants.
pub(crate) fn check_email_structure(email: &str) -> Result<(), &'static str> {
    if email.chars().any(char::is_whitespace) {
        return Err("L'email non può contenere spazi");
    }
    if char_len(email) > EMAIL_MAX_LEN {
        return Err("L'email non può superare 100 caratteri");
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err("Formato email non valido");
    }
    // no leading, trailing or doubled dots in either part
    let has_empty_label = email
        .split('@')
        .any(|part| part.split('.').any(str::is_empty));
    if has_empty_label {
        return Err("Formato email non valido");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> ValidationResult {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return ValidationResult::invalid_field("email", "L'email è obbligatoria");
    }
    match check_email_structure(trimmed) {
        Ok(()) => ValidationResult::ok(),
        Err(msg) => ValidationResult::invalid_field("email", msg),
    }
}

/// Optional email: blank means not provided; otherwise lower-cased and checked.
pub fn validate_email_optional(email: &str) -> ValidationResult {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return ValidationResult::ok();
    }
    let lowered = trimmed.to_lowercase();
    match check_email_structure(&lowered) {
        Ok(()) => ValidationResult::formatted(lowered),
        Err(msg) => ValidationResult::invalid_field("email", msg),
    }
}

pub fn validate_phone(phone: &str) -> ValidationResult {
    let trimmed = phone.trim();
    if trimmed.is_empty() {
        return ValidationResult::invalid_field("phone", "Il numero di telefono è obbligatorio");
    }

    let digits: String = trimmed
        .chars()
        .filter(|c| !matches!(c, '+' | '-' | ' '))
        .collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return ValidationResult::invalid_field(
            "phone",
            "Il numero di telefono può contenere solo cifre, spazi, + e -",
        );
    }
    if !(PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits.len()) {
        return ValidationResult::invalid_field(
            "phone",
            "Il numero di telefono deve contenere 10-15 cifre",
        );
    }
    ValidationResult::ok()
}

/// Full name as typed in the contact form (first and last name together).
pub fn validate_name(name: &str) -> ValidationResult {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return ValidationResult::invalid_field("name", "Il nome è obbligatorio");
    }
    let len = char_len(trimmed);
    if len < NAME_MIN_LEN {
        return ValidationResult::invalid_field(
            "name",
            "Il nome deve contenere almeno 8 caratteri",
        );
    }
    if len > NAME_MAX_LEN {
        return ValidationResult::invalid_field("name", "Il nome non può superare 100 caratteri");
    }
    if !FULL_NAME_REGEX.is_match(trimmed) {
        return ValidationResult::invalid_field(
            "name",
            "Il nome può contenere solo lettere, spazi e apostrofi",
        );
    }
    ValidationResult::ok()
}

pub fn validate_subject(subject: &str) -> ValidationResult {
    let trimmed = subject.trim();
    if trimmed.is_empty() {
        return ValidationResult::invalid_field("subject", "L'oggetto è obbligatorio");
    }
    let len = char_len(trimmed);
    if len < SUBJECT_MIN_LEN {
        return ValidationResult::invalid_field(
            "subject",
            "L'oggetto deve contenere almeno 6 caratteri",
        );
    }
    if len > SUBJECT_MAX_LEN {
        return ValidationResult::invalid_field(
            "subject",
            "L'oggetto non può superare 200 caratteri",
        );
    }
    ValidationResult::ok()
}

pub fn validate_message(message: &str) -> ValidationResult {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return ValidationResult::invalid_field("message", "Il messaggio è obbligatorio");
    }
    let len = char_len(trimmed);
    if len < MESSAGE_MIN_LEN {
        return ValidationResult::invalid_field(
            "message",
            "Il messaggio deve contenere almeno 20 caratteri",
        );
    }
    if len > MESSAGE_MAX_LEN {
        return ValidationResult::invalid_field(
            "message",
            "Il messaggio non può superare 2000 caratteri",
        );
    }
    ValidationResult::ok()
}
