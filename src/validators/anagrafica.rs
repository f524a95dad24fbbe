//! Italian personal-data validators used by the profile and guardian forms.
//!
//! Every validator trims its input, returns the first failure, and on success
//! puts the normalized value in `formatted_value` (title-cased names, upper-case
//! fiscal code and province, `+39` phone numbers, ISO dates).

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

use crate::config::get_config;
use crate::models::profile::Relationship;
use crate::models::result::ValidationResult;
use crate::utils::time;

lazy_static! {
    static ref NOME_REGEX: Regex = Regex::new(r"^[\p{L}\s'’\-]+$").unwrap();

    /// 6 letters, 2 digits, month letter, 2 digits, cadastral letter + 3 digits, check letter
    static ref CODICE_FISCALE_REGEX: Regex =
        Regex::new(r"^[A-Z]{6}[0-9]{2}[A-Z][0-9]{2}[A-Z][0-9]{3}[A-Z]$").unwrap();

    static ref PROVINCE_SET: HashSet<&'static str> = PROVINCE_CODES.iter().copied().collect();
}

pub const NOME_MIN_LEN: usize = 2;
pub const NOME_MAX_LEN: usize = 50;
pub const CAP_MIN: u32 = 10;
pub const CAP_MAX: u32 = 98168;
pub const CITTA_MIN_LEN: usize = 2;
pub const INDIRIZZO_MIN_LEN: usize = 5;
pub const ADULT_AGE: i32 = 18;

pub const PROVINCE_CODES: [&str; 110] = [
    "AG", "AL", "AN", "AO", "AR", "AP", "AT", "AV", "BA", "BT", "BL", "BN", "BG", "BI", "BO",
    "BZ", "BS", "BR", "CA", "CL", "CB", "CI", "CE", "CT", "CZ", "CH", "CO", "CS", "CR", "KR",
    "CN", "EN", "FM", "FE", "FI", "FG", "FC", "FR", "GE", "GO", "GR", "IM", "IS", "SP", "AQ",
    "LT", "LE", "LC", "LI", "LO", "LU", "MC", "MN", "MS", "MT", "VS", "ME", "MI", "MO", "MB",
    "NA", "NO", "NU", "OG", "OT", "OR", "PD", "PA", "PR", "PV", "PG", "PU", "PE", "PC", "PI",
    "PT", "PN", "PZ", "PO", "RG", "RA", "RC", "RE", "RI", "RN", "RM", "RO", "SA", "SS", "SV",
    "SI", "SR", "SO", "TA", "TE", "TR", "TO", "TP", "TN", "TV", "TS", "UD", "VA", "VE", "VB",
    "VC", "VR", "VV", "VI", "VT",
];

// Values for characters in odd (1st, 3rd, ...) positions, indexed by 0-9 then A-Z.
const CF_ODD_DIGITS: [u32; 10] = [1, 0, 5, 7, 9, 13, 15, 17, 19, 21];
const CF_ODD_LETTERS: [u32; 26] = [
    1, 0, 5, 7, 9, 13, 15, 17, 19, 21, 2, 4, 18, 20, 11, 3, 6, 8, 12, 14, 16, 10, 22, 25, 24, 23,
];

fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Upper-cases the first letter of every segment separated by spaces, apostrophes or hyphens.
fn title_case_name(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut boundary = true;
    for c in value.chars() {
        if boundary {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        boundary = matches!(c, ' ' | '\'' | '’' | '-');
    }
    out
}

/// Capitalizes each whitespace-separated word; digits pass through untouched.
fn title_case_words(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Given or family name, defaulting the field label to "nome".
pub fn validate_nome(value: &str) -> ValidationResult {
    validate_nome_field(value, "nome")
}

/// Given or family name; `field_name` is used both in the message and as the field key.
pub fn validate_nome_field(value: &str, field_name: &str) -> ValidationResult {
    let normalized = crate::validators::sanitizers::normalize_whitespace(value);
    if normalized.is_empty() {
        return ValidationResult::invalid_field(
            field_name,
            format!("Il {} è obbligatorio", field_name),
        );
    }
    let len = char_len(&normalized);
    if !(NOME_MIN_LEN..=NOME_MAX_LEN).contains(&len) {
        return ValidationResult::invalid_field(
            field_name,
            format!("Il {} deve contenere tra 2 e 50 caratteri", field_name),
        );
    }
    if !NOME_REGEX.is_match(&normalized) {
        return ValidationResult::invalid_field(
            field_name,
            format!(
                "Il {} può contenere solo lettere, spazi, apostrofi e trattini",
                field_name
            ),
        );
    }
    ValidationResult::formatted(title_case_name(&normalized))
}

/// Check letter for the first 15 characters of an upper-case fiscal code.
pub fn codice_fiscale_check_char(first15: &str) -> Option<char> {
    let mut sum = 0u32;
    for (idx, c) in first15.chars().take(15).enumerate() {
        let odd_position = idx % 2 == 0;
        let value = match c {
            '0'..='9' => {
                let d = c as usize - '0' as usize;
                if odd_position {
                    CF_ODD_DIGITS[d]
                } else {
                    d as u32
                }
            }
            'A'..='Z' => {
                let l = c as usize - 'A' as usize;
                if odd_position {
                    CF_ODD_LETTERS[l]
                } else {
                    l as u32
                }
            }
            _ => return None,
        };
        sum += value;
    }
    char::from_u32('A' as u32 + sum % 26)
}

pub fn validate_codice_fiscale(value: &str) -> ValidationResult {
    const FIELD: &str = "codiceFiscale";

    let normalized: String = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    if normalized.is_empty() {
        return ValidationResult::invalid_field(FIELD, "Il codice fiscale è obbligatorio");
    }
    if char_len(&normalized) != 16 {
        return ValidationResult::invalid_field(
            FIELD,
            "Il codice fiscale deve essere di 16 caratteri",
        );
    }
    if !CODICE_FISCALE_REGEX.is_match(&normalized) {
        return ValidationResult::invalid_field(FIELD, "Formato codice fiscale non valido");
    }

    let expected = codice_fiscale_check_char(&normalized[..15]);
    if expected != normalized.chars().nth(15) {
        return ValidationResult::invalid_field(
            FIELD,
            "Codice fiscale non valido: carattere di controllo errato",
        );
    }
    ValidationResult::formatted(normalized)
}

/// Italian phone number, normalized to `+39` followed by space-separated groups.
pub fn validate_telefono(value: &str) -> ValidationResult {
    const FIELD: &str = "telefono";

    let compact: String = value
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '/' | '(' | ')'))
        .collect();
    if compact.is_empty() {
        return ValidationResult::invalid_field(FIELD, "Il numero di telefono è obbligatorio");
    }

    let national = if let Some(rest) = compact.strip_prefix("+39") {
        rest
    } else if let Some(rest) = compact.strip_prefix("0039") {
        rest
    } else if compact.starts_with('+') || (compact.starts_with("00") && compact.len() > 11) {
        return ValidationResult::invalid_field(
            FIELD,
            "Sono accettati solo numeri italiani (+39)",
        );
    } else {
        compact.as_str()
    };

    if !national.chars().all(|c| c.is_ascii_digit()) {
        return ValidationResult::invalid_field(
            FIELD,
            "Il numero di telefono può contenere solo cifre",
        );
    }
    if !(9..=10).contains(&national.len()) {
        return ValidationResult::invalid_field(
            FIELD,
            "Il numero di telefono deve contenere 9-10 cifre",
        );
    }

    let formatted = format!(
        "+39 {} {} {}",
        &national[..3],
        &national[3..6],
        &national[6..]
    );
    ValidationResult::formatted(formatted)
}

/// Five-digit postal code inside the assigned Italian range.
pub fn validate_cap(value: &str) -> ValidationResult {
    const FIELD: &str = "cap";

    if value.trim().is_empty() {
        return ValidationResult::invalid_field(FIELD, "Il CAP è obbligatorio");
    }
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != 5 {
        return ValidationResult::invalid_field(FIELD, "Il CAP deve essere di 5 cifre");
    }
    match digits.parse::<u32>() {
        Ok(n) if (CAP_MIN..=CAP_MAX).contains(&n) => ValidationResult::formatted(digits),
        _ => ValidationResult::invalid_field(FIELD, "CAP non valido"),
    }
}

pub fn is_valid_provincia(code: &str) -> bool {
    PROVINCE_SET.contains(code)
}

pub fn validate_provincia(value: &str) -> ValidationResult {
    const FIELD: &str = "provincia";

    let code = value.trim().to_uppercase();
    if code.is_empty() {
        return ValidationResult::invalid_field(FIELD, "La provincia è obbligatoria");
    }
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return ValidationResult::invalid_field(FIELD, "La provincia deve essere di 2 lettere");
    }
    if !is_valid_provincia(&code) {
        return ValidationResult::invalid_field(FIELD, "Codice provincia non valido");
    }
    ValidationResult::formatted(code)
}

pub fn format_citta(value: &str) -> ValidationResult {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return ValidationResult::invalid_field("citta", "La città è obbligatoria");
    }
    if char_len(trimmed) < CITTA_MIN_LEN {
        return ValidationResult::invalid_field(
            "citta",
            "La città deve contenere almeno 2 caratteri",
        );
    }
    ValidationResult::formatted(title_case_words(trimmed))
}

pub fn format_indirizzo(value: &str) -> ValidationResult {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return ValidationResult::invalid_field("indirizzo", "L'indirizzo è obbligatorio");
    }
    if char_len(trimmed) < INDIRIZZO_MIN_LEN {
        return ValidationResult::invalid_field(
            "indirizzo",
            "L'indirizzo deve contenere almeno 5 caratteri",
        );
    }
    ValidationResult::formatted(title_case_words(trimmed))
}

/// A birth date as received: raw text from a form, or an already parsed date.
#[derive(Debug, Clone, Copy)]
pub enum BirthDate<'a> {
    Text(&'a str),
    Date(NaiveDate),
}

impl<'a> From<&'a str> for BirthDate<'a> {
    fn from(value: &'a str) -> Self {
        BirthDate::Text(value)
    }
}

impl<'a> From<&'a String> for BirthDate<'a> {
    fn from(value: &'a String) -> Self {
        BirthDate::Text(value.as_str())
    }
}

impl From<NaiveDate> for BirthDate<'_> {
    fn from(value: NaiveDate) -> Self {
        BirthDate::Date(value)
    }
}

pub fn validate_data_nascita<'a>(value: impl Into<BirthDate<'a>>) -> ValidationResult {
    validate_data_nascita_at(value, time::today())
}

/// Birth-date check against an explicit reference day.
pub fn validate_data_nascita_at<'a>(
    value: impl Into<BirthDate<'a>>,
    today: NaiveDate,
) -> ValidationResult {
    const FIELD: &str = "dataNascita";

    let date = match value.into() {
        BirthDate::Date(date) => date,
        BirthDate::Text(raw) if raw.trim().is_empty() => {
            return ValidationResult::invalid_field(FIELD, "La data di nascita è obbligatoria");
        }
        BirthDate::Text(raw) => match time::parse_date(raw) {
            Ok(date) => date,
            Err(_) => {
                return ValidationResult::invalid_field(FIELD, "Data di nascita non valida");
            }
        },
    };

    let config = get_config();
    let age = time::age_on(date, today);
    if age < config.min_student_age as i32 {
        return ValidationResult::invalid_field(
            FIELD,
            format!("L'età minima è {} anni", config.min_student_age),
        );
    }
    if age > config.max_student_age as i32 {
        return ValidationResult::invalid_field(
            FIELD,
            format!("L'età massima è {} anni", config.max_student_age),
        );
    }
    ValidationResult::formatted(date.format("%Y-%m-%d").to_string())
}

pub fn validate_relationship(value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return ValidationResult::invalid_field(
            "relationship",
            "Il tipo di relazione è obbligatorio",
        );
    }
    match value.parse::<Relationship>() {
        Ok(rel) => ValidationResult::formatted(rel.as_str()),
        Err(_) => ValidationResult::invalid_field("relationship", "Tipo di relazione non valido"),
    }
}

pub fn calculate_age(birth: NaiveDate) -> i32 {
    time::age_on(birth, time::today())
}

pub fn calculate_age_at(birth: NaiveDate, today: NaiveDate) -> i32 {
    time::age_on(birth, today)
}

pub fn is_minor(birth: NaiveDate) -> bool {
    calculate_age(birth) < ADULT_AGE
}

pub fn is_minor_at(birth: NaiveDate, today: NaiveDate) -> bool {
    calculate_age_at(birth, today) < ADULT_AGE
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[rstest]
    #[case("mario", "Mario")]
    #[case("d'amico", "D'Amico")]
    #[case("jean-pierre", "Jean-Pierre")]
    #[case("  DE   LUCA ", "De Luca")]
    #[case("niccolò", "Niccolò")]
    fn nome_is_title_cased(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(validate_nome(input).formatted_value.as_deref(), Some(expected));
    }

    #[test]
    fn nome_length_and_charset_errors_differ() {
        let short = validate_nome("a");
        let bad = validate_nome("Mario3");
        assert!(!short.valid && !bad.valid);
        assert_ne!(short.error, bad.error);
        assert_eq!(
            short.error.as_deref(),
            Some("Il nome deve contenere tra 2 e 50 caratteri")
        );
    }

    #[test]
    fn nome_uses_custom_field_name() {
        let result = validate_nome_field("", "cognome");
        assert_eq!(result.error.as_deref(), Some("Il cognome è obbligatorio"));
        assert_eq!(result.field.as_deref(), Some("cognome"));
    }

    #[test]
    fn codice_fiscale_valid_examples() {
        for cf in ["RSSMRA80A01H501U", "VRDGPP80A01F205X", "RSSMRA85M01H501Q"] {
            let result = validate_codice_fiscale(cf);
            assert!(result.valid, "{cf}: {:?}", result.error);
            assert_eq!(result.formatted_value.as_deref(), Some(cf));
        }
    }

    #[test]
    fn codice_fiscale_is_normalized() {
        let result = validate_codice_fiscale(" rssmra80a01 h501u ");
        assert_eq!(result.formatted_value.as_deref(), Some("RSSMRA80A01H501U"));
    }

    #[test]
    fn codice_fiscale_check_digit_error_is_distinct() {
        let checksum = validate_codice_fiscale("RSSMRA85M01H501A");
        let structure = validate_codice_fiscale("RSSMRA8AM01H501Q");
        let length = validate_codice_fiscale("RSSMRA85M01H501");
        assert_eq!(
            checksum.error.as_deref(),
            Some("Codice fiscale non valido: carattere di controllo errato")
        );
        assert_eq!(structure.error.as_deref(), Some("Formato codice fiscale non valido"));
        assert_eq!(
            length.error.as_deref(),
            Some("Il codice fiscale deve essere di 16 caratteri")
        );
    }

    #[test]
    fn check_char_matches_known_codes() {
        assert_eq!(codice_fiscale_check_char("RSSMRA80A01H501"), Some('U'));
        assert_eq!(codice_fiscale_check_char("RSSMRA85M01H501"), Some('Q'));
        assert_eq!(codice_fiscale_check_char("rssmra85m01h501"), None);
    }

    #[rstest]
    #[case("3401234567", "+39 340 123 4567")]
    #[case("+39 340 123 4567", "+39 340 123 4567")]
    #[case("0039 340-123-4567", "+39 340 123 4567")]
    #[case("061234567", "+39 061 234 567")]
    #[case("(06) 1234.5678", "+39 061 234 5678")]
    fn telefono_is_prefixed(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(validate_telefono(input).formatted_value.as_deref(), Some(expected));
    }

    #[rstest]
    #[case("", "Il numero di telefono è obbligatorio")]
    #[case("12345678", "Il numero di telefono deve contenere 9-10 cifre")]
    #[case("+39 34012345678", "Il numero di telefono deve contenere 9-10 cifre")]
    #[case("340abc4567", "Il numero di telefono può contenere solo cifre")]
    #[case("+44 20 7946 0958", "Sono accettati solo numeri italiani (+39)")]
    fn telefono_rejections(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(validate_telefono(input).error.as_deref(), Some(expected));
    }

    #[test]
    fn cap_range() {
        assert_eq!(validate_cap("00100").formatted_value.as_deref(), Some("00100"));
        assert!(validate_cap("20121").valid);
        assert_eq!(validate_cap("99999").error.as_deref(), Some("CAP non valido"));
        assert_eq!(validate_cap("00005").error.as_deref(), Some("CAP non valido"));
        assert_eq!(validate_cap("1234").error.as_deref(), Some("Il CAP deve essere di 5 cifre"));
        assert_eq!(validate_cap(" ").error.as_deref(), Some("Il CAP è obbligatorio"));
    }

    #[test]
    fn provincia_set_and_errors() {
        assert_eq!(PROVINCE_SET.len(), 110);
        assert_eq!(validate_provincia(" rm ").formatted_value.as_deref(), Some("RM"));
        assert_eq!(
            validate_provincia("ROM").error.as_deref(),
            Some("La provincia deve essere di 2 lettere")
        );
        assert_eq!(
            validate_provincia("XX").error.as_deref(),
            Some("Codice provincia non valido")
        );
    }

    #[test]
    fn citta_and_indirizzo_are_title_cased() {
        assert_eq!(
            format_citta("  reggio   emilia ").formatted_value.as_deref(),
            Some("Reggio Emilia")
        );
        assert_eq!(
            format_indirizzo("via ROMA 10/b").formatted_value.as_deref(),
            Some("Via Roma 10/b")
        );
        assert!(!format_citta("A").valid);
        assert!(!format_indirizzo("via").valid);
        assert!(!format_indirizzo("  ").valid);
    }

    #[test]
    fn data_nascita_age_window() {
        let today = d(2025, 6, 1);
        assert_eq!(
            validate_data_nascita_at("2000-01-31", today).formatted_value.as_deref(),
            Some("2000-01-31")
        );
        assert_eq!(
            validate_data_nascita_at("2012-01-01", today).error.as_deref(),
            Some("L'età minima è 14 anni")
        );
        assert_eq!(
            validate_data_nascita_at("1900-01-01", today).error.as_deref(),
            Some("L'età massima è 100 anni")
        );
        assert_eq!(
            validate_data_nascita_at("31/01/2000", today).error.as_deref(),
            Some("Data di nascita non valida")
        );
        assert_eq!(
            validate_data_nascita_at("", today).error.as_deref(),
            Some("La data di nascita è obbligatoria")
        );
        assert!(validate_data_nascita_at(d(2011, 6, 1), today).valid);
        assert!(!validate_data_nascita_at(d(2011, 6, 2), today).valid);
    }

    #[test]
    fn data_nascita_timestamp_keeps_local_day() {
        let today = d(2025, 6, 1);
        assert_eq!(
            validate_data_nascita_at("2000-05-15T00:00:00+02:00", today)
                .formatted_value
                .as_deref(),
            Some("2000-05-15")
        );
        // read in UTC this would be 1924-06-01, one day past the age limit
        assert!(validate_data_nascita_at("1924-06-02T00:30:00+02:00", today).valid);
    }

    #[test]
    fn relationship_set() {
        assert_eq!(
            validate_relationship("tutore_legale").formatted_value.as_deref(),
            Some("TUTORE_LEGALE")
        );
        assert!(validate_relationship("MADRE").valid);
        assert_eq!(
            validate_relationship("NONNO").error.as_deref(),
            Some("Tipo di relazione non valido")
        );
    }

    #[test]
    fn minor_boundary() {
        let today = d(2025, 6, 1);
        assert_eq!(calculate_age_at(d(2007, 6, 2), today), 17);
        assert!(is_minor_at(d(2007, 6, 2), today));
        assert_eq!(calculate_age_at(d(2007, 6, 1), today), 18);
        assert!(!is_minor_at(d(2007, 6, 1), today));
    }
}
