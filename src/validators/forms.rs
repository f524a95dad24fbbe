//! Whole-form validators.
//!
//! The contact form is fail-fast: it reports the first failing field only.
//! The profile and guardian forms run every field and return all failures at
//! once, keyed by field name, so the UI can mark every invalid input.

use chrono::NaiveDate;

use crate::models::contact::ContactFormData;
use crate::models::profile::{
    ParentGuardianFormData, ParentGuardianValues, ProfileFormData, ProfileFormValues,
    Relationship,
};
use crate::models::result::{FieldErrors, FormResult, ValidationResult};
use crate::utils::time;
use crate::validators::anagrafica::{
    format_citta, format_indirizzo, validate_cap, validate_codice_fiscale,
    validate_data_nascita_at, validate_nome_field, validate_provincia, validate_relationship,
    validate_telefono,
};
use crate::validators::contact::{
    validate_email, validate_email_optional, validate_message, validate_name, validate_phone,
    validate_subject,
};

pub const MATERIA_MIN_LEN: usize = 2;

pub fn validate_contact_form(data: &ContactFormData) -> ValidationResult {
    if data
        .required_fields()
        .iter()
        .any(|(_, value)| value.trim().is_empty())
    {
        tracing::debug!("contact form rejected: missing required fields");
        return ValidationResult::invalid("Tutti i campi obbligatori devono essere compilati");
    }

    let checks = [
        validate_name(&data.name),
        validate_email(&data.email),
        validate_phone(&data.phone),
        validate_subject(&data.subject),
        validate_message(&data.message),
    ];
    if let Some(failure) = checks.into_iter().find(|r| !r.valid) {
        tracing::debug!(field = ?failure.field, "contact form rejected");
        return failure;
    }

    if let Some(materia) = data.materia.as_deref().map(str::trim) {
        if !materia.is_empty() && materia.chars().count() < MATERIA_MIN_LEN {
            tracing::debug!(field = "materia", "contact form rejected");
            return ValidationResult::invalid_field(
                "materia",
                "La materia deve contenere almeno 2 caratteri",
            );
        }
    }

    tracing::trace!("contact form accepted");
    ValidationResult::ok()
}

/// Records a failure under `key` and hands back the formatted value on success.
fn take(errors: &mut FieldErrors, key: &str, result: ValidationResult) -> Option<String> {
    if result.valid {
        result.formatted_value
    } else {
        errors.insert(key.to_string(), result.error.unwrap_or_default());
        None
    }
}

/// Optional field: blank means absent, otherwise the same rule as the required variant.
fn take_optional(
    errors: &mut FieldErrors,
    key: &str,
    value: Option<&str>,
    validate: fn(&str) -> ValidationResult,
) -> Option<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => take(errors, key, validate(v)),
        _ => None,
    }
}

pub fn validate_profile_form(data: &ProfileFormData) -> FormResult<ProfileFormValues> {
    validate_profile_form_at(data, time::today())
}

pub fn validate_profile_form_at(
    data: &ProfileFormData,
    today: NaiveDate,
) -> FormResult<ProfileFormValues> {
    let mut errors = FieldErrors::new();

    let nome = take(&mut errors, "nome", validate_nome_field(&data.nome, "nome"));
    let cognome = take(
        &mut errors,
        "cognome",
        validate_nome_field(&data.cognome, "cognome"),
    );
    let codice_fiscale = take(
        &mut errors,
        "codiceFiscale",
        validate_codice_fiscale(&data.codice_fiscale),
    );
    let data_nascita = take(
        &mut errors,
        "dataNascita",
        validate_data_nascita_at(&data.data_nascita, today),
    )
    .and_then(|iso| time::parse_date(&iso).ok());
    let telefono = take(&mut errors, "telefono", validate_telefono(&data.telefono));
    let indirizzo = take(&mut errors, "indirizzo", format_indirizzo(&data.indirizzo));
    let citta = take(&mut errors, "citta", format_citta(&data.citta));
    let provincia = take(&mut errors, "provincia", validate_provincia(&data.provincia));
    let cap = take(&mut errors, "cap", validate_cap(&data.cap));

    match (
        nome,
        cognome,
        codice_fiscale,
        data_nascita,
        telefono,
        indirizzo,
        citta,
        provincia,
        cap,
    ) {
        (
            Some(nome),
            Some(cognome),
            Some(codice_fiscale),
            Some(data_nascita),
            Some(telefono),
            Some(indirizzo),
            Some(citta),
            Some(provincia),
            Some(cap),
        ) if errors.is_empty() => {
            tracing::trace!("profile form accepted");
            Ok(ProfileFormValues {
                nome,
                cognome,
                codice_fiscale,
                data_nascita,
                telefono,
                indirizzo,
                citta,
                provincia,
                cap,
            })
        }
        _ => {
            tracing::debug!(
                errors = errors.len(),
                fields = ?errors.keys().collect::<Vec<_>>(),
                "profile form rejected"
            );
            Err(errors)
        }
    }
}

pub fn validate_parent_guardian_form(
    data: &ParentGuardianFormData,
) -> FormResult<ParentGuardianValues> {
    let mut errors = FieldErrors::new();

    let relationship = take(
        &mut errors,
        "relationship",
        validate_relationship(&data.relationship),
    )
    .and_then(|r| r.parse::<Relationship>().ok());
    let nome = take(&mut errors, "nome", validate_nome_field(&data.nome, "nome"));
    let cognome = take(
        &mut errors,
        "cognome",
        validate_nome_field(&data.cognome, "cognome"),
    );
    let codice_fiscale = take(
        &mut errors,
        "codiceFiscale",
        validate_codice_fiscale(&data.codice_fiscale),
    );
    let telefono = take(&mut errors, "telefono", validate_telefono(&data.telefono));

    let email = take(
        &mut errors,
        "email",
        validate_email_optional(data.email.as_deref().unwrap_or_default()),
    );
    let indirizzo = take_optional(
        &mut errors,
        "indirizzo",
        data.indirizzo.as_deref(),
        format_indirizzo,
    );
    let citta = take_optional(&mut errors, "citta", data.citta.as_deref(), format_citta);
    let provincia = take_optional(
        &mut errors,
        "provincia",
        data.provincia.as_deref(),
        validate_provincia,
    );
    let cap = take_optional(&mut errors, "cap", data.cap.as_deref(), validate_cap);

    match (relationship, nome, cognome, codice_fiscale, telefono) {
        (Some(relationship), Some(nome), Some(cognome), Some(codice_fiscale), Some(telefono))
            if errors.is_empty() =>
        {
            tracing::trace!("parent/guardian form accepted");
            Ok(ParentGuardianValues {
                relationship,
                nome,
                cognome,
                codice_fiscale,
                telefono,
                email,
                indirizzo,
                citta,
                provincia,
                cap,
            })
        }
        _ => {
            tracing::debug!(
                errors = errors.len(),
                fields = ?errors.keys().collect::<Vec<_>>(),
                "parent/guardian form rejected"
            );
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> ContactFormData {
        ContactFormData {
            name: "Mario Rossi".to_string(),
            phone: "3401234567".to_string(),
            email: "mario.rossi@example.com".to_string(),
            subject: "Informazioni corso".to_string(),
            message: "Vorrei sapere quando inizia il corso.".to_string(),
            materia: None,
        }
    }

    #[test]
    fn contact_form_accepts_complete_data() {
        assert_eq!(validate_contact_form(&contact()), ValidationResult::ok());
    }

    #[test]
    fn contact_form_logs_acceptance_at_trace() {
        let logs = crate::utils::validation::capture_logs(|| {
            assert!(validate_contact_form(&contact()).valid);
        });
        assert!(logs.contains("TRACE"), "{logs}");
        assert!(logs.contains("contact form accepted"), "{logs}");
    }

    #[test]
    fn contact_form_short_circuits_on_missing_field() {
        let data = ContactFormData {
            subject: "  ".to_string(),
            email: "not-an-email".to_string(),
            ..contact()
        };
        let result = validate_contact_form(&data);
        assert_eq!(
            result.error.as_deref(),
            Some("Tutti i campi obbligatori devono essere compilati")
        );
        assert_eq!(result.field, None);
    }

    #[test]
    fn contact_form_reports_first_failure_in_order() {
        let data = ContactFormData {
            email: "mario@".to_string(),
            phone: "12".to_string(),
            ..contact()
        };
        let result = validate_contact_form(&data);
        assert_eq!(result.field.as_deref(), Some("email"));
    }

    #[test]
    fn contact_form_checks_materia_only_when_present() {
        let short = ContactFormData {
            materia: Some("B".to_string()),
            ..contact()
        };
        let result = validate_contact_form(&short);
        assert_eq!(result.field.as_deref(), Some("materia"));
        assert_eq!(
            result.error.as_deref(),
            Some("La materia deve contenere almeno 2 caratteri")
        );

        let ok = ContactFormData {
            materia: Some("Biologia".to_string()),
            ..contact()
        };
        assert!(validate_contact_form(&ok).valid);
    }

    #[test]
    fn parent_form_treats_blank_optionals_as_absent() {
        let data = ParentGuardianFormData {
            relationship: "MADRE".to_string(),
            nome: "anna".to_string(),
            cognome: "bianchi".to_string(),
            codice_fiscale: "VRDGPP80A01F205X".to_string(),
            telefono: "3331234567".to_string(),
            email: Some("  ".to_string()),
            indirizzo: None,
            citta: Some("".to_string()),
            provincia: None,
            cap: None,
        };
        let values = validate_parent_guardian_form(&data).unwrap();
        assert_eq!(values.relationship, Relationship::Madre);
        assert_eq!(values.nome, "Anna");
        assert_eq!(values.email, None);
        assert_eq!(values.citta, None);
    }
}
