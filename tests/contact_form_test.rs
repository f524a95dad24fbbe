use edu_validation::models::contact::ContactFormData;
use edu_validation::utils::validation::null_as_empty;
use edu_validation::validators::contact::{validate_email, validate_email_optional, validate_phone};
use edu_validation::validators::forms::validate_contact_form;
use edu_validation::validators::sanitizers::{sanitize_contact_form, sanitize_input};
use edu_validation::ValidationResult;
use pretty_assertions::assert_eq;
use serde_json::json;

fn payload() -> serde_json::Value {
    json!({
        "name": "Mario Rossi",
        "phone": "+39 340-123-4567",
        "email": "mario.rossi@example.com",
        "subject": "Informazioni sul corso TOLC-MED",
        "message": "Buongiorno, vorrei sapere quando inizia il prossimo corso.",
        "materia": null
    })
}

#[test]
fn contact_flow_sanitize_then_validate() {
    let raw: ContactFormData = serde_json::from_value(json!({
        "name": "<script>Mario</script> Rossi",
        "phone": "3401234567",
        "email": "mario.rossi@example.com",
        "subject": "<b>Informazioni</b> corso",
        "message": "Vorrei \"informazioni\" sul corso di biologia.",
        "materia": "Biologia"
    }))
    .expect("deserialize contact form");

    let clean = sanitize_contact_form(&raw);
    assert_eq!(clean.name, "Mario Rossi");
    assert_eq!(clean.subject, "Informazioni corso");
    assert_eq!(clean.message, "Vorrei informazioni sul corso di biologia.");
    assert_eq!(clean.materia.as_deref(), Some("Biologia"));

    assert_eq!(validate_contact_form(&clean), ValidationResult::ok());
}

#[test]
fn null_fields_count_as_missing() {
    let mut value = payload();
    value["message"] = serde_json::Value::Null;
    let data: ContactFormData = serde_json::from_value(value).expect("deserialize");
    assert_eq!(data.message, "");

    let result = validate_contact_form(&data);
    assert!(!result.valid);
    assert_eq!(
        result.error.as_deref(),
        Some("Tutti i campi obbligatori devono essere compilati")
    );
    assert_eq!(result.field, None);
}

#[test]
fn first_failing_field_wins() {
    let mut value = payload();
    value["name"] = json!("Mario");
    value["phone"] = json!("123");
    let data: ContactFormData = serde_json::from_value(value).expect("deserialize");

    let result = validate_contact_form(&data);
    assert_eq!(result.field.as_deref(), Some("name"));
}

#[test]
fn phone_digit_count_is_checked_after_stripping() {
    let data: ContactFormData = serde_json::from_value(payload()).expect("deserialize");
    assert!(validate_contact_form(&data).valid);

    let result = validate_phone("123456789");
    assert!(!result.valid);
    assert!(result.error.unwrap().contains("10-15 cifre"));
}

#[test]
fn email_examples() {
    assert!(validate_email("test@example.com").valid);
    assert!(!validate_email("test@").valid);
    assert_eq!(
        validate_email_optional("  Mario.Rossi@Example.COM ")
            .formatted_value
            .as_deref(),
        Some("mario.rossi@example.com")
    );
    assert_eq!(validate_email_optional("   "), ValidationResult::ok());
}

#[test]
fn sanitizing_twice_changes_nothing() {
    for raw in [
        "<p>ciao</p>",
        "  spazi  ",
        "<<script>>alert('x')",
        "a < b > c",
        "nessun tag",
    ] {
        let once = sanitize_input(raw);
        assert_eq!(sanitize_input(&once), once, "{raw}");
    }
}

#[test]
fn null_as_empty_is_reusable() {
    #[derive(serde::Deserialize)]
    struct Nullable {
        #[serde(default, deserialize_with = "null_as_empty")]
        value: String,
    }
    let nullable: Nullable = serde_json::from_value(json!({ "value": null })).expect("deserialize");
    assert_eq!(nullable.value, "");
}
