use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Uniform outcome of a single-field validator.
///
/// `error` is always set when `valid` is false; `formatted_value` is only set
/// on success, when the validator produced a normalized value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_value: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            ..Default::default()
        }
    }

    pub fn formatted(value: impl Into<String>) -> Self {
        Self {
            valid: true,
            formatted_value: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn invalid_field(field: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
            field: Some(field.into()),
            formatted_value: None,
        }
    }
}

/// Per-field error messages collected by the accumulate-all form validators.
pub type FieldErrors = BTreeMap<String, String>;

/// Outcome of an accumulate-all form validator: normalized values or every failure.
pub type FormResult<T> = Result<T, FieldErrors>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_serializes_without_formatted_value() {
        let result = ValidationResult::invalid_field("email", "Formato email non valido");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "valid": false,
                "error": "Formato email non valido",
                "field": "email"
            })
        );
    }

    #[test]
    fn success_exposes_formatted_value() {
        let result = ValidationResult::formatted("RM");
        assert!(result.valid);
        assert_eq!(result.error, None);
        assert_eq!(result.formatted_value.as_deref(), Some("RM"));
    }
}
