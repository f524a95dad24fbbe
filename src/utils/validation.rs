use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use crate::error::Result;

/// Deserializes `value` (applying serde defaults) and runs its declarative rules.
pub fn parse<T>(value: serde_json::Value) -> Result<T>
where
    T: DeserializeOwned + Validate,
{
    let parsed: T = serde_json::from_value(value)?;
    if let Err(errors) = parsed.validate() {
        tracing::debug!(
            schema = std::any::type_name::<T>(),
            fields = errors.errors().len(),
            "payload rejected"
        );
        return Err(errors.into());
    }
    tracing::trace!(schema = std::any::type_name::<T>(), "payload accepted");
    Ok(parsed)
}

/// Same as [`parse`], named after the call sites that treat rejection as data.
pub fn safe_parse<T>(value: serde_json::Value) -> Result<T>
where
    T: DeserializeOwned + Validate,
{
    parse(value)
}

pub fn parse_str<T>(raw: &str) -> Result<T>
where
    T: DeserializeOwned + Validate,
{
    parse(serde_json::from_str(raw)?)
}

/// Builds a validator error carrying an Italian message for the client.
pub fn rule_error(code: &'static str, message: impl Into<String>) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Owned(message.into()));
    err
}

// Explicit nulls from the client become empty strings so required checks see them.
pub fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// Runs `f` under a TRACE-level subscriber and returns everything it logged.
#[cfg(test)]
pub(crate) fn capture_logs<F: FnOnce()>(f: F) -> String {
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);

    let bytes = captured.0.lock().unwrap().clone();
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct Signup {
        #[serde(default, deserialize_with = "null_as_empty")]
        #[validate(length(min = 1, message = "obbligatorio"))]
        name: String,
    }

    #[test]
    fn null_string_becomes_empty_and_fails_length() {
        let err = parse::<Signup>(serde_json::json!({ "name": null })).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            err.field_messages(),
            vec![("name".to_string(), "obbligatorio".to_string())]
        );
    }

    #[test]
    fn parse_str_accepts_valid_json() {
        let signup: Signup = parse_str(r#"{"name":"x"}"#).unwrap();
        assert_eq!(signup.name, "x");
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let err = parse_str::<Signup>("{").unwrap_err();
        assert!(matches!(err, crate::error::Error::Json(_)));
    }

    #[test]
    fn acceptance_and_rejection_are_both_logged() {
        let logs = capture_logs(|| {
            let _ = parse::<Signup>(serde_json::json!({ "name": "x" }));
            let _ = parse::<Signup>(serde_json::json!({ "name": "" }));
        });
        assert!(logs.contains("payload accepted"), "{logs}");
        assert!(logs.contains("payload rejected"), "{logs}");
    }
}
