use std::{borrow::Cow, collections::BTreeMap};

use validator::{ValidationError, ValidationErrors};

pub fn schema_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Flattens validator output into `field -> messages`, the shape returned to
/// API clients.
pub fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, field_errors)| {
            let messages = field_errors
                .iter()
                .map(|error| match error.message.as_ref() {
                    Some(message) => message.to_string(),
                    None => error.code.to_string(),
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// Trims the value and maps blank strings to `None`.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_blank_drops_whitespace_only_values() {
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(Some(" a ".to_string())), Some("a".to_string()));
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn field_messages_prefers_explicit_message() {
        let mut errors = ValidationErrors::new();
        errors.add("email1", schema_error("required", "email1 is required"));
        errors.add("name", ValidationError::new("length"));

        let messages = field_messages(&errors);
        assert_eq!(messages["email1"], vec!["email1 is required".to_string()]);
        assert_eq!(messages["name"], vec!["length".to_string()]);
    }
}
