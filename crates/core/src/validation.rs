//! Glue between `validator` derive rules and [`CoreError`].
//!
//! Form inputs (project editor, contact form) declare their rules with
//! `#[derive(Validate)]`; handlers call [`validate_input`] and get a single
//! human-readable [`CoreError::Validation`] back.

use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::CoreError;

/// Run the derived rules on `input`, mapping failures to [`CoreError`].
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::Validation(describe(&errors)))
}

/// Reject strings that are empty once surrounding whitespace is removed.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Reject lists holding an entry that is blank once trimmed.
pub fn entries_not_blank(values: &[String]) -> Result<(), ValidationError> {
    if values.iter().any(|v| v.trim().is_empty()) {
        let mut err = ValidationError::new("blank_entry");
        err.message = Some("entries must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Flatten field errors into `field: message; field: message`, sorted by field.
fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => format!("{field}: {msg}"),
                None => format!("{field}: {}", e.code),
            })
        })
        .collect();
    parts.sort();
    parts.join("; ")
}
