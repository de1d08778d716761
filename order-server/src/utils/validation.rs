//! Input validation helpers
//!
//! Text length limits and conversion of `validator` reports into [`AppError`]
//! with field-level details.

use shared::error::AppError;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// Notes, reasons, special instructions
pub const MAX_NOTE_LEN: usize = 500;

/// Entity names: tenant, staff display name
pub const MAX_NAME_LEN: usize = 200;

/// Slugs printed into QR codes
pub const MAX_SLUG_LEN: usize = 64;

/// Validate a DTO, reporting every failing field in `details.fields`
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(validation_error)
}

/// Convert a validator report into a `ValidationFailed` error
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let mut fields = Vec::new();
    collect_fields("", &errors, &mut fields);
    fields.sort();
    let message = match fields.first() {
        Some(first) => format!("Invalid field: {first}"),
        None => "Invalid request".to_string(),
    };
    AppError::validation(message).with_detail("fields", fields)
}

fn collect_fields(prefix: &str, errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(_) => out.push(path),
            ValidationErrorsKind::Struct(inner) => collect_fields(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_fields(&format!("{path}[{index}]"), inner, out);
                }
            }
        }
    }
}

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty"))
            .with_detail("field", field));
    }
    validate_len(value, field, max_len)
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: Option<&str>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    match value {
        Some(v) => validate_len(v, field, max_len),
        None => Ok(()),
    }
}

fn validate_len(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        ))
        .with_detail("field", field));
    }
    Ok(())
}
