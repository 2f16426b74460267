use medadmin_core::ApiError;
use validator::{Validate, ValidationErrors};

/// Flattens field errors into messages, falling back to "<field> is invalid".
pub fn format_errors(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();
    messages.sort();
    messages
}

/// Validates a form before it is sent.
pub fn validate_form<T: Validate>(form: &T) -> Result<(), ApiError> {
    form.validate()
        .map_err(|errors| ApiError::validation(format_errors(&errors)))
}
