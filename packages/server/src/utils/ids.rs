use uuid::Uuid;

use crate::error::AppError;

/// Parse a client-supplied identifier, mapping malformed input to a validation error.
///
/// `what` names the identifier in the error message, e.g. "proposal ID".
pub fn parse_id(raw: &str, what: &str) -> Result<Uuid, AppError> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "null" || raw == "undefined" {
        return Err(AppError::Validation(format!("{} is missing or invalid.", capitalize(what))));
    }
    Uuid::parse_str(raw).map_err(|_| AppError::Validation(format!("Invalid {what}")))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
