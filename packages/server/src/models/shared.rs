use chrono::NaiveDate;

use crate::error::AppError;

/// Check the shape `local@domain.tld`: one `@`, no whitespace, a dot inside the domain.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Trim a required text field, rejecting empty or overlong values.
pub fn required_text(value: Option<&str>, field: &str, max_chars: usize) -> Result<String, AppError> {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    if value.chars().count() > max_chars {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max_chars} characters"
        )));
    }
    Ok(value.to_string())
}

/// A required, well-formed email address.
pub fn required_email(value: Option<&str>, field: &str) -> Result<String, AppError> {
    let email = required_text(value, field, 254)?;
    if !is_valid_email(&email) {
        return Err(AppError::Validation(format!("{field} must be a valid email")));
    }
    Ok(email)
}

/// A required calendar date in `YYYY-MM-DD` form.
pub fn required_date(value: Option<&str>, field: &str) -> Result<NaiveDate, AppError> {
    let raw = required_text(value, field, 32)?;
    parse_date(&raw, field)
}

pub fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("{field} must be a date in YYYY-MM-DD format")))
}
