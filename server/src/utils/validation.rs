use super::error::{AppError, AppResult};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Trimmed value of a required text field; 400 when absent or blank.
pub fn required(field: &str, value: Option<&str>) -> AppResult<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::ValidationError(format!("{} is required", field)))
}

/// Trims and lower-cases an address after a basic shape check.
pub fn normalize_email(raw: &str) -> AppResult<String> {
    let email = raw.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(email)
    } else {
        Err(AppError::ValidationError("A valid email is required".to_string()))
    }
}

pub fn check_password(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::ValidationError(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}
