use crate::error::{TutorError, TutorResult};

/// Validates that a string is not blank (empty or whitespace-only).
/// Returns the trimmed string on success.
pub fn non_blank(value: &str, field: &str) -> TutorResult<String> {
    let trimmed = value.trim().to_string();
    if trimmed.is_empty() {
        Err(TutorError::invalid(field, "cannot be blank"))
    } else {
        Ok(trimmed)
    }
}

/// Validates that an amount is finite and not negative. Zero is allowed.
pub fn non_negative(value: f64, field: &str) -> TutorResult<f64> {
    if !value.is_finite() {
        Err(TutorError::invalid(field, "must be a finite number"))
    } else if value < 0.0 {
        Err(TutorError::invalid(field, "cannot be negative"))
    } else {
        Ok(value)
    }
}

/// Non-blank, and only letters, digits and spaces.
pub fn alphanumeric_words(value: &str, field: &str) -> TutorResult<String> {
    let trimmed = non_blank(value, field)?;
    if trimmed.chars().all(|c| c.is_alphanumeric() || c == ' ') {
        Ok(trimmed)
    } else {
        Err(TutorError::invalid(
            field,
            "should only contain alphanumeric characters and spaces",
        ))
    }
}

/// At least three digits, nothing else.
pub fn phone_number(value: &str, field: &str) -> TutorResult<String> {
    let trimmed = non_blank(value, field)?;
    if trimmed.len() >= 3 && trimmed.chars().all(|c| c.is_ascii_digit()) {
        Ok(trimmed)
    } else {
        Err(TutorError::invalid(
            field,
            "should only contain digits and be at least 3 digits long",
        ))
    }
}

/// `local@domain`: one `@`, neither side empty, no whitespace, and the
/// domain does not start or end with a dot.
pub fn email_address(value: &str, field: &str) -> TutorResult<String> {
    let trimmed = non_blank(value, field)?;
    let valid = match trimmed.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !trimmed.contains(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(trimmed)
    } else {
        Err(TutorError::invalid(field, "should be of the format local-part@domain"))
    }
}
