// ============================
// crates/gatehouse-lib/src/validation.rs
// ============================
//! Request field validation.
use std::sync::LazyLock;

use regex::Regex;

use crate::error::AppError;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

pub fn validate_email(email: &str) -> Result<(), AppError> {
    if email.len() > MAX_EMAIL_LENGTH || !EMAIL_REGEX.is_match(email) {
        return Err(AppError::InvalidInput("invalid email address".to_string()));
    }
    Ok(())
}
