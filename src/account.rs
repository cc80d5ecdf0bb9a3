//! Staff account activation: email verification and first password.
//!
//! Verification trades the emailed token for a password-setup token; the
//! second token is then spent once on `set-password`.
use crate::decision::non_blank;
use crate::error::{Result, ReviewError};
use serde::{Deserialize, Serialize};

pub const MIN_PASSWORD_CHARS: usize = 8;

/// Response of `GET /internal-users/verify`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailVerification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_token: Option<String>,
}

/// Body of `POST /internal-users/set-password`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordSetup {
    pub token: String,
    pub password: String,
}

/// Trim a token and reject it when blank.
pub fn require_token<'a>(token: Option<&'a str>, missing: &str) -> Result<&'a str> {
    non_blank(token).ok_or_else(|| ReviewError::validation(missing))
}

/// Check a new password and its confirmation.
///
/// The password itself is never trimmed.
pub fn validate_new_password(password: &str, confirmation: &str) -> Result<()> {
    if password.is_empty() {
        return Err(ReviewError::validation("Password is required"));
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ReviewError::validation(format!(
            "Password must be at least {MIN_PASSWORD_CHARS} characters"
        )));
    }
    if confirmation.is_empty() {
        return Err(ReviewError::validation("Please confirm your password"));
    }
    if password != confirmation {
        return Err(ReviewError::validation("Passwords do not match"));
    }
    Ok(())
}

/// Validate everything and build the set-password body.
pub fn prepare_password_setup(
    token: Option<&str>,
    password: &str,
    confirmation: &str,
) -> Result<PasswordSetup> {
    validate_new_password(password, confirmation)?;
    let token = require_token(
        token,
        "Password setup token is missing. Please request a new verification email.",
    )?;
    Ok(PasswordSetup {
        token: token.to_string(),
        password: password.to_string(),
    })
}
