//! User validation utilities

use thiserror::Error;
use validator::ValidateEmail;

use super::entity::{UserInput, UserPatch};

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("required Nickname")]
    RequiredNickname,

    #[error("required Password")]
    RequiredPassword,

    #[error("required Email")]
    RequiredEmail,

    #[error("invalid Email")]
    InvalidEmail,

    #[error("User ID must be a positive integer")]
    InvalidId,
}

/// The operation a user record is validated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    #[default]
    Create,
    Update,
    Login,
}

impl ValidationMode {
    /// Parse a mode name case-insensitively; unknown names validate as create
    pub fn parse(action: &str) -> Self {
        match action.to_lowercase().as_str() {
            "update" => Self::Update,
            "login" => Self::Login,
            _ => Self::Create,
        }
    }

    fn requires_nickname(self) -> bool {
        !matches!(self, Self::Login)
    }
}

/// Validate a user payload for the given operation
///
/// Fields are checked in a fixed order (Nickname, Password, Email) and the
/// first failure is returned. Login skips the nickname check.
pub fn validate_user(input: &UserInput, mode: ValidationMode) -> Result<(), UserValidationError> {
    if mode.requires_nickname() {
        validate_nickname(&input.nickname)?;
    }
    validate_password(&input.password)?;
    validate_email(&input.email)
}

/// Validate every field a patch provides
pub fn validate_patch(patch: &UserPatch) -> Result<(), UserValidationError> {
    if let Some(nickname) = &patch.nickname {
        validate_nickname(nickname)?;
    }
    if let Some(password) = &patch.password {
        validate_password(password)?;
    }
    if let Some(email) = &patch.email {
        validate_email(email)?;
    }
    Ok(())
}

pub fn validate_nickname(nickname: &str) -> Result<(), UserValidationError> {
    if nickname.is_empty() {
        return Err(UserValidationError::RequiredNickname);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.is_empty() {
        return Err(UserValidationError::RequiredPassword);
    }
    Ok(())
}

/// Validate presence and RFC 5322 style format of an email address
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.is_empty() {
        return Err(UserValidationError::RequiredEmail);
    }
    if !email.validate_email() {
        return Err(UserValidationError::InvalidEmail);
    }
    Ok(())
}
