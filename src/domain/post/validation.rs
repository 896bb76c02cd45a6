//! Post validation utilities

use thiserror::Error;

use super::entity::PostInput;

/// Errors that can occur during post validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PostValidationError {
    #[error("required Title")]
    RequiredTitle,

    #[error("required Content")]
    RequiredContent,

    #[error("required Author")]
    RequiredAuthor,

    #[error("Post ID must be a positive integer")]
    InvalidId,
}

/// Validate a post payload
///
/// Checks Title, Content and AuthorID in that order and returns the first
/// failure.
pub fn validate_post(input: &PostInput) -> Result<(), PostValidationError> {
    if input.title.is_empty() {
        return Err(PostValidationError::RequiredTitle);
    }
    if input.content.is_empty() {
        return Err(PostValidationError::RequiredContent);
    }
    if input.author_id < 1 {
        return Err(PostValidationError::RequiredAuthor);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_post() {
        assert!(validate_post(&PostInput::new("Hi", "World", 1)).is_ok());
    }

    #[test]
    fn test_first_failure_wins() {
        assert_eq!(
            validate_post(&PostInput::new("", "", 0)),
            Err(PostValidationError::RequiredTitle)
        );
        assert_eq!(
            validate_post(&PostInput::new("Hi", "", 0)),
            Err(PostValidationError::RequiredContent)
        );
        assert_eq!(
            validate_post(&PostInput::new("Hi", "World", 0)),
            Err(PostValidationError::RequiredAuthor)
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(PostValidationError::RequiredTitle.to_string(), "required Title");
        assert_eq!(PostValidationError::RequiredAuthor.to_string(), "required Author");
    }
}
