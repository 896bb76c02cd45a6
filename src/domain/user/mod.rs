//! User domain
//!
//! This module provides domain types and traits for registered users,
//! including the user entity, input validation, and the repository trait.

mod entity;
mod repository;
mod validation;

pub use entity::{NewUser, User, UserChanges, UserId, UserInput, UserPatch};
pub use repository::UserRepository;
pub use validation::{
    validate_email, validate_nickname, validate_password, validate_patch, validate_user,
    UserValidationError, ValidationMode,
};

#[cfg(test)]
pub use repository::MockUserRepository;
