//! Domain layer - Core business logic and entities

pub mod error;
pub mod post;
pub mod sanitize;
pub mod user;

pub use error::DomainError;
pub use post::{
    validate_post, AuthorResolver, NewPost, Post, PostChanges, PostId, PostInput, PostRepository,
    PostValidationError, PostWithAuthor,
};
pub use sanitize::{escape_html, sanitize_post_fields, sanitize_user_fields, sanitize_user_patch};
pub use user::{
    validate_patch, validate_user, NewUser, User, UserChanges, UserId, UserInput, UserPatch,
    UserRepository, UserValidationError, ValidationMode,
};
