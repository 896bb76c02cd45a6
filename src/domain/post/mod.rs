//! Post domain
//!
//! Blog posts owned by exactly one user, plus the validation rules and
//! storage traits that guard them.

mod entity;
mod repository;
mod validation;

pub use entity::{NewPost, Post, PostChanges, PostId, PostInput, PostWithAuthor};
pub use repository::{AuthorResolver, PostRepository};
pub use validation::{validate_post, PostValidationError};

#[cfg(test)]
pub use repository::{MockAuthorResolver, MockPostRepository};
