//! Infrastructure layer - storage, hashing and token implementations

pub mod auth;
pub mod logging;
pub mod post;
pub mod storage;
pub mod user;
