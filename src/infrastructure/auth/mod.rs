//! Authentication infrastructure module
//!
//! Verification of bearer tokens issued by the external sign-in service.

mod jwt;

pub use jwt::{JwtVerifier, TokenClaims, TokenVerifier};

#[cfg(test)]
pub use jwt::mint_token;
