//! Bearer token verification for HS256 JWTs

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Claims carried by tokens minted by the external issuer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Set by the issuer on successful sign-in
    pub authorized: bool,
    /// Numeric ID of the signed-in user
    pub user_id: u32,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

/// Verifies a bearer token and yields the caller it was issued to
pub trait TokenVerifier: Send + Sync + Debug {
    fn verify(&self, token: &str) -> Result<UserId, DomainError>;
}

/// HS256 verifier sharing a secret with the token issuer
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("algorithm", &Algorithm::HS256)
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtVerifier {
    /// Create a verifier for tokens signed with `secret`
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
            validation,
        }
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<UserId, DomainError> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| DomainError::validation(format!("Invalid token: {}", e)))?;

        if !data.claims.authorized {
            return Err(DomainError::validation("Token is not authorized"));
        }

        UserId::new(data.claims.user_id)
            .map_err(|e| DomainError::validation(format!("Invalid token subject: {}", e)))
    }
}

/// Sign a token the way the issuer does
#[cfg(test)]
pub fn mint_token(secret: &str, user_id: u32, ttl_secs: i64) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let claims = TokenClaims {
        authorized: true,
        user_id,
        exp: chrono::Utc::now().timestamp() + ttl_secs,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    #[test]
    fn test_verify_valid_token() {
        let verifier = JwtVerifier::new(SECRET);
        let token = mint_token(SECRET, 7, 3600);

        assert_eq!(verifier.verify(&token).unwrap().value(), 7);
    }

    #[test]
    fn test_verify_expired_token() {
        let verifier = JwtVerifier::new(SECRET);
        let token = mint_token(SECRET, 7, -3600);

        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_verify_wrong_secret() {
        let verifier = JwtVerifier::new("another-secret");
        let token = mint_token(SECRET, 7, 3600);

        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_verify_unauthorized_claim() {
        let claims = TokenClaims {
            authorized: false,
            user_id: 7,
            exp: chrono::Utc::now().timestamp() + 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(JwtVerifier::new(SECRET).verify(&token).is_err());
    }

    #[test]
    fn test_verify_zero_user_id() {
        let token = mint_token(SECRET, 0, 3600);

        assert!(JwtVerifier::new(SECRET).verify(&token).is_err());
    }

    #[test]
    fn test_verify_other_algorithm() {
        let claims = TokenClaims {
            authorized: true,
            user_id: 7,
            exp: chrono::Utc::now().timestamp() + 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(JwtVerifier::new(SECRET).verify(&token).is_err());
    }

    #[test]
    fn test_verify_garbage() {
        let verifier = JwtVerifier::new(SECRET);

        assert!(verifier.verify("not-a-jwt").is_err());
        assert!(verifier.verify("").is_err());
    }

    #[test]
    fn test_debug_hides_key() {
        let debug = format!("{:?}", JwtVerifier::new(SECRET));
        assert!(!debug.contains(SECRET));
    }
}
