//! Session token verification
//!
//! Tokens are issued by the external credential service; this module only
//! verifies the signature and expiry and extracts the identity the core
//! trusts: user id, email and role.

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT-related errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Claims carried by a session token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User email
    pub email: String,
    /// User role (CLIENT, PROVIDER or ADMIN)
    pub role: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Verify a session token and return its claims
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let validation = Validation::default();

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        _ => JwtError::InvalidToken(e.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use uuid::Uuid;

    const SECRET: &str = "test-secret";

    fn make_token(exp_offset: i64, secret: &str) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            email: "user@example.com".to_string(),
            role: "CLIENT".to_string(),
            iat: now,
            exp: now + exp_offset,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_verify_valid_token() {
        let token = make_token(3600, SECRET);
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.role, "CLIENT");
        assert_eq!(claims.email, "user@example.com");
    }

    #[test]
    fn test_verify_expired_token() {
        let token = make_token(-3600, SECRET);
        assert!(matches!(
            verify_token(&token, SECRET),
            Err(JwtError::TokenExpired)
        ));
    }

    #[test]
    fn test_verify_wrong_secret() {
        let token = make_token(3600, "other-secret");
        assert!(matches!(
            verify_token(&token, SECRET),
            Err(JwtError::InvalidToken(_))
        ));
    }
}
