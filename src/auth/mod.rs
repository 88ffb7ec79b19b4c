use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod password;

/// Claims embedded in every identity token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject -- the user's id.
    pub sub: Uuid,
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, username: String, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: user_id,
            username,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug)]
pub enum JwtError {
    TokenGeneration(String),
    InvalidToken(String),
    InvalidSecret,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            JwtError::InvalidToken(msg) => write!(f, "Invalid JWT token: {}", msg),
            JwtError::InvalidSecret => write!(f, "Invalid JWT secret"),
        }
    }
}

impl std::error::Error for JwtError {}

/// Sign an identity token (HS256) for the given claims.
pub fn generate_jwt(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Validate an identity token and extract its claims.
///
/// Signature and expiration are both checked; an expired or tampered token
/// comes back as [`JwtError::InvalidToken`].
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

    #[test]
    fn generate_and_verify_roundtrip() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "alice".to_string(), 1);
        let token = generate_jwt(&claims, SECRET).expect("token generation should succeed");

        let decoded = verify_jwt(&token, SECRET).expect("token validation should succeed");
        assert_eq!(decoded.sub, user_id);
        assert_eq!(decoded.username, "alice");
        assert!(decoded.exp > decoded.iat);
    }

    #[test]
    fn expired_token_fails() {
        // Build an already-expired token, well past the default 60s leeway
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            username: "bob".to_string(),
            exp: now - 300,
            iat: now - 600,
        };
        let token = generate_jwt(&claims, SECRET).expect("encoding should succeed");

        assert!(verify_jwt(&token, SECRET).is_err(), "expired token must fail");
    }

    #[test]
    fn wrong_secret_fails() {
        let claims = Claims::new(Uuid::new_v4(), "carol".to_string(), 1);
        let token = generate_jwt(&claims, SECRET).expect("token generation should succeed");

        let result = verify_jwt(&token, "a-different-secret");
        assert!(result.is_err(), "token signed with a different secret must fail");
    }

    #[test]
    fn empty_secret_is_rejected() {
        let claims = Claims::new(Uuid::new_v4(), "dave".to_string(), 1);
        assert!(matches!(
            generate_jwt(&claims, ""),
            Err(JwtError::InvalidSecret)
        ));
        assert!(matches!(
            verify_jwt("whatever", ""),
            Err(JwtError::InvalidSecret)
        ));
    }
}
