// Password hashing, access tokens and opaque refresh tokens.
//
// Access tokens are HS256 JWTs whose subject is the canonical user id.
// Refresh tokens are random and only their SHA-256 digest is ever stored.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

const REFRESH_TOKEN_BYTES: usize = 48;
const JTI_BYTES: usize = 16;

#[derive(Debug, Error)]
pub enum SecurityError {
    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("token error: {0}")]
    Token(String),
}

#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, password: &str) -> Result<String, SecurityError> {
        bcrypt::hash(password, self.cost).map_err(|e| SecurityError::Hashing(e.to_string()))
    }

    /// A malformed stored hash never verifies.
    pub fn verify(&self, password: &str, hashed_password: &str) -> bool {
        bcrypt::verify(password, hashed_password).unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct IssuedAccessToken {
    pub token: String,
    pub jti: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, access_ttl_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl: Duration::minutes(access_ttl_minutes),
        }
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn issue_access_token(
        &self,
        subject: &str,
        now: DateTime<Utc>,
    ) -> Result<IssuedAccessToken, SecurityError> {
        let expires_at = now + self.access_ttl;
        let claims = AccessClaims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: random_jti(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| SecurityError::Token(e.to_string()))?;
        Ok(IssuedAccessToken {
            token,
            jti: claims.jti,
            expires_at,
        })
    }

    pub fn decode_access_token(&self, token: &str) -> Result<AccessClaims, SecurityError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<AccessClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| SecurityError::Token(e.to_string()))
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_ttl", &self.access_ttl)
            .finish_non_exhaustive()
    }
}

fn random_urlsafe(bytes: usize) -> String {
    let mut buffer = vec![0u8; bytes];
    rand::thread_rng().fill_bytes(&mut buffer);
    URL_SAFE_NO_PAD.encode(buffer)
}

pub fn random_jti() -> String {
    random_urlsafe(JTI_BYTES)
}

pub fn generate_refresh_token() -> String {
    random_urlsafe(REFRESH_TOKEN_BYTES)
}

pub fn hash_refresh_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
