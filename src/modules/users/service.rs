use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::modules::users::core::ports::{RefreshTokenRepository, UserRepository};
use crate::modules::users::core::session::RefreshToken;
use crate::modules::users::core::user::User;
use crate::modules::users::errors::UsersError;
use crate::shared::core::security::{
    PasswordHasher, SecurityError, TokenIssuer, generate_refresh_token, hash_refresh_token,
    random_jti,
};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Account and session use cases. Each use case adds its own `impl` block.
pub struct UsersService {
    pub(crate) users: Arc<dyn UserRepository>,
    pub(crate) refresh_tokens: Arc<dyn RefreshTokenRepository>,
    pub(crate) hasher: PasswordHasher,
    pub(crate) tokens: TokenIssuer,
    pub(crate) refresh_ttl: Duration,
}

impl UsersService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        refresh_tokens: Arc<dyn RefreshTokenRepository>,
        hasher: PasswordHasher,
        tokens: TokenIssuer,
        refresh_ttl_days: i64,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            hasher,
            tokens,
            refresh_ttl: Duration::days(refresh_ttl_days),
        }
    }

    pub async fn issue_token_pair(&self, user: &User) -> Result<TokenPair, UsersError> {
        self.issue_token_pair_with_jti(user, random_jti()).await
    }

    pub(crate) async fn issue_token_pair_with_jti(
        &self,
        user: &User,
        refresh_jti: String,
    ) -> Result<TokenPair, UsersError> {
        let now = Utc::now();
        let access = self.tokens.issue_access_token(&user.id.to_string(), now)?;
        let refresh_token = generate_refresh_token();
        self.refresh_tokens
            .insert(RefreshToken {
                id: Uuid::now_v7(),
                user_id: user.id,
                jti: refresh_jti,
                token_hash: hash_refresh_token(&refresh_token),
                expires_at: now + self.refresh_ttl,
                revoked: false,
                revoked_at: None,
                replaced_by_jti: None,
                created_at: now,
            })
            .await?;
        Ok(TokenPair {
            access_token: access.token,
            refresh_token,
            token_type: "bearer".into(),
            expires_in: self.tokens.access_ttl().num_seconds(),
        })
    }

    // bcrypt is CPU bound; keep it off the async workers.
    pub(crate) async fn hash_password(&self, password: &str) -> Result<String, UsersError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| SecurityError::Hashing(e.to_string()))?
            .map_err(UsersError::from)
    }

    pub(crate) async fn verify_password(&self, password: &str, hashed: &str) -> bool {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let hashed = hashed.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hashed))
            .await
            .unwrap_or(false)
    }
}
