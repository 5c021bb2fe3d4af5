use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::modules::users::core::session::RefreshToken;
use crate::modules::users::core::user::User;
use crate::shared::infrastructure::repository::RepositoryError;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `RepositoryError::Duplicate` when the email is taken.
    async fn insert(&self, user: User) -> Result<(), RepositoryError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;
}

#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn insert(&self, token: RefreshToken) -> Result<(), RepositoryError>;
    async fn find_by_hash(&self, token_hash: &str)
    -> Result<Option<RefreshToken>, RepositoryError>;
    /// Returns false when the token was already revoked.
    async fn revoke(
        &self,
        id: Uuid,
        replaced_by_jti: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError>;
    async fn revoke_all_for_user(
        &self,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<u64, RepositoryError>;
}
