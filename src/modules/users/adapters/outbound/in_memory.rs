use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::modules::users::core::ports::{RefreshTokenRepository, UserRepository};
use crate::modules::users::core::session::RefreshToken;
use crate::modules::users::core::user::User;
use crate::shared::infrastructure::repository::{RepositoryError, offline};

/// Users and refresh tokens kept in process memory.
#[derive(Default)]
pub struct InMemoryAccounts {
    users: RwLock<HashMap<Uuid, User>>,
    refresh_tokens: RwLock<HashMap<Uuid, RefreshToken>>,
    offline: AtomicBool,
}

impl InMemoryAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&self) {
        self.offline.fetch_xor(true, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), RepositoryError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(offline());
        }
        Ok(())
    }

    #[cfg(test)]
    pub async fn expire(&self, token_hash: &str) {
        let mut tokens = self.refresh_tokens.write().await;
        if let Some(token) = tokens.values_mut().find(|t| t.token_hash == token_hash) {
            token.expires_at = Utc::now() - chrono::Duration::seconds(1);
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryAccounts {
    async fn insert(&self, user: User) -> Result<(), RepositoryError> {
        self.check_online()?;
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::Duplicate(user.email));
        }
        users.insert(user.id, user);
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        self.check_online()?;
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        self.check_online()?;
        Ok(self.users.read().await.get(&id).cloned())
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryAccounts {
    async fn insert(&self, token: RefreshToken) -> Result<(), RepositoryError> {
        self.check_online()?;
        self.refresh_tokens.write().await.insert(token.id, token);
        Ok(())
    }

    async fn find_by_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, RepositoryError> {
        self.check_online()?;
        Ok(self
            .refresh_tokens
            .read()
            .await
            .values()
            .find(|t| t.token_hash == token_hash)
            .cloned())
    }

    async fn revoke(
        &self,
        id: Uuid,
        replaced_by_jti: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        self.check_online()?;
        let mut tokens = self.refresh_tokens.write().await;
        match tokens.get_mut(&id) {
            Some(token) if !token.revoked => {
                token.revoked = true;
                token.revoked_at = Some(at);
                token.replaced_by_jti = replaced_by_jti;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_all_for_user(
        &self,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<u64, RepositoryError> {
        self.check_online()?;
        let mut revoked = 0;
        for token in self
            .refresh_tokens
            .write()
            .await
            .values_mut()
            .filter(|t| t.user_id == user_id && !t.revoked)
        {
            token.revoked = true;
            token.revoked_at = Some(at);
            revoked += 1;
        }
        Ok(revoked)
    }
}
