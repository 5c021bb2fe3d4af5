use chrono::Utc;

use crate::modules::users::core::session::{RefreshDecision, decide_refresh};
use crate::modules::users::errors::UsersError;
use crate::modules::users::service::{TokenPair, UsersService};
use crate::shared::core::security::{hash_refresh_token, random_jti};

impl UsersService {
    /// Rotates a refresh token. Presenting a revoked token revokes every
    /// session of its owner.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, UsersError> {
        let now = Utc::now();
        let stored = self
            .refresh_tokens
            .find_by_hash(&hash_refresh_token(refresh_token))
            .await?;

        let current = match decide_refresh(stored, now) {
            RefreshDecision::Rotate(token) => token,
            RefreshDecision::Unknown => return Err(UsersError::InvalidRefreshToken),
            RefreshDecision::Expired => return Err(UsersError::RefreshTokenExpired),
            RefreshDecision::Reused { user_id } => return Err(self.burn_sessions(user_id).await),
        };

        let next_jti = random_jti();
        let revoked = self
            .refresh_tokens
            .revoke(current.id, Some(next_jti.clone()), now)
            .await?;
        if !revoked {
            // Another request rotated the same token first.
            return Err(self.burn_sessions(current.user_id).await);
        }

        let user = self
            .users
            .find_by_id(current.user_id)
            .await?
            .ok_or(UsersError::InvalidRefreshToken)?;
        self.issue_token_pair_with_jti(&user, next_jti).await
    }

    async fn burn_sessions(&self, user_id: uuid::Uuid) -> UsersError {
        tracing::warn!(%user_id, "refresh token reuse detected, revoking all sessions");
        match self
            .refresh_tokens
            .revoke_all_for_user(user_id, Utc::now())
            .await
        {
            Ok(_) => UsersError::RefreshTokenRevoked,
            Err(e) => e.into(),
        }
    }
}
