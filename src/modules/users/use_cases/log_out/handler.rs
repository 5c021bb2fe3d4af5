use chrono::Utc;

use crate::modules::users::errors::UsersError;
use crate::modules::users::service::UsersService;
use crate::shared::core::security::hash_refresh_token;

impl UsersService {
    /// Idempotent: unknown or already revoked tokens are not an error.
    pub async fn log_out(&self, refresh_token: &str) -> Result<(), UsersError> {
        let stored = self
            .refresh_tokens
            .find_by_hash(&hash_refresh_token(refresh_token))
            .await?;
        if let Some(token) = stored.filter(|t| !t.revoked) {
            self.refresh_tokens.revoke(token.id, None, Utc::now()).await?;
            tracing::info!(user_id = %token.user_id, "refresh token revoked on logout");
        }
        Ok(())
    }
}

#[cfg(test)]
mod log_out_handler_tests {
    use crate::modules::users::errors::UsersError;
    use crate::tests::fixtures::users::make_users_service;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn it_should_revoke_the_token_so_it_cannot_be_refreshed() {
        let (service, _) = make_users_service();
        let pair = service
            .sign_up("bye@example.com", "StrongPass123!")
            .await
            .unwrap();
        service.log_out(&pair.refresh_token).await.unwrap();
        assert!(matches!(
            service.refresh(&pair.refresh_token).await,
            Err(UsersError::RefreshTokenRevoked)
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_be_idempotent() {
        let (service, _) = make_users_service();
        let pair = service
            .sign_up("twice@example.com", "StrongPass123!")
            .await
            .unwrap();
        service.log_out(&pair.refresh_token).await.unwrap();
        service.log_out(&pair.refresh_token).await.unwrap();
        service.log_out("never-issued").await.unwrap();
    }
}
