use chrono::Utc;
use uuid::Uuid;

use crate::modules::users::core::user::{User, decide_sign_up};
use crate::modules::users::errors::UsersError;
use crate::modules::users::service::{TokenPair, UsersService};
use crate::shared::infrastructure::repository::RepositoryError;

impl UsersService {
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<TokenPair, UsersError> {
        let email = decide_sign_up(email, password)?;
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(UsersError::EmailAlreadyRegistered);
        }

        let user = User {
            id: Uuid::now_v7(),
            email,
            hashed_password: self.hash_password(password).await?,
            created_at: Utc::now(),
        };
        match self.users.insert(user.clone()).await {
            Ok(()) => {}
            // Lost a race with a concurrent sign-up for the same email.
            Err(RepositoryError::Duplicate(_)) => return Err(UsersError::EmailAlreadyRegistered),
            Err(e) => return Err(e.into()),
        }
        tracing::info!(user_id = %user.id, "user signed up");

        self.issue_token_pair(&user).await
    }
}
