use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::modules::users::adapters::outbound::in_memory::InMemoryAccounts;
use crate::modules::users::core::session::RefreshToken;
use crate::modules::users::core::user::User;
use crate::modules::users::service::UsersService;
use crate::shared::core::security::{PasswordHasher, TokenIssuer, random_jti};

pub const PASSWORD: &str = "StrongPass123!";

/// Low bcrypt cost keeps hashing fast in tests.
pub fn make_users_service() -> (UsersService, Arc<InMemoryAccounts>) {
    let accounts = Arc::new(InMemoryAccounts::new());
    let service = UsersService::new(
        accounts.clone(),
        accounts.clone(),
        PasswordHasher::new(4),
        TokenIssuer::new("test-secret", 15),
        30,
    );
    (service, accounts)
}

pub fn make_user(email: &str) -> User {
    User {
        id: Uuid::now_v7(),
        email: email.to_string(),
        hashed_password: PasswordHasher::new(4).hash(PASSWORD).unwrap(),
        created_at: Utc::now(),
    }
}

pub fn make_refresh_token(user_id: Uuid, token_hash: &str) -> RefreshToken {
    let now = Utc::now();
    RefreshToken {
        id: Uuid::now_v7(),
        user_id,
        jti: random_jti(),
        token_hash: token_hash.to_string(),
        expires_at: now + Duration::days(30),
        revoked: false,
        revoked_at: None,
        replaced_by_jti: None,
        created_at: now,
    }
}
