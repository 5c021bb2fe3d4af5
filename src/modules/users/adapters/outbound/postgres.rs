use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::modules::users::core::ports::{RefreshTokenRepository, UserRepository};
use crate::modules::users::core::session::RefreshToken;
use crate::modules::users::core::user::User;
use crate::shared::infrastructure::repository::RepositoryError;

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    hashed_password: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            hashed_password: row.hashed_password,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
struct RefreshTokenRow {
    id: Uuid,
    user_id: Uuid,
    jti: String,
    token_hash: String,
    expires_at: DateTime<Utc>,
    revoked: bool,
    revoked_at: Option<DateTime<Utc>>,
    replaced_by_jti: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<RefreshTokenRow> for RefreshToken {
    fn from(row: RefreshTokenRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            jti: row.jti,
            token_hash: row.token_hash,
            expires_at: row.expires_at,
            revoked: row.revoked,
            revoked_at: row.revoked_at,
            replaced_by_jti: row.replaced_by_jti,
            created_at: row.created_at,
        }
    }
}

pub struct PostgresAccounts {
    pool: PgPool,
}

impl PostgresAccounts {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresAccounts {
    async fn insert(&self, user: User) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO users (id, email, hashed_password, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.hashed_password)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, hashed_password, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, hashed_password, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }
}

#[async_trait]
impl RefreshTokenRepository for PostgresAccounts {
    async fn insert(&self, token: RefreshToken) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO refresh_tokens \
             (id, user_id, jti, token_hash, expires_at, revoked, revoked_at, replaced_by_jti, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(token.id)
        .bind(token.user_id)
        .bind(&token.jti)
        .bind(&token.token_hash)
        .bind(token.expires_at)
        .bind(token.revoked)
        .bind(token.revoked_at)
        .bind(&token.replaced_by_jti)
        .bind(token.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, RepositoryError> {
        let row = sqlx::query_as::<_, RefreshTokenRow>(
            "SELECT id, user_id, jti, token_hash, expires_at, revoked, revoked_at, replaced_by_jti, created_at \
             FROM refresh_tokens WHERE token_hash = $1",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn revoke(
        &self,
        id: Uuid,
        replaced_by_jti: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked = TRUE, revoked_at = $2, replaced_by_jti = $3 \
             WHERE id = $1 AND revoked = FALSE",
        )
        .bind(id)
        .bind(at)
        .bind(replaced_by_jti)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn revoke_all_for_user(
        &self,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked = TRUE, revoked_at = $2 \
             WHERE user_id = $1 AND revoked = FALSE",
        )
        .bind(user_id)
        .bind(at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
