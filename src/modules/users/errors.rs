use thiserror::Error;

use crate::shared::core::errors::AppError;
use crate::shared::core::security::SecurityError;
use crate::shared::infrastructure::repository::RepositoryError;

#[derive(Debug, Error)]
pub enum UsersError {
    #[error("Invalid email address.")]
    InvalidEmail,

    #[error("Password must be at least 8 characters long.")]
    WeakPassword,

    #[error("Email already registered.")]
    EmailAlreadyRegistered,

    #[error("Invalid credentials.")]
    InvalidCredentials,

    #[error("Invalid refresh token.")]
    InvalidRefreshToken,

    #[error("Refresh token expired.")]
    RefreshTokenExpired,

    #[error("Refresh token revoked.")]
    RefreshTokenRevoked,

    #[error("Missing bearer token.")]
    MissingToken,

    #[error("Invalid or expired access token.")]
    InvalidToken,

    #[error("User not found.")]
    UserNotFound,

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Security(#[from] SecurityError),
}

impl UsersError {
    pub fn code(&self) -> &'static str {
        match self {
            UsersError::InvalidEmail => "INVALID_EMAIL",
            UsersError::WeakPassword => "WEAK_PASSWORD",
            UsersError::EmailAlreadyRegistered => "EMAIL_ALREADY_REGISTERED",
            UsersError::InvalidCredentials => "INVALID_CREDENTIALS",
            UsersError::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            UsersError::RefreshTokenExpired => "REFRESH_TOKEN_EXPIRED",
            UsersError::RefreshTokenRevoked => "REFRESH_TOKEN_REVOKED",
            UsersError::MissingToken => "MISSING_TOKEN",
            UsersError::InvalidToken => "INVALID_TOKEN",
            UsersError::UserNotFound => "USER_NOT_FOUND",
            UsersError::Repository(_) | UsersError::Security(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<UsersError> for AppError {
    fn from(error: UsersError) -> Self {
        let code = error.code();
        match error {
            UsersError::InvalidEmail | UsersError::WeakPassword => {
                AppError::unprocessable(code, error.to_string())
            }
            UsersError::EmailAlreadyRegistered => AppError::bad_request(code, error.to_string()),
            UsersError::InvalidCredentials
            | UsersError::InvalidRefreshToken
            | UsersError::RefreshTokenExpired
            | UsersError::RefreshTokenRevoked
            | UsersError::MissingToken
            | UsersError::InvalidToken
            | UsersError::UserNotFound => AppError::unauthorized(code, error.to_string()),
            UsersError::Repository(_) | UsersError::Security(_) => {
                AppError::internal(code, error.to_string())
            }
        }
    }
}
