use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::modules::users::errors::UsersError;

pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub hashed_password: String,
    pub created_at: DateTime<Utc>,
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

/// Checks sign-up input and returns the canonical email.
pub fn decide_sign_up(raw_email: &str, password: &str) -> Result<String, UsersError> {
    let email = normalize_email(raw_email);
    if !is_valid_email(&email) {
        return Err(UsersError::InvalidEmail);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(UsersError::WeakPassword);
    }
    Ok(email)
}
