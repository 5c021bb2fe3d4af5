// Refresh token records and the rotation decision.

use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub jti: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
    pub revoked_at: Option<DateTime<Utc>>,
    pub replaced_by_jti: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl RefreshToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshDecision {
    Rotate(RefreshToken),
    Unknown,
    Expired,
    /// A revoked token was presented again: the whole session family is burned.
    Reused { user_id: Uuid },
}

pub fn decide_refresh(stored: Option<RefreshToken>, now: DateTime<Utc>) -> RefreshDecision {
    match stored {
        None => RefreshDecision::Unknown,
        Some(token) if token.revoked => RefreshDecision::Reused {
            user_id: token.user_id,
        },
        Some(token) if token.is_expired(now) => RefreshDecision::Expired,
        Some(token) => RefreshDecision::Rotate(token),
    }
}
