use uuid::Uuid;

use crate::modules::users::core::user::User;
use crate::modules::users::errors::UsersError;
use crate::modules::users::service::UsersService;

impl UsersService {
    /// Resolves the user behind an access token.
    pub async fn current_user(&self, access_token: &str) -> Result<User, UsersError> {
        let claims = self
            .tokens
            .decode_access_token(access_token)
            .map_err(|_| UsersError::InvalidToken)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| UsersError::InvalidToken)?;
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(UsersError::UserNotFound)
    }
}
