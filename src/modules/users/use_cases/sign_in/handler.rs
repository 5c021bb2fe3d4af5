use crate::modules::users::core::user::normalize_email;
use crate::modules::users::errors::UsersError;
use crate::modules::users::service::{TokenPair, UsersService};

impl UsersService {
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<TokenPair, UsersError> {
        let email = normalize_email(email);
        let Some(user) = self.users.find_by_email(&email).await? else {
            tracing::warn!("sign-in rejected: unknown email");
            return Err(UsersError::InvalidCredentials);
        };
        if !self.verify_password(password, &user.hashed_password).await {
            tracing::warn!(user_id = %user.id, "sign-in rejected: wrong password");
            return Err(UsersError::InvalidCredentials);
        }
        self.issue_token_pair(&user).await
    }
}

#[cfg(test)]
mod sign_in_handler_tests {
    use crate::modules::users::errors::UsersError;
    use crate::tests::fixtures::users::make_users_service;
    use rstest::rstest;

    #[rstest]
    #[case("signin@example.com")]
    #[case(" SIGNIN@example.com ")]
    #[tokio::test]
    async fn it_should_issue_tokens_for_valid_credentials(#[case] login_email: &str) {
        let (service, _) = make_users_service();
        service
            .sign_up("signin@example.com", "StrongPass123!")
            .await
            .unwrap();
        let pair = service.sign_in(login_email, "StrongPass123!").await.unwrap();
        assert_eq!(pair.token_type, "bearer");
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_reject_a_wrong_password() {
        let (service, _) = make_users_service();
        service
            .sign_up("wrong@example.com", "StrongPass123!")
            .await
            .unwrap();
        let result = service.sign_in("wrong@example.com", "WrongPass!").await;
        assert!(matches!(result, Err(UsersError::InvalidCredentials)));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_reject_an_unknown_email() {
        let (service, _) = make_users_service();
        let result = service.sign_in("nobody@example.com", "StrongPass123!").await;
        assert!(matches!(result, Err(UsersError::InvalidCredentials)));
    }
}
