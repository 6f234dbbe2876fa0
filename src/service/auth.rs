use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::repo::{AuthRepository, UsersRepository};
use crate::types::BaseUser;

#[derive(Clone)]
pub struct AuthService {
    auth: AuthRepository,
    users: UsersRepository,
}

impl AuthService {
    pub fn new(auth: AuthRepository, users: UsersRepository) -> Self {
        Self { auth, users }
    }

    fn generate_token() -> String {
        Uuid::new_v4().simple().to_string()
    }

    /// Logs a user in by name, creating the account on first contact.
    /// Returns the bearer token and whether a new account was created.
    pub async fn login(&self, username: &str) -> AppResult<(String, bool)> {
        let user =
            self.users.get_user(&[UsersRepository::filter_by_username(username, true)]).await?;

        match user {
            // User doesn't exist, create it and its token
            None => {
                let user_id = self.users.create_user(username).await?;
                let token = Self::generate_token();
                self.auth.set_token(user_id, &token).await?;
                Ok((token, true))
            }
            Some(user) => {
                let token =
                    self.auth.get_token(&[UsersRepository::filter_by_user_id(user.id)]).await?;
                match token {
                    Some(token) => Ok((token, false)),
                    // Account predates token bookkeeping; mint one now
                    None => {
                        let token = Self::generate_token();
                        self.auth.set_token(user.id, &token).await?;
                        Ok((token, false))
                    }
                }
            }
        }
    }

    /// Resolves a bearer token to the user it identifies.
    pub async fn authorize(&self, token: &str) -> AppResult<BaseUser> {
        self.users
            .get_user(&[AuthRepository::with_tokens(), AuthRepository::filter_by_token(token)])
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid bearer token".to_string()))
    }
}
