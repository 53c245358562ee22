use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString},
};
use password_hash::rand_core::OsRng;

use crate::application::ports::user_repository::UserRepository;
use crate::application::tokens::{self, TokenPurpose};

#[derive(thiserror::Error, Debug)]
pub enum ResetError {
    /// Bad signature, expired, wrong purpose, or a user that no longer
    /// resolves. Callers redirect without saying which.
    #[error("invalid or expired reset token")]
    InvalidToken,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub struct PerformPasswordReset<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> PerformPasswordReset<'a, R> {
    pub async fn execute(
        &self,
        token: &str,
        new_password: &str,
        secret: &str,
    ) -> Result<(), ResetError> {
        let user_id = tokens::verify(secret, token, TokenPurpose::PasswordReset)
            .ok_or(ResetError::InvalidToken)?;
        let user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(ResetError::InvalidToken)?;

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(new_password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!(e.to_string()))?
            .to_string();
        self.repo.update_password(user.id, &hash).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::user_repository::{UserRow, UserWriteError};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use uuid::Uuid;

    struct StoredUser {
        row: UserRow,
        new_hash: Mutex<Option<String>>,
    }

    #[async_trait]
    impl UserRepository for StoredUser {
        async fn create_user(
            &self,
            _username: &str,
            _email: &str,
            _password_hash: &str,
        ) -> Result<UserRow, UserWriteError> {
            unimplemented!()
        }
        async fn find_by_username(&self, _username: &str) -> anyhow::Result<Option<UserRow>> {
            Ok(None)
        }
        async fn find_by_email(&self, _email: &str) -> anyhow::Result<Option<UserRow>> {
            Ok(None)
        }
        async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<UserRow>> {
            Ok((self.row.id == id).then(|| self.row.clone()))
        }
        async fn update_profile(
            &self,
            _id: Uuid,
            _username: &str,
            _about_me: &str,
        ) -> Result<(), UserWriteError> {
            unimplemented!()
        }
        async fn update_password(&self, _id: Uuid, password_hash: &str) -> anyhow::Result<()> {
            *self.new_hash.lock().unwrap() = Some(password_hash.to_string());
            Ok(())
        }
        async fn touch_last_seen(&self, _id: Uuid) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn dave() -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            username: "dave".to_string(),
            email: "dave@example.com".to_string(),
            about_me: String::new(),
            last_seen: chrono::Utc::now(),
            password_hash: None,
        }
    }

    const SECRET: &str = "s3cret";

    #[tokio::test]
    async fn valid_token_rewrites_the_password_hash() {
        let repo = StoredUser {
            row: dave(),
            new_hash: Mutex::new(None),
        };
        let token = tokens::issue(SECRET, repo.row.id, TokenPurpose::PasswordReset, 600).unwrap();
        let uc = PerformPasswordReset { repo: &repo };

        uc.execute(&token, "new-password", SECRET).await.unwrap();

        let stored = repo.new_hash.lock().unwrap().clone().unwrap();
        assert!(stored.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let repo = StoredUser {
            row: dave(),
            new_hash: Mutex::new(None),
        };
        let token = tokens::issue(SECRET, repo.row.id, TokenPurpose::PasswordReset, -60).unwrap();
        let uc = PerformPasswordReset { repo: &repo };

        let err = uc.execute(&token, "new-password", SECRET).await.unwrap_err();
        assert!(matches!(err, ResetError::InvalidToken));
        assert!(repo.new_hash.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn token_for_a_vanished_user_is_rejected() {
        let repo = StoredUser {
            row: dave(),
            new_hash: Mutex::new(None),
        };
        let token =
            tokens::issue(SECRET, Uuid::new_v4(), TokenPurpose::PasswordReset, 600).unwrap();
        let uc = PerformPasswordReset { repo: &repo };

        let err = uc.execute(&token, "new-password", SECRET).await.unwrap_err();
        assert!(matches!(err, ResetError::InvalidToken));
    }

    #[tokio::test]
    async fn session_token_cannot_reset_a_password() {
        let repo = StoredUser {
            row: dave(),
            new_hash: Mutex::new(None),
        };
        let token = tokens::issue(SECRET, repo.row.id, TokenPurpose::Session, 600).unwrap();
        let uc = PerformPasswordReset { repo: &repo };

        let err = uc.execute(&token, "new-password", SECRET).await.unwrap_err();
        assert!(matches!(err, ResetError::InvalidToken));
    }
}
