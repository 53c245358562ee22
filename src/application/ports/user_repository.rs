use async_trait::async_trait;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub about_me: String,
    pub last_seen: chrono::DateTime<chrono::Utc>,
    pub password_hash: Option<String>,
}

/// Writes that can collide with the unique username/email columns carry a
/// typed error so callers can turn them into form-level messages instead of
/// a 500.
#[derive(thiserror::Error, Debug)]
pub enum UserWriteError {
    #[error("username already taken")]
    UsernameTaken,
    #[error("email already registered")]
    EmailTaken,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRow, UserWriteError>;
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<UserRow>>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRow>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<UserRow>>;
    async fn update_profile(
        &self,
        id: Uuid,
        username: &str,
        about_me: &str,
    ) -> Result<(), UserWriteError>;
    async fn update_password(&self, id: Uuid, password_hash: &str) -> anyhow::Result<()>;
    /// Concurrent touches race; the newest write wins.
    async fn touch_last_seen(&self, id: Uuid) -> anyhow::Result<()>;
}
