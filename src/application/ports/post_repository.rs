use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::posts::post::Post;

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create_post(&self, author_id: Uuid, body: &str) -> anyhow::Result<Post>;

    /// Posts authored by `user_id` or by anyone they follow, newest first.
    async fn timeline_window(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Post>>;
    async fn timeline_total(&self, user_id: Uuid) -> anyhow::Result<i64>;

    /// Every post in the system, newest first.
    async fn all_window(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<Post>>;
    async fn all_total(&self) -> anyhow::Result<i64>;

    /// Posts authored by a single user, newest first.
    async fn by_author_window(
        &self,
        author_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Post>>;
    async fn by_author_total(&self, author_id: Uuid) -> anyhow::Result<i64>;
}
