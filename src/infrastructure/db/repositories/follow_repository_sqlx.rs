use async_trait::async_trait;
use uuid::Uuid;

use crate::application::ports::follow_repository::{FollowCounts, FollowRepository};
use crate::infrastructure::db::PgPool;

pub struct SqlxFollowRepository {
    pub pool: PgPool,
}

impl SqlxFollowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FollowRepository for SqlxFollowRepository {
    async fn follow(&self, follower_id: Uuid, followed_id: Uuid) -> anyhow::Result<()> {
        // Idempotent under the (follower_id, followed_id) primary key.
        sqlx::query(
            r#"INSERT INTO follows (follower_id, followed_id) VALUES ($1, $2)
               ON CONFLICT DO NOTHING"#,
        )
        .bind(follower_id)
        .bind(followed_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn unfollow(&self, follower_id: Uuid, followed_id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followed_id = $2")
            .bind(follower_id)
            .bind(followed_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn is_following(&self, follower_id: Uuid, followed_id: Uuid) -> anyhow::Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(
                   SELECT 1 FROM follows WHERE follower_id = $1 AND followed_id = $2
               )"#,
        )
        .bind(follower_id)
        .bind(followed_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn counts(&self, user_id: Uuid) -> anyhow::Result<FollowCounts> {
        let followers =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE followed_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        let following =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE follower_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(FollowCounts {
            followers,
            following,
        })
    }
}
