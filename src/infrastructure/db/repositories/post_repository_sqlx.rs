use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::application::ports::post_repository::PostRepository;
use crate::domain::posts::post::Post;
use crate::infrastructure::db::PgPool;

pub struct SqlxPostRepository {
    pub pool: PgPool,
}

impl SqlxPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_post(r: &sqlx::postgres::PgRow) -> Post {
    Post {
        id: r.get("id"),
        author_id: r.get("author_id"),
        author_username: r.get("author_username"),
        body: r.get("body"),
        created_at: r.get("created_at"),
    }
}

// Newest-first everywhere; the id tiebreak keeps pages stable when two posts
// share a timestamp.
const ORDER: &str = "ORDER BY p.created_at DESC, p.id DESC";

#[async_trait]
impl PostRepository for SqlxPostRepository {
    async fn create_post(&self, author_id: Uuid, body: &str) -> anyhow::Result<Post> {
        let row = sqlx::query(
            r#"WITH inserted AS (
                   INSERT INTO posts (author_id, body) VALUES ($1, $2)
                   RETURNING id, author_id, body, created_at
               )
               SELECT i.id, i.author_id, u.username AS author_username, i.body, i.created_at
               FROM inserted i JOIN users u ON u.id = i.author_id"#,
        )
        .bind(author_id)
        .bind(body)
        .fetch_one(&self.pool)
        .await?;
        Ok(row_to_post(&row))
    }

    async fn timeline_window(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Post>> {
        let sql = format!(
            r#"SELECT p.id, p.author_id, u.username AS author_username, p.body, p.created_at
               FROM posts p
               JOIN users u ON u.id = p.author_id
               WHERE p.author_id = $1
                  OR p.author_id IN (SELECT followed_id FROM follows WHERE follower_id = $1)
               {ORDER}
               LIMIT $2 OFFSET $3"#
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(row_to_post).collect())
    }

    async fn timeline_total(&self, user_id: Uuid) -> anyhow::Result<i64> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM posts p
               WHERE p.author_id = $1
                  OR p.author_id IN (SELECT followed_id FROM follows WHERE follower_id = $1)"#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    async fn all_window(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<Post>> {
        let sql = format!(
            r#"SELECT p.id, p.author_id, u.username AS author_username, p.body, p.created_at
               FROM posts p
               JOIN users u ON u.id = p.author_id
               {ORDER}
               LIMIT $1 OFFSET $2"#
        );
        let rows = sqlx::query(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(row_to_post).collect())
    }

    async fn all_total(&self) -> anyhow::Result<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn by_author_window(
        &self,
        author_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Post>> {
        let sql = format!(
            r#"SELECT p.id, p.author_id, u.username AS author_username, p.body, p.created_at
               FROM posts p
               JOIN users u ON u.id = p.author_id
               WHERE p.author_id = $1
               {ORDER}
               LIMIT $2 OFFSET $3"#
        );
        let rows = sqlx::query(&sql)
            .bind(author_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(row_to_post).collect())
    }

    async fn by_author_total(&self, author_id: Uuid) -> anyhow::Result<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}
