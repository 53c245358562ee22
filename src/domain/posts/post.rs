use uuid::Uuid;

/// A single micro-blog entry, joined with its author's username for display.
/// The author is set at creation and never changes.
#[derive(Debug, Clone)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    pub body: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
