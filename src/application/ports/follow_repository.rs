use async_trait::async_trait;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default)]
pub struct FollowCounts {
    pub followers: i64,
    pub following: i64,
}

/// Directional follower -> followed edges. Both mutations are idempotent at
/// the store level: re-following an already-followed user and unfollowing an
/// absent edge are no-ops, never errors.
#[async_trait]
pub trait FollowRepository: Send + Sync {
    async fn follow(&self, follower_id: Uuid, followed_id: Uuid) -> anyhow::Result<()>;
    async fn unfollow(&self, follower_id: Uuid, followed_id: Uuid) -> anyhow::Result<()>;
    async fn is_following(&self, follower_id: Uuid, followed_id: Uuid) -> anyhow::Result<bool>;
    async fn counts(&self, user_id: Uuid) -> anyhow::Result<FollowCounts>;
}
