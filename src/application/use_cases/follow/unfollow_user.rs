use uuid::Uuid;

use crate::application::ports::follow_repository::FollowRepository;
use crate::application::ports::user_repository::UserRepository;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnfollowOutcome {
    /// Edge absent after the call; holds the unfollowed username.
    Unfollowed(String),
    NotFound,
    SelfUnfollow,
}

pub struct UnfollowUser<'a, U: UserRepository + ?Sized, F: FollowRepository + ?Sized> {
    pub users: &'a U,
    pub follows: &'a F,
}

impl<'a, U: UserRepository + ?Sized, F: FollowRepository + ?Sized> UnfollowUser<'a, U, F> {
    /// Idempotent: unfollowing a user who was never followed is a no-op.
    pub async fn execute(
        &self,
        follower_id: Uuid,
        username: &str,
    ) -> anyhow::Result<UnfollowOutcome> {
        let target = match self.users.find_by_username(username).await? {
            Some(u) => u,
            None => return Ok(UnfollowOutcome::NotFound),
        };
        if target.id == follower_id {
            return Ok(UnfollowOutcome::SelfUnfollow);
        }
        self.follows.unfollow(follower_id, target.id).await?;
        Ok(UnfollowOutcome::Unfollowed(target.username))
    }
}
