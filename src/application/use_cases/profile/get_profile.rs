use uuid::Uuid;

use crate::application::pagination::{Page, PageRequest};
use crate::application::ports::follow_repository::{FollowCounts, FollowRepository};
use crate::application::ports::post_repository::PostRepository;
use crate::application::ports::user_repository::{UserRepository, UserRow};
use crate::domain::posts::post::Post;

pub struct ProfileView {
    pub user: UserRow,
    pub posts: Page<Post>,
    pub counts: FollowCounts,
    pub viewer_follows: bool,
    pub is_self: bool,
}

pub struct GetProfile<
    'a,
    U: UserRepository + ?Sized,
    P: PostRepository + ?Sized,
    F: FollowRepository + ?Sized,
> {
    pub users: &'a U,
    pub posts: &'a P,
    pub follows: &'a F,
}

impl<'a, U: UserRepository + ?Sized, P: PostRepository + ?Sized, F: FollowRepository + ?Sized>
    GetProfile<'a, U, P, F>
{
    pub async fn execute(
        &self,
        viewer_id: Uuid,
        username: &str,
        req: PageRequest,
    ) -> anyhow::Result<Option<ProfileView>> {
        let user = match self.users.find_by_username(username).await? {
            Some(u) => u,
            None => return Ok(None),
        };
        let total = self.posts.by_author_total(user.id).await?;
        let items = self
            .posts
            .by_author_window(user.id, req.limit(), req.offset())
            .await?;
        let counts = self.follows.counts(user.id).await?;
        let is_self = user.id == viewer_id;
        let viewer_follows = if is_self {
            false
        } else {
            self.follows.is_following(viewer_id, user.id).await?
        };
        Ok(Some(ProfileView {
            user: UserRow {
                password_hash: None,
                ..user
            },
            posts: Page::assemble(items, total, req),
            counts,
            viewer_follows,
            is_self,
        }))
    }
}
