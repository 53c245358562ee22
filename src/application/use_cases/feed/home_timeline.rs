use uuid::Uuid;

use crate::application::pagination::{Page, PageRequest};
use crate::application::ports::post_repository::PostRepository;
use crate::domain::posts::post::Post;

/// The followed feed: the user's own posts plus posts from everyone they
/// follow, newest first.
pub struct HomeTimeline<'a, R: PostRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: PostRepository + ?Sized> HomeTimeline<'a, R> {
    pub async fn execute(&self, user_id: Uuid, req: PageRequest) -> anyhow::Result<Page<Post>> {
        let total = self.repo.timeline_total(user_id).await?;
        let items = self
            .repo
            .timeline_window(user_id, req.limit(), req.offset())
            .await?;
        Ok(Page::assemble(items, total, req))
    }
}
