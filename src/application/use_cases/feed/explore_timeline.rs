use crate::application::pagination::{Page, PageRequest};
use crate::application::ports::post_repository::PostRepository;
use crate::domain::posts::post::Post;

/// The global feed: every post in the system regardless of the follow graph.
pub struct ExploreTimeline<'a, R: PostRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: PostRepository + ?Sized> ExploreTimeline<'a, R> {
    pub async fn execute(&self, req: PageRequest) -> anyhow::Result<Page<Post>> {
        let total = self.repo.all_total().await?;
        let items = self.repo.all_window(req.limit(), req.offset()).await?;
        Ok(Page::assemble(items, total, req))
    }
}
