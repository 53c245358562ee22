use uuid::Uuid;

use crate::application::ports::post_repository::PostRepository;
use crate::domain::posts::post::Post;

pub struct ComposePost<'a, R: PostRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: PostRepository + ?Sized> ComposePost<'a, R> {
    pub async fn execute(&self, author_id: Uuid, body: &str) -> anyhow::Result<Post> {
        self.repo.create_post(author_id, body.trim()).await
    }
}
