use uuid::Uuid;

use crate::application::ports::user_repository::{UserRepository, UserRow};

/// Resolves the session subject to a live user row and records the visit.
/// The last-seen touch happens here, before any handler body runs.
pub struct Authenticate<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> Authenticate<'a, R> {
    pub async fn execute(&self, id: Uuid) -> anyhow::Result<Option<UserRow>> {
        let row = match self.repo.find_by_id(id).await? {
            Some(r) => r,
            None => return Ok(None),
        };
        self.repo.touch_last_seen(id).await?;
        Ok(Some(UserRow {
            password_hash: None,
            ..row
        }))
    }
}
