use uuid::Uuid;

use crate::application::ports::user_repository::{UserRepository, UserWriteError};

pub struct UpdateProfile<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> UpdateProfile<'a, R> {
    /// Renaming to a taken username surfaces as `UsernameTaken`, which the
    /// handler renders as a field error on the same form.
    pub async fn execute(
        &self,
        user_id: Uuid,
        username: &str,
        about_me: &str,
    ) -> Result<(), UserWriteError> {
        self.repo.update_profile(user_id, username, about_me).await
    }
}
