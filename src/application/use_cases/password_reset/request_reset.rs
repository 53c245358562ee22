use crate::application::ports::mailer::Mailer;
use crate::application::ports::user_repository::UserRepository;
use crate::application::tokens::{self, TokenPurpose};

pub struct RequestPasswordReset<'a, U: UserRepository + ?Sized, M: Mailer + ?Sized> {
    pub users: &'a U,
    pub mailer: &'a M,
}

impl<'a, U: UserRepository + ?Sized, M: Mailer + ?Sized> RequestPasswordReset<'a, U, M> {
    /// Completes without distinction whether or not the email matches an
    /// account; only a match sends mail. Callers show one message either way.
    pub async fn execute(
        &self,
        email: &str,
        secret: &str,
        ttl_secs: i64,
        base_url: &str,
    ) -> anyhow::Result<()> {
        let user = match self.users.find_by_email(email).await? {
            Some(u) => u,
            None => return Ok(()),
        };
        let token = tokens::issue(secret, user.id, TokenPurpose::PasswordReset, ttl_secs)?;
        let link = format!("{}/reset_password/{}", base_url.trim_end_matches('/'), token);
        let minutes = (ttl_secs / 60).max(1);
        let body = format!(
            "Dear {},\n\n\
             To reset your password visit the following link:\n\n\
             {}\n\n\
             The link expires in {} minutes. If you have not requested a \
             password reset simply ignore this message.\n\n\
             Sincerely,\n\nThe ripple team",
            user.username, link, minutes
        );
        self.mailer
            .send(&user.email, "[ripple] Reset Your Password", &body)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::user_repository::{UserRow, UserWriteError};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use uuid::Uuid;

    struct OneUser {
        row: UserRow,
    }

    #[async_trait]
    impl UserRepository for OneUser {
        async fn create_user(
            &self,
            _username: &str,
            _email: &str,
            _password_hash: &str,
        ) -> Result<UserRow, UserWriteError> {
            unimplemented!()
        }
        async fn find_by_username(&self, _username: &str) -> anyhow::Result<Option<UserRow>> {
            Ok(None)
        }
        async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRow>> {
            Ok((self.row.email == email).then(|| self.row.clone()))
        }
        async fn find_by_id(&self, _id: Uuid) -> anyhow::Result<Option<UserRow>> {
            Ok(None)
        }
        async fn update_profile(
            &self,
            _id: Uuid,
            _username: &str,
            _about_me: &str,
        ) -> Result<(), UserWriteError> {
            unimplemented!()
        }
        async fn update_password(&self, _id: Uuid, _password_hash: &str) -> anyhow::Result<()> {
            unimplemented!()
        }
        async fn touch_last_seen(&self, _id: Uuid) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct Outbox {
        sent: Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait]
    impl Mailer for Outbox {
        async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()> {
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), subject.to_string(), body.to_string()));
            Ok(())
        }
    }

    fn carol() -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            username: "carol".to_string(),
            email: "carol@example.com".to_string(),
            about_me: String::new(),
            last_seen: chrono::Utc::now(),
            password_hash: None,
        }
    }

    #[tokio::test]
    async fn matching_email_sends_a_reset_link() {
        let users = OneUser { row: carol() };
        let outbox = Outbox::default();
        let uc = RequestPasswordReset {
            users: &users,
            mailer: &outbox,
        };

        uc.execute("carol@example.com", "s3cret", 600, "http://localhost:8080/")
            .await
            .unwrap();

        let sent = outbox.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let (to, subject, body) = &sent[0];
        assert_eq!(to, "carol@example.com");
        assert_eq!(subject, "[ripple] Reset Your Password");
        assert!(body.contains("http://localhost:8080/reset_password/"));
    }

    #[tokio::test]
    async fn unknown_email_sends_nothing_and_still_succeeds() {
        let users = OneUser { row: carol() };
        let outbox = Outbox::default();
        let uc = RequestPasswordReset {
            users: &users,
            mailer: &outbox,
        };

        uc.execute("nobody@example.com", "s3cret", 600, "http://localhost:8080")
            .await
            .unwrap();

        assert!(outbox.sent.lock().unwrap().is_empty());
    }
}
