use uuid::Uuid;

use crate::application::ports::follow_repository::FollowRepository;
use crate::application::ports::user_repository::UserRepository;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowOutcome {
    /// Edge present after the call; holds the followed username.
    Followed(String),
    NotFound,
    SelfFollow,
}

pub struct FollowUser<'a, U: UserRepository + ?Sized, F: FollowRepository + ?Sized> {
    pub users: &'a U,
    pub follows: &'a F,
}

impl<'a, U: UserRepository + ?Sized, F: FollowRepository + ?Sized> FollowUser<'a, U, F> {
    /// Idempotent: following an already-followed user leaves exactly one
    /// edge. Self-follow is rejected before the store is touched.
    pub async fn execute(&self, follower_id: Uuid, username: &str) -> anyhow::Result<FollowOutcome> {
        let target = match self.users.find_by_username(username).await? {
            Some(u) => u,
            None => return Ok(FollowOutcome::NotFound),
        };
        if target.id == follower_id {
            return Ok(FollowOutcome::SelfFollow);
        }
        self.follows.follow(follower_id, target.id).await?;
        Ok(FollowOutcome::Followed(target.username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::follow::unfollow_user::{UnfollowOutcome, UnfollowUser};
    use crate::application::ports::follow_repository::FollowCounts;
    use crate::application::ports::user_repository::{UserRow, UserWriteError};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;

    struct FixedUsers {
        rows: Vec<UserRow>,
    }

    fn row(id: Uuid, username: &str) -> UserRow {
        UserRow {
            id,
            username: username.to_string(),
            email: format!("{username}@example.com"),
            about_me: String::new(),
            last_seen: chrono::Utc::now(),
            password_hash: None,
        }
    }

    #[async_trait]
    impl UserRepository for FixedUsers {
        async fn create_user(
            &self,
            _username: &str,
            _email: &str,
            _password_hash: &str,
        ) -> Result<UserRow, UserWriteError> {
            unimplemented!()
        }
        async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<UserRow>> {
            Ok(self.rows.iter().find(|r| r.username == username).cloned())
        }
        async fn find_by_email(&self, _email: &str) -> anyhow::Result<Option<UserRow>> {
            Ok(None)
        }
        async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<UserRow>> {
            Ok(self.rows.iter().find(|r| r.id == id).cloned())
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
    struct EdgeSet {
        edges: Mutex<HashSet<(Uuid, Uuid)>>,
    }

    #[async_trait]
    impl FollowRepository for EdgeSet {
        async fn follow(&self, follower_id: Uuid, followed_id: Uuid) -> anyhow::Result<()> {
            self.edges.lock().unwrap().insert((follower_id, followed_id));
            Ok(())
        }
        async fn unfollow(&self, follower_id: Uuid, followed_id: Uuid) -> anyhow::Result<()> {
            self.edges.lock().unwrap().remove(&(follower_id, followed_id));
            Ok(())
        }
        async fn is_following(&self, follower_id: Uuid, followed_id: Uuid) -> anyhow::Result<bool> {
            Ok(self
                .edges
                .lock()
                .unwrap()
                .contains(&(follower_id, followed_id)))
        }
        async fn counts(&self, _user_id: Uuid) -> anyhow::Result<FollowCounts> {
            Ok(FollowCounts::default())
        }
    }

    #[tokio::test]
    async fn double_follow_leaves_one_edge() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let users = FixedUsers {
            rows: vec![row(alice, "alice"), row(bob, "bob")],
        };
        let follows = EdgeSet::default();
        let uc = FollowUser {
            users: &users,
            follows: &follows,
        };

        for _ in 0..2 {
            let outcome = uc.execute(alice, "bob").await.unwrap();
            assert_eq!(outcome, FollowOutcome::Followed("bob".to_string()));
        }
        assert_eq!(follows.edges.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn self_follow_is_rejected_without_touching_the_store() {
        let alice = Uuid::new_v4();
        let users = FixedUsers {
            rows: vec![row(alice, "alice")],
        };
        let follows = EdgeSet::default();
        let uc = FollowUser {
            users: &users,
            follows: &follows,
        };

        assert_eq!(uc.execute(alice, "alice").await.unwrap(), FollowOutcome::SelfFollow);
        assert!(follows.edges.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_target_reports_not_found() {
        let alice = Uuid::new_v4();
        let users = FixedUsers {
            rows: vec![row(alice, "alice")],
        };
        let follows = EdgeSet::default();
        let uc = FollowUser {
            users: &users,
            follows: &follows,
        };

        assert_eq!(uc.execute(alice, "ghost").await.unwrap(), FollowOutcome::NotFound);
    }

    #[tokio::test]
    async fn unfollow_of_absent_edge_is_a_no_op() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let users = FixedUsers {
            rows: vec![row(alice, "alice"), row(bob, "bob")],
        };
        let follows = EdgeSet::default();
        let uc = UnfollowUser {
            users: &users,
            follows: &follows,
        };

        let outcome = uc.execute(alice, "bob").await.unwrap();
        assert_eq!(outcome, UnfollowOutcome::Unfollowed("bob".to_string()));
        assert!(follows.edges.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn follow_then_unfollow_clears_the_edge() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let users = FixedUsers {
            rows: vec![row(alice, "alice"), row(bob, "bob")],
        };
        let follows = EdgeSet::default();

        let follow = FollowUser {
            users: &users,
            follows: &follows,
        };
        follow.execute(alice, "bob").await.unwrap();
        assert!(follows.is_following(alice, bob).await.unwrap());

        let unfollow = UnfollowUser {
            users: &users,
            follows: &follows,
        };
        unfollow.execute(alice, "bob").await.unwrap();
        assert!(!follows.is_following(alice, bob).await.unwrap());
    }
}
