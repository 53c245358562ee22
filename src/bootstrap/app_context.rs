use std::sync::Arc;

use crate::application::ports::follow_repository::FollowRepository;
use crate::application::ports::mailer::Mailer;
use crate::application::ports::post_repository::PostRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::bootstrap::config::Config;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

pub struct AppServices {
    user_repo: Arc<dyn UserRepository>,
    post_repo: Arc<dyn PostRepository>,
    follow_repo: Arc<dyn FollowRepository>,
    mailer: Arc<dyn Mailer>,
}

impl AppServices {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        post_repo: Arc<dyn PostRepository>,
        follow_repo: Arc<dyn FollowRepository>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            user_repo,
            post_repo,
            follow_repo,
            mailer,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        self.services.user_repo.clone()
    }

    pub fn post_repo(&self) -> Arc<dyn PostRepository> {
        self.services.post_repo.clone()
    }

    pub fn follow_repo(&self) -> Arc<dyn FollowRepository> {
        self.services.follow_repo.clone()
    }

    pub fn mailer(&self) -> Arc<dyn Mailer> {
        self.services.mailer.clone()
    }
}
