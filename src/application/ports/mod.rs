pub mod follow_repository;
pub mod mailer;
pub mod post_repository;
pub mod user_repository;
