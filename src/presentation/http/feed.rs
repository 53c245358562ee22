use axum::{
    Form, Router,
    extract::{Query, State},
    http::StatusCode,
    response::Response,
    routing::get,
};
use serde::Deserialize;
use tracing::error;
use validator::Validate;

use crate::application::pagination::PageRequest;
use crate::application::use_cases::feed::compose_post::ComposePost;
use crate::application::use_cases::feed::explore_timeline::ExploreTimeline;
use crate::application::use_cases::feed::home_timeline::HomeTimeline;
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::forms::FormErrors;
use crate::presentation::http::session::{self, CurrentUser, IncomingFlash};
use crate::presentation::views;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PostForm {
    #[validate(length(min = 1, max = 280, message = "Posts must be 1 to 280 characters long."))]
    pub body: String,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/", get(index_page).post(index_submit))
        .route("/index", get(index_page).post(index_submit))
        .route("/explore", get(explore_page))
        .with_state(ctx)
}

async fn index_page(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    Query(q): Query<PageQuery>,
    flash: IncomingFlash,
) -> Result<Response, StatusCode> {
    let req = PageRequest::from_param(q.page.as_deref(), ctx.cfg.posts_per_page);
    let repo = ctx.post_repo();
    let uc = HomeTimeline {
        repo: repo.as_ref(),
    };
    let posts = uc.execute(user.id, req).await.map_err(|err| {
        error!(error = ?err, "home_timeline_failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(session::render_page(
        &flash,
        views::feed::home(&user, &flash.messages, "", &FormErrors::default(), &posts),
    ))
}

async fn index_submit(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    flash: IncomingFlash,
    Form(form): Form<PostForm>,
) -> Result<Response, StatusCode> {
    let trimmed = form.body.trim().to_string();
    let errors = PostForm {
        body: trimmed.clone(),
    }
    .validate()
    .err()
    .map(FormErrors::from)
    .unwrap_or_default();

    if !errors.is_empty() {
        // Re-render the first feed page with the entered text and messages.
        let repo = ctx.post_repo();
        let uc = HomeTimeline {
            repo: repo.as_ref(),
        };
        let posts = uc
            .execute(user.id, PageRequest::new(1, ctx.cfg.posts_per_page))
            .await
            .map_err(|err| {
                error!(error = ?err, "home_timeline_failed");
                StatusCode::INTERNAL_SERVER_ERROR
            })?;
        return Ok(session::render_page(
            &flash,
            views::feed::home(&user, &flash.messages, &form.body, &errors, &posts),
        ));
    }

    let repo = ctx.post_repo();
    let uc = ComposePost {
        repo: repo.as_ref(),
    };
    uc.execute(user.id, &trimmed).await.map_err(|err| {
        error!(error = ?err, "compose_post_failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(session::redirect_with_flash("/", "Your post is now live!"))
}

async fn explore_page(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    Query(q): Query<PageQuery>,
    flash: IncomingFlash,
) -> Result<Response, StatusCode> {
    let req = PageRequest::from_param(q.page.as_deref(), ctx.cfg.posts_per_page);
    let repo = ctx.post_repo();
    let uc = ExploreTimeline {
        repo: repo.as_ref(),
    };
    let posts = uc.execute(req).await.map_err(|err| {
        error!(error = ?err, "explore_timeline_failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(session::render_page(
        &flash,
        views::feed::explore(&user, &flash.messages, &posts),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_posts_are_rejected() {
        let form = PostForm {
            body: String::new(),
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn overlong_posts_are_rejected() {
        let form = PostForm {
            body: "x".repeat(281),
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn a_short_post_validates() {
        let form = PostForm {
            body: "hello world".to_string(),
        };
        assert!(form.validate().is_ok());
    }
}
