use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tracing::error;
use validator::Validate;

use crate::application::pagination::PageRequest;
use crate::application::ports::user_repository::UserWriteError;
use crate::application::use_cases::follow::follow_user::{FollowOutcome, FollowUser};
use crate::application::use_cases::follow::unfollow_user::{UnfollowOutcome, UnfollowUser};
use crate::application::use_cases::profile::get_profile::GetProfile;
use crate::application::use_cases::profile::update_profile::UpdateProfile;
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::feed::PageQuery;
use crate::presentation::http::forms::{FormErrors, USERNAME_RE};
use crate::presentation::http::session::{self, CurrentUser, IncomingFlash};
use crate::presentation::views;

#[derive(Debug, Deserialize, Validate)]
pub struct EditProfileForm {
    #[validate(
        length(min = 3, max = 64, message = "Username must be 3 to 64 characters long."),
        regex(
            path = *USERNAME_RE,
            message = "Usernames may only contain letters, digits and underscores."
        )
    )]
    pub username: String,
    #[validate(length(max = 140, message = "About me is limited to 140 characters."))]
    #[serde(default)]
    pub about_me: String,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/user/:username", get(user_page))
        .route("/edit_profile", get(edit_profile_page).post(edit_profile_submit))
        .route("/follow/:username", get(follow))
        .route("/unfollow/:username", get(unfollow))
        .with_state(ctx)
}

async fn user_page(
    State(ctx): State<AppContext>,
    CurrentUser(viewer): CurrentUser,
    Path(username): Path<String>,
    Query(q): Query<PageQuery>,
    flash: IncomingFlash,
) -> Result<Response, StatusCode> {
    let req = PageRequest::from_param(q.page.as_deref(), ctx.cfg.posts_per_page);
    let users = ctx.user_repo();
    let posts = ctx.post_repo();
    let follows = ctx.follow_repo();
    let uc = GetProfile {
        users: users.as_ref(),
        posts: posts.as_ref(),
        follows: follows.as_ref(),
    };
    let view = uc
        .execute(viewer.id, &username, req)
        .await
        .map_err(|err| {
            error!(%username, error = ?err, "profile_load_failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    match view {
        Some(view) => Ok(session::render_page(
            &flash,
            views::profile::user_profile(&viewer, &flash.messages, &view),
        )),
        None => Ok((
            StatusCode::NOT_FOUND,
            views::errors::not_found(Some(&viewer)),
        )
            .into_response()),
    }
}

async fn edit_profile_page(
    CurrentUser(user): CurrentUser,
    flash: IncomingFlash,
) -> Response {
    session::render_page(
        &flash,
        views::profile::edit_profile(
            &user,
            &flash.messages,
            &user.username,
            &user.about_me,
            &FormErrors::default(),
        ),
    )
}

async fn edit_profile_submit(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    flash: IncomingFlash,
    Form(form): Form<EditProfileForm>,
) -> Result<Response, StatusCode> {
    let mut errors = form
        .validate()
        .err()
        .map(FormErrors::from)
        .unwrap_or_default();

    if errors.is_empty() {
        let repo = ctx.user_repo();
        let uc = UpdateProfile {
            repo: repo.as_ref(),
        };
        match uc
            .execute(user.id, form.username.trim(), form.about_me.trim())
            .await
        {
            Ok(()) => {
                return Ok(session::redirect_with_flash(
                    "/edit_profile",
                    "Your changes have been saved.",
                ));
            }
            Err(UserWriteError::UsernameTaken) => {
                errors.add("username", "Please use a different username.");
            }
            Err(err) => {
                error!(error = ?err, "profile_update_failed");
                return Err(StatusCode::INTERNAL_SERVER_ERROR);
            }
        }
    }

    Ok(session::render_page(
        &flash,
        views::profile::edit_profile(
            &user,
            &flash.messages,
            &form.username,
            &form.about_me,
            &errors,
        ),
    ))
}

async fn follow(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    Path(username): Path<String>,
) -> Result<Response, StatusCode> {
    let users = ctx.user_repo();
    let follows = ctx.follow_repo();
    let uc = FollowUser {
        users: users.as_ref(),
        follows: follows.as_ref(),
    };
    let outcome = uc.execute(user.id, &username).await.map_err(|err| {
        error!(%username, error = ?err, "follow_failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(match outcome {
        FollowOutcome::NotFound => {
            session::redirect_with_flash("/", &format!("User {username} not found."))
        }
        FollowOutcome::SelfFollow => session::redirect_with_flash(
            &format!("/user/{}", user.username),
            "You cannot follow yourself!",
        ),
        FollowOutcome::Followed(name) => session::redirect_with_flash(
            &format!("/user/{name}"),
            &format!("You are now following {name}!"),
        ),
    })
}

async fn unfollow(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    Path(username): Path<String>,
) -> Result<Response, StatusCode> {
    let users = ctx.user_repo();
    let follows = ctx.follow_repo();
    let uc = UnfollowUser {
        users: users.as_ref(),
        follows: follows.as_ref(),
    };
    let outcome = uc.execute(user.id, &username).await.map_err(|err| {
        error!(%username, error = ?err, "unfollow_failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(match outcome {
        UnfollowOutcome::NotFound => {
            session::redirect_with_flash("/", &format!("User {username} not found."))
        }
        UnfollowOutcome::SelfUnfollow => session::redirect_with_flash(
            &format!("/user/{}", user.username),
            "You cannot unfollow yourself!",
        ),
        UnfollowOutcome::Unfollowed(name) => session::redirect_with_flash(
            &format!("/user/{name}"),
            &format!("You are no longer following {name}."),
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn about_me_length_is_bounded() {
        let form = EditProfileForm {
            username: "alice".to_string(),
            about_me: "x".repeat(141),
        };
        let errors: FormErrors = form.validate().unwrap_err().into();
        assert!(!errors.field("about_me").is_empty());
    }

    #[test]
    fn empty_about_me_is_fine() {
        let form = EditProfileForm {
            username: "alice".to_string(),
            about_me: String::new(),
        };
        assert!(form.validate().is_ok());
    }
}
