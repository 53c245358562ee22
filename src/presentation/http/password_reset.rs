use axum::{
    Form, Router,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::get,
};
use serde::Deserialize;
use tracing::error;
use validator::Validate;

use crate::application::tokens::{self, TokenPurpose};
use crate::application::use_cases::password_reset::perform_reset::{
    PerformPasswordReset, ResetError,
};
use crate::application::use_cases::password_reset::request_reset::RequestPasswordReset;
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::forms::FormErrors;
use crate::presentation::http::session::{self, IncomingFlash, MaybeUser};
use crate::presentation::views;

#[derive(Debug, Deserialize, Validate)]
pub struct ResetRequestForm {
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordForm {
    #[validate(length(min = 8, message = "Password must be at least 8 characters long."))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match."))]
    pub password2: String,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route(
            "/reset_password_request",
            get(request_page).post(request_submit),
        )
        .route("/reset_password/:token", get(reset_page).post(reset_submit))
        .with_state(ctx)
}

async fn request_page(MaybeUser(user): MaybeUser, flash: IncomingFlash) -> Response {
    if user.is_some() {
        return session::redirect_to("/");
    }
    session::render_page(
        &flash,
        views::password_reset::request_reset(&flash.messages, "", &FormErrors::default()),
    )
}

async fn request_submit(
    State(ctx): State<AppContext>,
    MaybeUser(user): MaybeUser,
    flash: IncomingFlash,
    Form(form): Form<ResetRequestForm>,
) -> Result<Response, StatusCode> {
    if user.is_some() {
        return Ok(session::redirect_to("/"));
    }
    if let Err(errors) = form.validate() {
        return Ok(session::render_page(
            &flash,
            views::password_reset::request_reset(&flash.messages, &form.email, &errors.into()),
        ));
    }

    let users = ctx.user_repo();
    let mailer = ctx.mailer();
    let uc = RequestPasswordReset {
        users: users.as_ref(),
        mailer: mailer.as_ref(),
    };
    uc.execute(
        form.email.trim(),
        &ctx.cfg.secret_key,
        ctx.cfg.reset_token_expires_secs,
        &ctx.cfg.base_url,
    )
    .await
    .map_err(|err| {
        error!(error = ?err, "password_reset_request_failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    // Identical response whether or not the address matched an account.
    Ok(session::redirect_with_flash(
        "/login",
        "Check your email for the instructions to reset your password",
    ))
}

async fn reset_page(
    State(ctx): State<AppContext>,
    MaybeUser(user): MaybeUser,
    Path(token): Path<String>,
    flash: IncomingFlash,
) -> Result<Response, StatusCode> {
    if user.is_some() {
        return Ok(session::redirect_to("/"));
    }
    let user_id = match tokens::verify(&ctx.cfg.secret_key, &token, TokenPurpose::PasswordReset) {
        Some(id) => id,
        None => return Ok(session::redirect_to("/")),
    };
    let known = ctx
        .user_repo()
        .find_by_id(user_id)
        .await
        .map_err(|err| {
            error!(error = ?err, "password_reset_lookup_failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .is_some();
    if !known {
        return Ok(session::redirect_to("/"));
    }
    Ok(session::render_page(
        &flash,
        views::password_reset::reset_password(&flash.messages, &token, &FormErrors::default()),
    ))
}

async fn reset_submit(
    State(ctx): State<AppContext>,
    MaybeUser(user): MaybeUser,
    Path(token): Path<String>,
    flash: IncomingFlash,
    Form(form): Form<ResetPasswordForm>,
) -> Result<Response, StatusCode> {
    if user.is_some() {
        return Ok(session::redirect_to("/"));
    }
    if let Err(errors) = form.validate() {
        return Ok(session::render_page(
            &flash,
            views::password_reset::reset_password(&flash.messages, &token, &errors.into()),
        ));
    }

    let repo = ctx.user_repo();
    let uc = PerformPasswordReset {
        repo: repo.as_ref(),
    };
    match uc
        .execute(&token, &form.password, &ctx.cfg.secret_key)
        .await
    {
        Ok(()) => Ok(session::redirect_with_flash(
            "/login",
            "Your password has been reset.",
        )),
        // No detail about why the token was refused.
        Err(ResetError::InvalidToken) => Ok(session::redirect_to("/")),
        Err(ResetError::Other(err)) => {
            error!(error = ?err, "password_reset_failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_request_requires_a_plausible_email() {
        let form = ResetRequestForm {
            email: "nope".to_string(),
        };
        assert!(form.validate().is_err());

        let form = ResetRequestForm {
            email: "carol@example.com".to_string(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn new_password_confirmation_must_match() {
        let form = ResetPasswordForm {
            password: "long enough".to_string(),
            password2: "different!".to_string(),
        };
        assert!(form.validate().is_err());
    }
}
