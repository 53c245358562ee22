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

use crate::application::ports::user_repository::UserWriteError;
use crate::application::tokens::{self, TokenPurpose};
use crate::application::use_cases::auth::login::{Login as LoginUc, LoginRequest as LoginDto};
use crate::application::use_cases::auth::register::{
    Register as RegisterUc, RegisterRequest as RegisterDto,
};
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::forms::{FormErrors, USERNAME_RE};
use crate::presentation::http::session::{self, IncomingFlash, MaybeUser};
use crate::presentation::views;

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
    pub remember: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(
        length(min = 3, max = 64, message = "Username must be 3 to 64 characters long."),
        regex(
            path = *USERNAME_RE,
            message = "Usernames may only contain letters, digits and underscores."
        )
    )]
    pub username: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters long."))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match."))]
    pub password2: String,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/login", get(login_page).post(login_submit))
        .route("/logout", get(logout))
        .route("/register", get(register_page).post(register_submit))
        .with_state(ctx)
}

async fn login_page(
    MaybeUser(user): MaybeUser,
    Query(q): Query<NextQuery>,
    flash: IncomingFlash,
) -> Response {
    if user.is_some() {
        return session::redirect_to("/");
    }
    session::render_page(
        &flash,
        views::auth::login(&flash.messages, q.next.as_deref(), ""),
    )
}

async fn login_submit(
    State(ctx): State<AppContext>,
    MaybeUser(user): MaybeUser,
    Query(q): Query<NextQuery>,
    Form(form): Form<LoginForm>,
) -> Result<Response, StatusCode> {
    if user.is_some() {
        return Ok(session::redirect_to("/"));
    }
    let repo = ctx.user_repo();
    let uc = LoginUc {
        repo: repo.as_ref(),
    };
    let dto = LoginDto {
        username: form.username.trim().to_string(),
        password: form.password.clone(),
    };
    let row = uc.execute(&dto).await.map_err(|err| {
        error!(error = ?err, "login_failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    // One message for both unknown username and wrong password.
    let Some(user) = row else {
        return Ok(session::redirect_with_flash(
            "/login",
            "Invalid username or password",
        ));
    };

    let remember = form.remember.is_some();
    let ttl = if remember {
        ctx.cfg.remember_expires_secs
    } else {
        ctx.cfg.session_expires_secs
    };
    let token = tokens::issue(&ctx.cfg.secret_key, user.id, TokenPurpose::Session, ttl)
        .map_err(|err| {
            error!(error = ?err, "session_token_issue_failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    let cookie = session::session_cookie(&token, remember.then_some(ttl), ctx.cfg.cookie_secure());
    Ok(session::redirect_with_cookie(
        &session::safe_next_path(q.next.as_deref()),
        &cookie,
    ))
}

async fn logout(State(ctx): State<AppContext>) -> Response {
    session::redirect_with_cookie("/", &session::clear_session_cookie(ctx.cfg.cookie_secure()))
}

async fn register_page(MaybeUser(user): MaybeUser, flash: IncomingFlash) -> Response {
    if user.is_some() {
        return session::redirect_to("/");
    }
    session::render_page(
        &flash,
        views::auth::register(&flash.messages, "", "", &FormErrors::default()),
    )
}

async fn register_submit(
    State(ctx): State<AppContext>,
    MaybeUser(user): MaybeUser,
    flash: IncomingFlash,
    Form(form): Form<RegisterForm>,
) -> Result<Response, StatusCode> {
    if user.is_some() {
        return Ok(session::redirect_to("/"));
    }
    let mut errors = form
        .validate()
        .err()
        .map(FormErrors::from)
        .unwrap_or_default();

    if errors.is_empty() {
        let repo = ctx.user_repo();
        let uc = RegisterUc {
            repo: repo.as_ref(),
        };
        let dto = RegisterDto {
            username: form.username.trim().to_string(),
            email: form.email.trim().to_string(),
            password: form.password.clone(),
        };
        match uc.execute(&dto).await {
            Ok(_) => {
                return Ok(session::redirect_with_flash(
                    "/login",
                    "Congratulations, you are now a registered user!",
                ));
            }
            Err(UserWriteError::UsernameTaken) => {
                errors.add("username", "Please use a different username.");
            }
            Err(UserWriteError::EmailTaken) => {
                errors.add("email", "Please use a different email address.");
            }
            Err(UserWriteError::Other(err)) => {
                error!(error = ?err, "register_failed");
                return Err(StatusCode::INTERNAL_SERVER_ERROR);
            }
        }
    }

    Ok(session::render_page(
        &flash,
        views::auth::register(&flash.messages, &form.username, &form.email, &errors),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> RegisterForm {
        RegisterForm {
            username: "alice_99".to_string(),
            email: "alice@example.com".to_string(),
            password: "correct horse".to_string(),
            password2: "correct horse".to_string(),
        }
    }

    #[test]
    fn a_well_formed_registration_validates() {
        assert!(valid_form().validate().is_ok());
    }

    #[test]
    fn username_charset_is_enforced() {
        let mut form = valid_form();
        form.username = "alice smith".to_string();
        let errors: FormErrors = form.validate().unwrap_err().into();
        assert!(!errors.field("username").is_empty());
    }

    #[test]
    fn short_usernames_are_rejected() {
        let mut form = valid_form();
        form.username = "ab".to_string();
        assert!(form.validate().is_err());
    }

    #[test]
    fn malformed_email_is_rejected() {
        let mut form = valid_form();
        form.email = "not-an-email".to_string();
        let errors: FormErrors = form.validate().unwrap_err().into();
        assert!(!errors.field("email").is_empty());
    }

    #[test]
    fn password_confirmation_must_match() {
        let mut form = valid_form();
        form.password2 = "different".to_string();
        let errors: FormErrors = form.validate().unwrap_err().into();
        assert!(!errors.field("password2").is_empty());
    }

    #[test]
    fn short_passwords_are_rejected() {
        let mut form = valid_form();
        form.password = "short".to_string();
        form.password2 = "short".to_string();
        let errors: FormErrors = form.validate().unwrap_err().into();
        assert!(!errors.field("password").is_empty());
    }
}
