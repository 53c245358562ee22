use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use base64::Engine as _;
use maud::Markup;
use tracing::error;

use crate::application::tokens::{self, TokenPurpose};
use crate::application::use_cases::auth::authenticate::Authenticate;
use crate::application::ports::user_repository::UserRow;
use crate::bootstrap::app_context::AppContext;

pub const SESSION_COOKIE: &str = "session";
pub const FLASH_COOKIE: &str = "flash";

// --- Cookie helpers ---

pub fn get_cookie(cookie_header: &str, name: &str) -> Option<String> {
    for part in cookie_header.split(';') {
        let kv = part.trim();
        if let Some((k, v)) = kv.split_once('=') {
            if k.trim() == name {
                return Some(v.trim().to_string());
            }
        }
    }
    None
}

/// `remember_max_age` present makes the cookie persistent across browser
/// restarts; absent leaves a browser-session cookie. The signed token inside
/// carries its own expiry either way.
pub fn session_cookie(token: &str, remember_max_age: Option<i64>, secure: bool) -> String {
    let secure_attr = if secure { "; Secure" } else { "" };
    let max_age = remember_max_age
        .map(|secs| format!("; Max-Age={}", secs.max(0)))
        .unwrap_or_default();
    format!("{SESSION_COOKIE}={token}; HttpOnly{secure_attr}; Path=/; SameSite=Lax{max_age}")
}

pub fn clear_session_cookie(secure: bool) -> String {
    let secure_attr = if secure { "; Secure" } else { "" };
    format!("{SESSION_COOKIE}=; HttpOnly{secure_attr}; Path=/; Max-Age=0; SameSite=Lax")
}

fn flash_cookie(messages: &[String]) -> String {
    let payload = serde_json::to_vec(messages).unwrap_or_default();
    let encoded = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(payload);
    format!("{FLASH_COOKIE}={encoded}; HttpOnly; Path=/; SameSite=Lax")
}

fn clear_flash_cookie() -> String {
    format!("{FLASH_COOKIE}=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax")
}

fn decode_flash(value: &str) -> Vec<String> {
    base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(value)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or_default()
}

// --- Redirect safety ---

/// A login `next` target is honored only when it stays on this host: a
/// single leading slash and no scheme. Anything else falls back to the home
/// page.
pub fn safe_next_path(next: Option<&str>) -> String {
    match next {
        Some(p)
            if p.starts_with('/')
                && !p.starts_with("//")
                && !p.starts_with("/\\")
                && !p.contains("://") =>
        {
            p.to_string()
        }
        _ => "/".to_string(),
    }
}

pub fn login_redirect_path(original: &str) -> String {
    format!("/login?next={}", urlencoding::encode(original))
}

// --- Response helpers ---

fn set_cookie(mut resp: Response, cookie: &str) -> Response {
    resp.headers_mut().append(
        axum::http::header::SET_COOKIE,
        axum::http::HeaderValue::from_str(cookie)
            .unwrap_or(axum::http::HeaderValue::from_static("")),
    );
    resp
}

pub fn redirect_to(to: &str) -> Response {
    Redirect::to(to).into_response()
}

pub fn redirect_with_flash(to: &str, message: &str) -> Response {
    let resp = Redirect::to(to).into_response();
    set_cookie(resp, &flash_cookie(&[message.to_string()]))
}

pub fn redirect_with_cookie(to: &str, cookie: &str) -> Response {
    let resp = Redirect::to(to).into_response();
    set_cookie(resp, cookie)
}

/// Renders a page and, when the request carried a flash cookie, clears it so
/// the messages show exactly once.
pub fn render_page(flash: &IncomingFlash, markup: Markup) -> Response {
    let resp = markup.into_response();
    if flash.present {
        set_cookie(resp, &clear_flash_cookie())
    } else {
        resp
    }
}

// --- Extractors ---

/// One-shot messages from the previous request, consumed by the next page
/// render.
#[derive(Debug, Default)]
pub struct IncomingFlash {
    pub messages: Vec<String>,
    present: bool,
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for IncomingFlash
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(axum::http::header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|hdr| get_cookie(hdr, FLASH_COOKIE));
        Ok(match raw {
            Some(value) => IncomingFlash {
                messages: decode_flash(&value),
                present: true,
            },
            None => IncomingFlash::default(),
        })
    }
}

fn session_user_id(parts: &Parts, ctx: &AppContext) -> Option<uuid::Uuid> {
    let hdr = parts
        .headers
        .get(axum::http::header::COOKIE)
        .and_then(|v| v.to_str().ok())?;
    let token = get_cookie(hdr, SESSION_COOKIE)?;
    tokens::verify(&ctx.cfg.secret_key, &token, TokenPurpose::Session)
}

/// The authenticated visitor. Loading it also stamps `last_seen`, so the
/// touch happens on every authenticated request before the handler runs.
/// Without a valid session the request is redirected to the login page with
/// the original target preserved in `next`.
pub struct CurrentUser(pub UserRow);

#[axum::async_trait]
impl axum::extract::FromRequestParts<AppContext> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let target = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/")
            .to_string();
        let user_id = match session_user_id(parts, ctx) {
            Some(id) => id,
            None => return Err(redirect_to(&login_redirect_path(&target))),
        };
        let repo = ctx.user_repo();
        let uc = Authenticate {
            repo: repo.as_ref(),
        };
        match uc.execute(user_id).await {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            Ok(None) => Err(redirect_to(&login_redirect_path(&target))),
            Err(err) => {
                error!(error = ?err, "session_authenticate_failed");
                Err(StatusCode::INTERNAL_SERVER_ERROR.into_response())
            }
        }
    }
}

/// Like `CurrentUser` but anonymous visitors pass through as `None`; used by
/// pages that redirect authenticated visitors home.
pub struct MaybeUser(pub Option<UserRow>);

#[axum::async_trait]
impl axum::extract::FromRequestParts<AppContext> for MaybeUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let user_id = match session_user_id(parts, ctx) {
            Some(id) => id,
            None => return Ok(MaybeUser(None)),
        };
        let repo = ctx.user_repo();
        let uc = Authenticate {
            repo: repo.as_ref(),
        };
        match uc.execute(user_id).await {
            Ok(row) => Ok(MaybeUser(row)),
            Err(err) => {
                error!(error = ?err, "session_authenticate_failed");
                Err(StatusCode::INTERNAL_SERVER_ERROR.into_response())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_header_parsing_finds_the_named_cookie() {
        let hdr = "a=1; session=tok.en.value; flash=xyz";
        assert_eq!(get_cookie(hdr, "session").as_deref(), Some("tok.en.value"));
        assert_eq!(get_cookie(hdr, "flash").as_deref(), Some("xyz"));
        assert_eq!(get_cookie(hdr, "missing"), None);
    }

    #[test]
    fn relative_next_paths_are_honored() {
        assert_eq!(safe_next_path(Some("/user/alice")), "/user/alice");
        assert_eq!(safe_next_path(Some("/explore?page=2")), "/explore?page=2");
    }

    #[test]
    fn offsite_next_targets_fall_back_home() {
        assert_eq!(safe_next_path(None), "/");
        assert_eq!(safe_next_path(Some("")), "/");
        assert_eq!(safe_next_path(Some("http://evil.example/")), "/");
        assert_eq!(safe_next_path(Some("https://evil.example/x")), "/");
        assert_eq!(safe_next_path(Some("//evil.example/x")), "/");
        assert_eq!(safe_next_path(Some("/\\evil.example")), "/");
        assert_eq!(safe_next_path(Some("user/alice")), "/");
    }

    #[test]
    fn flash_round_trips_through_the_cookie_value() {
        let messages = vec!["Your post is now live!".to_string()];
        let cookie = flash_cookie(&messages);
        let value = cookie
            .strip_prefix("flash=")
            .unwrap()
            .split(';')
            .next()
            .unwrap();
        assert_eq!(decode_flash(value), messages);
    }

    #[test]
    fn flash_decode_tolerates_garbage() {
        assert!(decode_flash("not-base64!").is_empty());
        assert!(decode_flash("").is_empty());
    }

    #[test]
    fn session_cookie_attributes() {
        let persistent = session_cookie("t", Some(3600), true);
        assert!(persistent.contains("HttpOnly"));
        assert!(persistent.contains("; Secure"));
        assert!(persistent.contains("Max-Age=3600"));

        let transient = session_cookie("t", None, false);
        assert!(transient.contains("HttpOnly"));
        assert!(!transient.contains("Secure"));
        assert!(!transient.contains("Max-Age"));

        let cleared = clear_session_cookie(false);
        assert!(cleared.contains("Max-Age=0"));
    }

    #[test]
    fn login_redirect_preserves_the_target() {
        assert_eq!(
            login_redirect_path("/user/alice?page=2"),
            "/login?next=%2Fuser%2Falice%3Fpage%3D2"
        );
    }
}
