use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Signed-payload-with-expiry primitive backing both the session cookie and
/// the emailed password-reset link. HS256 over {sub, purpose, exp}; a token
/// minted for one purpose never verifies for another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPurpose {
    Session,
    PasswordReset,
}

impl TokenPurpose {
    fn as_str(&self) -> &'static str {
        match self {
            TokenPurpose::Session => "session",
            TokenPurpose::PasswordReset => "password_reset",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub purpose: String,
    pub exp: usize,
}

pub fn issue(
    secret: &str,
    user_id: Uuid,
    purpose: TokenPurpose,
    ttl_secs: i64,
) -> anyhow::Result<String> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        purpose: purpose.as_str().to_string(),
        exp: (now + ttl_secs).max(0) as usize,
    };
    let token = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// Returns the user id when the signature checks out, the token has not
/// expired, and the purpose matches. Any failure is `None`; callers never
/// learn why a token was rejected.
pub fn verify(secret: &str, token: &str, purpose: TokenPurpose) -> Option<Uuid> {
    let mut validation = Validation::default();
    validation.leeway = 0;
    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .ok()?;
    if data.claims.purpose != purpose.as_str() {
        return None;
    }
    Uuid::parse_str(&data.claims.sub).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn round_trips_within_validity_window() {
        let id = Uuid::new_v4();
        let token = issue(SECRET, id, TokenPurpose::PasswordReset, 600).unwrap();
        assert_eq!(verify(SECRET, &token, TokenPurpose::PasswordReset), Some(id));
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let id = Uuid::new_v4();
        let token = issue(SECRET, id, TokenPurpose::PasswordReset, -120).unwrap();
        assert_eq!(verify(SECRET, &token, TokenPurpose::PasswordReset), None);
    }

    #[test]
    fn purpose_mismatch_is_rejected() {
        let id = Uuid::new_v4();
        let session = issue(SECRET, id, TokenPurpose::Session, 600).unwrap();
        assert_eq!(verify(SECRET, &session, TokenPurpose::PasswordReset), None);

        let reset = issue(SECRET, id, TokenPurpose::PasswordReset, 600).unwrap();
        assert_eq!(verify(SECRET, &reset, TokenPurpose::Session), None);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let id = Uuid::new_v4();
        let token = issue(SECRET, id, TokenPurpose::Session, 600).unwrap();
        assert_eq!(verify("other-secret", &token, TokenPurpose::Session), None);
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(verify(SECRET, "not-a-token", TokenPurpose::Session), None);
        assert_eq!(verify(SECRET, "", TokenPurpose::PasswordReset), None);
    }
}
