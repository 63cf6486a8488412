use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use headers::{Authorization, HeaderMapExt, authorization::Bearer};

use crate::auth::SessionToken;
use crate::db::models::OperatorId;
use crate::error::DeskError;
use crate::router::DeskState;

pub const SESSION_COOKIE: &str = "dnsdesk_session";

/// Pull the session token from the request.
/// Accepts either:
/// - the encrypted `dnsdesk_session` cookie
/// - header: `Authorization: Bearer <token>`
pub fn session_token(headers: &HeaderMap, key: &Key) -> Option<String> {
    let jar = PrivateCookieJar::from_headers(headers, key.clone());
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_owned());
    }
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_owned())
}

/// Resolve the request's session to the signed-in operator.
pub async fn authenticate(headers: &HeaderMap, state: &DeskState) -> Result<OperatorId, DeskError> {
    let token = session_token(headers, &state.cookie_key).ok_or_else(DeskError::unauthorized)?;
    state.guard.verify(&token).await
}

/// Extractor for routes that need a signed-in operator. Rejects by
/// redirecting to the login page.
#[derive(Debug, Clone, Copy)]
pub struct RequireOperator(pub OperatorId);

impl FromRequestParts<DeskState> for RequireOperator {
    type Rejection = DeskError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &DeskState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(&parts.headers, state).await.map(Self)
    }
}

pub fn session_cookie(token: &SessionToken, ttl: chrono::Duration, insecure: bool) -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE, token.as_str().to_owned()))
        .path("/")
        .http_only(true)
        .secure(!insecure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(ttl.num_seconds()))
        .build()
}

pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::{AUTHORIZATION, COOKIE};

    fn key() -> Key {
        Key::from(&[7u8; 64])
    }

    #[test]
    fn bearer_header_is_accepted() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer abc.def".parse().expect("header"));
        assert_eq!(session_token(&headers, &key()).as_deref(), Some("abc.def"));
    }

    #[test]
    fn unencrypted_cookie_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, "dnsdesk_session=forged".parse().expect("header"));
        assert_eq!(session_token(&headers, &key()), None);
    }

    #[test]
    fn cookie_flags() {
        let token = SessionToken("t".into());
        let cookie = session_cookie(&token, chrono::Duration::minutes(30), false);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.max_age(), Some(time::Duration::minutes(30)));
        let relaxed = session_cookie(&token, chrono::Duration::minutes(30), true);
        assert_eq!(relaxed.secure(), Some(false));
    }
}
