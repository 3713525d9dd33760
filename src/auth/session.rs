use std::time::Duration;

use axum::{
    async_trait,
    extract::{FromRequestParts, TypedHeader},
    headers::Cookie,
    http::{header::SET_COOKIE, request::Parts, HeaderValue},
    response::{IntoResponse, Response},
};
use log::{error, trace};

pub const TOKEN_COOKIE: &str = "token";

/// The browser's `token` cookie, as seen by one request.
///
/// Writes are queued as `Set-Cookie` headers and only reach the browser once
/// [`SessionStore::apply`] is called on the outgoing response.
#[derive(Debug, Default)]
pub struct SessionStore {
    token: Option<String>,
    pending: Vec<String>,
}

impl SessionStore {
    pub fn from_cookies(cookies: Option<&Cookie>) -> SessionStore {
        let token = cookies
            .and_then(|cookies| cookies.get(TOKEN_COOKIE))
            .filter(|token| !token.is_empty())
            .map(str::to_owned);

        SessionStore {
            token,
            pending: Vec::new(),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, value: &str, max_age: Duration) {
        trace!("Setting session cookie for {}s", max_age.as_secs());
        self.pending.push(make_cookie(value, max_age.as_secs()));
        self.token = Some(value.to_owned());
    }

    pub fn clear_token(&mut self) {
        trace!("Clearing session cookie");
        self.pending.push(make_cookie("", 0));
        self.token = None;
    }

    /// Attach every queued cookie write to `response`.
    pub fn apply(self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        for cookie in self.pending {
            match HeaderValue::from_str(&cookie) {
                Ok(value) => {
                    response.headers_mut().append(SET_COOKIE, value);
                }
                Err(err) => error!("Refusing to send malformed session cookie: {}", err),
            }
        }
        response
    }
}

fn make_cookie(value: &str, max_age: u64) -> String {
    format!(
        // In production, the secure flag should be present
        "{}={}; Max-Age={}; Path=/; SameSite=Lax; HttpOnly",
        TOKEN_COOKIE, value, max_age,
    )
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionStore
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let cookies = Option::<TypedHeader<Cookie>>::from_request_parts(parts, state).await?;
        Ok(SessionStore::from_cookies(
            cookies.as_ref().map(|TypedHeader(cookies)| cookies),
        ))
    }
}
