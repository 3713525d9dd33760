use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use log::warn;

use super::{claims, Claims, SessionStore};

/// Who is looking at the page, as far as the UI is concerned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Viewer {
    Anonymous,
    Authenticated { token: String, claims: Claims },
}

impl Viewer {
    /// A token that fails to decode is treated exactly like no token at all.
    pub fn resolve(session: &SessionStore) -> Viewer {
        let Some(token) = session.token() else {
            return Viewer::Anonymous;
        };

        match claims::decode(token) {
            Ok(claims) => Viewer::Authenticated {
                token: token.to_owned(),
                claims,
            },
            Err(err) => {
                warn!("Ignoring undecodable session token: {}", err);
                Viewer::Anonymous
            }
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Viewer::Anonymous => None,
            Viewer::Authenticated { token, .. } => Some(token),
        }
    }

    pub fn claims(&self) -> Option<&Claims> {
        match self {
            Viewer::Anonymous => None,
            Viewer::Authenticated { claims, .. } => Some(claims),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self, Viewer::Authenticated { .. })
    }

    pub fn is_admin(&self) -> bool {
        self.claims().is_some_and(|claims| claims.is_admin)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = SessionStore::from_request_parts(parts, state).await?;
        Ok(Viewer::resolve(&session))
    }
}
