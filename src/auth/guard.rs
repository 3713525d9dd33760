use axum::response::{IntoResponse, Redirect, Response};
use log::debug;

use super::{Claims, Viewer};
use crate::views::Notice;

/// A page needs an identity the viewer does not have.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("you must be logged in")]
    LoginRequired,
    #[error("admin access required")]
    AdminRequired,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        debug!("Redirecting viewer: {}", self);
        let target = match self {
            AuthError::LoginRequired => Notice::LoginRequired.redirect_to("/login"),
            AuthError::AdminRequired => Notice::AdminRequired.redirect_to("/"),
        };
        Redirect::to(&target).into_response()
    }
}

pub fn require_user(viewer: &Viewer) -> Result<(&str, &Claims), AuthError> {
    match viewer {
        Viewer::Authenticated { token, claims } => Ok((token, claims)),
        Viewer::Anonymous => Err(AuthError::LoginRequired),
    }
}

pub fn require_admin(viewer: &Viewer) -> Result<(&str, &Claims), AuthError> {
    let (token, claims) = require_user(viewer)?;
    if !claims.is_admin {
        return Err(AuthError::AdminRequired);
    }
    Ok((token, claims))
}
