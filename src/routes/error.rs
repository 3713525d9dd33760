use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use log::{error, warn};

use crate::{
    api::ClientError,
    auth::{AuthError, Viewer},
    forms::FormError,
    views,
};

/// Why a page could not be shown.
#[derive(Debug)]
pub enum PageError {
    /// The viewer must log in (or be an admin) first.
    Auth(AuthError),
    Render(tera::Error),
    /// Shown to the user as an error page.
    Page {
        status: StatusCode,
        heading: &'static str,
        message: String,
        viewer: Viewer,
    },
}

impl PageError {
    pub fn page(
        viewer: &Viewer,
        status: StatusCode,
        heading: &'static str,
        message: impl Into<String>,
    ) -> PageError {
        PageError::Page {
            status,
            heading,
            message: message.into(),
            viewer: viewer.clone(),
        }
    }

    /// A failed backend call that left nothing to show.
    pub fn backend(viewer: &Viewer, err: &ClientError) -> PageError {
        match err.status() {
            Some(404) => PageError::page(viewer, StatusCode::NOT_FOUND, "Not found", err.to_string()),
            Some(status @ 400..=499) => PageError::page(
                viewer,
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_REQUEST),
                "Request refused",
                err.to_string(),
            ),
            _ => PageError::page(
                viewer,
                StatusCode::BAD_GATEWAY,
                "Something went wrong",
                err.to_string(),
            ),
        }
    }

    pub fn busy(viewer: &Viewer) -> PageError {
        PageError::page(
            viewer,
            StatusCode::CONFLICT,
            "Please wait",
            FormError::InFlight.to_string(),
        )
    }
}

impl From<AuthError> for PageError {
    fn from(err: AuthError) -> Self {
        PageError::Auth(err)
    }
}

impl From<tera::Error> for PageError {
    fn from(err: tera::Error) -> Self {
        PageError::Render(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::Auth(err) => err.into_response(),
            PageError::Render(err) => {
                error!("Failed to render page: {:?}", err);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
            PageError::Page {
                status,
                heading,
                message,
                viewer,
            } => {
                warn!("{} ({}): {}", heading, status, message);
                match views::error_page(&viewer, heading, &message) {
                    Ok(html) => (status, Html(html)).into_response(),
                    Err(err) => {
                        error!("Failed to render error page: {:?}", err);
                        status.into_response()
                    }
                }
            }
        }
    }
}

/// Status for a form that is shown again with an error.
pub fn form_status(err: &FormError) -> StatusCode {
    match err {
        FormError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        FormError::InFlight => StatusCode::CONFLICT,
        FormError::Api(err) => match err.status() {
            Some(status @ 400..=499) => {
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_REQUEST)
            }
            _ => StatusCode::BAD_GATEWAY,
        },
    }
}
