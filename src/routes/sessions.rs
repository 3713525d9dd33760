use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_macros::debug_handler;
use log::{debug, info};

use super::{form_status, PageError};
use crate::{
    auth::{SessionStore, Viewer},
    forms::{FormController, FormError, FormKind, LoginForm},
    model::AppState,
    views::{self, Notice, NoticeQuery},
};

#[debug_handler]
pub async fn login_page(
    viewer: Viewer,
    Query(notice): Query<NoticeQuery>,
) -> Result<Html<String>, PageError> {
    Ok(Html(views::login(&viewer, "", None, notice.banner())?))
}

#[debug_handler]
pub async fn login(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
    mut session: SessionStore,
    Form(form): Form<LoginForm>,
) -> Result<Response, PageError> {
    debug!("Got login request for user: {}", form.email.trim());

    let api = &state.api;
    let mut controller = FormController::new(
        FormKind::Login,
        form.email.trim().to_lowercase(),
        state.in_flight.clone(),
    );
    let result = controller
        .submit(&form, |credentials| async move { api.login(&credentials).await })
        .await;

    match result {
        Ok(response) => {
            info!("Logged in {}", form.email.trim());
            session.set_token(&response.access_token, state.config.session_ttl);
            Ok(session.apply(Redirect::to("/")))
        }
        Err(FormError::InFlight) => Err(PageError::busy(&viewer)),
        Err(err) => {
            debug!("Login failed for {}: {}", form.email.trim(), err);
            let html = views::login(&viewer, &form.email, Some(&err.to_string()), None)?;
            Ok((form_status(&err), Html(html)).into_response())
        }
    }
}

#[debug_handler]
pub async fn logout(mut session: SessionStore) -> Response {
    debug!("Logging out (had a session: {})", session.token().is_some());
    session.clear_token();
    session.apply(Redirect::to(&Notice::LoggedOut.redirect_to("/")))
}
