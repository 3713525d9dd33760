use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_macros::debug_handler;
use log::info;

use super::{form_status, PageError};
use crate::{
    auth::Viewer,
    forms::{FormController, FormError, FormKind, UserForm},
    model::AppState,
    views::{self, Notice},
};

#[debug_handler]
pub async fn page(viewer: Viewer) -> Result<Html<String>, PageError> {
    Ok(Html(views::register(&viewer, &UserForm::default(), None)?))
}

#[debug_handler]
pub async fn register(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
    Form(form): Form<UserForm>,
) -> Result<Response, PageError> {
    let form = form.for_registration();
    let api = &state.api;
    let mut controller = FormController::new(
        FormKind::Register,
        form.email.trim().to_lowercase(),
        state.in_flight.clone(),
    );

    // Self-registration is never authenticated
    let result = controller
        .submit(&form, |user| async move { api.create_user(&user, None).await })
        .await;

    match result {
        Ok(()) => {
            info!("Registered {}", form.email.trim());
            Ok(Redirect::to(&Notice::Registered.redirect_to("/login")).into_response())
        }
        Err(FormError::InFlight) => Err(PageError::busy(&viewer)),
        Err(err) => {
            let html = views::register(&viewer, &form, Some(&err.to_string()))?;
            Ok((form_status(&err), Html(html)).into_response())
        }
    }
}
