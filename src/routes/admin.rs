use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_macros::debug_handler;
use log::{info, warn};

use super::{form_status, PageError};
use crate::{
    auth::{require_admin, Viewer},
    forms::{FormController, FormError, FormKind, UserForm},
    model::AppState,
    views::{self, Banner, Confirmation, Notice, NoticeQuery},
};

/// The users list is fetched fresh on every render.
async fn render(
    state: &AppState,
    viewer: &Viewer,
    token: &str,
    values: &UserForm,
    error: Option<&str>,
    banner: Option<Banner>,
) -> Result<String, PageError> {
    let users = state.api.list_users(token).await;
    Ok(views::admin(
        viewer,
        users.as_ref().map(Vec::as_slice),
        values,
        error,
        banner,
    )?)
}

#[debug_handler]
pub async fn page(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
    Query(notice): Query<NoticeQuery>,
) -> Result<Html<String>, PageError> {
    let (token, _) = require_admin(&viewer)?;
    let html = render(
        &state,
        &viewer,
        token,
        &UserForm::default(),
        None,
        notice.banner(),
    )
    .await?;
    Ok(Html(html))
}

#[debug_handler]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
    Form(form): Form<UserForm>,
) -> Result<Response, PageError> {
    let (token, _) = require_admin(&viewer)?;
    let api = &state.api;
    let mut controller = FormController::new(FormKind::AddUser, token, state.in_flight.clone());

    let result = controller
        .submit(&form, |user| async move { api.create_user(&user, Some(token)).await })
        .await;

    match result {
        Ok(()) => {
            info!("Admin created user {}", form.email.trim());
            Ok(Redirect::to(&Notice::UserCreated.redirect_to("/admin")).into_response())
        }
        Err(FormError::InFlight) => Err(PageError::busy(&viewer)),
        Err(err) => {
            let message = err.to_string();
            let html = render(&state, &viewer, token, &form, Some(&message), None).await?;
            Ok((form_status(&err), Html(html)).into_response())
        }
    }
}

fn delete_confirmation(id: &str) -> Confirmation {
    Confirmation {
        heading: "Delete user".to_owned(),
        message: "Are you sure you want to delete this user?".to_owned(),
        action: format!("/admin/users/{}/delete", views::segment(id)),
        cancel: "/admin".to_owned(),
    }
}

#[debug_handler]
pub async fn confirm_delete(
    viewer: Viewer,
    Path(id): Path<String>,
) -> Result<Html<String>, PageError> {
    require_admin(&viewer)?;
    Ok(Html(views::confirm(&viewer, &delete_confirmation(&id), None)?))
}

#[debug_handler]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
    Path(id): Path<String>,
) -> Result<Response, PageError> {
    let (token, _) = require_admin(&viewer)?;
    let api = &state.api;
    let mut controller = FormController::new(FormKind::DeleteUser, token, state.in_flight.clone())
        .targeting(&id);

    match controller.submit(&(), |()| api.delete_user(&id, token)).await {
        Ok(()) => {
            info!("Admin deleted user {}", id);
            Ok(Redirect::to(&Notice::UserDeleted.redirect_to("/admin")).into_response())
        }
        Err(FormError::InFlight) => Err(PageError::busy(&viewer)),
        Err(err) => {
            warn!("Failed to delete user {}: {}", id, err);
            let html = views::confirm(&viewer, &delete_confirmation(&id), Some(&err.to_string()))?;
            Ok((form_status(&err), Html(html)).into_response())
        }
    }
}
