use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_macros::debug_handler;
use log::{info, warn};

use super::{form_status, PageError};
use crate::{
    auth::{require_user, Viewer},
    forms::{FormController, FormError, FormKind, ReviewForm},
    model::AppState,
    views::{self, Confirmation, Notice},
};

#[debug_handler]
pub async fn new_form(
    viewer: Viewer,
    Path(place_id): Path<String>,
) -> Result<Html<String>, PageError> {
    require_user(&viewer)?;
    Ok(Html(views::review_form(
        &viewer,
        &place_id,
        &ReviewForm::default(),
        None,
    )?))
}

#[debug_handler]
pub async fn create(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
    Path(place_id): Path<String>,
    Form(form): Form<ReviewForm>,
) -> Result<Response, PageError> {
    let (token, _) = require_user(&viewer)?;
    let api = &state.api;
    let place = place_id.as_str();
    let mut controller = FormController::new(FormKind::AddReview, token, state.in_flight.clone())
        .targeting(place);

    let result = controller
        .submit(&form, |draft| async move {
            let review = draft.for_place(place);
            api.create_review(&review, token).await
        })
        .await;

    match result {
        Ok(()) => {
            info!("Added review to place {}", place_id);
            let target = Notice::ReviewAdded.redirect_to(&views::place_path(&place_id));
            Ok(Redirect::to(&target).into_response())
        }
        Err(FormError::InFlight) => Err(PageError::busy(&viewer)),
        Err(err) => {
            let html = views::review_form(&viewer, &place_id, &form, Some(&err.to_string()))?;
            Ok((form_status(&err), Html(html)).into_response())
        }
    }
}

fn delete_confirmation(place_id: &str, review_id: &str) -> Confirmation {
    Confirmation {
        heading: "Delete review".to_owned(),
        message: "Are you sure you want to delete this review?".to_owned(),
        action: format!(
            "{}/reviews/{}/delete",
            views::place_path(place_id),
            views::segment(review_id)
        ),
        cancel: views::place_path(place_id),
    }
}

#[debug_handler]
pub async fn confirm_delete(
    viewer: Viewer,
    Path((place_id, review_id)): Path<(String, String)>,
) -> Result<Html<String>, PageError> {
    require_user(&viewer)?;
    let confirmation = delete_confirmation(&place_id, &review_id);
    Ok(Html(views::confirm(&viewer, &confirmation, None)?))
}

#[debug_handler]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
    Path((place_id, review_id)): Path<(String, String)>,
) -> Result<Response, PageError> {
    let (token, _) = require_user(&viewer)?;
    let api = &state.api;
    let mut controller = FormController::new(FormKind::DeleteReview, token, state.in_flight.clone())
        .targeting(&review_id);

    match controller
        .submit(&(), |()| api.delete_review(&review_id, token))
        .await
    {
        Ok(()) => {
            info!("Deleted review {} of place {}", review_id, place_id);
            let target = Notice::ReviewDeleted.redirect_to(&views::place_path(&place_id));
            Ok(Redirect::to(&target).into_response())
        }
        Err(FormError::InFlight) => Err(PageError::busy(&viewer)),
        Err(err) => {
            warn!("Failed to delete review {}: {}", review_id, err);
            let confirmation = delete_confirmation(&place_id, &review_id);
            let html = views::confirm(&viewer, &confirmation, Some(&err.to_string()))?;
            Ok((form_status(&err), Html(html)).into_response())
        }
    }
}
