use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_macros::debug_handler;
use log::{debug, info, warn};

use super::PageError;
use crate::{
    auth::{require_user, Viewer},
    forms::{self, FormController, FormError, FormKind, PlaceCreated, PlaceForm},
    model::{place::ImageUpload, AppState},
    views::{self, Confirmation, Notice, NoticeQuery, PriceFilter},
};

#[derive(Debug, Default, serde::Deserialize)]
pub struct FilterQuery {
    max_price: Option<String>,
}

#[debug_handler]
pub async fn index(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
    Query(filter): Query<FilterQuery>,
    Query(notice): Query<NoticeQuery>,
) -> Result<Html<String>, PageError> {
    let price = PriceFilter::parse(filter.max_price.as_deref());
    debug!("Listing places ({:?})", price);

    // Fetched once per page view, filtered in memory
    let places = state.api.list_places().await;
    let html = views::index(
        &viewer,
        &state.images,
        places.as_ref().map(Vec::as_slice),
        price,
        notice.banner(),
    )?;
    Ok(Html(html))
}

#[debug_handler]
pub async fn show(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
    Path(id): Path<String>,
    Query(notice): Query<NoticeQuery>,
) -> Result<Html<String>, PageError> {
    let place = state
        .api
        .get_place(&id)
        .await
        .map_err(|err| PageError::backend(&viewer, &err))?;
    Ok(Html(views::place(
        &viewer,
        &state.images,
        &place,
        notice.banner(),
    )?))
}

async fn render_form(
    state: &AppState,
    viewer: &Viewer,
    values: &PlaceForm,
    error: Option<&str>,
) -> Result<String, PageError> {
    let (amenities, load_error) = match state.api.list_amenities().await {
        Ok(amenities) => (amenities, None),
        Err(err) => (Vec::new(), Some(format!("Failed to load amenities: {}", err))),
    };
    Ok(views::place_form(
        viewer,
        &amenities,
        values,
        error.or(load_error.as_deref()),
    )?)
}

#[debug_handler]
pub async fn new_form(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
) -> Result<Html<String>, PageError> {
    require_user(&viewer)?;
    let html = render_form(&state, &viewer, &PlaceForm::default(), None).await?;
    Ok(Html(html))
}

/// Split the multipart body into the text fields and the optional image.
///
/// Fields are written into `form` as they arrive, so whatever was read before
/// a failure is still there to show again.
async fn read_form(
    mut multipart: Multipart,
    form: &mut PlaceForm,
) -> Result<Option<ImageUpload>, MultipartError> {
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_owned();
        if name == "image" {
            let file_name = field.file_name().map(str::to_owned);
            let content_type = field.content_type().map(str::to_owned);
            let bytes = field.bytes().await?;
            // Browsers send an empty part when no file was picked
            if let Some(file_name) = file_name.filter(|name| !name.is_empty()) {
                if !bytes.is_empty() {
                    image = Some(ImageUpload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            continue;
        }

        let value = field.text().await?;
        match name.as_str() {
            "title" => form.title = value,
            "description" => form.description = value,
            "price" => form.price = value,
            "location" => form.location = value,
            "latitude" => form.latitude = value,
            "longitude" => form.longitude = value,
            "amenities" => form.amenities.push(value),
            other => debug!("Ignoring unknown place form field {:?}", other),
        }
    }

    Ok(image)
}

#[debug_handler]
pub async fn create(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
    multipart: Multipart,
) -> Result<Response, PageError> {
    let (token, claims) = require_user(&viewer)?;
    let mut form = PlaceForm::default();
    let image = match read_form(multipart, &mut form).await {
        Ok(image) => image,
        Err(err) if err.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            warn!("Place form over the upload limit: {}", err);
            let message = format!(
                "The image is too large. Uploads are limited to {} KiB.",
                state.config.max_upload / 1024
            );
            let html = render_form(&state, &viewer, &form, Some(&message)).await?;
            return Ok((StatusCode::PAYLOAD_TOO_LARGE, Html(html)).into_response());
        }
        Err(err) => {
            return Err(PageError::page(
                &viewer,
                StatusCode::BAD_REQUEST,
                "Invalid form",
                err.body_text(),
            ));
        }
    };

    let owner_id = claims.subject_id.clone();
    let api = &state.api;
    let mut controller = FormController::new(FormKind::AddPlace, token, state.in_flight.clone());
    let result = controller
        .submit(&form, |draft| {
            forms::create_place(api, token, draft.owned_by(&owner_id), image)
        })
        .await;

    match result {
        Ok(created) => {
            let notice = match &created {
                PlaceCreated::Complete { .. } => Notice::PlaceCreated,
                PlaceCreated::ImageFailed { .. } => Notice::ImageUploadFailed,
            };
            let target = notice.redirect_to(&views::place_path(created.id()));
            Ok(Redirect::to(&target).into_response())
        }
        Err(FormError::InFlight) => Err(PageError::busy(&viewer)),
        Err(err) => {
            let message = err.to_string();
            let html = render_form(&state, &viewer, &form, Some(&message)).await?;
            Ok((super::form_status(&err), Html(html)).into_response())
        }
    }
}

fn delete_confirmation(id: &str) -> Confirmation {
    Confirmation {
        heading: "Delete place".to_owned(),
        message: "Are you sure you want to delete this place? This cannot be undone.".to_owned(),
        action: format!("{}/delete", views::place_path(id)),
        cancel: views::place_path(id),
    }
}

#[debug_handler]
pub async fn confirm_delete(
    viewer: Viewer,
    Path(id): Path<String>,
) -> Result<Html<String>, PageError> {
    require_user(&viewer)?;
    Ok(Html(views::confirm(&viewer, &delete_confirmation(&id), None)?))
}

#[debug_handler]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
    Path(id): Path<String>,
) -> Result<Response, PageError> {
    let (token, _) = require_user(&viewer)?;
    let api = &state.api;
    let mut controller = FormController::new(FormKind::DeletePlace, token, state.in_flight.clone())
        .targeting(&id);

    match controller.submit(&(), |()| api.delete_place(&id, token)).await {
        Ok(()) => {
            info!("Deleted place {}", id);
            Ok(Redirect::to(&Notice::PlaceDeleted.redirect_to("/")).into_response())
        }
        Err(FormError::InFlight) => Err(PageError::busy(&viewer)),
        Err(err) => {
            warn!("Failed to delete place {}: {}", id, err);
            let html = views::confirm(&viewer, &delete_confirmation(&id), Some(&err.to_string()))?;
            Ok((super::form_status(&err), Html(html)).into_response())
        }
    }
}
