mod admin;
mod error;
mod places;
mod register;
mod reviews;
mod sessions;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

pub use error::{form_status, PageError};

use crate::model::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let max_upload = state.config.max_upload;

    Router::new()
        .route("/", get(places::index))
        .route(
            "/places/new",
            get(places::new_form)
                .post(places::create)
                .layer(DefaultBodyLimit::max(max_upload)),
        )
        .route("/places/:id", get(places::show))
        .route(
            "/places/:id/delete",
            get(places::confirm_delete).post(places::delete),
        )
        .route(
            "/places/:id/reviews/new",
            get(reviews::new_form).post(reviews::create),
        )
        .route(
            "/places/:id/reviews/:review_id/delete",
            get(reviews::confirm_delete).post(reviews::delete),
        )
        .route("/login", get(sessions::login_page).post(sessions::login))
        .route("/logout", post(sessions::logout))
        .route("/register", get(register::page).post(register::register))
        .route("/admin", get(admin::page))
        .route("/admin/users", post(admin::create_user))
        .route(
            "/admin/users/:id/delete",
            get(admin::confirm_delete).post(admin::delete_user),
        )
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .nest_service("/images", ServeDir::new(&state.config.images_dir))
        .with_state(state)
}
