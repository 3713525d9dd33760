pub mod place;
pub mod review;
pub mod user;

use std::sync::Arc;

pub use place::{Amenity, Place};
pub use review::Review;
pub use user::User;

use crate::{api::ApiClient, config::Config, forms::InFlight, views::ImageResolver};

/// Everything a request handler needs, shared behind an `Arc`.
#[derive(Debug)]
pub struct AppState {
    pub api: ApiClient,
    pub config: Config,
    pub images: ImageResolver,
    pub in_flight: Arc<InFlight>,
}

impl AppState {
    pub fn build(config: Config) -> Result<AppState, reqwest::Error> {
        Ok(AppState {
            api: ApiClient::new(config.api_url.clone())?,
            images: ImageResolver::new(config.images_dir.clone(), "/images"),
            in_flight: Arc::new(InFlight::default()),
            config,
        })
    }
}
