use std::{error::Error, sync::Arc};

use clap::Parser;
use log::{info, warn};

use config::Config;
use model::AppState;

mod api;
mod auth;
mod config;
mod forms;
mod logger;
mod model;
mod routes;
mod templates;
mod views;

#[cfg(test)]
mod test_support;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env file is fine, everything has a default
    let dotenv = dotenvy::dotenv();
    let config = Config::parse();
    logger::init(config.log_level)?;

    if let Err(err) = dotenv {
        if !err.not_found() {
            warn!("Ignoring unreadable .env file: {}", err);
        }
    }

    info!(
        "Starting hbnb-web at {} (backend {})",
        config.listen, config.api_url
    );

    let listen = config.listen;
    let state = Arc::new(AppState::build(config)?);
    let app = routes::router(state);

    axum::Server::bind(&listen)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
