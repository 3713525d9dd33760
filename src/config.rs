use std::{net::SocketAddr, path::PathBuf, time::Duration};

use clap::Parser;
use log::LevelFilter;
use reqwest::Url;

/// Server-rendered front end for the HBnB booking API.
///
/// Every option can also be set through the environment (or a `.env` file).
#[derive(Clone, Debug, Parser)]
#[command(name = "hbnb-web", version)]
pub struct Config {
    /// Address the front end listens on
    #[arg(long, env = "HBNB_LISTEN", default_value = "127.0.0.1:7878")]
    pub listen: SocketAddr,

    /// Base URL of the REST backend, including the API version prefix
    #[arg(long, env = "HBNB_API_URL", default_value = "http://127.0.0.1:8000/api/v1")]
    pub api_url: Url,

    /// Directory served under /static
    #[arg(long, env = "HBNB_STATIC_DIR", default_value = "public")]
    pub static_dir: PathBuf,

    /// Directory holding place images, served under /images
    #[arg(long, env = "HBNB_IMAGES_DIR", default_value = "public/images")]
    pub images_dir: PathBuf,

    /// Lifetime of the session cookie set at login
    #[arg(long, env = "HBNB_SESSION_TTL", default_value = "1h", value_parser = humantime::parse_duration)]
    pub session_ttl: Duration,

    /// Largest request body accepted when adding a place, in bytes
    #[arg(long, env = "HBNB_MAX_UPLOAD", default_value_t = 16 * 1024 * 1024)]
    pub max_upload: usize,

    #[arg(long, env = "HBNB_LOG", default_value = "debug", value_parser = parse_level)]
    pub log_level: LevelFilter,
}

fn parse_level(level: &str) -> Result<LevelFilter, String> {
    level
        .parse()
        .map_err(|_| format!("unknown log level `{}`", level))
}
