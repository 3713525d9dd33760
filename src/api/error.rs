/// Everything that can go wrong talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The backend answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },
    /// The backend could not be reached at all.
    #[error("Unable to reach the server. Is it running?")]
    Transport(#[source] reqwest::Error),
    /// The backend answered, but not with what we expected.
    #[error("Unexpected response from the server: {0}")]
    Decode(#[from] serde_json::Error),
    /// The request was never sent because its input cannot be expressed.
    #[error("{0}")]
    InvalidRequest(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::InvalidRequest(_) => Some(400),
            _ => None,
        }
    }
}

#[derive(Debug, Default, serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Pull a human readable message out of an error response, falling back to
/// the status text.
pub fn error_message(body: &str, reason: Option<&str>) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message.or(body.error))
        .filter(|message| !message.trim().is_empty())
        .or_else(|| reason.map(str::to_owned))
        .unwrap_or_else(|| "Request failed".to_owned())
}
