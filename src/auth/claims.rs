use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde_json::Value;

/// Identity attributes read out of a bearer token.
///
/// These are only ever used to decide what to *show*. The signature is not
/// checked here, the backend re-validates the token on every protected call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Claims {
    pub subject_id: String,
    pub is_admin: bool,
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("token has no payload segment")]
    MissingPayload,
    #[error("token payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("token payload is not valid JSON: {0}")]
    Json(String),
    #[error("token payload has no subject")]
    MissingSubject,
}

#[derive(Debug, serde::Deserialize)]
struct Payload {
    sub: Option<Value>,
    is_admin: Option<bool>,
}

pub fn decode(token: &str) -> Result<Claims, DecodeError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload)) = (segments.next(), segments.next()) else {
        return Err(DecodeError::MissingPayload);
    };

    // Accept both the url-safe and the standard alphabet, padded or not
    let normalized = payload
        .trim_end_matches('=')
        .replace('+', "-")
        .replace('/', "_");
    let bytes = URL_SAFE_NO_PAD.decode(normalized)?;

    let payload: Payload =
        serde_json::from_slice(&bytes).map_err(|err| DecodeError::Json(err.to_string()))?;

    let subject_id = match payload.sub {
        Some(Value::String(sub)) => sub,
        Some(Value::Number(sub)) => sub.to_string(),
        _ => return Err(DecodeError::MissingSubject),
    };

    Ok(Claims {
        subject_id,
        is_admin: payload.is_admin.unwrap_or(false),
    })
}
