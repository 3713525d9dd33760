//! Thin client for the HBnB REST backend.
//!
//! Every call is fire-once: no retries, no backoff. Callers decide what to
//! show the user when a call fails.

pub mod error;

use log::{debug, error, warn};
use reqwest::{
    multipart::{Form, Part},
    Client, Method, Url,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use error::ClientError;

use crate::model::{
    place::{self, Amenity, CreatedPlace, ImageUpload, NewPlace, Place},
    review::NewReview,
    user::{Credentials, LoginResponse, NewUser, User},
};

pub enum Body {
    Json(Value),
    /// Multipart bodies let reqwest pick the `Content-Type` (with boundary).
    Multipart(Form),
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: Url) -> Result<ApiClient, reqwest::Error> {
        let http = Client::builder()
            .user_agent(concat!("hbnb-web/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(ApiClient { http, base_url })
    }

    /// `path` is appended to the base URL one segment at a time. Each segment
    /// is percent-encoded, so an id containing `/` or `?` stays a single
    /// segment. An empty last segment gives the trailing slash the backend's
    /// collection routes expect.
    fn url(&self, path: &[&str]) -> Result<Url, ClientError> {
        if let Some(segment) = path.iter().find(|s| matches!(**s, "." | "..")) {
            return Err(ClientError::InvalidRequest(format!(
                "`{}` is not a valid resource id",
                segment
            )));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ClientError::InvalidRequest(format!("{} cannot take a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(path);
        Ok(url)
    }

    /// Issue one request. A bearer header is attached when `token` is given.
    pub async fn request(
        &self,
        method: Method,
        path: &[&str],
        body: Option<Body>,
        token: Option<&str>,
    ) -> Result<Value, ClientError> {
        let url = self.url(path)?;
        debug!("{} {} (authenticated: {})", method, url, token.is_some());

        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request = match body {
            Some(Body::Json(json)) => request.json(&json),
            Some(Body::Multipart(form)) => request.multipart(form),
            None => request,
        };

        let response = request.send().await.map_err(|err| {
            error!("{} {} failed to send: {}", method, url, err);
            ClientError::Transport(err)
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|err| {
            error!("{} {} failed to read body: {}", method, url, err);
            ClientError::Transport(err)
        })?;

        if !status.is_success() {
            let message = error::error_message(&text, status.canonical_reason());
            warn!("{} {} returned {}: {}", method, url, status, message);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &[&str],
        body: Option<Body>,
        token: Option<&str>,
    ) -> Result<T, ClientError> {
        let value = self.request(method, path, body, token).await?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Endpoints
impl ApiClient {
    pub async fn list_amenities(&self) -> Result<Vec<Amenity>, ClientError> {
        self.fetch(Method::GET, &["amenities", ""], None, None).await
    }

    pub async fn list_places(&self) -> Result<Vec<Place>, ClientError> {
        self.fetch(Method::GET, &["places", ""], None, None).await
    }

    pub async fn get_place(&self, id: &str) -> Result<Place, ClientError> {
        self.fetch(Method::GET, &["places", id], None, None).await
    }

    pub async fn create_place(
        &self,
        place: &NewPlace,
        token: &str,
    ) -> Result<place::Id, ClientError> {
        let body = Body::Json(serde_json::to_value(place)?);
        let created: CreatedPlace = self
            .fetch(Method::POST, &["places", ""], Some(body), Some(token))
            .await?;
        Ok(created.id)
    }

    pub async fn upload_place_image(
        &self,
        place_id: &str,
        place_title: &str,
        image: ImageUpload,
        token: &str,
    ) -> Result<(), ClientError> {
        let mut part = Part::bytes(image.bytes).file_name(image.file_name);
        if let Some(content_type) = image.content_type {
            part = part.mime_str(&content_type).map_err(|_| {
                ClientError::InvalidRequest(format!(
                    "`{}` is not a valid image content type",
                    content_type
                ))
            })?;
        }
        let form = Form::new()
            .part("image", part)
            .text("place_id", place_id.to_owned())
            .text("place_title", place_title.to_owned());

        self.request(
            Method::POST,
            &["places", "upload-image"],
            Some(Body::Multipart(form)),
            Some(token),
        )
        .await?;
        Ok(())
    }

    pub async fn delete_place(&self, id: &str, token: &str) -> Result<(), ClientError> {
        self.request(Method::DELETE, &["places", id], None, Some(token))
            .await?;
        Ok(())
    }

    pub async fn create_review(&self, review: &NewReview, token: &str) -> Result<(), ClientError> {
        let body = Body::Json(serde_json::to_value(review)?);
        self.request(Method::POST, &["reviews", ""], Some(body), Some(token))
            .await?;
        Ok(())
    }

    pub async fn delete_review(&self, id: &str, token: &str) -> Result<(), ClientError> {
        self.request(Method::DELETE, &["reviews", id], None, Some(token))
            .await?;
        Ok(())
    }

    pub async fn list_users(&self, token: &str) -> Result<Vec<User>, ClientError> {
        self.fetch(Method::GET, &["users", ""], None, Some(token)).await
    }

    /// `token` is `None` for self-registration.
    pub async fn create_user(
        &self,
        user: &NewUser,
        token: Option<&str>,
    ) -> Result<(), ClientError> {
        let body = Body::Json(serde_json::to_value(user)?);
        self.request(Method::POST, &["users", ""], Some(body), token)
            .await?;
        Ok(())
    }

    pub async fn delete_user(&self, id: &str, token: &str) -> Result<(), ClientError> {
        self.request(Method::DELETE, &["users", id], None, Some(token))
            .await?;
        Ok(())
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ClientError> {
        let body = Body::Json(serde_json::to_value(credentials)?);
        self.fetch(Method::POST, &["users", "login"], Some(body), None)
            .await
    }
}
