//! An in-process stand-in for the HBnB backend, plus small fixtures.
//!
//! The fake keeps its resources in memory, records every call it receives
//! and only checks what the real backend's clients can observe: bearer
//! presence, a fixed password, and status codes/messages.

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header::AUTHORIZATION, HeaderMap, Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{self, delete, post},
    Json, Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use clap::Parser;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::{api::ApiClient, config::Config, model::AppState, model::Place, routes};

pub const PASSWORD: &str = "correct horse";

/// A bearer token shaped like the backend's, with an unchecked signature.
pub fn token_for(sub: &str, is_admin: Option<bool>) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let mut payload = json!({ "sub": sub, "exp": 4_102_444_800u64 });
    if let Some(is_admin) = is_admin {
        payload["is_admin"] = json!(is_admin);
    }
    let payload = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{}.{}.signature", header, payload)
}

pub fn place(id: &str, title: &str, price: f64) -> Place {
    Place {
        id: id.to_owned(),
        title: title.to_owned(),
        description: None,
        price,
        location: None,
        latitude: 0.0,
        longitude: 0.0,
        owner: None,
        owner_id: None,
        amenities: Vec::new(),
        reviews: Vec::new(),
    }
}

/// An address nothing is listening on.
pub fn unused_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

#[derive(Clone, Debug)]
pub struct Call {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
}

#[derive(Debug, Default)]
struct Inner {
    places: Vec<Value>,
    users: Vec<Value>,
    amenities: Vec<Value>,
    uploads: Vec<String>,
    calls: Vec<Call>,
    reject_uploads: bool,
    login_token: String,
    next_id: usize,
}

impl Inner {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }
}

type Shared = Arc<Mutex<Inner>>;

pub struct FakeBackend {
    addr: SocketAddr,
    inner: Shared,
}

impl FakeBackend {
    pub async fn start() -> FakeBackend {
        let inner = Shared::default();
        inner.lock().unwrap().login_token = token_for("user-1", None);

        let api = Router::new()
            .route("/amenities/", routing::get(list_amenities))
            .route("/places/", routing::get(list_places).post(create_place))
            .route(
                "/places/upload-image",
                post(upload_image).layer(DefaultBodyLimit::disable()),
            )
            .route("/places/:id", routing::get(get_place).delete(delete_place))
            .route("/reviews/", post(create_review))
            .route("/reviews/:id", delete(delete_review))
            .route("/users/", routing::get(list_users).post(create_user))
            .route("/users/login", post(login))
            .route("/users/:id", delete(delete_user))
            .with_state(inner.clone());
        // Recorded outside the nest so paths keep their prefix and encoding
        let app = Router::new()
            .nest("/api/v1", api)
            .layer(middleware::from_fn_with_state(inner.clone(), record));

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = axum::Server::from_tcp(listener)
            .unwrap()
            .serve(app.into_make_service());
        tokio::spawn(async move {
            let _ = server.await;
        });

        FakeBackend { addr, inner }
    }

    pub fn api_url(&self) -> String {
        format!("http://{}/api/v1", self.addr)
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(self.api_url().parse().unwrap()).unwrap()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn places(&self) -> Vec<Value> {
        self.inner.lock().unwrap().places.clone()
    }

    pub fn users(&self) -> Vec<Value> {
        self.inner.lock().unwrap().users.clone()
    }

    pub fn uploads(&self) -> Vec<String> {
        self.inner.lock().unwrap().uploads.clone()
    }

    pub fn login_token(&self) -> String {
        self.inner.lock().unwrap().login_token.clone()
    }

    pub fn reject_uploads(&self) {
        self.inner.lock().unwrap().reject_uploads = true;
    }

    pub fn add_place(&self, place: Value) {
        self.inner.lock().unwrap().places.push(place);
    }

    pub fn add_amenity(&self, id: &str, name: &str) {
        self.inner
            .lock()
            .unwrap()
            .amenities
            .push(json!({ "id": id, "name": name }));
    }

    pub fn add_user(&self, id: &str, first_name: &str, is_admin: bool) {
        self.inner.lock().unwrap().users.push(json!({
            "id": id,
            "first_name": first_name,
            "last_name": "Tester",
            "email": format!("{}@example.com", first_name.to_lowercase()),
            "is_admin": is_admin,
        }));
    }
}

async fn record<B>(State(inner): State<Shared>, request: Request<B>, next: Next<B>) -> Response {
    let call = Call {
        method: request.method().to_string(),
        path: request.uri().path().to_owned(),
        authorization: request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned),
    };
    inner.lock().unwrap().calls.push(call);
    next.run(request).await
}

fn has_bearer(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| !token.trim().is_empty())
}

fn fail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

async fn list_amenities(State(inner): State<Shared>) -> Json<Vec<Value>> {
    Json(inner.lock().unwrap().amenities.clone())
}

async fn list_places(State(inner): State<Shared>) -> Json<Vec<Value>> {
    Json(inner.lock().unwrap().places.clone())
}

async fn get_place(State(inner): State<Shared>, Path(id): Path<String>) -> Response {
    let inner = inner.lock().unwrap();
    match inner.places.iter().find(|place| place["id"] == id.as_str()) {
        Some(place) => Json(place.clone()).into_response(),
        None => fail(StatusCode::NOT_FOUND, "Place not found"),
    }
}

async fn create_place(
    State(inner): State<Shared>,
    headers: HeaderMap,
    Json(mut place): Json<Value>,
) -> Response {
    if !has_bearer(&headers) {
        return fail(StatusCode::UNAUTHORIZED, "Missing Authorization Header");
    }
    let mut inner = inner.lock().unwrap();
    place["id"] = json!(inner.next_id("place"));
    place["reviews"] = json!([]);
    inner.places.push(place.clone());
    (StatusCode::CREATED, Json(place)).into_response()
}

async fn upload_image(
    State(inner): State<Shared>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let mut place_id = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("place_id") => place_id = field.text().await.ok(),
            _ => {
                let _ = field.bytes().await;
            }
        }
    }

    if !has_bearer(&headers) {
        return fail(StatusCode::UNAUTHORIZED, "Missing Authorization Header");
    }
    let mut inner = inner.lock().unwrap();
    if inner.reject_uploads {
        return fail(StatusCode::BAD_REQUEST, "Invalid file type");
    }
    inner.uploads.extend(place_id);
    Json(json!({ "message": "Image uploaded successfully" })).into_response()
}

async fn delete_place(
    State(inner): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !has_bearer(&headers) {
        return fail(StatusCode::UNAUTHORIZED, "Missing Authorization Header");
    }
    let mut inner = inner.lock().unwrap();
    let before = inner.places.len();
    inner.places.retain(|place| place["id"] != id.as_str());
    if inner.places.len() == before {
        return fail(StatusCode::NOT_FOUND, "Place not found");
    }
    Json(json!({ "message": "Place deleted successfully" })).into_response()
}

async fn create_review(
    State(inner): State<Shared>,
    headers: HeaderMap,
    Json(mut review): Json<Value>,
) -> Response {
    if !has_bearer(&headers) {
        return fail(StatusCode::UNAUTHORIZED, "Missing Authorization Header");
    }
    let mut inner = inner.lock().unwrap();
    review["id"] = json!(inner.next_id("review"));
    let place_id = review["place_id"].clone();
    let Some(place) = inner.places.iter_mut().find(|place| place["id"] == place_id) else {
        return fail(StatusCode::NOT_FOUND, "Place not found");
    };
    match place["reviews"].as_array_mut() {
        Some(reviews) => reviews.push(review.clone()),
        None => place["reviews"] = json!([review.clone()]),
    }
    (StatusCode::CREATED, Json(review)).into_response()
}

async fn delete_review(
    State(inner): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !has_bearer(&headers) {
        return fail(StatusCode::UNAUTHORIZED, "Missing Authorization Header");
    }
    let mut inner = inner.lock().unwrap();
    let mut found = false;
    for place in inner.places.iter_mut() {
        if let Some(reviews) = place["reviews"].as_array_mut() {
            let before = reviews.len();
            reviews.retain(|review| review["id"] != id.as_str());
            found |= reviews.len() != before;
        }
    }
    if !found {
        return fail(StatusCode::NOT_FOUND, "Review not found");
    }
    Json(json!({ "message": "Review deleted successfully" })).into_response()
}

async fn list_users(State(inner): State<Shared>, headers: HeaderMap) -> Response {
    if !has_bearer(&headers) {
        return fail(StatusCode::UNAUTHORIZED, "Missing Authorization Header");
    }
    Json(inner.lock().unwrap().users.clone()).into_response()
}

async fn create_user(
    State(inner): State<Shared>,
    headers: HeaderMap,
    Json(user): Json<Value>,
) -> Response {
    if user["is_admin"] == true && !has_bearer(&headers) {
        return fail(StatusCode::FORBIDDEN, "Admin privileges required");
    }
    let mut inner = inner.lock().unwrap();
    if inner.users.iter().any(|existing| existing["email"] == user["email"]) {
        return fail(StatusCode::BAD_REQUEST, "Email already registered");
    }
    let created = json!({
        "id": inner.next_id("user"),
        "first_name": user["first_name"],
        "last_name": user["last_name"],
        "email": user["email"],
        "is_admin": user["is_admin"],
    });
    inner.users.push(created.clone());
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn delete_user(
    State(inner): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !has_bearer(&headers) {
        return fail(StatusCode::UNAUTHORIZED, "Missing Authorization Header");
    }
    let mut inner = inner.lock().unwrap();
    let before = inner.users.len();
    inner.users.retain(|user| user["id"] != id.as_str());
    if inner.users.len() == before {
        return fail(StatusCode::NOT_FOUND, "User not found");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn login(State(inner): State<Shared>, Json(credentials): Json<Value>) -> Response {
    if credentials["password"] != PASSWORD {
        return fail(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }
    let token = inner.lock().unwrap().login_token.clone();
    Json(json!({
        "access_token": token,
        "user": { "id": "user-1", "email": credentials["email"] },
    }))
    .into_response()
}

/// The front end, wired to `backend`, with no images on disk.
pub fn app(backend: &FakeBackend) -> Router {
    app_for(&backend.api_url())
}

pub fn app_for(api_url: &str) -> Router {
    app_with(api_url, &[])
}

/// Like [`app_for`], with extra command line options.
pub fn app_with(api_url: &str, options: &[&str]) -> Router {
    let mut args = vec![
        "hbnb-web",
        "--api-url",
        api_url,
        "--images-dir",
        "/nonexistent-hbnb-web-images",
    ];
    args.extend_from_slice(options);
    let config = Config::try_parse_from(args).unwrap();
    routes::router(Arc::new(AppState::build(config).unwrap()))
}

pub struct Page {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl Page {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(axum::http::header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> Page {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
    Page {
        status,
        headers,
        body: String::from_utf8(body.to_vec()).unwrap(),
    }
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut request = Request::get(uri);
    if let Some(token) = token {
        request = request.header("cookie", format!("token={}", token));
    }
    request.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, token: Option<&str>, form: &str) -> Request<Body> {
    let mut request = Request::post(uri).header("content-type", "application/x-www-form-urlencoded");
    if let Some(token) = token {
        request = request.header("cookie", format!("token={}", token));
    }
    request.body(Body::from(form.to_owned())).unwrap()
}

/// A `multipart/form-data` request. `image` is `(file name, bytes)`.
pub fn post_multipart(
    uri: &str,
    token: Option<&str>,
    fields: &[(&str, &str)],
    image: Option<(&str, &[u8])>,
) -> Request<Body> {
    const BOUNDARY: &str = "hbnb-test-boundary";
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let mut request = Request::post(uri).header(
        "content-type",
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(token) = token {
        request = request.header("cookie", format!("token={}", token));
    }
    // Streamed in small chunks, the way a browser upload arrives
    let chunks: Vec<Result<Vec<u8>, std::io::Error>> =
        body.chunks(8 * 1024).map(|chunk| Ok(chunk.to_vec())).collect();
    request
        .body(Body::wrap_stream(futures::stream::iter(chunks)))
        .unwrap()
}
