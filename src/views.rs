//! Turns fetched resources into HTML pages.
//!
//! Page functions build a view model, hand it to a template and return the
//! markup. Anything that depends on who is looking (delete controls, admin
//! links) is recomputed from the [`Viewer`] on every render.

pub mod filter;
pub mod icons;
pub mod images;
pub mod notice;

use tera::Context;

pub use filter::PriceFilter;
pub use images::ImageResolver;
pub use notice::{Banner, Notice, NoticeQuery};

use crate::{
    api::ClientError,
    auth::Viewer,
    forms::{PlaceForm, ReviewForm, UserForm},
    model::{Amenity, Place, Review, User},
    templates,
};
use icons::Icon;

/// Whether the viewer may see a delete control for something owned by
/// `owner_id`. Admins may delete anything, everyone else only their own.
pub fn can_delete(viewer: &Viewer, owner_id: Option<&str>) -> bool {
    match viewer.claims() {
        None => false,
        Some(claims) => claims.is_admin || owner_id == Some(claims.subject_id.as_str()),
    }
}

/// Percent-encode `id` so it stays one segment of a page path. Dots are
/// encoded too, so `..` can never climb out of its route.
pub fn segment(id: &str) -> String {
    let mut encoded = String::with_capacity(id.len());
    for byte in id.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'~' => {
                encoded.push(char::from(byte))
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

pub fn place_path(id: &str) -> String {
    format!("/places/{}", segment(id))
}

pub fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{:.0}", price)
    } else {
        format!("{:.2}", price)
    }
}

#[derive(Debug, serde::Serialize)]
struct Nav {
    logged_in: bool,
    is_admin: bool,
}

#[derive(Debug, serde::Serialize)]
struct AmenityBadge {
    name: String,
    icon: Option<Icon>,
}

impl From<&Amenity> for AmenityBadge {
    fn from(amenity: &Amenity) -> Self {
        AmenityBadge {
            name: amenity.name.clone(),
            icon: icons::for_amenity(&amenity.name),
        }
    }
}

#[derive(Debug, serde::Serialize)]
struct PlaceCard {
    id: String,
    title: String,
    price: String,
    image: Option<String>,
    amenities: Vec<AmenityBadge>,
}

#[derive(Debug, serde::Serialize)]
struct Host {
    name: String,
    email: String,
}

#[derive(Debug, serde::Serialize)]
struct ReviewView {
    id: String,
    author: String,
    text: String,
    rating: u8,
    can_delete: bool,
}

#[derive(Debug, serde::Serialize)]
struct PlaceDetail {
    id: String,
    title: String,
    description: String,
    price: String,
    location: String,
    image: Option<String>,
    host: Option<Host>,
    amenities: Vec<AmenityBadge>,
    reviews: Vec<ReviewView>,
    can_delete: bool,
}

#[derive(Debug, serde::Serialize)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    is_admin: bool,
}

/// A destructive action waiting for the user to confirm it.
#[derive(Debug, serde::Serialize)]
pub struct Confirmation {
    pub heading: String,
    pub message: String,
    pub action: String,
    pub cancel: String,
}

fn base_context(viewer: &Viewer, banner: Option<Banner>) -> Context {
    let mut context = Context::new();
    context.insert(
        "nav",
        &Nav {
            logged_in: viewer.is_logged_in(),
            is_admin: viewer.is_admin(),
        },
    );
    context.insert("banner", &banner);
    context
}

fn card(place: &Place, images: &ImageResolver) -> PlaceCard {
    PlaceCard {
        id: place.id.clone(),
        title: place.title.clone(),
        price: format_price(place.price),
        image: images.resolve(&place.title),
        amenities: place.amenities.iter().take(3).map(AmenityBadge::from).collect(),
    }
}

fn review_view(review: &Review, viewer: &Viewer) -> ReviewView {
    ReviewView {
        id: review.id.clone(),
        author: review
            .user
            .as_ref()
            .map(User::full_name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "Anonymous".to_owned()),
        text: review.text.clone(),
        rating: review.rating,
        can_delete: can_delete(viewer, review.author_id()),
    }
}

fn detail(place: &Place, viewer: &Viewer, images: &ImageResolver) -> PlaceDetail {
    PlaceDetail {
        id: place.id.clone(),
        title: place.title.clone(),
        description: place
            .description
            .clone()
            .filter(|description| !description.trim().is_empty())
            .unwrap_or_else(|| "No description available".to_owned()),
        price: format_price(place.price),
        location: place
            .location
            .clone()
            .filter(|location| !location.trim().is_empty())
            .unwrap_or_else(|| "Not specified".to_owned()),
        image: images.resolve(&place.title),
        host: place.owner.as_ref().map(|owner| Host {
            name: owner.full_name(),
            email: owner.email.clone(),
        }),
        amenities: place.amenities.iter().map(AmenityBadge::from).collect(),
        reviews: place
            .reviews
            .iter()
            .map(|review| review_view(review, viewer))
            .collect(),
        can_delete: can_delete(viewer, place.owner_id()),
    }
}

/// The listing page. `places` is the full fetched list; only the filtered
/// subset is shown.
pub fn index(
    viewer: &Viewer,
    images: &ImageResolver,
    places: Result<&[Place], &ClientError>,
    price: PriceFilter,
    banner: Option<Banner>,
) -> Result<String, tera::Error> {
    let mut context = base_context(viewer, banner);
    context.insert("filters", &filter::options(price));

    match places {
        Ok(places) => {
            let cards: Vec<PlaceCard> = price
                .apply(places)
                .into_iter()
                .map(|place| card(place, images))
                .collect();
            context.insert("loaded", &true);
            context.insert("total", &places.len());
            context.insert("places", &cards);
        }
        Err(err) => {
            context.insert("loaded", &false);
            context.insert("load_error", &err.to_string());
            context.insert("places", &Vec::<PlaceCard>::new());
        }
    }

    templates::render("index.html", &context)
}

pub fn place(
    viewer: &Viewer,
    images: &ImageResolver,
    place: &Place,
    banner: Option<Banner>,
) -> Result<String, tera::Error> {
    let mut context = base_context(viewer, banner);
    context.insert("place", &detail(place, viewer, images));
    templates::render("place.html", &context)
}

pub fn place_form(
    viewer: &Viewer,
    amenities: &[Amenity],
    values: &PlaceForm,
    error: Option<&str>,
) -> Result<String, tera::Error> {
    let mut context = base_context(viewer, None);
    context.insert("amenities", amenities);
    context.insert("form", values);
    context.insert("error", &error);
    templates::render("add_place.html", &context)
}

pub fn review_form(
    viewer: &Viewer,
    place_id: &str,
    values: &ReviewForm,
    error: Option<&str>,
) -> Result<String, tera::Error> {
    let mut context = base_context(viewer, None);
    context.insert("place_id", place_id);
    context.insert("form", values);
    context.insert("error", &error);
    templates::render("add_review.html", &context)
}

pub fn login(
    viewer: &Viewer,
    email: &str,
    error: Option<&str>,
    banner: Option<Banner>,
) -> Result<String, tera::Error> {
    let mut context = base_context(viewer, banner);
    context.insert("email", email);
    context.insert("error", &error);
    templates::render("login.html", &context)
}

pub fn register(
    viewer: &Viewer,
    values: &UserForm,
    error: Option<&str>,
) -> Result<String, tera::Error> {
    let mut context = base_context(viewer, None);
    context.insert("form", values);
    context.insert("error", &error);
    templates::render("register.html", &context)
}

pub fn admin(
    viewer: &Viewer,
    users: Result<&[User], &ClientError>,
    values: &UserForm,
    error: Option<&str>,
    banner: Option<Banner>,
) -> Result<String, tera::Error> {
    let mut context = base_context(viewer, banner);
    match users {
        Ok(users) => {
            let rows: Vec<UserRow> = users
                .iter()
                .map(|user| UserRow {
                    id: user.id.clone(),
                    name: user.full_name(),
                    email: user.email.clone(),
                    is_admin: user.is_admin,
                })
                .collect();
            context.insert("loaded", &true);
            context.insert("users", &rows);
        }
        Err(err) => {
            context.insert("loaded", &false);
            context.insert("load_error", &err.to_string());
            context.insert("users", &Vec::<UserRow>::new());
        }
    }
    context.insert("form", values);
    context.insert("error", &error);
    templates::render("admin.html", &context)
}

pub fn confirm(
    viewer: &Viewer,
    confirmation: &Confirmation,
    error: Option<&str>,
) -> Result<String, tera::Error> {
    let mut context = base_context(viewer, None);
    context.insert("confirm", confirmation);
    context.insert("error", &error);
    templates::render("confirm.html", &context)
}

pub fn error_page(viewer: &Viewer, heading: &str, message: &str) -> Result<String, tera::Error> {
    let mut context = base_context(viewer, None);
    context.insert("heading", heading);
    context.insert("message", message);
    templates::render("error.html", &context)
}
