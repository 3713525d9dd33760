//! Submitted forms: their fields, their validation rules and the two-phase
//! place creation.
//!
//! Field values are kept exactly as typed so a rejected form can be shown
//! again with the user's input intact.

pub mod controller;
pub mod validate;

use log::{info, warn};

pub use controller::{FormController, FormError, FormKind, InFlight};
pub use validate::{Validate, ValidationError};

use crate::{
    api::{ApiClient, ClientError},
    model::{
        place::{self, ImageUpload, NewPlace},
        review::NewReview,
        user::{Credentials, NewUser},
    },
};

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl Validate for LoginForm {
    type Output = Credentials;

    fn validate(&self) -> Result<Credentials, ValidationError> {
        let email = validate::required("Email", &self.email)?;
        validate::required("Password", &self.password)?;
        Ok(Credentials {
            email,
            password: self.password.clone(),
        })
    }
}

/// Registration and the admin "add user" form share their fields; only the
/// admin form shows the `is_admin` checkbox.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UserForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    /// Checkbox: present (usually `"on"`) when ticked.
    pub is_admin: Option<String>,
}

impl UserForm {
    /// Self-registration can never create an admin, whatever was posted.
    pub fn for_registration(mut self) -> Self {
        self.is_admin = None;
        self
    }
}

impl Validate for UserForm {
    type Output = NewUser;

    fn validate(&self) -> Result<NewUser, ValidationError> {
        Ok(NewUser {
            first_name: validate::required("First name", &self.first_name)?,
            last_name: validate::required("Last name", &self.last_name)?,
            email: validate::required("Email", &self.email)?,
            password: validate::password(&self.password)?,
            is_admin: self.is_admin.is_some(),
        })
    }
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ReviewForm {
    pub text: String,
    pub rating: String,
}

/// A checked review, still missing the place it belongs to.
#[derive(Clone, Debug, PartialEq)]
pub struct ReviewDraft {
    pub text: String,
    pub rating: u8,
}

impl ReviewDraft {
    pub fn for_place(self, place_id: &str) -> NewReview {
        NewReview {
            text: self.text,
            rating: self.rating,
            place_id: place_id.to_owned(),
        }
    }
}

impl Validate for ReviewForm {
    type Output = ReviewDraft;

    fn validate(&self) -> Result<ReviewDraft, ValidationError> {
        Ok(ReviewDraft {
            text: validate::required("Review", &self.text)?,
            rating: validate::rating(&self.rating)?,
        })
    }
}

#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct PlaceForm {
    pub title: String,
    pub description: String,
    pub price: String,
    pub location: String,
    pub latitude: String,
    pub longitude: String,
    pub amenities: Vec<String>,
}

/// A checked place, still missing its owner.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaceDraft {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub amenities: Vec<String>,
}

impl PlaceDraft {
    pub fn owned_by(self, owner_id: &str) -> NewPlace {
        NewPlace {
            title: self.title,
            description: self.description,
            price: self.price,
            latitude: self.latitude,
            longitude: self.longitude,
            location: self.location,
            owner_id: owner_id.to_owned(),
            amenities: self.amenities,
        }
    }
}

impl Validate for PlaceForm {
    type Output = PlaceDraft;

    fn validate(&self) -> Result<PlaceDraft, ValidationError> {
        Ok(PlaceDraft {
            title: validate::required("Title", &self.title)?,
            price: validate::price(&self.price)?,
            location: validate::required("Location", &self.location)?,
            description: self.description.trim().to_owned(),
            latitude: validate::coordinate("Latitude", &self.latitude, 90.0)?,
            longitude: validate::coordinate("Longitude", &self.longitude, 180.0)?,
            amenities: self.amenities.clone(),
        })
    }
}

/// What happened when a place was created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlaceCreated {
    Complete { id: place::Id },
    /// The place exists, only its image is missing. The cause is logged.
    ImageFailed { id: place::Id },
}

impl PlaceCreated {
    pub fn id(&self) -> &str {
        match self {
            PlaceCreated::Complete { id } | PlaceCreated::ImageFailed { id } => id,
        }
    }
}

/// Create the place, then upload its image tagged with the new id.
///
/// Only a failure to create the place is an error. A failed upload still
/// leaves a created place behind and is reported as `ImageFailed`.
pub async fn create_place(
    api: &ApiClient,
    token: &str,
    place: NewPlace,
    image: Option<ImageUpload>,
) -> Result<PlaceCreated, ClientError> {
    let id = api.create_place(&place, token).await?;
    info!("Created place {} ({})", id, place.title);

    let Some(image) = image else {
        return Ok(PlaceCreated::Complete { id });
    };

    match api.upload_place_image(&id, &place.title, image, token).await {
        Ok(()) => Ok(PlaceCreated::Complete { id }),
        Err(err) => {
            warn!("Place {} created but its image upload failed: {}", id, err);
            Ok(PlaceCreated::ImageFailed { id })
        }
    }
}
