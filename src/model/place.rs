use super::{
    review::Review,
    user::{self, User},
};

pub type Id = String;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Amenity {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Place {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub owner: Option<User>,
    #[serde(default)]
    pub owner_id: Option<user::Id>,
    #[serde(default)]
    pub amenities: Vec<Amenity>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Place {
    /// The owner, from the nested user when the backend sent one.
    pub fn owner_id(&self) -> Option<&str> {
        self.owner
            .as_ref()
            .map(|owner| owner.id.as_str())
            .or(self.owner_id.as_deref())
    }
}

/// Body of `POST /places/`. Amenities are referenced by id.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct NewPlace {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub location: String,
    pub owner_id: user::Id,
    pub amenities: Vec<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct CreatedPlace {
    pub id: Id,
}

/// An image attached to the add-place form.
#[derive(Clone, Debug)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}
