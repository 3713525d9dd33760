use super::user::{self, User};

pub type Id = String;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Review {
    pub id: Id,
    #[serde(default)]
    pub text: String,
    pub rating: u8,
    pub user: Option<User>,
    pub user_id: Option<user::Id>,
    pub place_id: Option<super::place::Id>,
}

impl Review {
    /// The author, from the nested user when the backend sent one.
    pub fn author_id(&self) -> Option<&str> {
        self.user
            .as_ref()
            .map(|user| user.id.as_str())
            .or(self.user_id.as_deref())
    }
}

/// Body of `POST /reviews/`.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct NewReview {
    pub text: String,
    pub rating: u8,
    pub place_id: super::place::Id,
}
