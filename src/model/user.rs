pub type Id = String;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct User {
    pub id: Id,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }
}

/// Body of `POST /users/`, both for self-registration and admin creation.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub is_admin: bool,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Only the token is used; the rest of the login answer is ignored.
#[derive(Debug, serde::Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}
