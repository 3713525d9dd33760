/// One-shot banners carried across a redirect as `?notice=<code>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    PlaceCreated,
    ImageUploadFailed,
    PlaceDeleted,
    ReviewAdded,
    ReviewDeleted,
    UserCreated,
    UserDeleted,
    Registered,
    LoggedOut,
    LoginRequired,
    AdminRequired,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Success,
    Warning,
}

#[derive(Debug, serde::Serialize)]
pub struct Banner {
    pub tone: Tone,
    pub text: &'static str,
}

/// Query string of pages that can show a notice.
#[derive(Debug, Default, serde::Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}

impl NoticeQuery {
    pub fn banner(&self) -> Option<Banner> {
        self.notice.as_deref().and_then(Notice::parse).map(Notice::banner)
    }
}

impl Notice {
    pub fn code(self) -> &'static str {
        match self {
            Notice::PlaceCreated => "place_created",
            Notice::ImageUploadFailed => "image_upload_failed",
            Notice::PlaceDeleted => "place_deleted",
            Notice::ReviewAdded => "review_added",
            Notice::ReviewDeleted => "review_deleted",
            Notice::UserCreated => "user_created",
            Notice::UserDeleted => "user_deleted",
            Notice::Registered => "registered",
            Notice::LoggedOut => "logged_out",
            Notice::LoginRequired => "login_required",
            Notice::AdminRequired => "admin_required",
        }
    }

    /// Unknown codes are ignored rather than rejected.
    pub fn parse(code: &str) -> Option<Notice> {
        [
            Notice::PlaceCreated,
            Notice::ImageUploadFailed,
            Notice::PlaceDeleted,
            Notice::ReviewAdded,
            Notice::ReviewDeleted,
            Notice::UserCreated,
            Notice::UserDeleted,
            Notice::Registered,
            Notice::LoggedOut,
            Notice::LoginRequired,
            Notice::AdminRequired,
        ]
        .into_iter()
        .find(|notice| notice.code() == code)
    }

    pub fn banner(self) -> Banner {
        let (tone, text) = match self {
            Notice::PlaceCreated => (Tone::Success, "Place added successfully!"),
            Notice::ImageUploadFailed => (
                Tone::Warning,
                "Place created, but the image upload failed.",
            ),
            Notice::PlaceDeleted => (Tone::Success, "Place deleted."),
            Notice::ReviewAdded => (Tone::Success, "Review submitted successfully!"),
            Notice::ReviewDeleted => (Tone::Success, "Review deleted."),
            Notice::UserCreated => (Tone::Success, "User added successfully!"),
            Notice::UserDeleted => (Tone::Success, "User deleted successfully."),
            Notice::Registered => (Tone::Success, "Registration successful! Please login."),
            Notice::LoggedOut => (Tone::Success, "You have been logged out."),
            Notice::LoginRequired => (Tone::Warning, "You must be logged in to do that."),
            Notice::AdminRequired => (Tone::Warning, "Admin access required."),
        };
        Banner { tone, text }
    }

    /// `path` with this notice appended to its query string.
    pub fn redirect_to(self, path: &str) -> String {
        let separator = if path.contains('?') { '&' } else { '?' };
        format!("{}{}notice={}", path, separator, self.code())
    }
}
