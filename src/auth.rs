pub mod claims;
pub mod guard;
pub mod session;
pub mod viewer;

pub use claims::{Claims, DecodeError};
pub use guard::{require_admin, require_user, AuthError};
pub use session::SessionStore;
pub use viewer::Viewer;
