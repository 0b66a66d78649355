//! Cookie-borne session tokens.

pub mod extractor;
pub mod session;

pub use extractor::AuthenticatedUser;
pub use session::{Claims, SESSION_COOKIE, SessionIssuer};
