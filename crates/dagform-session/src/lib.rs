//! dagform-session: per-user scratch state addressed by an opaque token.

pub mod error;
pub mod session;
pub mod store;

pub use error::{Result, SessionError};
pub use session::{EdgeUpdate, Session};
pub use store::{SessionPolicy, SessionStore};
