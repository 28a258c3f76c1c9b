//! Session management and route authorization.
//!
//! This module provides:
//! - `SessionStore`: the single store for the login token and username
//! - `Route`/`authorize`: which screens need a session, decided in one place
//!
//! Sessions are persisted to disk and have no client-side expiry.

pub mod guard;
pub mod session;

pub use guard::{authorize, Route};
pub use session::{SessionData, SessionStore};
