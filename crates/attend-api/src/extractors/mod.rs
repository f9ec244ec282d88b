//! Axum extractors for request handling
//!
//! Custom extractors for the session cookie, validated JSON bodies, and the
//! client address used as the rate-limit key.

mod client_ip;
mod session;
mod validated;

pub use client_ip::ClientIp;
pub use session::{SessionUser, SESSION_COOKIE};
pub use validated::ValidatedJson;
