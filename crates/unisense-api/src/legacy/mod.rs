// Legacy API client modules
//
// Hand-written client for the controller's session-authenticated endpoints
// wrapped in the standard `{ meta: { rc, msg }, data: [...] }` envelope.

pub mod auth;
pub mod client;
pub mod clients;
pub mod devices;
pub mod models;

pub use auth::LoginOutcome;
pub use client::{FETCH_TIMEOUT, LOGIN_TIMEOUT, SessionClient};
