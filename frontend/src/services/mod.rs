//! Server communication.
//!
//! # Services
//!
//! - [`http`] - transport seam and the credentialed fetch implementation
//! - [`api`] - typed calls for logout, registration, upload and feedback

pub mod http;
pub mod api;

pub use http::*;
pub use api::*;
