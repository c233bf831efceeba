// coursely-api: Async Rust client for the course management HTTP API

pub mod auth;
pub mod client;
pub mod courses;
pub mod error;
pub mod transport;

pub use auth::{LoginResponse, UserInfo};
pub use client::CourseClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};

/// HTTP method re-export so callers of [`CourseClient::request`] don't need
/// a direct `reqwest` dependency.
pub use reqwest::Method;
