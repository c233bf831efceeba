// Session login
//
// `POST /api/auth/login` exchanges email + password for a bearer token and
// the user's identity. The client keeps no session state; callers hold the
// token and pass it back into every course call.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::client::CourseClient;
use crate::error::Error;

/// Identity returned alongside the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Successful login payload: `{token, user}`.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub token: SecretString,
    pub user: Option<UserInfo>,
}

#[derive(Deserialize)]
struct RawLoginResponse {
    token: String,
    #[serde(default)]
    user: Option<UserInfo>,
}

impl CourseClient {
    /// Authenticate with email and password.
    ///
    /// `POST /api/auth/login` with `{email, password}`. No bearer header is
    /// sent. A rejected login surfaces as `Error::Status` carrying the
    /// server's `message` verbatim.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<LoginResponse, Error> {
        debug!(email, "logging in");

        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });

        let value = self
            .request_anonymous(Method::POST, &["api", "auth", "login"], &body)
            .await
            .map_err(|e| match e {
                // No `message` in the rejection body.
                Error::Status { status, message } if message == format!("HTTP {status}") => {
                    Error::Status {
                        status,
                        message: "Login failed".into(),
                    }
                }
                other => other,
            })?;

        let raw: RawLoginResponse = Self::decode(value)?;
        if raw.token.is_empty() {
            return Err(Error::Deserialization {
                message: "login response carried an empty token".into(),
                body: String::new(),
            });
        }

        debug!("login successful");
        Ok(LoginResponse {
            token: SecretString::from(raw.token),
            user: raw.user,
        })
    }
}
