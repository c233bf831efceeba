// Course endpoints
//
// Thin typed wrappers over `CourseClient::request`. Responses stay raw JSON:
// record shape is canonicalized downstream, not here.

use reqwest::Method;
use secrecy::SecretString;
use serde_json::Value;
use tracing::debug;

use crate::client::CourseClient;
use crate::error::Error;

impl CourseClient {
    /// List the courses owned by the token's identity.
    ///
    /// `GET /api/courses`
    pub async fn list_courses(&self, token: &SecretString) -> Result<Value, Error> {
        debug!("listing courses");
        self.request(Method::GET, &["api", "courses"], None, token)
            .await
    }

    /// Fetch a single course.
    ///
    /// `GET /api/courses/{id}`
    pub async fn get_course(&self, token: &SecretString, id: &str) -> Result<Value, Error> {
        debug!(id, "fetching course");
        self.request(Method::GET, &["api", "courses", id], None, token)
            .await
    }

    /// Create a course. Returns the created record.
    ///
    /// `POST /api/courses/add`
    pub async fn create_course(&self, token: &SecretString, body: &Value) -> Result<Value, Error> {
        debug!("creating course");
        self.request(Method::POST, &["api", "courses", "add"], Some(body), token)
            .await
    }

    /// Update a course with a partial or complete body. Returns the
    /// updated record.
    ///
    /// `PUT /api/courses/{id}`
    pub async fn update_course(
        &self,
        token: &SecretString,
        id: &str,
        body: &Value,
    ) -> Result<Value, Error> {
        debug!(id, "updating course");
        self.request(Method::PUT, &["api", "courses", id], Some(body), token)
            .await
    }

    /// Delete a course. Any acknowledgement body is discarded.
    ///
    /// `DELETE /api/courses/{id}`
    pub async fn delete_course(&self, token: &SecretString, id: &str) -> Result<(), Error> {
        debug!(id, "deleting course");
        let _: Value = self
            .request(Method::DELETE, &["api", "courses", id], None, token)
            .await?;
        Ok(())
    }
}
