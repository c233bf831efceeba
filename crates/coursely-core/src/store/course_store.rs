// ── Course store ──
//
// Owns the collection cache, the selected-item cache and one lifecycle
// record per operation kind. Every operation reads the token from the
// auth context, calls the gateway once, normalizes, then reconciles.
//
// Last response wins: there is no sequencing, dedupe or cancellation, so
// overlapping calls settle in whatever order their responses arrive.

use std::sync::Arc;

use secrecy::SecretString;
use serde_json::Value;
use tokio::sync::watch;
use tracing::debug;

use crate::auth::AuthContext;
use crate::error::CoreError;
use crate::model::{Course, CourseDraft, CourseId, CoursePatch};
use crate::normalize::{normalize, normalize_all};
use crate::stream::{CourseSnapshot, CourseStream};

use super::collection::OrderedCollection;
use super::lifecycle::{Lifecycle, Lifecycles, OperationKind};

struct StoreInner {
    auth: AuthContext,
    courses: OrderedCollection<Course>,
    selected: watch::Sender<Option<Arc<Course>>>,
    lifecycles: Lifecycles,
}

/// Client-side cache of the signed-in user's courses.
///
/// Cheaply cloneable; clones share state, so one store can be driven from
/// several tasks at once. No lock is held across an `.await`.
#[derive(Clone)]
pub struct CourseStore {
    inner: Arc<StoreInner>,
}

impl CourseStore {
    pub fn new(auth: AuthContext) -> Self {
        let (selected, _) = watch::channel(None);
        Self {
            inner: Arc::new(StoreInner {
                auth,
                courses: OrderedCollection::new(),
                selected,
                lifecycles: Lifecycles::new(),
            }),
        }
    }

    pub fn auth(&self) -> &AuthContext {
        &self.inner.auth
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Fetch the signed-in user's courses and replace the collection cache
    /// wholesale, in server order.
    pub async fn list_mine(&self) -> Result<Vec<Course>, CoreError> {
        let kind = OperationKind::List;
        let token = self.require_token(kind)?;

        self.inner.lifecycles.begin(kind);
        let courses = self.settle(kind, self.fetch_list(&token).await)?;

        self.inner.courses.replace_all(courses.clone());
        self.inner.lifecycles.succeed(kind);
        debug!(count = courses.len(), "collection replaced");
        Ok(courses)
    }

    /// Fetch one course into the selected-item cache.
    pub async fn fetch_one(&self, id: &str) -> Result<Course, CoreError> {
        let kind = OperationKind::FetchOne;
        let token = self.require_token(kind)?;
        let id = self.require_id(kind, id)?;
        debug!(%id, "fetching course");

        self.inner.lifecycles.begin(kind);
        let course = self.settle(kind, self.fetch_course(&token, &id).await)?;

        self.inner
            .selected
            .send_replace(Some(Arc::new(course.clone())));
        self.inner.lifecycles.succeed(kind);
        Ok(course)
    }

    /// Apply `patch` to course `id` and reconcile the result into both
    /// caches.
    ///
    /// Both caches are keyed by `id`: every collection element with that id
    /// is replaced in place (a miss is ignored) and the selected item is
    /// replaced only when it is that course. A response naming a different
    /// course is a validation error. On failure neither cache changes and
    /// only the update record carries the error.
    pub async fn update(&self, id: &str, patch: &CoursePatch) -> Result<Course, CoreError> {
        let kind = OperationKind::Update;
        let token = self.require_token(kind)?;
        let id = self.require_id(kind, id)?;
        if patch.is_empty() {
            return Err(self.reject(kind, CoreError::validation("update patch is empty")));
        }

        debug!(%id, "updating course");
        self.inner.lifecycles.begin(kind);
        let course = self.settle(kind, self.put_course(&token, &id, patch).await)?;
        if course.id != id {
            return Err(self.reject(
                kind,
                CoreError::validation(format!(
                    "update response is for course '{}', expected '{id}'",
                    course.id
                )),
            ));
        }

        let in_collection = self.inner.courses.replace(course.clone());
        let in_selected = self.inner.selected.send_if_modified(|sel| {
            if sel.as_ref().is_some_and(|s| s.id == id) {
                *sel = Some(Arc::new(course.clone()));
                true
            } else {
                false
            }
        });
        self.inner.lifecycles.succeed(kind);
        debug!(in_collection, in_selected, "update reconciled");
        Ok(course)
    }

    /// Delete course `id`, dropping it from the collection and clearing
    /// the selected item if it was that course.
    pub async fn delete(&self, id: &str) -> Result<(), CoreError> {
        let kind = OperationKind::Delete;
        let token = self.require_token(kind)?;
        let id = self.require_id(kind, id)?;
        debug!(%id, "deleting course");

        self.inner.lifecycles.begin(kind);
        let result = self
            .inner
            .auth
            .client()
            .delete_course(&token, id.as_str())
            .await
            .map_err(CoreError::from);
        self.settle(kind, result)?;

        let in_collection = self.inner.courses.remove(id.as_str());
        let in_selected = self.inner.selected.send_if_modified(|sel| {
            if sel.as_ref().is_some_and(|s| s.id == id) {
                *sel = None;
                true
            } else {
                false
            }
        });
        self.inner.lifecycles.succeed(kind);
        debug!(in_collection, in_selected, "delete reconciled");
        Ok(())
    }

    /// Create a course. Returns the stored record with its server-assigned
    /// id. Neither cache changes; a following `list_mine` picks it up.
    pub async fn create(&self, draft: &CourseDraft) -> Result<Course, CoreError> {
        let kind = OperationKind::Create;
        let token = self.require_token(kind)?;
        debug!(title = %draft.title, "creating course");

        self.inner.lifecycles.begin(kind);
        let course = self.settle(kind, self.post_course(&token, draft).await)?;

        self.inner.lifecycles.succeed(kind);
        debug!(id = %course.id, "course created");
        Ok(course)
    }

    /// Drop the selected item and the fetch-one error.
    pub fn clear_selected(&self) {
        self.inner.selected.send_replace(None);
        self.inner.lifecycles.clear_error(OperationKind::FetchOne);
    }

    /// Clear the error on every lifecycle record. In-flight flags stay.
    pub fn clear_errors(&self) {
        self.inner.lifecycles.clear_all_errors();
    }

    // ── Read side ────────────────────────────────────────────────────

    pub fn courses_snapshot(&self) -> CourseSnapshot {
        self.inner.courses.snapshot()
    }

    pub fn course_by_id(&self, id: &str) -> Option<Arc<Course>> {
        self.inner.courses.get(id)
    }

    pub fn course_count(&self) -> usize {
        self.inner.courses.len()
    }

    /// Bumped on every effective change to the collection cache.
    pub fn courses_version(&self) -> u64 {
        self.inner.courses.version()
    }

    pub fn selected(&self) -> Option<Arc<Course>> {
        self.inner.selected.borrow().clone()
    }

    pub fn lifecycle(&self, kind: OperationKind) -> Lifecycle {
        self.inner.lifecycles.get(kind)
    }

    pub fn subscribe_courses(&self) -> CourseStream {
        CourseStream::new(self.inner.courses.subscribe())
    }

    pub fn subscribe_selected(&self) -> watch::Receiver<Option<Arc<Course>>> {
        self.inner.selected.subscribe()
    }

    pub fn subscribe_lifecycle(&self, kind: OperationKind) -> watch::Receiver<Lifecycle> {
        self.inner.lifecycles.subscribe(kind)
    }

    // ── Preconditions ────────────────────────────────────────────────

    fn require_token(&self, kind: OperationKind) -> Result<SecretString, CoreError> {
        self.inner
            .auth
            .token()
            .ok_or_else(|| self.reject(kind, CoreError::NotAuthenticated))
    }

    fn require_id(&self, kind: OperationKind, id: &str) -> Result<CourseId, CoreError> {
        CourseId::new(id)
            .ok_or_else(|| self.reject(kind, CoreError::validation("course id is required")))
    }

    /// Record `err` on `kind`'s lifecycle and hand it back.
    fn reject(&self, kind: OperationKind, err: CoreError) -> CoreError {
        self.inner.lifecycles.fail(kind, err.to_string());
        err
    }

    /// Record a failed gateway round trip. Success is recorded by the
    /// caller once the caches are written.
    fn settle<T>(&self, kind: OperationKind, result: Result<T, CoreError>) -> Result<T, CoreError> {
        result.map_err(|e| self.reject(kind, e))
    }

    // ── Gateway round trips ──────────────────────────────────────────

    async fn fetch_list(&self, token: &SecretString) -> Result<Vec<Course>, CoreError> {
        let raw = self.inner.auth.client().list_courses(token).await?;
        normalize_all(raw)
    }

    async fn fetch_course(&self, token: &SecretString, id: &CourseId) -> Result<Course, CoreError> {
        let raw = self
            .inner
            .auth
            .client()
            .get_course(token, id.as_str())
            .await?;
        normalize(raw)
    }

    async fn put_course(
        &self,
        token: &SecretString,
        id: &CourseId,
        patch: &CoursePatch,
    ) -> Result<Course, CoreError> {
        let body = serde_json::to_value(patch)
            .map_err(|e| CoreError::validation(format!("cannot encode patch: {e}")))?;
        let raw = self
            .inner
            .auth
            .client()
            .update_course(token, id.as_str(), &body)
            .await?;
        normalize(raw)
    }

    async fn post_course(
        &self,
        token: &SecretString,
        draft: &CourseDraft,
    ) -> Result<Course, CoreError> {
        let body = serde_json::to_value(draft)
            .map_err(|e| CoreError::validation(format!("cannot encode course: {e}")))?;
        let raw = self.inner.auth.client().create_course(token, &body).await?;
        normalize(unwrap_created(raw))
    }
}

/// Create responses may wrap the record: `{"message": .., "course": {..}}`.
fn unwrap_created(raw: Value) -> Value {
    match raw {
        Value::Object(mut map) if !map.contains_key("_id") && !map.contains_key("id") => {
            match map.remove("course") {
                Some(inner @ Value::Object(_)) => inner,
                _ => Value::Object(map),
            }
        }
        other => other,
    }
}

impl std::fmt::Debug for CourseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CourseStore")
            .field("courses", &self.course_count())
            .field("selected", &self.selected().map(|c| c.id.clone()))
            .finish_non_exhaustive()
    }
}
