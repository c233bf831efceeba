// ── Course records ──
//
// `Course` is the canonical cached shape. `CourseDraft` and `CoursePatch`
// are outbound bodies for create and update.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::catalog::{Category, Level};
use super::course_id::CourseId;

/// A course as held in the store's caches.
///
/// Built only by the normalizer, so `id` is always present. `level` and
/// `category` stay `None` when the server omits them; `title`,
/// `description` and `subcategory` default to empty strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default)]
    pub subcategory: String,
    /// Data-URI text. Opaque to the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    /// Server fields outside the known shape (`enrolledStudents`,
    /// timestamps, ...), carried through unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Course {
    pub fn has_cover_image(&self) -> bool {
        self.cover_image.as_deref().is_some_and(|c| !c.is_empty())
    }
}

/// Body of a create request.
///
/// Defaults mirror a blank create form: Beginner, Web Development, no
/// subcategory and no cover image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDraft {
    pub title: String,
    pub description: String,
    pub level: Level,
    pub category: Category,
    pub subcategory: String,
    pub cover_image: String,
}

impl CourseDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }
}

/// Partial update body. Absent fields are left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

impl CoursePatch {
    /// `true` when no field is set. The store rejects empty patches.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.level.is_none()
            && self.category.is_none()
            && self.subcategory.is_none()
            && self.cover_image.is_none()
    }
}

impl From<&Course> for CoursePatch {
    /// Full-replacement patch carrying every editable field of `course`.
    fn from(course: &Course) -> Self {
        Self {
            title: Some(course.title.clone()),
            description: Some(course.description.clone()),
            level: course.level.clone(),
            category: course.category.clone(),
            subcategory: Some(course.subcategory.clone()),
            cover_image: course.cover_image.clone(),
        }
    }
}
