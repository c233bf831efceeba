// ── Course identity ──
//
// The reconciliation key for every cache. Never empty.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable server-assigned course identifier.
///
/// Wraps the raw string verbatim (Mongo ObjectIds in practice, but the
/// store doesn't care). Construction rejects empty strings, so a cached
/// record always has a usable key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CourseId(String);

impl CourseId {
    /// Wrap a raw identifier. Returns `None` for an empty string.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() { None } else { Some(Self(raw)) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CourseId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CourseId {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw).ok_or_else(|| "course id must not be empty".to_owned())
    }
}

impl From<CourseId> for String {
    fn from(id: CourseId) -> Self {
        id.0
    }
}

impl PartialEq<str> for CourseId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CourseId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_id_is_rejected() {
        assert!(CourseId::new("").is_none());
        assert!(serde_json::from_str::<CourseId>(r#""""#).is_err());
    }

    #[test]
    fn id_is_kept_verbatim() {
        let id = CourseId::new(" 507f1f77bcf86cd799439011 ").unwrap();
        assert_eq!(id.as_str(), " 507f1f77bcf86cd799439011 ");
        assert_eq!(id, " 507f1f77bcf86cd799439011 ");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = CourseId::new("abc").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""abc""#);
    }
}
