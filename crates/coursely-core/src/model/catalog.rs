// ── Course catalog enums ──
//
// Level and category carry the server's exact wire strings. Values outside
// the known catalog are kept verbatim in `Other` so a record round-trips
// unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Course difficulty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Level {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Other(String),
}

impl Level {
    /// Known levels, in form order.
    pub const CATALOG: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Other(s) => s,
        }
    }

    /// Case-insensitive lookup against the known levels only.
    pub fn from_catalog(input: &str) -> Option<Self> {
        let input = input.trim();
        Self::CATALOG
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(input))
    }
}

impl From<String> for Level {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Beginner" => Self::Beginner,
            "Intermediate" => Self::Intermediate,
            "Advanced" => Self::Advanced,
            _ => Self::Other(s),
        }
    }
}

impl From<Level> for String {
    fn from(level: Level) -> Self {
        match level {
            Level::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Course category.
///
/// Wire values are inconsistent (`WebDevelopment` vs `Data Science`); they
/// are kept exactly as the server stores them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    #[default]
    WebDevelopment,
    CyberSecurity,
    DataManagement,
    DataAnalyst,
    DataScience,
    EmbeddedSystems,
    Other(String),
}

impl Category {
    pub const CATALOG: [Category; 6] = [
        Category::WebDevelopment,
        Category::CyberSecurity,
        Category::DataManagement,
        Category::DataAnalyst,
        Category::DataScience,
        Category::EmbeddedSystems,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::WebDevelopment => "WebDevelopment",
            Self::CyberSecurity => "CyberSecurity",
            Self::DataManagement => "Data Management",
            Self::DataAnalyst => "Data Analyst",
            Self::DataScience => "Data Science",
            Self::EmbeddedSystems => "Embedded Systems",
            Self::Other(s) => s,
        }
    }

    /// Lenient lookup for user input: ignores case, spaces, dashes and
    /// underscores, so `data-science` and `webdevelopment` both resolve.
    pub fn from_catalog(input: &str) -> Option<Self> {
        let wanted = squash(input);
        Self::CATALOG
            .into_iter()
            .find(|c| squash(c.as_str()) == wanted)
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        match s.as_str() {
            "WebDevelopment" => Self::WebDevelopment,
            "CyberSecurity" => Self::CyberSecurity,
            "Data Management" => Self::DataManagement,
            "Data Analyst" => Self::DataAnalyst,
            "Data Science" => Self::DataScience,
            "Embedded Systems" => Self::EmbeddedSystems,
            _ => Self::Other(s),
        }
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn category_uses_exact_wire_strings() {
        let json = serde_json::to_string(&Category::DataScience).unwrap();
        assert_eq!(json, r#""Data Science""#);
        let back: Category = serde_json::from_str(r#""WebDevelopment""#).unwrap();
        assert_eq!(back, Category::WebDevelopment);
    }

    #[test]
    fn unknown_values_round_trip_verbatim() {
        let level: Level = serde_json::from_str(r#""Expert""#).unwrap();
        assert_eq!(level, Level::Other("Expert".into()));
        assert_eq!(serde_json::to_string(&level).unwrap(), r#""Expert""#);

        let cat: Category = serde_json::from_str(r#""Robotics""#).unwrap();
        assert_eq!(cat.to_string(), "Robotics");
    }

    #[test]
    fn wire_match_is_case_sensitive() {
        let level: Level = serde_json::from_str(r#""beginner""#).unwrap();
        assert_eq!(level, Level::Other("beginner".into()));
    }

    #[test]
    fn lenient_catalog_lookup() {
        assert_eq!(Level::from_catalog("advanced"), Some(Level::Advanced));
        assert_eq!(
            Category::from_catalog("data-science"),
            Some(Category::DataScience)
        );
        assert_eq!(
            Category::from_catalog("embedded_systems"),
            Some(Category::EmbeddedSystems)
        );
        assert_eq!(Category::from_catalog("robotics"), None);
    }

    #[test]
    fn defaults_match_create_form() {
        assert_eq!(Level::default(), Level::Beginner);
        assert_eq!(Category::default(), Category::WebDevelopment);
    }
}
