use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A ranked recommendation produced by the backend.
///
/// Records are never mutated after they are produced; presentation only
/// reorders or subsets them.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Recommendation {
    #[serde(deserialize_with = "string_or_number")]
    #[schemars(with = "String")]
    pub id: String,
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// 0-100, higher is better.
    #[serde(alias = "match_score")]
    pub score: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub why_perfect: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub student_quotes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub also_liked: Vec<String>,
    /// Domain-specific fields (location, price, professor, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Recommendation {
    pub fn new(id: impl Into<String>, title: impl Into<String>, score: f64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            score,
            tags: Vec::new(),
            why_perfect: Vec::new(),
            student_quotes: Vec::new(),
            also_liked: Vec::new(),
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| (*t).to_string()).collect();
        self
    }

    #[must_use]
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    /// Whether the score lies in the documented 0-100 range.
    #[must_use]
    pub fn has_valid_score(&self) -> bool {
        self.score.is_finite() && (0.0..=100.0).contains(&self.score)
    }

    /// Case-insensitive substring match over title, description, and tags.
    ///
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_domain_fields_into_extra() {
        let rec: Recommendation = serde_json::from_str(
            r#"{"id": 7, "name": "Maple Hall", "score": 91, "location": "North", "price": 5200}"#,
        )
        .unwrap();
        assert_eq!(rec.id, "7");
        assert_eq!(rec.title, "Maple Hall");
        assert_eq!(rec.extra["location"], "North");
        assert_eq!(rec.extra["price"], 5200);
    }

    #[test]
    fn score_range_is_checked() {
        assert!(Recommendation::new("a", "A", 100.0).has_valid_score());
        assert!(!Recommendation::new("a", "A", 101.0).has_valid_score());
        assert!(!Recommendation::new("a", "A", f64::NAN).has_valid_score());
    }

    #[test]
    fn substring_match_covers_tags() {
        let rec = Recommendation::new("c1", "Robotics Club", 80.0)
            .with_description("Build robots")
            .with_tags(&["STEM", "Engineering"]);
        assert!(rec.matches_lowercase("stem"));
        assert!(rec.matches_lowercase("robots"));
        assert!(!rec.matches_lowercase("music"));
    }
}
