use campus_core::entities::Recommendation;
use serde::Serialize;

/// Printable summary of one recommendation.
#[derive(Debug, Serialize)]
pub struct RecommendationRow {
    pub id: String,
    pub title: String,
    pub score: f64,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub selected: bool,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl RecommendationRow {
    #[must_use]
    pub fn new(rec: &Recommendation, selected: bool) -> Self {
        Self {
            id: rec.id.clone(),
            title: rec.title.clone(),
            score: rec.score,
            selected,
            tags: rec.tags.clone(),
            description: rec.description.clone(),
        }
    }
}
