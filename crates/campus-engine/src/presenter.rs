//! Ranked recommendation list with sort, filter, selection and expansion.
//!
//! All state here is view state. Records are never mutated; sorting and
//! filtering produce a projection over the backend's order.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use campus_core::QuizError;
use campus_core::entities::Recommendation;
use campus_core::enums::{SearchMerge, SortKey};
use serde_json::Value;

#[derive(Debug, Clone, Default)]
pub struct RecommendationPresenter {
    records: Vec<Recommendation>,
    sort: Option<SortKey>,
    query: String,
    /// Selected ids in selection order.
    selected: Vec<String>,
    expanded: BTreeSet<String>,
    cap: Option<usize>,
}

impl RecommendationPresenter {
    #[must_use]
    pub fn new(cap: Option<usize>) -> Self {
        Self {
            cap,
            ..Self::default()
        }
    }

    /// Replace the records and drop all view state.
    pub fn set_records(&mut self, records: Vec<Recommendation>) {
        self.records = records;
        self.sort = None;
        self.query.clear();
        self.selected.clear();
        self.expanded.clear();
    }

    /// Records in backend order.
    #[must_use]
    pub fn records(&self) -> &[Recommendation] {
        &self.records
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Recommendation> {
        self.records.iter().find(|r| r.id == id)
    }

    #[must_use]
    pub const fn cap(&self) -> Option<usize> {
        self.cap
    }

    pub fn sort_by(&mut self, key: SortKey) {
        self.sort = Some(key);
    }

    #[must_use]
    pub const fn sort_key(&self) -> Option<&SortKey> {
        self.sort.as_ref()
    }

    /// Keep only records whose title, description or tags contain `query`,
    /// ignoring case. A blank query shows everything.
    pub fn filter_by_substring(&mut self, query: &str) {
        self.query = query.trim().to_lowercase();
    }

    /// Filtered and sorted projection of the records.
    #[must_use]
    pub fn view(&self) -> Vec<&Recommendation> {
        let mut view: Vec<&Recommendation> = self
            .records
            .iter()
            .filter(|r| self.query.is_empty() || r.matches_lowercase(&self.query))
            .collect();
        if let Some(key) = &self.sort {
            view.sort_by(|a, b| compare(key, a, b));
        }
        view
    }

    /// Select or deselect `id`; returns whether it is selected afterwards.
    ///
    /// Selecting beyond the cap is refused silently (returns `false`).
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::UnknownRecommendation`] if no record has `id`.
    pub fn toggle_selection(&mut self, id: &str) -> Result<bool, QuizError> {
        self.ensure_known(id)?;
        if let Some(pos) = self.selected.iter().position(|s| s == id) {
            self.selected.remove(pos);
            return Ok(false);
        }
        if self.cap.is_some_and(|cap| self.selected.len() >= cap) {
            tracing::debug!(id, cap = ?self.cap, "selection cap reached");
            return Ok(false);
        }
        self.selected.push(id.to_string());
        Ok(true)
    }

    /// Expand or collapse the details of `id`; returns whether it is
    /// expanded afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::UnknownRecommendation`] if no record has `id`.
    pub fn toggle_expansion(&mut self, id: &str) -> Result<bool, QuizError> {
        self.ensure_known(id)?;
        if self.expanded.remove(id) {
            Ok(false)
        } else {
            self.expanded.insert(id.to_string());
            Ok(true)
        }
    }

    #[must_use]
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    #[must_use]
    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    #[must_use]
    pub fn selected_ids(&self) -> &[String] {
        &self.selected
    }

    /// Merge search results into the displayed records.
    ///
    /// `Replace` swaps the list and prunes selection and expansion to ids
    /// that survive. `Append` adds records whose id is not already shown,
    /// after the existing ones.
    pub fn apply_search(&mut self, results: Vec<Recommendation>, merge: SearchMerge) {
        match merge {
            SearchMerge::Replace => {
                self.records = results;
                let records = &self.records;
                self.selected.retain(|id| records.iter().any(|r| &r.id == id));
                self.expanded.retain(|id| records.iter().any(|r| &r.id == id));
            }
            SearchMerge::Append => {
                for rec in results {
                    if !self.records.iter().any(|r| r.id == rec.id) {
                        self.records.push(rec);
                    }
                }
            }
        }
    }

    fn ensure_known(&self, id: &str) -> Result<(), QuizError> {
        if self.get(id).is_some() {
            Ok(())
        } else {
            Err(QuizError::UnknownRecommendation(id.to_string()))
        }
    }
}

/// Order two records by `key`. Used with a stable sort so ties keep
/// backend order.
#[must_use]
pub fn compare(key: &SortKey, a: &Recommendation, b: &Recommendation) -> Ordering {
    match key {
        SortKey::Score => b.score.total_cmp(&a.score),
        SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortKey::Field(name) => match (a.extra.get(name), b.extra.get(name)) {
            (Some(x), Some(y)) => compare_values(x, y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .unwrap_or(f64::NAN)
            .total_cmp(&y.as_f64().unwrap_or(f64::NAN)),
        (Value::Number(_), _) => Ordering::Less,
        (_, Value::Number(_)) => Ordering::Greater,
        (Value::String(x), Value::String(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
        _ => a.to_string().cmp(&b.to_string()),
    }
}
