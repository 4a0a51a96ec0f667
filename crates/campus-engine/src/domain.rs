//! Built-in domain descriptors and their lookup.

use campus_core::QuizError;
use campus_core::entities::{DomainDescriptor, PersistenceKeys};
use campus_core::enums::SearchMerge;

const SEARCH_PATH: &str = "/api/modules/{domain}/search";

fn keys(results: &str) -> PersistenceKeys {
    PersistenceKeys {
        completed: None,
        results: results.to_string(),
        selected: None,
        answers: None,
    }
}

fn descriptor(name: &str, title: &str) -> DomainDescriptor {
    let mut d = DomainDescriptor::new(name);
    d.title = title.to_string();
    d
}

/// The flows the portal ships with.
#[must_use]
pub fn builtin_descriptors() -> Vec<DomainDescriptor> {
    let mut onboarding = descriptor("onboarding", "Freshman onboarding");
    onboarding.follow_up_path = None;
    onboarding.persistence = Some(PersistenceKeys {
        completed: Some("quizCompleted".into()),
        ..keys("freshmanFlowResults")
    });

    let mut dorm = descriptor("dorm", "Housing");
    dorm.search_path = Some(SEARCH_PATH.into());
    dorm.selection_cap = Some(1);
    dorm.persistence = Some(PersistenceKeys {
        selected: Some("selectedDorm".into()),
        ..keys("dormRecommendations")
    });

    let mut roommate = descriptor("roommate", "Roommate matching");
    roommate.follow_up_path = None;
    roommate.persistence = Some(PersistenceKeys {
        answers: Some("roommateQuizAnswers".into()),
        ..keys("roommateQuizShortlist")
    });

    let mut enrollment = descriptor("enrollment", "Course enrollment");
    enrollment.search_path = Some(SEARCH_PATH.into());
    enrollment.action_path = Some("/api/modules/{domain}/enroll".into());
    enrollment.action_label = "enroll".into();
    enrollment.selection_cap = Some(5);
    enrollment.persistence = Some(keys("enrollmentRecommendations"));

    let mut jobs = descriptor("jobs", "Student jobs");
    jobs.search_path = Some(SEARCH_PATH.into());
    jobs.action_path = Some("/api/modules/{domain}/apply".into());
    jobs.action_label = "apply".into();
    jobs.persistence = Some(keys("jobRecommendations"));

    let mut clubs = descriptor("clubs", "Clubs and community");
    clubs.search_path = Some(SEARCH_PATH.into());
    clubs.search_merge = SearchMerge::Append;
    clubs.action_path = Some("/api/modules/{domain}/join".into());
    clubs.action_label = "join".into();
    clubs.persistence = Some(keys("communityRecommendations"));

    vec![onboarding, dorm, roommate, enrollment, jobs, clubs]
}

/// Descriptors by name: the built-ins, overridden or extended by
/// configuration.
#[derive(Debug, Clone)]
pub struct DomainRegistry {
    descriptors: Vec<DomainDescriptor>,
}

impl Default for DomainRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl DomainRegistry {
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            descriptors: builtin_descriptors(),
        }
    }

    /// Replace built-ins with configured descriptors of the same name and
    /// append the rest, keeping configuration order.
    #[must_use]
    pub fn with_overrides(mut self, overrides: Vec<DomainDescriptor>) -> Self {
        for descriptor in overrides {
            match self
                .descriptors
                .iter_mut()
                .find(|d| d.name == descriptor.name)
            {
                Some(existing) => *existing = descriptor,
                None => self.descriptors.push(descriptor),
            }
        }
        self
    }

    /// Look up a descriptor by name.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::UnknownDomain`] if none is registered.
    pub fn get(&self, name: &str) -> Result<&DomainDescriptor, QuizError> {
        self.descriptors
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| QuizError::UnknownDomain(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &DomainDescriptor> {
        self.descriptors.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
