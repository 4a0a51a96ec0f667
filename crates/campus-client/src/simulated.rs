//! Offline recommendation agent.
//!
//! Answers every [`QuizBackend`] call from canned data: a short question set
//! per built-in domain, follow-up questions derived from the initial
//! answers, and a catalog ranked by keyword overlap with everything the
//! student answered so far. Output is deterministic for a given answer set.

use std::collections::BTreeSet;
use std::sync::Mutex;

use campus_core::entities::{AnswerValue, DomainDescriptor, Question, Recommendation};
use campus_core::enums::Phase;
use campus_core::responses::{
    ActionRequest, ActionResponse, PhaseOutcome, SearchRequest, SubmitRequest,
};

use crate::QuizBackend;
use crate::error::ClientError;

/// Base score every catalog entry starts from before keyword matches.
const BASE_SCORE: f64 = 55.0;
/// Score added per matched answer keyword.
const MATCH_BONUS: f64 = 9.0;
const MAX_SCORE: f64 = 99.0;

struct Entry {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    tags: &'static [&'static str],
    field: (&'static str, &'static str),
}

enum Prompt {
    Single(&'static str, &'static [&'static str]),
    Multi(&'static str, &'static [&'static str]),
    Text(&'static str),
}

fn initial_prompts(domain: &str) -> Option<&'static [Prompt]> {
    let prompts: &'static [Prompt] = match domain {
        "onboarding" => &[
            Prompt::Single(
                "What are you most excited about this year?",
                &["Academics", "Making friends", "Clubs", "Sports"],
            ),
            Prompt::Multi(
                "Which of these do you want help with?",
                &["Housing", "Courses", "Jobs", "Community"],
            ),
            Prompt::Text("Tell us one thing you want to get out of college."),
        ],
        "dorm" => &[
            Prompt::Single(
                "What is your yearly housing budget?",
                &["Under $5k", "$5k-$8k", "Over $8k"],
            ),
            Prompt::Single(
                "How would you describe your ideal floor?",
                &["Quiet", "Social", "Somewhere in between"],
            ),
            Prompt::Multi(
                "Which amenities matter to you?",
                &["Gym", "Library", "Dining", "Laundry"],
            ),
        ],
        "roommate" => &[
            Prompt::Single("When do you usually go to sleep?", &["Early", "Late", "Varies"]),
            Prompt::Single("How tidy do you keep your space?", &["Very tidy", "Relaxed"]),
            Prompt::Multi(
                "What do you do to unwind?",
                &["Gaming", "Music", "Reading", "Sports"],
            ),
        ],
        "enrollment" => &[
            Prompt::Single(
                "Which area are you majoring in?",
                &["Computer science", "Mathematics", "Biology", "Undeclared"],
            ),
            Prompt::Single("Preferred class time?", &["Morning", "Afternoon", "Evening"]),
            Prompt::Multi(
                "What topics interest you?",
                &["Programming", "Statistics", "Writing", "Design"],
            ),
        ],
        "jobs" => &[
            Prompt::Single(
                "How many hours a week can you work?",
                &["Under 10", "10-20", "Over 20"],
            ),
            Prompt::Multi(
                "What kind of work do you enjoy?",
                &["Research", "Tutoring", "Library", "Programming"],
            ),
        ],
        "clubs" => &[
            Prompt::Multi(
                "Which interests would you like to explore?",
                &["Music", "Robotics", "Hiking", "Chess"],
            ),
            Prompt::Single(
                "How much time can you commit each week?",
                &["An hour or two", "A few hours", "As much as it takes"],
            ),
        ],
        _ => return None,
    };
    Some(prompts)
}

fn catalog(domain: &str) -> &'static [Entry] {
    match domain {
        "dorm" => &[
            Entry {
                id: "dorm-maple",
                title: "Maple Hall",
                description: "Quiet hall next to the library with single rooms",
                tags: &["quiet", "library", "under $5k"],
                field: ("location", "North Campus"),
            },
            Entry {
                id: "dorm-birch",
                title: "Birch Commons",
                description: "Social suites above the main dining hall",
                tags: &["social", "dining", "$5k-$8k"],
                field: ("location", "Central Campus"),
            },
            Entry {
                id: "dorm-cedar",
                title: "Cedar Towers",
                description: "Modern tower with a gym and in-building laundry",
                tags: &["gym", "laundry", "over $8k"],
                field: ("location", "East Campus"),
            },
        ],
        "roommate" => &[
            Entry {
                id: "rm-alex",
                title: "Alex P.",
                description: "Early riser, very tidy, into reading and music",
                tags: &["early", "very tidy", "reading", "music"],
                field: ("major", "History"),
            },
            Entry {
                id: "rm-jordan",
                title: "Jordan K.",
                description: "Night owl who loves gaming and a relaxed room",
                tags: &["late", "relaxed", "gaming"],
                field: ("major", "Computer Science"),
            },
            Entry {
                id: "rm-sam",
                title: "Sam R.",
                description: "Plays intramural sports, schedule varies",
                tags: &["varies", "sports", "relaxed"],
                field: ("major", "Kinesiology"),
            },
        ],
        "enrollment" => &[
            Entry {
                id: "cs-101",
                title: "Intro to Programming",
                description: "Programming fundamentals in Python, morning lectures",
                tags: &["computer science", "programming", "morning"],
                field: ("professor", "Dr. Rivera"),
            },
            Entry {
                id: "math-220",
                title: "Applied Statistics",
                description: "Statistics for the sciences, afternoon sections",
                tags: &["mathematics", "statistics", "afternoon"],
                field: ("professor", "Dr. Chen"),
            },
            Entry {
                id: "bio-110",
                title: "Cell Biology",
                description: "Lab-based introduction to biology",
                tags: &["biology", "lab", "morning"],
                field: ("professor", "Dr. Okafor"),
            },
            Entry {
                id: "des-150",
                title: "Design Thinking",
                description: "Evening studio on design and writing for the web",
                tags: &["design", "writing", "evening", "undeclared"],
                field: ("professor", "Prof. Lind"),
            },
        ],
        "jobs" => &[
            Entry {
                id: "job-lab",
                title: "Research Assistant",
                description: "Support a biology research lab, 10-20 hours a week",
                tags: &["research", "10-20"],
                field: ("pay", "$16/hr"),
            },
            Entry {
                id: "job-tutor",
                title: "Peer Tutor",
                description: "Tutoring in math and programming, under 10 hours",
                tags: &["tutoring", "programming", "under 10"],
                field: ("pay", "$15/hr"),
            },
            Entry {
                id: "job-library",
                title: "Library Desk Assistant",
                description: "Front desk shifts at the main library",
                tags: &["library", "over 20", "10-20"],
                field: ("pay", "$14/hr"),
            },
        ],
        "clubs" => &[
            Entry {
                id: "club-robotics",
                title: "Robotics Club",
                description: "Build robots for regional competitions",
                tags: &["robotics", "engineering", "as much as it takes"],
                field: ("meets", "Thursdays"),
            },
            Entry {
                id: "club-outdoors",
                title: "Outdoors Society",
                description: "Weekend hiking and camping trips",
                tags: &["hiking", "a few hours"],
                field: ("meets", "Saturdays"),
            },
            Entry {
                id: "club-chess",
                title: "Chess Circle",
                description: "Casual and rated chess nights",
                tags: &["chess", "an hour or two"],
                field: ("meets", "Tuesdays"),
            },
            Entry {
                id: "club-choir",
                title: "Campus Choir",
                description: "Music ensemble open to all voices",
                tags: &["music", "a few hours"],
                field: ("meets", "Mondays"),
            },
        ],
        _ => &[
            Entry {
                id: "hub-housing",
                title: "Housing Office",
                description: "Find the dorm that fits your budget",
                tags: &["housing"],
                field: ("next_step", "dorm"),
            },
            Entry {
                id: "hub-courses",
                title: "Course Planner",
                description: "Build a first-semester schedule with academics in mind",
                tags: &["courses", "academics"],
                field: ("next_step", "enrollment"),
            },
            Entry {
                id: "hub-jobs",
                title: "Student Employment",
                description: "On-campus jobs that fit around classes",
                tags: &["jobs"],
                field: ("next_step", "jobs"),
            },
            Entry {
                id: "hub-community",
                title: "Clubs and Community",
                description: "Meet people through clubs, sports and making friends",
                tags: &["community", "clubs", "sports", "making friends"],
                field: ("next_step", "clubs"),
            },
        ],
    }
}

/// Deterministic offline stand-in for the portal backend.
///
/// Answers submitted in earlier phases are remembered so the final ranking
/// reflects the whole quiz, the way the real backend keeps a session.
#[derive(Debug, Default)]
pub struct SimulatedBackend {
    keywords: Mutex<Vec<String>>,
}

impl SimulatedBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn remember(&self, request: &SubmitRequest) -> Vec<String> {
        let mut keywords = self
            .keywords
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        for entry in &request.responses {
            keywords.extend(answer_keywords(&entry.answer));
        }
        keywords.clone()
    }

    fn rank(domain: &str, keywords: &[String]) -> Vec<Recommendation> {
        let mut ranked: Vec<Recommendation> = catalog(domain)
            .iter()
            .map(|entry| {
                let matched: Vec<&String> = keywords
                    .iter()
                    .filter(|k| entry_matches(entry, k))
                    .collect();
                let mut rec = to_recommendation(entry, overlap_score(matched.len()));
                rec.why_perfect = matched
                    .iter()
                    .map(|k| format!("Matches your answer \"{k}\""))
                    .collect();
                rec
            })
            .collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }
}

#[allow(clippy::cast_precision_loss)]
fn overlap_score(matches: usize) -> f64 {
    (matches as f64).mul_add(MATCH_BONUS, BASE_SCORE).min(MAX_SCORE)
}

fn answer_keywords(answer: &AnswerValue) -> Vec<String> {
    answer
        .values()
        .into_iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}

fn entry_matches(entry: &Entry, keyword: &str) -> bool {
    entry.tags.iter().any(|t| *t == keyword)
        || entry.title.to_lowercase().contains(keyword)
        || entry.description.to_lowercase().contains(keyword)
}

fn to_recommendation(entry: &Entry, score: f64) -> Recommendation {
    Recommendation::new(entry.id, entry.title, score)
        .with_description(entry.description)
        .with_tags(entry.tags)
        .with_field(entry.field.0, entry.field.1)
}

fn follow_up_questions(domain: &str, keywords: &[String]) -> Vec<Question> {
    let mut tags = BTreeSet::new();
    for entry in catalog(domain) {
        tags.extend(entry.tags.iter().copied());
    }
    let options: Vec<&str> = tags.into_iter().take(4).collect();
    let focus = keywords.first().map_or("your answers", String::as_str);
    vec![
        Question::free_text(
            "f1",
            format!("You mentioned \"{focus}\". What would make that work for you?"),
        ),
        Question::multi_choice("f2", "Which of these should we weigh most?", &options),
    ]
}

impl QuizBackend for SimulatedBackend {
    async fn fetch_initial_questions(
        &self,
        descriptor: &DomainDescriptor,
    ) -> Result<Vec<Question>, ClientError> {
        let prompts = initial_prompts(&descriptor.name).ok_or_else(|| ClientError::Api {
            status: 404,
            message: format!("no questions for module '{}'", descriptor.name),
        })?;
        if let Ok(mut keywords) = self.keywords.lock() {
            keywords.clear();
        }
        Ok(prompts
            .iter()
            .zip(1u32..)
            .map(|(prompt, id)| match prompt {
                Prompt::Single(text, options) => Question::single_choice(id, *text, options),
                Prompt::Multi(text, options) => Question::multi_choice(id, *text, options),
                Prompt::Text(text) => Question::free_text(id, *text),
            })
            .collect())
    }

    async fn submit_phase(
        &self,
        descriptor: &DomainDescriptor,
        phase: Phase,
        request: &SubmitRequest,
    ) -> Result<PhaseOutcome, ClientError> {
        let keywords = self.remember(request);
        tracing::debug!(domain = %descriptor.name, %phase, keywords = keywords.len(), "simulated submit");
        match phase {
            Phase::Initial if descriptor.has_follow_up() => Ok(PhaseOutcome::FollowUp(
                follow_up_questions(&descriptor.name, &keywords),
            )),
            Phase::Initial | Phase::FollowUp => Ok(PhaseOutcome::Recommendations(Self::rank(
                &descriptor.name,
                &keywords,
            ))),
            Phase::Recommendations => Err(ClientError::Unsupported {
                domain: descriptor.name.clone(),
                operation: "submission".into(),
            }),
        }
    }

    async fn search(
        &self,
        descriptor: &DomainDescriptor,
        request: &SearchRequest,
    ) -> Result<Vec<Recommendation>, ClientError> {
        let needle = request.search.trim().to_lowercase();
        let entries = catalog(&descriptor.name);
        let matching: Vec<Recommendation> = entries
            .iter()
            .map(|e| to_recommendation(e, BASE_SCORE))
            .filter(|r| r.matches_lowercase(&needle))
            .collect();
        if !matching.is_empty() {
            return Ok(matching);
        }
        // Nothing matched the text: offer what is not already on screen.
        Ok(entries
            .iter()
            .filter(|e| !request.current_recommendations.iter().any(|id| id == e.id))
            .map(|e| to_recommendation(e, BASE_SCORE))
            .collect())
    }

    async fn commit_action(
        &self,
        descriptor: &DomainDescriptor,
        request: &ActionRequest,
    ) -> Result<ActionResponse, ClientError> {
        let entries = catalog(&descriptor.name);
        let unknown = request
            .recommendation_ids
            .iter()
            .find(|id| !entries.iter().any(|e| e.id == id.as_str()));
        Ok(match unknown {
            Some(id) => ActionResponse {
                success: false,
                message: Some(format!("unknown recommendation '{id}'")),
            },
            None => ActionResponse {
                success: !request.recommendation_ids.is_empty(),
                message: None,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::entities::QuestionId;
    use campus_core::responses::ResponseEntry;
    use pretty_assertions::assert_eq;

    fn answers(pairs: &[(u32, &str)]) -> SubmitRequest {
        SubmitRequest {
            responses: pairs
                .iter()
                .map(|(id, value)| ResponseEntry {
                    question_id: QuestionId::Initial(*id),
                    answer: AnswerValue::Single((*value).into()),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn initial_questions_are_numbered_from_one() {
        let backend = SimulatedBackend::new();
        let questions = backend
            .fetch_initial_questions(&DomainDescriptor::new("dorm"))
            .await
            .unwrap();
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[0].id, QuestionId::Initial(1));
        assert_eq!(questions[2].id, QuestionId::Initial(3));
    }

    #[tokio::test]
    async fn unknown_domain_has_no_questions() {
        let backend = SimulatedBackend::new();
        let err = backend
            .fetch_initial_questions(&DomainDescriptor::new("astronomy"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 404, .. }));
    }

    #[tokio::test]
    async fn three_phase_flow_returns_follow_ups_then_ranked_results() {
        let backend = SimulatedBackend::new();
        let descriptor = DomainDescriptor::new("dorm");

        let outcome = backend
            .submit_phase(&descriptor, Phase::Initial, &answers(&[(1, "Under $5k"), (2, "Quiet")]))
            .await
            .unwrap();
        let PhaseOutcome::FollowUp(questions) = outcome else {
            panic!("expected follow-up questions");
        };
        assert!(questions.iter().all(|q| q.id.is_follow_up()));

        let outcome = backend
            .submit_phase(&descriptor, Phase::FollowUp, &SubmitRequest { responses: Vec::new() })
            .await
            .unwrap();
        let PhaseOutcome::Recommendations(recs) = outcome else {
            panic!("expected recommendations");
        };
        assert_eq!(recs[0].id, "dorm-maple");
        assert!(recs.iter().all(Recommendation::has_valid_score));
        assert!(recs.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[tokio::test]
    async fn two_phase_flow_goes_straight_to_recommendations() {
        let backend = SimulatedBackend::new();
        let mut descriptor = DomainDescriptor::new("clubs");
        descriptor.follow_up_path = None;

        let outcome = backend
            .submit_phase(&descriptor, Phase::Initial, &answers(&[(1, "Chess")]))
            .await
            .unwrap();
        let PhaseOutcome::Recommendations(recs) = outcome else {
            panic!("expected recommendations");
        };
        assert_eq!(recs[0].id, "club-chess");
        assert_eq!(recs[0].why_perfect, vec!["Matches your answer \"chess\"".to_string()]);
    }

    #[tokio::test]
    async fn search_falls_back_to_unseen_entries() {
        let backend = SimulatedBackend::new();
        let descriptor = DomainDescriptor::new("clubs");
        let found = backend
            .search(
                &descriptor,
                &SearchRequest {
                    search: "HIKING".into(),
                    current_recommendations: Vec::new(),
                },
            )
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "club-outdoors");

        let fallback = backend
            .search(
                &descriptor,
                &SearchRequest {
                    search: "underwater basket weaving".into(),
                    current_recommendations: vec!["club-robotics".into()],
                },
            )
            .await
            .unwrap();
        assert_eq!(fallback.len(), 3);
        assert!(fallback.iter().all(|r| r.id != "club-robotics"));
    }

    #[tokio::test]
    async fn commit_action_rejects_unknown_ids() {
        let backend = SimulatedBackend::new();
        let descriptor = DomainDescriptor::new("enrollment");
        let ok = backend
            .commit_action(
                &descriptor,
                &ActionRequest {
                    action: "enroll".into(),
                    recommendation_ids: vec!["cs-101".into()],
                },
            )
            .await
            .unwrap();
        assert!(ok.success);

        let rejected = backend
            .commit_action(
                &descriptor,
                &ActionRequest {
                    action: "enroll".into(),
                    recommendation_ids: vec!["art-999".into()],
                },
            )
            .await
            .unwrap();
        assert!(!rejected.success);
    }
}
