//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{
    Admission, CampusLocation, Course, DomainError, Event, Exchange, Faq, FaqCategory, Feedback,
    Intent, QuickAction,
};
use chrono::{DateTime, Utc};

/// Course lookup predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseFilter {
    Any,
    /// Lowercased needle, matched against lowercased title and code.
    TitleOrCodeContains(String),
}

impl CourseFilter {
    pub fn matches(&self, course: &Course) -> bool {
        match self {
            CourseFilter::Any => true,
            CourseFilter::TitleOrCodeContains(needle) => {
                course.title.to_lowercase().contains(needle.as_str())
                    || course.code.to_lowercase().contains(needle.as_str())
            }
        }
    }
}

/// FAQ lookup predicate: category in `categories` AND (if set) lowercased keywords contain
/// `keywords_contain`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaqFilter {
    pub categories: Vec<FaqCategory>,
    pub keywords_contain: Option<String>,
}

impl FaqFilter {
    pub fn in_categories(categories: &[FaqCategory]) -> Self {
        Self {
            categories: categories.to_vec(),
            keywords_contain: None,
        }
    }

    pub fn with_keywords(mut self, needle: impl Into<String>) -> Self {
        self.keywords_contain = Some(needle.into());
        self
    }

    pub fn matches(&self, faq: &Faq) -> bool {
        self.categories.contains(&faq.category)
            && self
                .keywords_contain
                .as_deref()
                .is_none_or(|needle| faq.keywords.to_lowercase().contains(needle))
    }
}

/// Campus location predicate: description contains one needle OR building name contains the
/// other. Unset needles never match; a missing description never matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationFilter {
    pub description_contains: Option<String>,
    pub building_contains: Option<String>,
}

impl LocationFilter {
    pub fn matches(&self, location: &CampusLocation) -> bool {
        let by_description = match (&self.description_contains, &location.description) {
            (Some(needle), Some(desc)) => desc.to_lowercase().contains(needle.as_str()),
            _ => false,
        };
        let by_building = self
            .building_contains
            .as_deref()
            .is_some_and(|needle| location.building_name.to_lowercase().contains(needle));
        by_description || by_building
    }
}

/// Data gateway over institutional records. Read-only.
///
/// Absence is `Ok(None)`, never an error. Among several matches the lowest `id` wins;
/// ordered lookups sort by their key first, then by `id`.
#[async_trait::async_trait]
pub trait CatalogPort: Send + Sync {
    async fn first_admission(&self) -> Result<Option<Admission>, DomainError>;

    /// Admission with the earliest application deadline.
    async fn earliest_admission(&self) -> Result<Option<Admission>, DomainError>;

    async fn first_course(&self, filter: &CourseFilter) -> Result<Option<Course>, DomainError>;

    /// Earliest event dated at or after `from`.
    async fn next_event(&self, from: DateTime<Utc>) -> Result<Option<Event>, DomainError>;

    async fn first_faq(&self, filter: &FaqFilter) -> Result<Option<Faq>, DomainError>;

    async fn first_location(
        &self,
        filter: &LocationFilter,
    ) -> Result<Option<CampusLocation>, DomainError>;

    /// All quick actions, ordered by action id.
    async fn quick_actions(&self) -> Result<Vec<QuickAction>, DomainError>;
}

/// Append-only audit log of answered messages.
#[async_trait::async_trait]
pub trait ExchangeLogPort: Send + Sync {
    async fn record(&self, exchange: &Exchange) -> Result<(), DomainError>;
}

/// Append-only feedback store.
#[async_trait::async_trait]
pub trait FeedbackPort: Send + Sync {
    async fn record_feedback(&self, feedback: &Feedback) -> Result<(), DomainError>;
}

/// Text-to-intent classification tier.
///
/// An `Err` is a failure signal for combinators to act on; see
/// [`crate::usecases::classifiers`].
#[async_trait::async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    async fn classify(&self, text: &str) -> Result<Intent, DomainError>;
}
