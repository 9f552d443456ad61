//! In-memory store. Implements the catalog, exchange-log and feedback ports.
//!
//! Used for `storage = "memory"` deployments and for deterministic tests. Logs are
//! append-only vectors behind a `tokio::sync::RwLock`; the catalog is only ever read.

use crate::domain::{
    Admission, CampusLocation, Catalog, Course, DomainError, Event, Exchange, Faq, Feedback,
    QuickAction,
};
use crate::ports::{
    CatalogPort, CourseFilter, ExchangeLogPort, FaqFilter, FeedbackPort, LocationFilter,
};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryStore {
    catalog: RwLock<Catalog>,
    exchanges: RwLock<Vec<Exchange>>,
    feedback: RwLock<Vec<Feedback>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_catalog(catalog: Catalog) -> Self {
        Self {
            catalog: RwLock::new(catalog),
            ..Self::default()
        }
    }

    /// Snapshot of recorded exchanges, oldest first.
    pub async fn exchanges(&self) -> Vec<Exchange> {
        self.exchanges.read().await.clone()
    }

    /// Snapshot of recorded feedback, oldest first.
    pub async fn feedback(&self) -> Vec<Feedback> {
        self.feedback.read().await.clone()
    }
}

#[async_trait::async_trait]
impl CatalogPort for MemoryStore {
    async fn first_admission(&self) -> Result<Option<Admission>, DomainError> {
        let catalog = self.catalog.read().await;
        Ok(catalog.admissions.iter().min_by_key(|a| a.id).cloned())
    }

    async fn earliest_admission(&self) -> Result<Option<Admission>, DomainError> {
        let catalog = self.catalog.read().await;
        Ok(catalog
            .admissions
            .iter()
            .min_by_key(|a| (a.application_deadline, a.id))
            .cloned())
    }

    async fn first_course(&self, filter: &CourseFilter) -> Result<Option<Course>, DomainError> {
        let catalog = self.catalog.read().await;
        Ok(catalog
            .courses
            .iter()
            .filter(|c| filter.matches(c))
            .min_by_key(|c| c.id)
            .cloned())
    }

    async fn next_event(&self, from: DateTime<Utc>) -> Result<Option<Event>, DomainError> {
        let catalog = self.catalog.read().await;
        Ok(catalog
            .events
            .iter()
            .filter(|e| e.date >= from)
            .min_by_key(|e| (e.date, e.id))
            .cloned())
    }

    async fn first_faq(&self, filter: &FaqFilter) -> Result<Option<Faq>, DomainError> {
        let catalog = self.catalog.read().await;
        Ok(catalog
            .faqs
            .iter()
            .filter(|f| filter.matches(f))
            .min_by_key(|f| f.id)
            .cloned())
    }

    async fn first_location(
        &self,
        filter: &LocationFilter,
    ) -> Result<Option<CampusLocation>, DomainError> {
        let catalog = self.catalog.read().await;
        Ok(catalog
            .locations
            .iter()
            .filter(|l| filter.matches(l))
            .min_by_key(|l| l.id)
            .cloned())
    }

    async fn quick_actions(&self) -> Result<Vec<QuickAction>, DomainError> {
        let catalog = self.catalog.read().await;
        let mut actions = catalog.quick_actions.clone();
        actions.sort_by(|a, b| a.action_id.cmp(&b.action_id));
        Ok(actions)
    }
}

#[async_trait::async_trait]
impl ExchangeLogPort for MemoryStore {
    async fn record(&self, exchange: &Exchange) -> Result<(), DomainError> {
        self.exchanges.write().await.push(exchange.clone());
        Ok(())
    }
}

#[async_trait::async_trait]
impl FeedbackPort for MemoryStore {
    async fn record_feedback(&self, feedback: &Feedback) -> Result<(), DomainError> {
        self.feedback.write().await.push(feedback.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChatMessage, FaqCategory, Intent};
    use crate::test_support::{at, sample_catalog};

    #[tokio::test]
    async fn test_lookups_on_empty_store_are_none() {
        let store = MemoryStore::new();
        assert!(store.first_admission().await.unwrap().is_none());
        assert!(store.earliest_admission().await.unwrap().is_none());
        assert!(store.first_course(&CourseFilter::Any).await.unwrap().is_none());
        assert!(store.next_event(Utc::now()).await.unwrap().is_none());
        assert!(store
            .first_faq(&FaqFilter::in_categories(&[FaqCategory::Housing]))
            .await
            .unwrap()
            .is_none());
        assert!(store
            .first_location(&LocationFilter::default())
            .await
            .unwrap()
            .is_none());
        assert!(store.quick_actions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ties_break_on_lowest_id() {
        let mut catalog = sample_catalog();
        let mut twin = catalog.admissions[1].clone();
        twin.id = 0;
        twin.program_name = "Twin Programme".into();
        catalog.admissions.push(twin);
        let store = MemoryStore::from_catalog(catalog);

        let earliest = store.earliest_admission().await.unwrap().unwrap();
        assert_eq!(earliest.program_name, "Twin Programme");
        let first = store.first_admission().await.unwrap().unwrap();
        assert_eq!(first.id, 0);
    }

    #[tokio::test]
    async fn test_next_event_includes_the_boundary() {
        let store = MemoryStore::from_catalog(sample_catalog());
        let event = store
            .next_event(at("2025-09-15T10:00:00Z"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.title, "Career Fair");
    }

    #[tokio::test]
    async fn test_quick_actions_sorted_by_id() {
        let store = MemoryStore::from_catalog(sample_catalog());
        let ids: Vec<String> = store
            .quick_actions()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.action_id)
            .collect();
        assert_eq!(ids, vec!["class-schedule", "view-grades"]);
    }

    #[tokio::test]
    async fn test_logs_are_append_only() {
        let store = MemoryStore::new();
        let msg = ChatMessage::new(Some("hi".into()), None).unwrap();
        let first = Exchange::new(&msg, "hello".into(), Intent::GeneralInquiry);
        let second = Exchange::new(&msg, "hello again".into(), Intent::GeneralInquiry);
        store.record(&first).await.unwrap();
        store.record(&second).await.unwrap();
        assert_eq!(store.exchanges().await, vec![first, second]);
    }
}
