//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;
pub mod intent;

pub use entities::{
    Admission, CampusLocation, Catalog, ChatMessage, Course, Event, Exchange, Faq, FaqCategory,
    Feedback, QuickAction,
};
pub use errors::{DomainError, EMPTY_MESSAGE};
pub use intent::{classify, Intent, IntentRule, INTENT_RULES};
