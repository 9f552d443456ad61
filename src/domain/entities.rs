//! Domain entities. Pure data structures for the core business.
//!
//! Institutional records are read-only from the chat pipeline's point of view.
//! Every record carries an integer `id`; lookups that can match several records
//! break ties on the lowest `id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DomainError;
use super::intent::Intent;

/// An admission programme with its application window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admission {
    pub id: i64,
    pub program_name: String,
    pub application_deadline: DateTime<Utc>,
    pub requirements: String,
    pub contact_email: String,
    pub application_link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    /// E.g. "CS-101".
    pub code: String,
    pub title: String,
    pub description: String,
    pub credits: i32,
    #[serde(default)]
    pub department: Option<String>,
    /// Comma-separated course codes.
    #[serde(default)]
    pub prerequisites: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub description: String,
    pub registration_link: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaqCategory {
    Admissions,
    Housing,
    Academics,
    FinancialAid,
    CampusLife,
    TechnicalSupport,
    GeneralInquiry,
    Other,
}

impl FaqCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaqCategory::Admissions => "Admissions",
            FaqCategory::Housing => "Housing",
            FaqCategory::Academics => "Academics",
            FaqCategory::FinancialAid => "FinancialAid",
            FaqCategory::CampusLife => "CampusLife",
            FaqCategory::TechnicalSupport => "TechnicalSupport",
            FaqCategory::GeneralInquiry => "GeneralInquiry",
            FaqCategory::Other => "Other",
        }
    }

    /// Inverse of [`FaqCategory::as_str`]. Unknown names map to `Other`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Admissions" => FaqCategory::Admissions,
            "Housing" => FaqCategory::Housing,
            "Academics" => FaqCategory::Academics,
            "FinancialAid" => FaqCategory::FinancialAid,
            "CampusLife" => FaqCategory::CampusLife,
            "TechnicalSupport" => FaqCategory::TechnicalSupport,
            "GeneralInquiry" => FaqCategory::GeneralInquiry,
            _ => FaqCategory::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faq {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: FaqCategory,
    /// Free-text keyword list; matched by substring containment.
    #[serde(default)]
    pub keywords: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampusLocation {
    pub id: i64,
    pub building_name: String,
    pub room_number: String,
    #[serde(default)]
    pub department: Option<String>,
    /// E.g. "Library, Cafeteria".
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub map_image_url: Option<String>,
}

/// Canned reply bound to a UI quick-action button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickAction {
    pub action_id: String,
    pub response_text: String,
}

/// Every record collection the gateway serves. Also the shape of the seed file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub admissions: Vec<Admission>,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub faqs: Vec<Faq>,
    #[serde(default)]
    pub locations: Vec<CampusLocation>,
    #[serde(default)]
    pub quick_actions: Vec<QuickAction>,
}

impl Catalog {
    pub fn is_empty(&self) -> bool {
        self.admissions.is_empty()
            && self.courses.is_empty()
            && self.events.is_empty()
            && self.faqs.is_empty()
            && self.locations.is_empty()
            && self.quick_actions.is_empty()
    }
}

/// An inbound chat message. Construct with [`ChatMessage::new`], which rejects blank text.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub text: String,
    pub user_id: Option<String>,
}

impl ChatMessage {
    pub fn new(text: Option<String>, user_id: Option<String>) -> Result<Self, DomainError> {
        match text {
            Some(text) if !text.trim().is_empty() => Ok(Self { text, user_id }),
            _ => Err(DomainError::empty_message()),
        }
    }
}

/// One answered message. Written once to the exchange log, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub id: Uuid,
    pub user_id: Option<String>,
    pub message_text: String,
    pub response_text: String,
    pub intent: Intent,
    pub timestamp: DateTime<Utc>,
}

impl Exchange {
    pub fn new(message: &ChatMessage, response_text: String, intent: Intent) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: message.user_id.clone(),
            message_text: message.text.clone(),
            response_text,
            intent,
            timestamp: Utc::now(),
        }
    }
}

/// User feedback captured from a chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    /// The sender's user id, when known.
    pub name: Option<String>,
    pub message: String,
    /// 1-5 scale.
    pub rating: u8,
    pub timestamp: DateTime<Utc>,
}
