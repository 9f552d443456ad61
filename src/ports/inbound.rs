//! Inbound port. The HTTP adapter calls into the application.

use crate::domain::{DomainError, Intent, QuickAction};
use uuid::Uuid;

/// Whether the exchange reached the audit log.
#[derive(Debug, Clone, PartialEq)]
pub enum AuditStatus {
    Recorded(Uuid),
    /// The reply was still delivered. Carries the store's error message.
    Failed(String),
}

/// Result of answering one chat message.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOutcome {
    pub response: String,
    pub intent: Intent,
    pub audit: AuditStatus,
}

/// Chat port: answer messages, list quick actions.
#[async_trait::async_trait]
pub trait ChatPort: Send + Sync {
    /// Validate, classify, plan, record. Only a validation failure is returned as `Err`.
    async fn respond(
        &self,
        text: Option<String>,
        user_id: Option<String>,
    ) -> Result<ChatOutcome, DomainError>;

    async fn quick_actions(&self) -> Result<Vec<QuickAction>, DomainError>;
}
