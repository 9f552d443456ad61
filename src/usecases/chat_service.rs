//! Chat pipeline: validate -> classify -> plan -> store feedback -> record exchange.
//!
//! Only validation can fail the call. Classifier, catalog, feedback and audit-log
//! failures are logged and degrade the answer, never the status.

use crate::domain::{ChatMessage, DomainError, Exchange, Intent, QuickAction};
use crate::ports::{
    AuditStatus, CatalogPort, ChatOutcome, ChatPort, ExchangeLogPort, FeedbackPort,
    IntentClassifier,
};
use crate::usecases::response_planner::ResponsePlanner;
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Answers chat messages. Holds no per-request state; share it via Arc.
pub struct ChatService {
    classifier: Arc<dyn IntentClassifier>,
    catalog: Arc<dyn CatalogPort>,
    planner: ResponsePlanner,
    feedback: Arc<dyn FeedbackPort>,
    exchanges: Arc<dyn ExchangeLogPort>,
}

impl ChatService {
    pub fn new(
        classifier: Arc<dyn IntentClassifier>,
        catalog: Arc<dyn CatalogPort>,
        feedback: Arc<dyn FeedbackPort>,
        exchanges: Arc<dyn ExchangeLogPort>,
    ) -> Self {
        Self {
            classifier,
            planner: ResponsePlanner::new(Arc::clone(&catalog)),
            catalog,
            feedback,
            exchanges,
        }
    }

    async fn classify(&self, text: &str) -> Intent {
        self.classifier.classify(text).await.unwrap_or_else(|e| {
            warn!(
                classifier = self.classifier.name(),
                error = %e,
                "classifier chain failed, defaulting to GeneralInquiry"
            );
            Intent::GeneralInquiry
        })
    }

    /// Run the pipeline for an already validated message.
    pub async fn handle(&self, message: ChatMessage) -> ChatOutcome {
        let intent = self.classify(&message.text).await;
        let plan = self
            .planner
            .plan(&message.text, intent, message.user_id.as_deref(), Utc::now())
            .await;

        if let Some(feedback) = &plan.feedback {
            match self.feedback.record_feedback(feedback).await {
                Ok(()) => info!(rating = feedback.rating, "feedback recorded"),
                Err(e) => warn!(error = %e, "failed to record feedback"),
            }
        }

        let exchange = Exchange::new(&message, plan.reply, intent);
        let audit = match self.exchanges.record(&exchange).await {
            Ok(()) => AuditStatus::Recorded(exchange.id),
            Err(e) => {
                error!(
                    exchange_id = %exchange.id,
                    intent = %intent,
                    error = %e,
                    "failed to record exchange"
                );
                AuditStatus::Failed(e.to_string())
            }
        };

        info!(
            exchange_id = %exchange.id,
            intent = %intent,
            user_id = exchange.user_id.as_deref().unwrap_or("-"),
            "answered chat message"
        );

        ChatOutcome {
            response: exchange.response_text,
            intent,
            audit,
        }
    }
}

#[async_trait::async_trait]
impl ChatPort for ChatService {
    async fn respond(
        &self,
        text: Option<String>,
        user_id: Option<String>,
    ) -> Result<ChatOutcome, DomainError> {
        let message = ChatMessage::new(text, user_id)?;
        Ok(self.handle(message).await)
    }

    async fn quick_actions(&self) -> Result<Vec<QuickAction>, DomainError> {
        self.catalog.quick_actions().await
    }
}
