//! Remote text-classification adapter.
//!
//! Sends `{prompt, model}` with a bearer token and expects `{"intent": "<label>"}` back.
//! Every deviation (transport error, timeout, non-2xx status, unparseable body, unknown
//! label) is returned as `DomainError::Classifier`; the classifier chain decides what
//! intent to use instead.

use crate::domain::{DomainError, Intent};
use crate::ports::IntentClassifier;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP client for the remote classification service.
pub struct RemoteClassifier {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl RemoteClassifier {
    /// Create a new adapter.
    ///
    /// # Arguments
    /// * `api_url` - Classification endpoint (e.g., "https://api.x.ai/grok")
    /// * `api_key` - Bearer token
    /// * `model` - Model name sent with each request (e.g., "grok-3")
    /// * `timeout` - Upper bound for the whole request, connect to last body byte
    pub fn new(
        api_url: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Classifier(format!("HTTP client build failed: {}", e)))?;
        Ok(Self {
            client,
            api_url,
            api_key,
            model,
        })
    }

    /// Instruction embedding the taxonomy and the raw message.
    fn prompt(message: &str) -> String {
        let labels = Intent::ALL.map(|i| i.label()).join(", ");
        format!(
            "Classify the intent of the following user query into one of these categories: {}. Query: {}",
            labels, message
        )
    }
}

/// Request body.
#[derive(Serialize)]
struct ClassifyRequest<'a> {
    prompt: String,
    model: &'a str,
}

/// Expected reply body.
#[derive(Deserialize)]
struct ClassifyReply {
    intent: String,
}

#[async_trait::async_trait]
impl IntentClassifier for RemoteClassifier {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn classify(&self, text: &str) -> Result<Intent, DomainError> {
        let request = ClassifyRequest {
            prompt: Self::prompt(text),
            model: &self.model,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let kind = if e.is_timeout() { "timed out" } else { "failed" };
                DomainError::Classifier(format!("HTTP request {}: {}", kind, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body.chars().take(200).collect::<String>(), "classifier API returned error");
            return Err(DomainError::Classifier(format!("API error {}", status)));
        }

        let reply: ClassifyReply = response
            .json()
            .await
            .map_err(|e| DomainError::Classifier(format!("Failed to parse reply: {}", e)))?;

        let intent = Intent::from_label(&reply.intent).ok_or_else(|| {
            DomainError::Classifier(format!("unknown intent label {:?}", reply.intent))
        })?;
        debug!(label = %reply.intent, intent = %intent, "remote classification");
        Ok(intent)
    }
}
