//! Classifier tiers and the combinators that chain them.
//!
//! Every tier implements [`IntentClassifier`]. A tier signals failure with `Err`; the
//! combinators turn that into a definite intent:
//! - [`FallbackClassifier`] asks a second tier (normally the keyword rules)
//! - [`DefaultingClassifier`] substitutes a fixed intent

use crate::domain::{self, DomainError, Intent};
use crate::ports::IntentClassifier;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

/// Keyword rule table as a classifier tier. Never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleClassifier;

#[async_trait::async_trait]
impl IntentClassifier for RuleClassifier {
    fn name(&self) -> &'static str {
        "rules"
    }

    async fn classify(&self, text: &str) -> Result<Intent, DomainError> {
        Ok(domain::classify(text))
    }
}

/// Try `primary`; on failure, answer with `fallback`.
pub struct FallbackClassifier {
    primary: Arc<dyn IntentClassifier>,
    fallback: Arc<dyn IntentClassifier>,
}

impl FallbackClassifier {
    pub fn new(primary: Arc<dyn IntentClassifier>, fallback: Arc<dyn IntentClassifier>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait::async_trait]
impl IntentClassifier for FallbackClassifier {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn classify(&self, text: &str) -> Result<Intent, DomainError> {
        match self.primary.classify(text).await {
            Ok(intent) => {
                debug!(classifier = self.primary.name(), intent = %intent, "classified");
                Ok(intent)
            }
            Err(e) => {
                warn!(
                    classifier = self.primary.name(),
                    fallback = self.fallback.name(),
                    error = %e,
                    "classification failed, using fallback tier"
                );
                self.fallback.classify(text).await
            }
        }
    }
}

/// Wrap a tier so it never fails: errors become `default`.
pub struct DefaultingClassifier {
    inner: Arc<dyn IntentClassifier>,
    default: Intent,
}

impl DefaultingClassifier {
    pub fn new(inner: Arc<dyn IntentClassifier>, default: Intent) -> Self {
        Self { inner, default }
    }
}

#[async_trait::async_trait]
impl IntentClassifier for DefaultingClassifier {
    fn name(&self) -> &'static str {
        "defaulting"
    }

    async fn classify(&self, text: &str) -> Result<Intent, DomainError> {
        Ok(self.inner.classify(text).await.unwrap_or_else(|e| {
            warn!(
                classifier = self.inner.name(),
                default = %self.default,
                error = %e,
                "classification failed, using default intent"
            );
            self.default
        }))
    }
}

/// What a failed remote classification resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Keyword rule verdict.
    #[default]
    Rules,
    /// Always `GeneralInquiry`.
    General,
}

impl FromStr for FallbackPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rules" => Ok(FallbackPolicy::Rules),
            "general" => Ok(FallbackPolicy::General),
            other => Err(format!("unknown classifier fallback {:?}", other)),
        }
    }
}

/// Assemble the deployment's classifier: rules alone, or the remote tier with the given policy.
pub fn build_classifier(
    remote: Option<Arc<dyn IntentClassifier>>,
    policy: FallbackPolicy,
) -> Arc<dyn IntentClassifier> {
    let rules: Arc<dyn IntentClassifier> = Arc::new(RuleClassifier);
    match (remote, policy) {
        (None, _) => rules,
        (Some(remote), FallbackPolicy::Rules) => Arc::new(FallbackClassifier::new(remote, rules)),
        (Some(remote), FallbackPolicy::General) => {
            Arc::new(DefaultingClassifier::new(remote, Intent::GeneralInquiry))
        }
    }
}
