//! Application use cases. Orchestrate domain logic via ports.

pub mod chat_service;
pub mod classifiers;
pub mod response_planner;

pub use chat_service::ChatService;
pub use classifiers::{
    build_classifier, DefaultingClassifier, FallbackClassifier, FallbackPolicy, RuleClassifier,
};
pub use response_planner::{Plan, ResponsePlanner};
