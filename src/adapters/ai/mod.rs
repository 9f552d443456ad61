//! AI adapter module. Implements IntentClassifier against a remote classification service.

pub mod remote_classifier;

pub use remote_classifier::RemoteClassifier;
