//! Application configuration. Listen address, storage, classifier credentials.

use serde::Deserialize;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_CLASSIFIER_URL: &str = "https://api.x.ai/grok";
pub const DEFAULT_CLASSIFIER_MODEL: &str = "grok-3";
/// Upper bound on one remote classification, connect to last byte.
pub const DEFAULT_CLASSIFIER_TIMEOUT_MS: u64 = 5000;

/// Where catalog, exchanges and feedback live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Sqlite,
    Memory,
}

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Socket address for the HTTP server. Read from CAMPUS_CHAT_BIND_ADDR.
    #[serde(default)]
    pub bind_addr: Option<String>,
    pub data_dir: Option<String>,
    #[serde(default)]
    pub storage: Option<StorageKind>,
    /// JSON catalog loaded at startup. Read from CAMPUS_CHAT_SEED_PATH.
    #[serde(default)]
    pub seed_path: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Remote Classifier Configuration
    // ─────────────────────────────────────────────────────────────────────────
    /// Bearer token. Without it only the keyword rules classify.
    #[serde(default)]
    pub classifier_api_key: Option<String>,

    #[serde(default)]
    pub classifier_url: Option<String>,

    #[serde(default)]
    pub classifier_model: Option<String>,

    #[serde(default)]
    pub classifier_timeout_ms: Option<u64>,

    /// `rules` or `general`. Read from CAMPUS_CHAT_CLASSIFIER_FALLBACK.
    #[serde(default)]
    pub classifier_fallback: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        if let Ok(path) = std::env::var("CAMPUS_CHAT_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        // Environment wins over the file.
        c = c.add_source(config::Environment::with_prefix("CAMPUS_CHAT"));
        let mut cfg: Self = c.build()?.try_deserialize()?;
        if let Ok(s) = std::env::var("CAMPUS_CHAT_CLASSIFIER_TIMEOUT_MS") {
            if let Ok(ms) = s.parse::<u64>() {
                cfg.classifier_timeout_ms = Some(ms);
            }
        }
        Ok(cfg)
    }

    pub fn bind_addr_or_default(&self) -> String {
        self.bind_addr
            .clone()
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
    }

    pub fn data_dir_or_default(&self) -> String {
        self.data_dir.clone().unwrap_or_else(|| "./data".to_string())
    }

    pub fn storage_or_default(&self) -> StorageKind {
        self.storage.unwrap_or_default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Classifier Configuration Helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the classifier API key from config or CAMPUS_CHAT_CLASSIFIER_API_KEY env.
    /// Blank keys count as unset.
    pub fn classifier_api_key(&self) -> Option<String> {
        resolve_api_key(
            self.classifier_api_key.clone(),
            std::env::var("CAMPUS_CHAT_CLASSIFIER_API_KEY").ok(),
        )
    }

    pub fn classifier_url_or_default(&self) -> String {
        self.classifier_url
            .clone()
            .unwrap_or_else(|| DEFAULT_CLASSIFIER_URL.to_string())
    }

    pub fn classifier_model_or_default(&self) -> String {
        self.classifier_model
            .clone()
            .unwrap_or_else(|| DEFAULT_CLASSIFIER_MODEL.to_string())
    }

    /// Returns the classifier timeout in milliseconds. Defaults to 5000; zero is treated as unset.
    pub fn classifier_timeout_ms_or_default(&self) -> u64 {
        self.classifier_timeout_ms
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_CLASSIFIER_TIMEOUT_MS)
    }

    /// Raw fallback policy name. Defaults to "rules".
    pub fn classifier_fallback_or_default(&self) -> String {
        self.classifier_fallback
            .clone()
            .unwrap_or_else(|| "rules".to_string())
    }
}

fn resolve_api_key(configured: Option<String>, from_env: Option<String>) -> Option<String> {
    let present = |k: &String| !k.trim().is_empty();
    configured.filter(present).or(from_env.filter(present))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.bind_addr_or_default(), "0.0.0.0:8080");
        assert_eq!(cfg.data_dir_or_default(), "./data");
        assert_eq!(cfg.storage_or_default(), StorageKind::Sqlite);
        assert_eq!(cfg.classifier_url_or_default(), "https://api.x.ai/grok");
        assert_eq!(cfg.classifier_model_or_default(), "grok-3");
        assert_eq!(cfg.classifier_timeout_ms_or_default(), 5000);
        assert_eq!(cfg.classifier_fallback_or_default(), "rules");
    }

    #[test]
    fn test_zero_timeout_uses_default() {
        let cfg = AppConfig {
            classifier_timeout_ms: Some(0),
            ..Default::default()
        };
        assert_eq!(cfg.classifier_timeout_ms_or_default(), 5000);
    }

    #[test]
    fn test_blank_key_is_not_configured() {
        assert_eq!(resolve_api_key(Some("  ".into()), None), None);
        assert_eq!(resolve_api_key(None, Some("".into())), None);
        assert_eq!(resolve_api_key(None, None), None);
        assert_eq!(
            resolve_api_key(Some("".into()), Some("env-key".into())).as_deref(),
            Some("env-key")
        );
    }

    #[test]
    fn test_configured_key_wins_over_env() {
        assert_eq!(
            resolve_api_key(Some("file-key".into()), Some("env-key".into())).as_deref(),
            Some("file-key")
        );
        assert_eq!(
            resolve_api_key(None, Some("env-key".into())).as_deref(),
            Some("env-key")
        );
    }

    #[test]
    fn test_storage_kind_from_file() {
        let cfg: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "storage = \"memory\"\nbind_addr = \"127.0.0.1:9000\"",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(cfg.storage_or_default(), StorageKind::Memory);
        assert_eq!(cfg.bind_addr_or_default(), "127.0.0.1:9000");
    }
}
