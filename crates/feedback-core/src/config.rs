//! Feedback engine configuration
//!
//! Loaded from TOML; every section and field is optional and falls back to
//! its default.
//!
//! ```toml
//! [classifier]
//! rt_threshold_ms = 30.0
//!
//! [generation]
//! timeout_ms = 30000
//! max_retries = 1
//!
//! [cache]
//! profile_change_policy = "regenerate"
//! ```

use crate::error::FeedbackError;
use feedback_scenario::ClassifierThresholds;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Scenario classification thresholds
    pub classifier: ClassifierThresholds,
    /// Generator call policy
    pub generation: GenerationConfig,
    /// Cached pattern policy
    pub cache: CacheConfig,
    /// HTTP surface
    pub http: HttpConfig,
    /// Chat-completion generator
    pub llm: LlmConfig,
}

impl FeedbackConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate TOML
    ///
    /// # Errors
    /// `FeedbackError::Config` on syntax errors or invalid values
    pub fn from_toml_str(source: &str) -> Result<Self, FeedbackError> {
        let config: Self =
            toml::from_str(source).map_err(|e| FeedbackError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    ///
    /// # Errors
    /// `FeedbackError::Config` if the file is unreadable or invalid
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FeedbackError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| FeedbackError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    /// Reject values the engine cannot work with
    ///
    /// # Errors
    /// `FeedbackError::Config` naming the first offending field
    pub fn validate(&self) -> Result<(), FeedbackError> {
        let t = &self.classifier;
        let positive = [
            ("classifier.rt_threshold_ms", t.rt_threshold_ms),
            ("classifier.acc_threshold", t.acc_threshold),
            ("classifier.large_rt_threshold_ms", t.large_rt_threshold_ms),
            ("classifier.large_acc_threshold", t.large_acc_threshold),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(FeedbackError::Config(format!(
                    "{field} must be a positive number, got {value}"
                )));
            }
        }
        if t.large_rt_threshold_ms < t.rt_threshold_ms {
            return Err(FeedbackError::Config(
                "classifier.large_rt_threshold_ms must not be below rt_threshold_ms".into(),
            ));
        }
        if t.large_acc_threshold < t.acc_threshold {
            return Err(FeedbackError::Config(
                "classifier.large_acc_threshold must not be below acc_threshold".into(),
            ));
        }
        if self.generation.timeout_ms == 0 {
            return Err(FeedbackError::Config(
                "generation.timeout_ms must be greater than zero".into(),
            ));
        }
        if self.cache.max_entries == 0 {
            return Err(FeedbackError::Config(
                "cache.max_entries must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// With classifier thresholds
    #[inline]
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: ClassifierThresholds) -> Self {
        self.classifier = thresholds;
        self
    }

    /// With generation timeout
    #[inline]
    #[must_use]
    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// With retry count for transient failures
    #[inline]
    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.generation.max_retries = retries;
        self
    }

    /// With delay between retries
    #[inline]
    #[must_use]
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.generation.retry_backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// With profile change policy
    #[inline]
    #[must_use]
    pub fn with_profile_change_policy(mut self, policy: ProfileChangePolicy) -> Self {
        self.cache.profile_change_policy = policy;
        self
    }
}

/// Generator call policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Time budget per attempt
    pub timeout_ms: u64,
    /// Additional attempts after a transient failure
    pub max_retries: u32,
    /// Pause before a retry
    pub retry_backoff_ms: u64,
}

impl GenerationConfig {
    /// Time budget per attempt
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Pause before a retry
    #[inline]
    #[must_use]
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            max_retries: 1,
            retry_backoff_ms: 500,
        }
    }
}

/// What to do with a cached set whose source profile differs from the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfileChangePolicy {
    /// Serve the cached set regardless
    #[default]
    KeepCached,
    /// Treat a profile change as a cache miss
    Regenerate,
}

/// Cached pattern policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Profile change handling
    pub profile_change_policy: ProfileChangePolicy,
    /// Capacity of the in-memory store
    pub max_entries: u64,
    /// Directory for the file store; in-memory when unset
    pub store_dir: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            profile_change_policy: ProfileChangePolicy::default(),
            max_entries: 10_000,
            store_dir: None,
        }
    }
}

/// HTTP surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Listen address
    pub bind: SocketAddr,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

/// OpenAI-compatible chat-completion endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API base, without the `/chat/completions` suffix
    pub base_url: String,
    /// Model name
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Response token cap
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: 0.8,
            max_tokens: 4096,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_is_valid() {
        let config = FeedbackConfig::new();
        assert!(config.validate().is_ok());
        assert_eq!(config.generation.max_retries, 1);
        assert_eq!(config.classifier.rt_threshold_ms, 30.0);
        assert_eq!(config.cache.profile_change_policy, ProfileChangePolicy::KeepCached);
    }

    #[test]
    fn empty_toml_yields_defaults() {
        assert_eq!(FeedbackConfig::from_toml_str("").unwrap(), FeedbackConfig::default());
    }

    #[test]
    fn partial_toml_overrides_fields() {
        let config = FeedbackConfig::from_toml_str(
            r#"
            [classifier]
            rt_threshold_ms = 40.0

            [generation]
            timeout_ms = 5000

            [cache]
            profile_change_policy = "regenerate"
            store_dir = "/var/lib/feedback"

            [http]
            bind = "0.0.0.0:9000"
            "#,
        )
        .unwrap();

        assert_eq!(config.classifier.rt_threshold_ms, 40.0);
        assert_eq!(config.classifier.acc_threshold, 5.0);
        assert_eq!(config.generation.timeout(), Duration::from_secs(5));
        assert_eq!(config.generation.max_retries, 1);
        assert_eq!(config.cache.profile_change_policy, ProfileChangePolicy::Regenerate);
        assert_eq!(config.cache.store_dir, Some(PathBuf::from("/var/lib/feedback")));
        assert_eq!(config.http.bind.port(), 9000);
    }

    #[test]
    fn rejects_non_positive_threshold() {
        let err = FeedbackConfig::from_toml_str("[classifier]\nacc_threshold = 0.0\n").unwrap_err();
        assert!(err.to_string().contains("classifier.acc_threshold"));
    }

    #[test]
    fn rejects_large_threshold_below_base() {
        let err =
            FeedbackConfig::from_toml_str("[classifier]\nlarge_acc_threshold = 2.0\n").unwrap_err();
        assert!(err.to_string().contains("large_acc_threshold"));
    }

    #[test]
    fn rejects_zero_timeout() {
        assert!(FeedbackConfig::from_toml_str("[generation]\ntimeout_ms = 0\n").is_err());
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            FeedbackConfig::from_toml_str("[generation\n"),
            Err(FeedbackError::Config(_))
        ));
    }

    #[test]
    fn builders() {
        let config = FeedbackConfig::new()
            .with_generation_timeout(Duration::from_millis(50))
            .with_max_retries(0)
            .with_retry_backoff(Duration::ZERO)
            .with_profile_change_policy(ProfileChangePolicy::Regenerate);

        assert_eq!(config.generation.timeout_ms, 50);
        assert_eq!(config.generation.max_retries, 0);
        assert_eq!(config.generation.retry_backoff(), Duration::ZERO);
        assert_eq!(config.cache.profile_change_policy, ProfileChangePolicy::Regenerate);
    }
}
