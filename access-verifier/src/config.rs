//! Configuration for the gate evaluator.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a [`GateEvaluator`](crate::GateEvaluator).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Deadline applied when the caller does not supply one (ms)
    pub default_timeout_ms: u64,
    /// Credential validation settings
    pub credential: CredentialConfig,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: 5_000,
            credential: CredentialConfig::default(),
        }
    }
}

impl EvaluatorConfig {
    /// Load config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }
}

/// Credential JWT validation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialConfig {
    /// Clock skew tolerated on `exp`/`nbf` (seconds)
    pub leeway_secs: u64,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self { leeway_secs: 60 }
    }
}
