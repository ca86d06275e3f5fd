//! Gatekeeper CLI configuration
//!
//! Configuration via CLI arguments and environment variables.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use access_verifier::EvaluatorConfig;

use crate::error::{Result, ScenarioError};

/// Gatekeeper - join admission for gated groups, channels and communities
#[derive(Parser, Debug, Clone)]
#[command(name = "gatekeeper")]
#[command(about = "Evaluate access gates and rules acceptance for join attempts")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "LOG_JSON", default_value = "false", global = true)]
    pub log_json: bool,

    /// Evaluator configuration file (YAML)
    #[arg(long, env = "GATEKEEPER_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Default verification deadline in milliseconds, overrides the config file
    #[arg(long, env = "GATE_TIMEOUT_MS", global = true)]
    pub timeout_ms: Option<u64>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run a join scenario and print the outcome as JSON
    Evaluate {
        /// Scenario file (YAML)
        #[arg(short, long)]
        scenario: PathBuf,

        /// Pretty-print the report
        #[arg(long)]
        pretty: bool,
    },

    /// Print the effective evaluator configuration as YAML
    ShowConfig,
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Args {
    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(format!(
                "LOG_LEVEL must be one of {}, got {}",
                LOG_LEVELS.join(", "),
                self.log_level
            ));
        }

        if self.timeout_ms == Some(0) {
            return Err("GATE_TIMEOUT_MS must be greater than zero".to_string());
        }

        Ok(())
    }

    /// Evaluator configuration: file (if any), then CLI overrides.
    pub fn evaluator_config(&self) -> Result<EvaluatorConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let yaml = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
                    path: path.clone(),
                    source,
                })?;
                EvaluatorConfig::from_yaml(&yaml).map_err(|source| ScenarioError::Yaml {
                    path: path.clone(),
                    source,
                })?
            }
            None => EvaluatorConfig::default(),
        };

        if let Some(ms) = self.timeout_ms {
            config.default_timeout_ms = ms;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_evaluate_command() {
        let args = parse(&["gatekeeper", "evaluate", "--scenario", "join.yaml"]);
        match &args.command {
            Command::Evaluate { scenario, pretty } => {
                assert_eq!(scenario, &PathBuf::from("join.yaml"));
                assert!(!pretty);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_timeout_override() {
        let args = parse(&["gatekeeper", "--timeout-ms", "250", "show-config"]);
        let config = assert_ok!(args.evaluator_config());
        assert_eq!(config.default_timeout_ms, 250);
        assert_eq!(config.credential.leeway_secs, 60);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let args = parse(&["gatekeeper", "--log-level", "loud", "show-config"]);
        assert_err!(args.validate());

        let args = parse(&["gatekeeper", "--timeout-ms", "0", "show-config"]);
        let err = assert_err!(args.validate());
        assert!(err.contains("GATE_TIMEOUT_MS"));
    }
}
