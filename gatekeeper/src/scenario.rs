//! Join scenarios loaded from YAML.
//!
//! A scenario describes one join attempt together with the remote state the
//! offline capabilities should serve. Running it replays the entity's rules
//! history through a [`RulesRegistry`] and then admits (or rejects) the
//! principal.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use access_core::{
    AccessControlled, AccessError, EntityId, GateKind, GateProof, Level, Principal, UpdatedRules,
    VersionedRules,
};
use access_rules::RulesRegistry;
use access_verifier::{
    Capabilities, CapabilityFixtures, EvaluatorConfig, GateEvaluator, OfflineCapabilities,
};

use crate::admission::{AdmissionController, JoinDecision, JoinRequest};
use crate::error::{Result, ScenarioError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub entity_id: EntityId,
    pub level: Level,
    pub entity: AccessControlled,
    /// Admin edits applied in order on top of the default rules
    #[serde(default)]
    pub rules_updates: Vec<UpdatedRules>,
    pub principal: Principal,
    #[serde(default)]
    pub proof: GateProof,
    #[serde(default)]
    pub accepted_version: Option<u32>,
    /// Overrides the evaluator's default deadline
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub fixtures: CapabilityFixtures,
}

/// What happened to the join attempt, as printed by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioReport {
    pub entity_id: EntityId,
    pub principal: Principal,
    pub gate: GateKind,
    pub rules: VersionedRules,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Admitted,
    RulesAcceptanceRequired { version: u32 },
    Rejected { error: String, transient: bool },
}

impl From<std::result::Result<JoinDecision, AccessError>> for Outcome {
    fn from(result: std::result::Result<JoinDecision, AccessError>) -> Self {
        match result {
            Ok(JoinDecision::Admitted) => Self::Admitted,
            Ok(JoinDecision::RulesAcceptanceRequired { version }) => {
                Self::RulesAcceptanceRequired { version }
            }
            Err(err) => Self::Rejected {
                transient: err.is_transient(),
                error: err.to_string(),
            },
        }
    }
}

impl Scenario {
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scenario = Self::from_yaml(&yaml).map_err(|source| ScenarioError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<()> {
        if self.principal.as_str().trim().is_empty() {
            return Err(ScenarioError::Invalid("principal must not be empty".into()));
        }
        if self.timeout_ms == Some(0) {
            return Err(ScenarioError::Invalid("timeoutMs must be positive".into()));
        }
        Ok(())
    }

    /// Replay the rules history into a fresh registry and return the rules
    /// in force.
    fn current_rules(&self) -> Result<VersionedRules> {
        let registry = RulesRegistry::new();
        registry.register(self.entity_id.clone(), self.level)?;

        let admin = Principal::new("scenario-admin");
        for update in &self.rules_updates {
            let revision = registry.snapshot(&self.entity_id)?.revision;
            registry.propose_update(&self.entity_id, update, revision, &admin)?;
        }

        Ok(registry.current_rules(&self.entity_id)?)
    }

    /// Run the join attempt against offline capabilities built from the
    /// scenario's fixtures.
    pub async fn run(&self, config: EvaluatorConfig) -> Result<ScenarioReport> {
        let rules = self.current_rules()?;
        debug!(entity = %self.entity_id, version = rules.version, enabled = rules.enabled, "Rules replayed");

        let caps = Arc::new(OfflineCapabilities::new(self.fixtures.clone()));
        let evaluator = GateEvaluator::new(Capabilities::uniform(caps), config);
        let controller = AdmissionController::new(evaluator);

        let request = JoinRequest {
            entity: &self.entity,
            rules: Some(&rules),
            principal: &self.principal,
            proof: &self.proof,
            accepted_version: self.accepted_version,
        };
        let result = match self.timeout_ms {
            Some(ms) => {
                controller
                    .check_join_within(&request, Duration::from_millis(ms))
                    .await
            }
            None => controller.check_join(&request).await,
        };

        let outcome = Outcome::from(result);
        info!(entity = %self.entity_id, principal = %self.principal, outcome = ?outcome, "Scenario finished");

        Ok(ScenarioReport {
            entity_id: self.entity_id.clone(),
            principal: self.principal.clone(),
            gate: self.entity.gate.kind(),
            rules,
            outcome,
        })
    }
}
