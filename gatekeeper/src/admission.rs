//! Join admission
//!
//! Runs the checks for one join attempt in a fixed order:
//!
//! 1. frozen entities reject every attempt before anything else runs
//! 2. public entities without a gate skip verification
//! 3. otherwise the gate is evaluated and must pass
//! 4. enabled rules must have been accepted at their current version

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use access_core::{
    requires_rules_acceptance, AccessControlled, AccessError, GateProof, Principal, Result,
    VersionedRules,
};
use access_verifier::GateEvaluator;

/// Outcome of a join attempt that was not rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum JoinDecision {
    Admitted,
    /// Gate satisfied, but the principal must first accept rules `version`.
    RulesAcceptanceRequired { version: u32 },
}

/// A single join attempt.
#[derive(Debug, Clone)]
pub struct JoinRequest<'a> {
    pub entity: &'a AccessControlled,
    /// Rules in force for the entity, if it has any
    pub rules: Option<&'a VersionedRules>,
    pub principal: &'a Principal,
    pub proof: &'a GateProof,
    /// Rules version the principal last accepted
    pub accepted_version: Option<u32>,
}

pub struct AdmissionController {
    evaluator: GateEvaluator,
}

impl AdmissionController {
    pub fn new(evaluator: GateEvaluator) -> Self {
        Self { evaluator }
    }

    /// Decide a join attempt using the evaluator's default deadline.
    pub async fn check_join(&self, request: &JoinRequest<'_>) -> Result<JoinDecision> {
        let timeout = self.evaluator.config().default_timeout();
        self.check_join_until(request, Instant::now() + timeout)
            .await
    }

    pub async fn check_join_within(
        &self,
        request: &JoinRequest<'_>,
        timeout: Duration,
    ) -> Result<JoinDecision> {
        self.check_join_until(request, Instant::now() + timeout)
            .await
    }

    /// Decide a join attempt, abandoning gate verification at `deadline`.
    pub async fn check_join_until(
        &self,
        request: &JoinRequest<'_>,
        deadline: Instant,
    ) -> Result<JoinDecision> {
        let entity = request.entity;

        if !entity.can_attempt_join() {
            debug!(principal = %request.principal, "Join rejected: entity frozen");
            return Err(AccessError::FrozenEntity);
        }

        if entity.requires_gate_check() {
            self.evaluator
                .evaluate_until(
                    &entity.gate,
                    request.principal,
                    request.proof,
                    entity.payment_recipient.as_ref(),
                    deadline,
                )
                .await?
                .into_result()?;
        } else {
            debug!(principal = %request.principal, "Public entity without gate, skipping verification");
        }

        if let Some(rules) = request.rules {
            if requires_rules_acceptance(rules, request.accepted_version) {
                info!(
                    principal = %request.principal,
                    version = rules.version,
                    accepted = ?request.accepted_version,
                    "Rules acceptance required"
                );
                return Ok(JoinDecision::RulesAcceptanceRequired {
                    version: rules.version,
                });
            }
        }

        info!(principal = %request.principal, gate = %entity.gate.kind(), "Join admitted");
        Ok(JoinDecision::Admitted)
    }
}
