//! Gate evaluator: the single entry point for verifying a principal
//! against an access gate.

use std::time::{Duration, Instant};

use access_core::{
    AccessError, AccessGate, Account, GateKind, GateProof, GateVerdict, MembershipStatus,
    Principal, Result,
};
use tracing::{debug, info, warn};

use crate::capability::Capabilities;
use crate::config::EvaluatorConfig;
use crate::strategies::{balance, credential, neuron, payment, status};

/// Dispatches gates to their verification strategy.
///
/// The evaluator holds no per-evaluation state: concurrent evaluations for
/// any number of principals share nothing mutable. It never retries and
/// never caches; each call is one attempt.
#[derive(Debug, Clone)]
pub struct GateEvaluator {
    capabilities: Capabilities,
    config: EvaluatorConfig,
}

impl GateEvaluator {
    pub fn new(capabilities: Capabilities, config: EvaluatorConfig) -> Self {
        Self {
            capabilities,
            config,
        }
    }

    pub fn with_defaults(capabilities: Capabilities) -> Self {
        Self::new(capabilities, EvaluatorConfig::default())
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluate `gate` for `principal` using the configured default deadline.
    pub async fn evaluate(
        &self,
        gate: &AccessGate,
        principal: &Principal,
        proof: &GateProof,
        payment_recipient: Option<&Account>,
    ) -> Result<GateVerdict> {
        self.evaluate_within(
            gate,
            principal,
            proof,
            payment_recipient,
            self.config.default_timeout(),
        )
        .await
    }

    /// Evaluate `gate` for `principal`, giving up after `timeout`.
    pub async fn evaluate_within(
        &self,
        gate: &AccessGate,
        principal: &Principal,
        proof: &GateProof,
        payment_recipient: Option<&Account>,
        timeout: Duration,
    ) -> Result<GateVerdict> {
        self.evaluate_until(
            gate,
            principal,
            proof,
            payment_recipient,
            Instant::now() + timeout,
        )
        .await
    }

    /// Evaluate `gate` for `principal`, giving up at `deadline`.
    ///
    /// `payment_recipient` is the gated entity's designated receiving
    /// account. Only payment gates consult it, and they fail with
    /// `Err(MissingPaymentRecipient)` when it is absent.
    ///
    /// Returns `Err(InvalidProofKind)` when `proof` does not have the shape
    /// the gate expects. An expired deadline always yields
    /// [`GateVerdict::Indeterminate`], never `Failed`, even when it had
    /// already passed on entry.
    pub async fn evaluate_until(
        &self,
        gate: &AccessGate,
        principal: &Principal,
        proof: &GateProof,
        payment_recipient: Option<&Account>,
        deadline: Instant,
    ) -> Result<GateVerdict> {
        let kind = gate.kind();

        // NoGate accepts any proof and never calls out
        if gate.is_no_gate() {
            return Ok(GateVerdict::Passed);
        }

        if proof.kind() != kind.expected_proof() {
            warn!(gate = %kind, proof = %proof.kind(), "Proof shape does not match gate");
            return Err(AccessError::invalid_proof(kind, proof.kind()));
        }

        if gate.is_payment_gate() && payment_recipient.is_none() {
            return Err(AccessError::MissingPaymentRecipient);
        }

        let started = Instant::now();

        // timeout_at polls the future once before looking at the clock
        if started >= deadline {
            warn!(gate = %kind, principal = %principal, "Deadline already expired");
            return Ok(timed_out(kind));
        }

        let verification = self.dispatch(gate, principal, proof, payment_recipient);
        let verdict = match tokio::time::timeout_at(deadline.into(), verification).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(gate = %kind, principal = %principal, "Verification deadline expired");
                timed_out(kind)
            }
        };

        debug!(
            gate = %kind,
            principal = %principal,
            duration_ms = started.elapsed().as_millis() as u64,
            "Gate evaluated"
        );
        if verdict.is_passed() {
            info!(gate = %kind, principal = %principal, "Gate passed");
        }

        Ok(verdict)
    }

    async fn dispatch(
        &self,
        gate: &AccessGate,
        principal: &Principal,
        proof: &GateProof,
        payment_recipient: Option<&Account>,
    ) -> Result<GateVerdict> {
        let caps = &self.capabilities;

        let verdict = match gate {
            AccessGate::NoGate => GateVerdict::Passed,
            AccessGate::NftGate => {
                let status = MembershipStatus::NftHolder;
                status::verify(caps.registry_for(status), principal, status).await
            }
            AccessGate::DiamondGate => {
                let status = MembershipStatus::Diamond;
                status::verify(caps.registry_for(status), principal, status).await
            }
            AccessGate::LifetimeDiamondGate => {
                let status = MembershipStatus::LifetimeDiamond;
                status::verify(caps.registry_for(status), principal, status).await
            }
            AccessGate::UniquePersonGate => {
                let status = MembershipStatus::UniquePerson;
                status::verify(caps.registry_for(status), principal, status).await
            }
            AccessGate::TokenBalanceGate(balance_gate) => {
                balance::verify(caps.ledger.as_ref(), balance_gate, principal).await
            }
            AccessGate::PaymentGate(payment_gate) => {
                let GateProof::Payment(receipt) = proof else {
                    return Err(AccessError::invalid_proof(gate.kind(), proof.kind()));
                };
                let recipient = payment_recipient.ok_or(AccessError::MissingPaymentRecipient)?;
                payment::verify(
                    caps.ledger.as_ref(),
                    payment_gate,
                    principal,
                    receipt,
                    recipient,
                )
                .await
            }
            AccessGate::NeuronGate(neuron_gate) => {
                neuron::verify(caps.governance.as_ref(), neuron_gate, principal).await
            }
            AccessGate::CredentialGate(credential_gate) => {
                let GateProof::Credential(args) = proof else {
                    return Err(AccessError::invalid_proof(gate.kind(), proof.kind()));
                };
                credential::verify(
                    caps.credential_issuer.as_ref(),
                    credential_gate,
                    args,
                    &self.config.credential,
                )
                .await
            }
        };

        Ok(verdict)
    }
}

fn timed_out(kind: GateKind) -> GateVerdict {
    GateVerdict::indeterminate(format!("{kind} verification timed out"))
}
