//! Error taxonomy for access gating and rules versioning.

use crate::gate::GateKind;
use crate::proof::ProofKind;
use crate::types::EntityId;
use crate::verdict::FailureReason;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// Proof shape does not match the gate kind. A caller bug; never retried.
    #[error("invalid proof: {gate} expects {expected} proof, got {proof}")]
    InvalidProofKind {
        gate: GateKind,
        expected: ProofKind,
        proof: ProofKind,
    },

    #[error("verification failed: {0}")]
    VerificationFailed(FailureReason),

    /// Remote service unreachable or timed out; the caller may retry.
    #[error("verification indeterminate: {0}")]
    VerificationIndeterminate(String),

    /// A concurrent update won the compare-and-swap; reload and retry.
    #[error("rules version conflict: expected revision {expected}, found {actual}")]
    RulesVersionConflict { expected: u64, actual: u64 },

    /// A version bump was requested at the highest representable version.
    #[error("rules version cannot be bumped any further")]
    RulesVersionExhausted,

    /// A payment gate was evaluated without the entity's receiving account.
    #[error("entity has no designated payment recipient")]
    MissingPaymentRecipient,

    #[error("entity is frozen")]
    FrozenEntity,

    #[error("unknown entity: {0}")]
    UnknownEntity(EntityId),

    #[error("entity already registered: {0}")]
    EntityAlreadyRegistered(EntityId),
}

impl AccessError {
    pub fn invalid_proof(gate: GateKind, proof: ProofKind) -> Self {
        Self::InvalidProofKind {
            gate,
            expected: gate.expected_proof(),
            proof,
        }
    }

    /// Only an indeterminate verification is a soft outcome.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::VerificationIndeterminate(_))
    }
}

pub type Result<T> = std::result::Result<T, AccessError>;
