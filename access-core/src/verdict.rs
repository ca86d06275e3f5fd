//! Evaluation outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AccessError;
use crate::types::{Account, Principal};

/// Outcome of evaluating one gate for one principal.
///
/// `Indeterminate` means the remote service could not answer (unreachable,
/// timed out). It must never be cached or reported as ineligibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum GateVerdict {
    Passed,
    Failed(FailureReason),
    Indeterminate(String),
}

impl GateVerdict {
    pub fn indeterminate(reason: impl Into<String>) -> Self {
        Self::Indeterminate(reason.into())
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn is_indeterminate(&self) -> bool {
        matches!(self, Self::Indeterminate(_))
    }

    /// Map the verdict onto the error taxonomy.
    pub fn into_result(self) -> Result<(), AccessError> {
        match self {
            Self::Passed => Ok(()),
            Self::Failed(reason) => Err(AccessError::VerificationFailed(reason)),
            Self::Indeterminate(reason) => Err(AccessError::VerificationIndeterminate(reason)),
        }
    }
}

impl fmt::Display for GateVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => write!(f, "passed"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
            Self::Indeterminate(reason) => write!(f, "indeterminate: {reason}"),
        }
    }
}

/// Status held in an external registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    NftHolder,
    Diamond,
    LifetimeDiamond,
    UniquePerson,
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NftHolder => write!(f, "qualifying NFT"),
            Self::Diamond => write!(f, "diamond membership"),
            Self::LifetimeDiamond => write!(f, "lifetime diamond membership"),
            Self::UniquePerson => write!(f, "unique personhood attestation"),
        }
    }
}

/// Why a gate was definitively not satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FailureReason {
    #[error("principal does not hold {status}")]
    StatusNotHeld { status: MembershipStatus },

    #[error("balance {actual} is below the required {required}")]
    InsufficientBalance { required: u64, actual: u64 },

    #[error("no transfer found at block {block_index}")]
    TransferNotFound { block_index: u64 },

    #[error("transfer sent by {actual}, expected {expected}")]
    WrongSender { expected: Principal, actual: Principal },

    #[error("transfer paid to {actual}, expected {expected}")]
    WrongRecipient { expected: Account, actual: Account },

    #[error("transfer amount {actual} does not match the required {expected}")]
    WrongAmount { expected: u64, actual: u64 },

    #[error("none of {neurons_checked} neuron(s) meet the stake and dissolve delay thresholds")]
    NoQualifyingNeuron { neurons_checked: usize },

    #[error("invalid credential: {detail}")]
    InvalidCredential { detail: String },
}

impl FailureReason {
    pub fn invalid_credential(detail: impl Into<String>) -> Self {
        Self::InvalidCredential {
            detail: detail.into(),
        }
    }
}
