//! Access gate descriptors.
//!
//! [`AccessGate`] is a closed union: exactly one variant is active per
//! governed entity, and every consumer matches it exhaustively. Adding a gate
//! kind is a schema change that must touch every match in the workspace.
//!
//! The serialized form uses an internal `kind` tag (`"no_gate"`,
//! `"neuron_gate"`, ...) with camelCase field names.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::proof::ProofKind;
use crate::types::CanisterId;

/// Condition a principal must satisfy to join an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccessGate {
    NoGate,
    NftGate,
    PaymentGate(PaymentGate),
    TokenBalanceGate(TokenBalanceGate),
    DiamondGate,
    LifetimeDiamondGate,
    UniquePersonGate,
    CredentialGate(CredentialGate),
    NeuronGate(NeuronGate),
}

/// One-off payment of `amount` on `ledger_canister`.
///
/// All amounts are in the ledger's smallest unit (e8s for 8-decimal tokens).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentGate {
    pub ledger_canister: CanisterId,
    pub amount: u64,
    /// Ledger fee paid by the principal on top of `amount`
    pub fee: u64,
}

/// Minimum balance held on `ledger_canister`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalanceGate {
    pub ledger_canister: CanisterId,
    pub min_balance: u64,
}

/// Control of a neuron on `governance_canister`.
///
/// An absent threshold imposes no constraint. `Some(0)` is a real threshold
/// that every neuron satisfies, which is different from `None` only in intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeuronGate {
    pub governance_canister: CanisterId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_stake_e8s: Option<u64>,
    /// Seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_dissolve_delay: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialGate {
    pub credential: Credential,
}

/// Verifiable credential a principal must present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub credential_name: String,
    pub issuer_canister_id: CanisterId,
    pub issuer_origin: String,
    pub credential_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_arguments: Option<BTreeMap<String, CredentialArgument>>,
}

/// Declared value of a credential argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CredentialArgument {
    String(String),
    Number(serde_json::Number),
}

impl fmt::Display for CredentialArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s:?}"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Discriminant of [`AccessGate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateKind {
    NoGate,
    NftGate,
    PaymentGate,
    TokenBalanceGate,
    DiamondGate,
    LifetimeDiamondGate,
    UniquePersonGate,
    CredentialGate,
    NeuronGate,
}

impl GateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoGate => "no_gate",
            Self::NftGate => "nft_gate",
            Self::PaymentGate => "payment_gate",
            Self::TokenBalanceGate => "token_balance_gate",
            Self::DiamondGate => "diamond_gate",
            Self::LifetimeDiamondGate => "lifetime_diamond_gate",
            Self::UniquePersonGate => "unique_person_gate",
            Self::CredentialGate => "credential_gate",
            Self::NeuronGate => "neuron_gate",
        }
    }

    /// Shape of proof a caller must supply when evaluating this kind.
    pub fn expected_proof(&self) -> ProofKind {
        match self {
            Self::PaymentGate => ProofKind::Payment,
            Self::CredentialGate => ProofKind::Credential,
            Self::NoGate
            | Self::NftGate
            | Self::TokenBalanceGate
            | Self::DiamondGate
            | Self::LifetimeDiamondGate
            | Self::UniquePersonGate
            | Self::NeuronGate => ProofKind::None,
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AccessGate {
    pub fn kind(&self) -> GateKind {
        match self {
            Self::NoGate => GateKind::NoGate,
            Self::NftGate => GateKind::NftGate,
            Self::PaymentGate(_) => GateKind::PaymentGate,
            Self::TokenBalanceGate(_) => GateKind::TokenBalanceGate,
            Self::DiamondGate => GateKind::DiamondGate,
            Self::LifetimeDiamondGate => GateKind::LifetimeDiamondGate,
            Self::UniquePersonGate => GateKind::UniquePersonGate,
            Self::CredentialGate(_) => GateKind::CredentialGate,
            Self::NeuronGate(_) => GateKind::NeuronGate,
        }
    }

    pub fn is_no_gate(&self) -> bool {
        matches!(self, Self::NoGate)
    }

    pub fn is_neuron_gate(&self) -> bool {
        matches!(self, Self::NeuronGate(_))
    }

    pub fn is_payment_gate(&self) -> bool {
        matches!(self, Self::PaymentGate(_))
    }

    pub fn is_balance_gate(&self) -> bool {
        matches!(self, Self::TokenBalanceGate(_))
    }

    pub fn is_credential_gate(&self) -> bool {
        matches!(self, Self::CredentialGate(_))
    }
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::NoGate
    }
}
