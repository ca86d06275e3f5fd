//! Proof material supplied by callers alongside a gate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Variant-shaped proof bundle.
///
/// Most gates are checked purely against remote state and take
/// [`GateProof::None`]. Payment and credential gates need material only the
/// caller has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GateProof {
    #[default]
    None,
    Payment(PaymentProof),
    Credential(VerifiedCredentialArgs),
}

impl GateProof {
    pub fn kind(&self) -> ProofKind {
        match self {
            Self::None => ProofKind::None,
            Self::Payment(_) => ProofKind::Payment,
            Self::Credential(_) => ProofKind::Credential,
        }
    }
}

/// Receipt of a payment transfer: the ledger block holding it.
///
/// The account the payment must reach is owned by the entity
/// ([`AccessControlled::payment_recipient`](crate::AccessControlled)), never
/// by the payer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentProof {
    pub block_index: u64,
}

/// Credential JWT bundle whose identity-provider origin has already been
/// established by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedCredentialArgs {
    #[serde(rename = "userIIPrincipal")]
    pub user_ii_principal: String,
    #[serde(rename = "iiOrigin")]
    pub ii_origin: String,
    #[serde(rename = "credentialJwt")]
    pub credential_jwt: String,
}

/// Discriminant of [`GateProof`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofKind {
    None,
    Payment,
    Credential,
}

impl fmt::Display for ProofKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Payment => write!(f, "payment"),
            Self::Credential => write!(f, "credential"),
        }
    }
}
