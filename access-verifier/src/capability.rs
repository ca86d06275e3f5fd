//! Read-only capabilities over external services.
//!
//! Each external domain (ledger, governance, registries, credential issuers)
//! is reached through a narrow async trait. The evaluator never learns the
//! wire format of any backend; it only sees typed results or a
//! [`CapabilityError`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use access_core::{Account, CanisterId, MembershipStatus, Principal};

/// Transport-level failure reaching a capability.
///
/// Every variant is turned into an indeterminate verdict; none of them says
/// anything about the principal's eligibility.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityError {
    /// Service is not reachable
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// Network error during the query
    #[error("network error: {0}")]
    Network(String),

    /// Service answered with something that could not be interpreted
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// A transfer recorded on a ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTransfer {
    pub from: Account,
    pub to: Account,
    pub amount: u64,
    pub fee: u64,
}

/// A neuron as reported by a governance canister.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeuronInfo {
    pub id: u64,
    pub stake_e8s: u64,
    /// Seconds
    pub dissolve_delay: u64,
}

/// Key material published by a credential issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "key", rename_all = "snake_case")]
pub enum IssuerKey {
    /// Shared HMAC secret (HS256)
    Secret(String),
    /// RSA public key, PEM encoded (RS256)
    RsaPem(String),
    /// EC P-256 public key, PEM encoded (ES256)
    EcPem(String),
    /// Ed25519 public key, PEM encoded (EdDSA)
    EdPem(String),
}

#[async_trait]
pub trait LedgerCapability: Send + Sync {
    /// Balance of `account` on `ledger`, in the ledger's smallest unit.
    async fn balance_of(&self, ledger: &CanisterId, account: &Account)
        -> Result<u64, CapabilityError>;

    /// Transfer recorded at `block_index`, if the block holds one.
    async fn transfer_at(
        &self,
        ledger: &CanisterId,
        block_index: u64,
    ) -> Result<Option<LedgerTransfer>, CapabilityError>;
}

#[async_trait]
pub trait GovernanceCapability: Send + Sync {
    /// Neurons on `governance` controlled by `principal`.
    async fn neurons_controlled_by(
        &self,
        governance: &CanisterId,
        principal: &Principal,
    ) -> Result<Vec<NeuronInfo>, CapabilityError>;
}

/// Boolean status lookup against one registry.
#[async_trait]
pub trait StatusRegistry: Send + Sync {
    async fn holds(
        &self,
        principal: &Principal,
        status: MembershipStatus,
    ) -> Result<bool, CapabilityError>;
}

#[async_trait]
pub trait CredentialIssuer: Send + Sync {
    /// Verification key of the issuer identified by canister and origin.
    async fn issuer_key(
        &self,
        issuer_canister: &CanisterId,
        issuer_origin: &str,
    ) -> Result<IssuerKey, CapabilityError>;
}

/// The full set of capabilities the evaluator dispatches to.
#[derive(Clone)]
pub struct Capabilities {
    pub ledger: Arc<dyn LedgerCapability>,
    pub governance: Arc<dyn GovernanceCapability>,
    pub nft_registry: Arc<dyn StatusRegistry>,
    pub membership_registry: Arc<dyn StatusRegistry>,
    pub personhood_registry: Arc<dyn StatusRegistry>,
    pub credential_issuer: Arc<dyn CredentialIssuer>,
}

impl Capabilities {
    /// Use one backend for every domain.
    pub fn uniform<B>(backend: Arc<B>) -> Self
    where
        B: LedgerCapability
            + GovernanceCapability
            + StatusRegistry
            + CredentialIssuer
            + 'static,
    {
        Self {
            ledger: backend.clone(),
            governance: backend.clone(),
            nft_registry: backend.clone(),
            membership_registry: backend.clone(),
            personhood_registry: backend.clone(),
            credential_issuer: backend,
        }
    }

    /// Registry that answers for `status`.
    pub fn registry_for(&self, status: MembershipStatus) -> &dyn StatusRegistry {
        match status {
            MembershipStatus::NftHolder => self.nft_registry.as_ref(),
            MembershipStatus::Diamond | MembershipStatus::LifetimeDiamond => {
                self.membership_registry.as_ref()
            }
            MembershipStatus::UniquePerson => self.personhood_registry.as_ref(),
        }
    }
}

impl std::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capabilities").finish_non_exhaustive()
    }
}
