//! Offline capability backend.
//!
//! Answers every capability from in-memory fixtures. Used when the real
//! services are not wired in (local scenarios, tests). Availability and
//! latency can be adjusted to exercise indeterminate outcomes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

use access_core::{Account, CanisterId, MembershipStatus, Principal};

use crate::capability::{
    CapabilityError, CredentialIssuer, GovernanceCapability, IssuerKey, LedgerCapability,
    LedgerTransfer, NeuronInfo, StatusRegistry,
};

/// Remote state served by [`OfflineCapabilities`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CapabilityFixtures {
    pub balances: Vec<BalanceFixture>,
    pub transfers: Vec<TransferFixture>,
    pub neurons: Vec<NeuronFixture>,
    pub nft_holders: Vec<Principal>,
    pub diamond_members: Vec<Principal>,
    pub lifetime_diamond_members: Vec<Principal>,
    pub unique_persons: Vec<Principal>,
    pub issuers: Vec<IssuerFixture>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceFixture {
    pub ledger: CanisterId,
    pub account: Account,
    pub balance: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferFixture {
    pub ledger: CanisterId,
    pub block_index: u64,
    #[serde(flatten)]
    pub transfer: LedgerTransfer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeuronFixture {
    pub governance: CanisterId,
    pub controller: Principal,
    #[serde(flatten)]
    pub neuron: NeuronInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuerFixture {
    pub canister: CanisterId,
    pub origin: String,
    pub key: IssuerKey,
}

/// Fixture-backed implementation of every capability trait.
pub struct OfflineCapabilities {
    fixtures: RwLock<CapabilityFixtures>,
    available: AtomicBool,
    latency: Option<Duration>,
    call_count: AtomicU32,
}

impl OfflineCapabilities {
    pub fn new(fixtures: CapabilityFixtures) -> Self {
        Self {
            fixtures: RwLock::new(fixtures),
            available: AtomicBool::new(true),
            latency: None,
            call_count: AtomicU32::new(0),
        }
    }

    /// Delay every answer by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn with_available(self, available: bool) -> Self {
        self.available.store(available, Ordering::SeqCst);
        self
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of capability queries answered or refused so far.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    pub async fn set_balance(&self, ledger: &CanisterId, account: Account, balance: u64) {
        let mut fixtures = self.fixtures.write().await;
        fixtures
            .balances
            .retain(|b| !(b.ledger == *ledger && b.account == account));
        fixtures.balances.push(BalanceFixture {
            ledger: ledger.clone(),
            account,
            balance,
        });
    }

    pub async fn record_transfer(&self, ledger: &CanisterId, block_index: u64, transfer: LedgerTransfer) {
        let mut fixtures = self.fixtures.write().await;
        fixtures.transfers.push(TransferFixture {
            ledger: ledger.clone(),
            block_index,
            transfer,
        });
    }

    pub async fn add_neuron(&self, governance: &CanisterId, controller: Principal, neuron: NeuronInfo) {
        let mut fixtures = self.fixtures.write().await;
        fixtures.neurons.push(NeuronFixture {
            governance: governance.clone(),
            controller,
            neuron,
        });
    }

    pub async fn grant_status(&self, principal: Principal, status: MembershipStatus) {
        let mut fixtures = self.fixtures.write().await;
        let holders = match status {
            MembershipStatus::NftHolder => &mut fixtures.nft_holders,
            MembershipStatus::Diamond => &mut fixtures.diamond_members,
            MembershipStatus::LifetimeDiamond => &mut fixtures.lifetime_diamond_members,
            MembershipStatus::UniquePerson => &mut fixtures.unique_persons,
        };
        if !holders.contains(&principal) {
            holders.push(principal);
        }
    }

    pub async fn register_issuer(&self, canister: CanisterId, origin: impl Into<String>, key: IssuerKey) {
        let mut fixtures = self.fixtures.write().await;
        fixtures.issuers.push(IssuerFixture {
            canister,
            origin: origin.into(),
            key,
        });
    }

    /// Common preamble of every query: count, delay, availability.
    async fn enter(&self, capability: &str) -> Result<(), CapabilityError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if !self.available.load(Ordering::SeqCst) {
            return Err(CapabilityError::Unavailable(format!(
                "offline {capability} disabled"
            )));
        }
        Ok(())
    }
}

impl Default for OfflineCapabilities {
    fn default() -> Self {
        Self::new(CapabilityFixtures::default())
    }
}

#[async_trait]
impl LedgerCapability for OfflineCapabilities {
    async fn balance_of(
        &self,
        ledger: &CanisterId,
        account: &Account,
    ) -> Result<u64, CapabilityError> {
        self.enter("ledger").await?;
        let fixtures = self.fixtures.read().await;
        Ok(fixtures
            .balances
            .iter()
            .find(|b| b.ledger == *ledger && b.account == *account)
            .map(|b| b.balance)
            .unwrap_or(0))
    }

    async fn transfer_at(
        &self,
        ledger: &CanisterId,
        block_index: u64,
    ) -> Result<Option<LedgerTransfer>, CapabilityError> {
        self.enter("ledger").await?;
        let fixtures = self.fixtures.read().await;
        Ok(fixtures
            .transfers
            .iter()
            .find(|t| t.ledger == *ledger && t.block_index == block_index)
            .map(|t| t.transfer.clone()))
    }
}

#[async_trait]
impl GovernanceCapability for OfflineCapabilities {
    async fn neurons_controlled_by(
        &self,
        governance: &CanisterId,
        principal: &Principal,
    ) -> Result<Vec<NeuronInfo>, CapabilityError> {
        self.enter("governance").await?;
        let fixtures = self.fixtures.read().await;
        Ok(fixtures
            .neurons
            .iter()
            .filter(|n| n.governance == *governance && n.controller == *principal)
            .map(|n| n.neuron.clone())
            .collect())
    }
}

#[async_trait]
impl StatusRegistry for OfflineCapabilities {
    async fn holds(
        &self,
        principal: &Principal,
        status: MembershipStatus,
    ) -> Result<bool, CapabilityError> {
        self.enter("registry").await?;
        let fixtures = self.fixtures.read().await;
        let held = match status {
            MembershipStatus::NftHolder => fixtures.nft_holders.contains(principal),
            // Lifetime members are diamond members too
            MembershipStatus::Diamond => {
                fixtures.diamond_members.contains(principal)
                    || fixtures.lifetime_diamond_members.contains(principal)
            }
            MembershipStatus::LifetimeDiamond => {
                fixtures.lifetime_diamond_members.contains(principal)
            }
            MembershipStatus::UniquePerson => fixtures.unique_persons.contains(principal),
        };
        Ok(held)
    }
}

#[async_trait]
impl CredentialIssuer for OfflineCapabilities {
    async fn issuer_key(
        &self,
        issuer_canister: &CanisterId,
        issuer_origin: &str,
    ) -> Result<IssuerKey, CapabilityError> {
        self.enter("credential issuer").await?;
        let fixtures = self.fixtures.read().await;
        fixtures
            .issuers
            .iter()
            .find(|i| i.canister == *issuer_canister && i.origin == issuer_origin)
            .map(|i| i.key.clone())
            .ok_or_else(|| {
                CapabilityError::Unavailable(format!(
                    "issuer {issuer_canister} at {issuer_origin} not reachable"
                ))
            })
    }
}
