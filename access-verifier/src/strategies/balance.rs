//! Token balance gate.

use access_core::{Account, FailureReason, GateVerdict, Principal, TokenBalanceGate};
use tracing::debug;

use super::capability_unreachable;
use crate::capability::LedgerCapability;

/// Passed iff the principal's default account holds at least `min_balance`.
pub async fn verify(
    ledger: &dyn LedgerCapability,
    gate: &TokenBalanceGate,
    principal: &Principal,
) -> GateVerdict {
    let account = Account::of(principal.clone());

    match ledger.balance_of(&gate.ledger_canister, &account).await {
        Ok(balance) if balance >= gate.min_balance => GateVerdict::Passed,
        Ok(balance) => {
            debug!(
                ledger = %gate.ledger_canister,
                principal = %principal,
                balance,
                required = gate.min_balance,
                "Balance below threshold"
            );
            GateVerdict::Failed(FailureReason::InsufficientBalance {
                required: gate.min_balance,
                actual: balance,
            })
        }
        Err(err) => capability_unreachable("ledger", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use access_core::CanisterId;
    use crate::offline::OfflineCapabilities;

    fn gate(min_balance: u64) -> TokenBalanceGate {
        TokenBalanceGate {
            ledger_canister: CanisterId::new("ledger"),
            min_balance,
        }
    }

    #[tokio::test]
    async fn test_balance_boundary() {
        let caps = OfflineCapabilities::default();
        let alice = Principal::new("alice");
        let ledger = CanisterId::new("ledger");

        caps.set_balance(&ledger, Account::of(alice.clone()), 100).await;
        assert_eq!(verify(&caps, &gate(100), &alice).await, GateVerdict::Passed);

        caps.set_balance(&ledger, Account::of(alice.clone()), 99).await;
        assert_eq!(
            verify(&caps, &gate(100), &alice).await,
            GateVerdict::Failed(FailureReason::InsufficientBalance {
                required: 100,
                actual: 99
            })
        );
    }

    #[tokio::test]
    async fn test_large_amounts_compare_exactly() {
        let caps = OfflineCapabilities::default();
        let alice = Principal::new("alice");
        let ledger = CanisterId::new("ledger");

        // Distinct as u64, equal as f64
        caps.set_balance(&ledger, Account::of(alice.clone()), u64::MAX - 1)
            .await;
        assert!(verify(&caps, &gate(u64::MAX), &alice).await.is_failed());
    }

    #[tokio::test]
    async fn test_zero_minimum_passes_empty_account() {
        let caps = OfflineCapabilities::default();
        let verdict = verify(&caps, &gate(0), &Principal::new("nobody")).await;
        assert!(verdict.is_passed());
    }
}
