//! Payment gate.
//!
//! The fee is paid on top of `amount` and is not deducted from it, so the
//! recorded transfer amount must equal `amount` exactly. The transfer must
//! reach the entity's designated account, which the caller supplies from the
//! entity record and never from the payer's proof.

use access_core::{Account, FailureReason, GateVerdict, PaymentGate, PaymentProof, Principal};
use tracing::debug;

use super::capability_unreachable;
use crate::capability::LedgerCapability;

pub async fn verify(
    ledger: &dyn LedgerCapability,
    gate: &PaymentGate,
    principal: &Principal,
    proof: &PaymentProof,
    recipient: &Account,
) -> GateVerdict {
    let transfer = match ledger
        .transfer_at(&gate.ledger_canister, proof.block_index)
        .await
    {
        Ok(Some(transfer)) => transfer,
        Ok(None) => {
            return GateVerdict::Failed(FailureReason::TransferNotFound {
                block_index: proof.block_index,
            })
        }
        Err(err) => return capability_unreachable("ledger", err),
    };

    debug!(
        ledger = %gate.ledger_canister,
        block_index = proof.block_index,
        amount = transfer.amount,
        fee = transfer.fee,
        "Inspecting payment transfer"
    );

    if transfer.from.owner != *principal {
        return GateVerdict::Failed(FailureReason::WrongSender {
            expected: principal.clone(),
            actual: transfer.from.owner,
        });
    }

    if transfer.to != *recipient {
        return GateVerdict::Failed(FailureReason::WrongRecipient {
            expected: recipient.clone(),
            actual: transfer.to,
        });
    }

    if transfer.amount != gate.amount {
        return GateVerdict::Failed(FailureReason::WrongAmount {
            expected: gate.amount,
            actual: transfer.amount,
        });
    }

    GateVerdict::Passed
}

/// Total debited from the payer: `amount` plus the ledger fee.
pub fn total_cost(gate: &PaymentGate) -> Option<u64> {
    gate.amount.checked_add(gate.fee)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::LedgerTransfer;
    use crate::offline::OfflineCapabilities;
    use access_core::CanisterId;

    fn designated(owner: &str) -> Account {
        Account::of(owner.into())
    }

    fn gate() -> PaymentGate {
        PaymentGate {
            ledger_canister: CanisterId::new("ledger"),
            amount: 1000,
            fee: 10,
        }
    }

    fn proof(block_index: u64) -> PaymentProof {
        PaymentProof { block_index }
    }

    async fn check(caps: &OfflineCapabilities, payer: &str, block_index: u64) -> GateVerdict {
        verify(
            caps,
            &gate(),
            &Principal::new(payer),
            &proof(block_index),
            &designated("group-treasury"),
        )
        .await
    }

    async fn caps_with_transfer(block_index: u64, from: &str, to: &str, amount: u64) -> OfflineCapabilities {
        let caps = OfflineCapabilities::default();
        caps.record_transfer(
            &CanisterId::new("ledger"),
            block_index,
            LedgerTransfer {
                from: designated(from),
                to: designated(to),
                amount,
                fee: 10,
            },
        )
        .await;
        caps
    }

    #[tokio::test]
    async fn test_exact_amount_passes() {
        let caps = caps_with_transfer(5, "alice", "group-treasury", 1000).await;
        let verdict = check(&caps, "alice", 5).await;
        assert_eq!(verdict, GateVerdict::Passed);
    }

    #[tokio::test]
    async fn test_short_amount_fails() {
        let caps = caps_with_transfer(5, "alice", "group-treasury", 999).await;
        let verdict = check(&caps, "alice", 5).await;
        assert_eq!(
            verdict,
            GateVerdict::Failed(FailureReason::WrongAmount {
                expected: 1000,
                actual: 999
            })
        );
    }

    #[tokio::test]
    async fn test_fee_is_not_deducted_from_amount() {
        // A payer who sends amount - fee has underpaid
        let caps = caps_with_transfer(5, "alice", "group-treasury", 990).await;
        let verdict = check(&caps, "alice", 5).await;
        assert!(verdict.is_failed());
        assert_eq!(total_cost(&gate()), Some(1010));
    }

    #[tokio::test]
    async fn test_wrong_sender_and_recipient() {
        let caps = caps_with_transfer(5, "mallory", "group-treasury", 1000).await;
        let verdict = check(&caps, "alice", 5).await;
        assert!(matches!(
            verdict,
            GateVerdict::Failed(FailureReason::WrongSender { .. })
        ));

        let caps = caps_with_transfer(5, "alice", "someone-else", 1000).await;
        let verdict = check(&caps, "alice", 5).await;
        assert!(matches!(
            verdict,
            GateVerdict::Failed(FailureReason::WrongRecipient { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_transfer_fails() {
        let caps = OfflineCapabilities::default();
        let verdict = check(&caps, "alice", 9).await;
        assert_eq!(
            verdict,
            GateVerdict::Failed(FailureReason::TransferNotFound { block_index: 9 })
        );
    }

    #[tokio::test]
    async fn test_self_transfer_is_wrong_recipient() {
        // Paying oneself the full amount must not satisfy the gate
        let caps = caps_with_transfer(5, "alice", "alice", 1000).await;
        let verdict = check(&caps, "alice", 5).await;
        assert_eq!(
            verdict,
            GateVerdict::Failed(FailureReason::WrongRecipient {
                expected: designated("group-treasury"),
                actual: designated("alice"),
            })
        );
    }
}
