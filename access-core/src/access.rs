//! The access-controlled aggregate.
//!
//! Every governed entity owns one [`AccessControlled`] snapshot. The
//! predicates here are pure and never reach out to remote services; they
//! decide whether evaluation should happen at all.

use serde::{Deserialize, Serialize};

use crate::gate::AccessGate;
use crate::types::Account;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AccessControlled {
    pub gate: AccessGate,
    pub public: bool,
    /// Highest-priority veto: overrides `public` and any gate outcome
    pub frozen: bool,
    /// Only consulted for private entities
    pub history_visible: bool,
    /// Account that payment-gate fees must be sent to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_recipient: Option<Account>,
}

impl AccessControlled {
    /// Whether a join attempt may proceed to verification at all.
    pub fn can_attempt_join(&self) -> bool {
        !self.frozen
    }

    /// Whether the gate must be evaluated before admitting a principal.
    ///
    /// Public entities with no gate skip verification. Evaluating
    /// [`AccessGate::NoGate`] always passes, so skipping and evaluating are
    /// behaviorally identical.
    pub fn requires_gate_check(&self) -> bool {
        !(self.public && self.gate.is_no_gate())
    }

    /// Whether non-members may read content posted before they joined.
    pub fn non_members_can_read_history(&self) -> bool {
        self.public || self.history_visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::TokenBalanceGate;

    fn balance_gate() -> AccessGate {
        AccessGate::TokenBalanceGate(TokenBalanceGate {
            ledger_canister: "ledger".into(),
            min_balance: 100,
        })
    }

    #[test]
    fn test_frozen_blocks_join_regardless_of_other_fields() {
        for public in [true, false] {
            for gate in [AccessGate::NoGate, balance_gate()] {
                let entity = AccessControlled {
                    gate,
                    public,
                    frozen: true,
                    history_visible: true,
                    payment_recipient: None,
                };
                assert!(!entity.can_attempt_join());
            }
        }
    }

    #[test]
    fn test_public_no_gate_skips_check() {
        let entity = AccessControlled {
            gate: AccessGate::NoGate,
            public: true,
            ..Default::default()
        };
        assert!(entity.can_attempt_join());
        assert!(!entity.requires_gate_check());
    }

    #[test]
    fn test_private_or_gated_requires_check() {
        let private = AccessControlled::default();
        assert!(private.requires_gate_check());

        let gated_public = AccessControlled {
            gate: balance_gate(),
            public: true,
            ..Default::default()
        };
        assert!(gated_public.requires_gate_check());
    }

    #[test]
    fn test_history_visibility() {
        let private_hidden = AccessControlled::default();
        assert!(!private_hidden.non_members_can_read_history());

        let private_visible = AccessControlled {
            history_visible: true,
            ..Default::default()
        };
        assert!(private_visible.non_members_can_read_history());

        let public = AccessControlled {
            public: true,
            history_visible: false,
            ..Default::default()
        };
        assert!(public.non_members_can_read_history());
    }

    #[test]
    fn test_aggregate_field_names() {
        let json = serde_json::to_value(AccessControlled::default()).unwrap();
        assert!(json.get("historyVisible").is_some());
        assert!(json.get("paymentRecipient").is_none());

        let entity: AccessControlled = serde_json::from_value(serde_json::json!({
            "gate": { "kind": "no_gate" },
            "public": false,
            "frozen": false,
            "historyVisible": false,
            "paymentRecipient": { "owner": "treasury" }
        }))
        .unwrap();
        assert_eq!(entity.payment_recipient, Some(Account::of("treasury".into())));
        assert_eq!(json["gate"]["kind"], "no_gate");
    }
}
