//! Access gating and rules versioning for shared messaging spaces
//!
//! This crate holds the domain model shared by every other crate in the
//! workspace:
//!
//! - **Gates**: [`AccessGate`], the closed set of conditions a principal must
//!   satisfy to join a group, channel or community
//! - **Proofs**: [`GateProof`], the variant-shaped material a caller supplies
//!   alongside a gate
//! - **Aggregate**: [`AccessControlled`], the `gate`/`public`/`frozen`/
//!   `historyVisible` snapshot consulted before any verification
//! - **Rules**: [`VersionedRules`] and [`UpdatedRules`], the membership terms
//!   and their version transitions
//! - **Verdicts and errors**: [`GateVerdict`] and [`AccessError`]
//!
//! # Example
//!
//! ```
//! use access_core::{AccessControlled, AccessGate};
//!
//! let entity = AccessControlled {
//!     gate: AccessGate::NoGate,
//!     public: true,
//!     frozen: false,
//!     history_visible: true,
//!     payment_recipient: None,
//! };
//!
//! assert!(entity.can_attempt_join());
//! assert!(!entity.requires_gate_check());
//! ```

pub mod access;
pub mod error;
pub mod gate;
pub mod proof;
pub mod rules;
pub mod types;
pub mod verdict;

pub use access::AccessControlled;
pub use error::{AccessError, Result};
pub use gate::{
    AccessGate, Credential, CredentialArgument, CredentialGate, GateKind, NeuronGate,
    PaymentGate, TokenBalanceGate,
};
pub use proof::{GateProof, PaymentProof, ProofKind, VerifiedCredentialArgs};
pub use rules::{default_chat_rules, requires_rules_acceptance, Level, UpdatedRules, VersionedRules};
pub use types::{Account, CanisterId, EntityId, Principal};
pub use verdict::{FailureReason, GateVerdict, MembershipStatus};
