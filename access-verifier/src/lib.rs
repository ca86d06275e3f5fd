//! Gate evaluation
//!
//! [`GateEvaluator`] takes an [`AccessGate`](access_core::AccessGate), the
//! principal attempting to join and the proof they supplied, and produces a
//! [`GateVerdict`](access_core::GateVerdict) by querying the external
//! services behind [`Capabilities`].
//!
//! Capabilities are narrow async traits, so the evaluator can be driven by
//! real service clients or by [`OfflineCapabilities`], which answers from
//! in-memory fixtures.

pub mod capability;
pub mod config;
pub mod evaluator;
pub mod offline;
pub mod strategies;

pub use capability::{
    Capabilities, CapabilityError, CredentialIssuer, GovernanceCapability, IssuerKey,
    LedgerCapability, LedgerTransfer, NeuronInfo, StatusRegistry,
};
pub use config::{CredentialConfig, EvaluatorConfig};
pub use evaluator::GateEvaluator;
pub use offline::{CapabilityFixtures, OfflineCapabilities};
pub use strategies::payment::total_cost;
