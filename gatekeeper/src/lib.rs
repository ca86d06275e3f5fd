//! Gatekeeper
//!
//! Decides join attempts against gated groups, channels and communities:
//! the frozen veto, gate verification through
//! [`access_verifier::GateEvaluator`], then rules acceptance.

pub mod admission;
pub mod config;
pub mod error;
pub mod logging;
pub mod scenario;

pub use admission::{AdmissionController, JoinDecision, JoinRequest};
pub use error::{Result, ScenarioError};
pub use scenario::{Outcome, Scenario, ScenarioReport};
