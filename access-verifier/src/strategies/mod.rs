//! Verification strategies, one per gate variant.
//!
//! Every strategy issues at most one capability query and shapes the answer
//! into a [`GateVerdict`]. Transport errors become `Indeterminate`; only a
//! definitive answer from the remote service can produce `Failed`.

pub mod balance;
pub mod credential;
pub mod neuron;
pub mod payment;
pub mod status;

use access_core::GateVerdict;
use tracing::warn;

use crate::capability::CapabilityError;

pub(crate) fn capability_unreachable(capability: &str, err: CapabilityError) -> GateVerdict {
    warn!(capability, error = %err, "Capability query failed");
    GateVerdict::indeterminate(format!("{capability} unreachable: {err}"))
}
