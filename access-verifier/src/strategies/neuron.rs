//! Neuron gate.

use access_core::{FailureReason, GateVerdict, NeuronGate, Principal};
use tracing::debug;

use super::capability_unreachable;
use crate::capability::{GovernanceCapability, NeuronInfo};

/// Passed iff at least one controlled neuron meets every present threshold.
pub async fn verify(
    governance: &dyn GovernanceCapability,
    gate: &NeuronGate,
    principal: &Principal,
) -> GateVerdict {
    let neurons = match governance
        .neurons_controlled_by(&gate.governance_canister, principal)
        .await
    {
        Ok(neurons) => neurons,
        Err(err) => return capability_unreachable("governance", err),
    };

    if let Some(neuron) = neurons.iter().find(|n| qualifies(n, gate)) {
        debug!(neuron_id = neuron.id, principal = %principal, "Qualifying neuron found");
        return GateVerdict::Passed;
    }

    GateVerdict::Failed(FailureReason::NoQualifyingNeuron {
        neurons_checked: neurons.len(),
    })
}

pub fn qualifies(neuron: &NeuronInfo, gate: &NeuronGate) -> bool {
    let stake_ok = gate
        .min_stake_e8s
        .map_or(true, |min| neuron.stake_e8s >= min);
    let delay_ok = gate
        .min_dissolve_delay
        .map_or(true, |min| neuron.dissolve_delay >= min);
    stake_ok && delay_ok
}
