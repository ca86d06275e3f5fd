//! NFT, diamond, lifetime diamond and unique-person gates.

use access_core::{FailureReason, GateVerdict, MembershipStatus, Principal};

use super::capability_unreachable;
use crate::capability::StatusRegistry;

pub async fn verify(
    registry: &dyn StatusRegistry,
    principal: &Principal,
    status: MembershipStatus,
) -> GateVerdict {
    match registry.holds(principal, status).await {
        Ok(true) => GateVerdict::Passed,
        Ok(false) => GateVerdict::Failed(FailureReason::StatusNotHeld { status }),
        Err(err) => capability_unreachable("status registry", err),
    }
}
