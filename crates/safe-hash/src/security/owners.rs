use alloy_primitives::Address;
use alloy_sol_types::SolCall;
use serde::Serialize;
use tracing::debug;

use super::{walk::walk_batches, Detection, DetectionKind, WarningLevel};
use crate::interfaces::ISafe::{
    addOwnerWithThresholdCall, changeThresholdCall, removeOwnerCall, swapOwnerCall,
};

/// Result of [`check_owner_modifications`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerCheck {
    /// At least one owner or threshold change was found
    pub modifies_owners: bool,
    /// Every change, in execution order
    pub detections: Vec<Detection>,
    /// Batches nested too deep to inspect
    pub depth_exceeded: bool,
    /// Severity
    pub warning_level: WarningLevel,
    /// Human readable findings
    pub warnings: Vec<String>,
}

/// Recognizes an owner or threshold management call.
///
/// Returns the kind and, when the arguments decode, the owner the call acts on.
pub fn detect_owner_call(data: &[u8]) -> Option<(DetectionKind, Option<Address>)> {
    let selector: [u8; 4] = data.get(..4)?.try_into().ok()?;

    if selector == addOwnerWithThresholdCall::SELECTOR {
        let owner = addOwnerWithThresholdCall::abi_decode(data, false).ok().map(|c| c.owner);
        Some((DetectionKind::AddOwner, owner))
    } else if selector == removeOwnerCall::SELECTOR {
        let owner = removeOwnerCall::abi_decode(data, false).ok().map(|c| c.owner);
        Some((DetectionKind::RemoveOwner, owner))
    } else if selector == swapOwnerCall::SELECTOR {
        let owner = swapOwnerCall::abi_decode(data, false).ok().map(|c| c.newOwner);
        Some((DetectionKind::SwapOwner, owner))
    } else if selector == changeThresholdCall::SELECTOR {
        Some((DetectionKind::ChangeThreshold, None))
    } else {
        None
    }
}

/// Finds changes to the signer set or the threshold, directly or inside batches.
///
/// Any hit is critical: whoever controls the owners controls the Safe.
pub fn check_owner_modifications(data: &[u8]) -> OwnerCheck {
    let mut check = OwnerCheck::default();

    let depth_exceeded = walk_batches(data, |visit| {
        if let Some((kind, target)) = detect_owner_call(visit.data) {
            debug!(%kind, ?target, depth = visit.depth, "Owner modification");
            check.detections.push(Detection::new(kind, target, false, visit.depth));
        }
    });

    for detection in &check.detections {
        let subject = match detection.target_address {
            Some(owner) => format!(" ({owner})"),
            None => String::new(),
        };
        check.warnings.push(format!(
            "The transaction calls {}{subject} {}. This changes who can sign for the Safe.",
            detection.function_name,
            detection.location(),
        ));
    }

    check.modifies_owners = !check.detections.is_empty();
    if check.modifies_owners {
        check.warning_level = WarningLevel::Critical;
    }
    if depth_exceeded {
        check.depth_exceeded = true;
        check.warning_level = WarningLevel::Critical;
        check.warnings.push(
            "The transaction contains batches nested too deep to inspect for owner changes."
                .to_string(),
        );
    }

    check
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encode_batch, Operation, SubCall};
    use alloy_primitives::{address, Bytes, U256};

    const NEW_OWNER: Address = address!("0x000000000000000000000000000000000000beef");
    const SAFE: Address = address!("0xf65475e74C1Ed6d004d5240b06E3088724dFDA5d");

    fn add_owner() -> Bytes {
        addOwnerWithThresholdCall { owner: NEW_OWNER, _threshold: U256::from(2) }.abi_encode().into()
    }

    #[test]
    fn test_direct_owner_change() {
        let check = check_owner_modifications(&add_owner());
        assert!(check.modifies_owners);
        assert_eq!(check.warning_level, WarningLevel::Critical);
        assert_eq!(check.detections.len(), 1);
        let detection = &check.detections[0];
        assert_eq!(detection.kind, DetectionKind::AddOwner);
        assert_eq!(detection.target_address, Some(NEW_OWNER));
        assert!(!detection.is_nested);
        assert!(check.warnings[0].contains("called directly"));
    }

    #[test]
    fn test_every_owner_call_is_listed() {
        let swap = swapOwnerCall {
            prevOwner: address!("0x0000000000000000000000000000000000000001"),
            oldOwner: address!("0x000000000000000000000000000000000000dead"),
            newOwner: NEW_OWNER,
        };
        let threshold = changeThresholdCall { _threshold: U256::from(1) };
        let data = encode_batch(&[
            SubCall { operation: Operation::Call, to: SAFE, value: U256::ZERO, data: swap.abi_encode().into() },
            SubCall {
                operation: Operation::Call,
                to: SAFE,
                value: U256::ZERO,
                data: threshold.abi_encode().into(),
            },
        ]);

        let check = check_owner_modifications(&data);
        let kinds: Vec<_> = check.detections.iter().map(|d| (d.kind, d.depth)).collect();
        assert_eq!(kinds, vec![(DetectionKind::SwapOwner, 1), (DetectionKind::ChangeThreshold, 1)]);
        assert_eq!(check.detections[0].target_address, Some(NEW_OWNER));
        assert_eq!(check.warnings.len(), 2);
    }

    #[test]
    fn test_selector_without_arguments() {
        let check = check_owner_modifications(&removeOwnerCall::SELECTOR);
        assert!(check.modifies_owners);
        assert_eq!(check.detections[0].target_address, None);
    }

    #[test]
    fn test_unrelated_calldata() {
        let check = check_owner_modifications(&[0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(check, OwnerCheck::default());
        assert_eq!(check_owner_modifications(&[]), OwnerCheck::default());
    }
}
