use alloy_primitives::Address;
use alloy_sol_types::SolCall;
use serde::Serialize;
use tracing::debug;

use super::{walk::walk_batches, Detection, DetectionKind, WarningLevel};
use crate::{
    constants::is_trusted_module_or_guard,
    interfaces::ISafe::{disableModuleCall, enableModuleCall, setGuardCall, setModuleGuardCall},
};

/// Result of [`check_module_guard_changes`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleGuardCheck {
    /// At least one module or guard change was found
    pub modifies_modules_or_guards: bool,
    /// Every change, in execution order
    pub detections: Vec<Detection>,
    /// Batches nested too deep to inspect
    pub depth_exceeded: bool,
    /// Severity
    pub warning_level: WarningLevel,
    /// Human readable findings
    pub warnings: Vec<String>,
}

/// Recognizes a module or guard management call.
///
/// Returns the kind and, when the arguments decode, the module or guard the call acts on. For
/// `disableModule` that is the second argument.
pub fn detect_module_guard_call(data: &[u8]) -> Option<(DetectionKind, Option<Address>)> {
    let selector: [u8; 4] = data.get(..4)?.try_into().ok()?;

    if selector == enableModuleCall::SELECTOR {
        let module = enableModuleCall::abi_decode(data, false).ok().map(|c| c.module);
        Some((DetectionKind::EnableModule, module))
    } else if selector == disableModuleCall::SELECTOR {
        let module = disableModuleCall::abi_decode(data, false).ok().map(|c| c.module);
        Some((DetectionKind::DisableModule, module))
    } else if selector == setGuardCall::SELECTOR {
        let guard = setGuardCall::abi_decode(data, false).ok().map(|c| c.guard);
        Some((DetectionKind::SetGuard, guard))
    } else if selector == setModuleGuardCall::SELECTOR {
        let guard = setModuleGuardCall::abi_decode(data, false).ok().map(|c| c.moduleGuard);
        Some((DetectionKind::SetModuleGuard, guard))
    } else {
        None
    }
}

/// Finds module and guard changes, directly or inside batches.
///
/// Enabled modules execute transactions without signatures and a guard can veto every
/// transaction, so each change is reported even when the address is a known deployment.
pub fn check_module_guard_changes(data: &[u8]) -> ModuleGuardCheck {
    let mut check = ModuleGuardCheck::default();

    let depth_exceeded = walk_batches(data, |visit| {
        if let Some((kind, target)) = detect_module_guard_call(visit.data) {
            let is_trusted = target.is_some_and(is_trusted_module_or_guard);
            debug!(%kind, ?target, is_trusted, depth = visit.depth, "Module or guard change");
            check.detections.push(Detection::new(kind, target, is_trusted, visit.depth));
        }
    });

    for detection in &check.detections {
        let subject = match detection.target_address {
            Some(address) if detection.is_trusted => format!(" (known deployment {address})"),
            Some(address) => format!(" (unknown address {address})"),
            None => String::new(),
        };
        check.warnings.push(format!(
            "The transaction calls {}{subject} {}. Modules can execute transactions without \
             signatures and guards can block the Safe.",
            detection.function_name,
            detection.location(),
        ));
    }

    check.modifies_modules_or_guards = !check.detections.is_empty();
    if check.modifies_modules_or_guards {
        check.warning_level = WarningLevel::High;
    }
    if depth_exceeded {
        check.depth_exceeded = true;
        check.warning_level = WarningLevel::Critical;
        check.warnings.push(
            "The transaction contains batches nested too deep to inspect for module or guard \
             changes."
                .to_string(),
        );
    }

    check
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{constants::MAX_BATCH_DEPTH, encode_batch, Operation, SubCall};
    use alloy_primitives::{address, Bytes, U256};

    const ALLOWANCE_MODULE: Address = address!("0xCFbFaC74C26F8647cBDb8c5caf80BB5b32E43134");
    const UNKNOWN: Address = address!("0x00000000000000000000000000000000000bad00");
    const SENTINEL: Address = address!("0x0000000000000000000000000000000000000001");

    #[test]
    fn test_trusted_module_still_warns() {
        let data = enableModuleCall { module: ALLOWANCE_MODULE }.abi_encode();
        let check = check_module_guard_changes(&data);
        assert!(check.modifies_modules_or_guards);
        assert_eq!(check.warning_level, WarningLevel::High);
        assert!(check.detections[0].is_trusted);
        assert_eq!(check.warnings.len(), 1);
        assert!(check.warnings[0].contains("known deployment"));
    }

    #[test]
    fn test_disable_module_uses_second_argument() {
        let data = disableModuleCall { prevModule: SENTINEL, module: UNKNOWN }.abi_encode();
        let check = check_module_guard_changes(&data);
        assert_eq!(check.detections[0].kind, DetectionKind::DisableModule);
        assert_eq!(check.detections[0].target_address, Some(UNKNOWN));
        assert!(!check.detections[0].is_trusted);
    }

    #[test]
    fn test_guards_in_batch() {
        let guard: Bytes = setGuardCall { guard: UNKNOWN }.abi_encode().into();
        let module_guard: Bytes = setModuleGuardCall { moduleGuard: UNKNOWN }.abi_encode().into();
        let data = encode_batch(&[
            SubCall { operation: Operation::Call, to: SENTINEL, value: U256::ZERO, data: guard },
            SubCall { operation: Operation::Call, to: SENTINEL, value: U256::ZERO, data: module_guard },
        ]);
        let check = check_module_guard_changes(&data);
        let kinds: Vec<_> = check.detections.iter().map(|d| (d.kind, d.is_nested)).collect();
        assert_eq!(kinds, vec![(DetectionKind::SetGuard, true), (DetectionKind::SetModuleGuard, true)]);
    }

    #[test]
    fn test_too_deep_fails_closed() {
        let mut data: Bytes = enableModuleCall { module: UNKNOWN }.abi_encode().into();
        for _ in 0..=MAX_BATCH_DEPTH {
            data = encode_batch(&[SubCall {
                operation: Operation::Call,
                to: SENTINEL,
                value: U256::ZERO,
                data,
            }]);
        }
        let check = check_module_guard_changes(&data);
        assert!(check.depth_exceeded);
        assert!(check.detections.is_empty());
        assert_eq!(check.warning_level, WarningLevel::Critical);
    }
}
