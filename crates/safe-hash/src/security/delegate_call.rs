use alloy_primitives::Address;
use serde::Serialize;
use tracing::debug;

use super::{walk::walk_batches, RiskLevel};
use crate::{constants::is_trusted_delegate_call_target, SafeTransaction};

/// A delegate call found inside a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedDelegateCall {
    /// Delegate call target
    pub target: Address,
    /// Whether the target is an audited Safe library
    pub is_trusted: bool,
    /// Batch nesting level, at least 1
    pub depth: usize,
}

/// Result of [`check_delegate_call`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegateCallCheck {
    /// The transaction itself is a delegate call
    pub is_delegate_call: bool,
    /// The transaction target
    pub target: Address,
    /// The transaction is a delegate call into an audited Safe library
    pub is_trusted: bool,
    /// Delegate calls found inside batches
    pub nested: Vec<NestedDelegateCall>,
    /// Batches nested too deep to inspect
    pub depth_exceeded: bool,
    /// Severity
    pub risk_level: RiskLevel,
    /// Human readable findings
    pub warnings: Vec<String>,
}

/// Warning text for an untrusted delegate call to `target`.
pub fn untrusted_delegate_call_warning(target: Address) -> String {
    format!(
        "The transaction includes an untrusted delegate call to address {target}! This may lead \
         to unexpected behaviour or vulnerabilities. Please review it carefully before you sign!"
    )
}

/// Flags delegate calls into code that is not an audited Safe library.
///
/// A delegate call runs the target's code with the Safe's storage, so an arbitrary target can
/// rewrite owners, modules or the singleton address. Batches are unwound and every nested
/// delegate call is listed with its depth.
pub fn check_delegate_call(tx: &SafeTransaction) -> DelegateCallCheck {
    let is_delegate_call = tx.operation.is_delegate_call();
    let is_trusted = is_delegate_call && is_trusted_delegate_call_target(tx.to);

    let mut check = DelegateCallCheck {
        is_delegate_call,
        target: tx.to,
        is_trusted,
        ..Default::default()
    };
    if is_delegate_call && !is_trusted {
        check.risk_level = RiskLevel::Critical;
        check.warnings.push(untrusted_delegate_call_warning(tx.to));
    }

    let depth_exceeded = walk_batches(&tx.data, |visit| {
        let Some(call) = visit.call else { return };
        if !call.operation.is_delegate_call() {
            return;
        }
        let is_trusted = is_trusted_delegate_call_target(call.to);
        debug!(to = %call.to, depth = visit.depth, is_trusted, "Nested delegate call");
        if !is_trusted {
            check.risk_level = RiskLevel::Critical;
            check.warnings.push(format!(
                "{} (inside a batch at depth {})",
                untrusted_delegate_call_warning(call.to),
                visit.depth
            ));
        }
        check.nested.push(NestedDelegateCall { target: call.to, is_trusted, depth: visit.depth });
    });

    if depth_exceeded {
        check.depth_exceeded = true;
        check.risk_level = RiskLevel::Critical;
        check.warnings.push(
            "The transaction contains batches nested too deep to inspect for delegate calls."
                .to_string(),
        );
    }

    check
}
