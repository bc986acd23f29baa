//! Risk analysis of Safe transactions.
//!
//! Four independent checks look for the patterns that have been used to trick Safe owners into
//! signing malicious transactions:
//! - [`check_delegate_call`]: `DELEGATECALL` into code that is not an audited Safe library,
//! - [`check_gas_token`]: gas refunds routed through a custom token and receiver,
//! - [`check_owner_modifications`]: changes to the signer set or threshold,
//! - [`check_module_guard_changes`]: modules (which bypass signatures) and guards (which can
//!   block the Safe).
//!
//! The owner, module and nested delegate-call checks look through `MultiSend` batches.
//! [`analyze_security`] combines all four into a [`RiskVerdict`].

mod delegate_call;
mod gas_token;
mod modules;
mod owners;
mod walk;

pub use delegate_call::*;
pub use gas_token::*;
pub use modules::*;
pub use owners::*;

use alloy_primitives::Address;
use serde::Serialize;
use tracing::debug;

use crate::SafeTransaction;

/// Severity of a finding, ordered from harmless to critical.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Nothing found
    #[default]
    #[display("none")]
    None,
    /// Unusual but mostly harmless
    #[display("low")]
    Low,
    /// Worth a second look
    #[display("medium")]
    Medium,
    /// Must be understood before signing
    #[display("high")]
    High,
    /// Known attack pattern
    #[display("critical")]
    Critical,
}

impl RiskLevel {
    /// Returns `true` for [`RiskLevel::High`] and [`RiskLevel::Critical`].
    pub fn is_high_or_critical(&self) -> bool {
        *self >= Self::High
    }
}

/// Severity reported by the owner and module checks.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum WarningLevel {
    /// Nothing found
    #[default]
    #[display("info")]
    Info,
    /// Detection with residual risk
    #[display("high")]
    High,
    /// Detection that changes who controls the Safe
    #[display("critical")]
    Critical,
}

impl From<WarningLevel> for RiskLevel {
    fn from(level: WarningLevel) -> Self {
        match level {
            WarningLevel::Info => Self::None,
            WarningLevel::High => Self::High,
            WarningLevel::Critical => Self::Critical,
        }
    }
}

/// What a recognized administrative call does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
#[serde(rename_all = "camelCase")]
pub enum DetectionKind {
    /// `addOwnerWithThreshold`
    #[display("add owner")]
    AddOwner,
    /// `removeOwner`
    #[display("remove owner")]
    RemoveOwner,
    /// `swapOwner`
    #[display("swap owner")]
    SwapOwner,
    /// `changeThreshold`
    #[display("change threshold")]
    ChangeThreshold,
    /// `enableModule`
    #[display("enable module")]
    EnableModule,
    /// `disableModule`
    #[display("disable module")]
    DisableModule,
    /// `setGuard`
    #[display("set guard")]
    SetGuard,
    /// `setModuleGuard`
    #[display("set module guard")]
    SetModuleGuard,
}

impl DetectionKind {
    /// The Solidity function name.
    pub const fn function_name(&self) -> &'static str {
        match self {
            Self::AddOwner => "addOwnerWithThreshold",
            Self::RemoveOwner => "removeOwner",
            Self::SwapOwner => "swapOwner",
            Self::ChangeThreshold => "changeThreshold",
            Self::EnableModule => "enableModule",
            Self::DisableModule => "disableModule",
            Self::SetGuard => "setGuard",
            Self::SetModuleGuard => "setModuleGuard",
        }
    }
}

/// An administrative call found in a transaction or one of its batches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    /// What the call does
    pub kind: DetectionKind,
    /// The Solidity function name
    pub function_name: &'static str,
    /// The owner, module or guard the call acts on, if its arguments decode
    pub target_address: Option<Address>,
    /// Whether `target_address` is on the relevant allow-list
    pub is_trusted: bool,
    /// Whether the call sits inside a batch
    pub is_nested: bool,
    /// Batch nesting level, 0 for the transaction itself
    pub depth: usize,
}

impl Detection {
    pub(crate) fn new(
        kind: DetectionKind,
        target_address: Option<Address>,
        is_trusted: bool,
        depth: usize,
    ) -> Self {
        Self {
            kind,
            function_name: kind.function_name(),
            target_address,
            is_trusted,
            is_nested: depth > 0,
            depth,
        }
    }

    pub(crate) fn location(&self) -> String {
        if self.is_nested {
            format!("inside a batch at depth {}", self.depth)
        } else {
            "called directly".to_string()
        }
    }
}

/// The combined result of all checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskVerdict {
    /// Delegate call check
    pub delegate_call: DelegateCallCheck,
    /// Gas token and refund receiver check
    pub gas_token: GasTokenCheck,
    /// Owner and threshold check
    pub owners: OwnerCheck,
    /// Module and guard check
    pub modules: ModuleGuardCheck,
    /// Highest severity among the four checks
    pub overall_risk: RiskLevel,
    /// Whether a human must review the transaction before signing
    pub requires_careful_review: bool,
}

impl RiskVerdict {
    /// Combines the four check results.
    pub fn combine(
        delegate_call: DelegateCallCheck,
        gas_token: GasTokenCheck,
        owners: OwnerCheck,
        modules: ModuleGuardCheck,
    ) -> Self {
        let overall_risk = [
            delegate_call.risk_level,
            gas_token.risk_level,
            owners.warning_level.into(),
            modules.warning_level.into(),
        ]
        .into_iter()
        .max()
        .unwrap_or_default();

        let requires_careful_review = overall_risk.is_high_or_critical() ||
            !delegate_call.warnings.is_empty() ||
            !gas_token.warnings.is_empty() ||
            owners.modifies_owners ||
            modules.modifies_modules_or_guards;

        Self { delegate_call, gas_token, owners, modules, overall_risk, requires_careful_review }
    }

    /// All warnings in check order.
    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.delegate_call
            .warnings
            .iter()
            .chain(&self.gas_token.warnings)
            .chain(&self.owners.warnings)
            .chain(&self.modules.warnings)
            .map(String::as_str)
    }
}

/// Runs every check on `tx`.
pub fn analyze_security(tx: &SafeTransaction) -> RiskVerdict {
    let verdict = RiskVerdict::combine(
        check_delegate_call(tx),
        check_gas_token(tx.gas_price, tx.gas_token, tx.refund_receiver),
        check_owner_modifications(&tx.data),
        check_module_guard_changes(&tx.data),
    );
    debug!(
        overall_risk = %verdict.overall_risk,
        requires_careful_review = verdict.requires_careful_review,
        "Security analysis finished"
    );
    verdict
}
