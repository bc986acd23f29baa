use alloy_primitives::{Address, U256};
use serde::Serialize;

use super::RiskLevel;

/// Warning for a custom gas token combined with a custom refund receiver.
pub const GAS_TOKEN_AND_REFUND_RECEIVER_WARNING: &str = "This transaction uses a custom gas token \
     and a custom refund receiver. This combination can be used to hide a rerouting of funds \
     through gas refunds.";

/// Additional warning when the combination above also carries a gas price.
pub const NON_ZERO_GAS_PRICE_WARNING: &str = "Furthermore, the gas price is non-zero, which \
     increases the potential for hidden value transfers.";

/// Warning for a custom gas token alone.
pub const CUSTOM_GAS_TOKEN_WARNING: &str =
    "This transaction uses a custom gas token. Please verify that this is intended.";

/// Warning for a custom refund receiver alone.
pub const CUSTOM_REFUND_RECEIVER_WARNING: &str =
    "This transaction uses a custom refund receiver. Please verify that this is intended.";

/// Result of [`check_gas_token`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GasTokenCheck {
    /// Gas token is not the zero address
    pub uses_custom_gas_token: bool,
    /// Refund receiver is not the zero address
    pub uses_custom_refund_receiver: bool,
    /// Gas price is above zero
    pub has_gas_price: bool,
    /// Severity
    pub risk_level: RiskLevel,
    /// Human readable findings
    pub warnings: Vec<String>,
}

/// Classifies the refund parameters of a transaction.
///
/// A Safe pays `gasPrice * gasUsed` in `gasToken` to `refundReceiver` after execution. With a
/// custom token and receiver this is an arbitrary token transfer that wallets rarely display.
pub fn check_gas_token(gas_price: U256, gas_token: Address, refund_receiver: Address) -> GasTokenCheck {
    let uses_custom_gas_token = !gas_token.is_zero();
    let uses_custom_refund_receiver = !refund_receiver.is_zero();
    let has_gas_price = !gas_price.is_zero();

    let (risk_level, warnings): (_, &[&str]) =
        match (uses_custom_gas_token, uses_custom_refund_receiver) {
            (true, true) if has_gas_price => (
                RiskLevel::Critical,
                &[GAS_TOKEN_AND_REFUND_RECEIVER_WARNING, NON_ZERO_GAS_PRICE_WARNING],
            ),
            (true, true) => (RiskLevel::High, &[GAS_TOKEN_AND_REFUND_RECEIVER_WARNING]),
            (true, false) => (RiskLevel::Medium, &[CUSTOM_GAS_TOKEN_WARNING]),
            (false, true) => (RiskLevel::Low, &[CUSTOM_REFUND_RECEIVER_WARNING]),
            (false, false) => (RiskLevel::None, &[]),
        };

    GasTokenCheck {
        uses_custom_gas_token,
        uses_custom_refund_receiver,
        has_gas_price,
        risk_level,
        warnings: warnings.iter().map(|w| w.to_string()).collect(),
    }
}
