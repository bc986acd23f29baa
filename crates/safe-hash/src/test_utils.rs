//! Fixtures shared by unit tests, integration tests and benchmarks.

use alloy_primitives::{address, Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};
use serde_json::json;

use crate::{encode_batch, DecodedClaim, Operation, SafeTransaction, SubCall};

sol! {
    /// ERC-20 transfer, used as the canonical harmless call.
    function transfer(address to, uint256 value);
}

/// A Safe on Ethereum mainnet running 1.3.0.
pub const SAFE: Address = address!("0xf65475e74C1Ed6d004d5240b06E3088724dFDA5d");

/// USDC on Ethereum mainnet.
pub const USDC: Address = address!("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");

/// Recipient of [`usdc_transfer`].
pub const RECIPIENT: Address = address!("0x1111111111111111111111111111111111111111");

/// An address that is on no allow-list.
pub const UNTRUSTED: Address = address!("0xdeadbeefdeadbeefdeadbeefdeadbeefdeadbeef");

/// `MultiSendCallOnly` v1.4.1.
pub const MULTI_SEND_CALL_ONLY: Address = address!("0x9641d764fc13c8B624c04430C7356C1C7C8102e2");

/// `transfer(RECIPIENT, amount)` calldata.
pub fn usdc_transfer(amount: u64) -> Bytes {
    transferCall { to: RECIPIENT, value: U256::from(amount) }.abi_encode().into()
}

/// A USDC transfer of 1 USDC from [`SAFE`] at nonce 7.
pub fn usdc_transfer_tx() -> SafeTransaction {
    SafeTransaction::call(USDC, U256::ZERO, usdc_transfer(1_000_000), 7)
}

/// A plain call without value.
pub fn sub_call(to: Address, data: impl Into<Bytes>) -> SubCall {
    SubCall { operation: Operation::Call, to, value: U256::ZERO, data: data.into() }
}

/// A delegate call without value.
pub fn delegate_sub_call(to: Address, data: impl Into<Bytes>) -> SubCall {
    SubCall { operation: Operation::DelegateCall, ..sub_call(to, data) }
}

/// A transaction that delegate calls [`MULTI_SEND_CALL_ONLY`] with `calls`.
pub fn batch_tx(calls: &[SubCall]) -> SafeTransaction {
    SafeTransaction {
        to: MULTI_SEND_CALL_ONLY,
        data: encode_batch(calls),
        operation: Operation::DelegateCall,
        ..Default::default()
    }
}

/// Wraps `data` in `levels` single-call batches addressed to [`SAFE`].
pub fn nest_in_batches(data: impl Into<Bytes>, levels: usize) -> Bytes {
    (0..levels).fold(data.into(), |data, _| encode_batch(&[sub_call(SAFE, data)]))
}

/// The transaction-service decoding of [`usdc_transfer`] with the given amount.
pub fn transfer_claim(amount: &str) -> DecodedClaim {
    DecodedClaim {
        method: "transfer".to_string(),
        parameters: vec![
            crate::ClaimParameter {
                name: "to".to_string(),
                ty: "address".to_string(),
                value: json!(RECIPIENT.to_string()),
                value_decoded: None,
            },
            crate::ClaimParameter {
                name: "value".to_string(),
                ty: "uint256".to_string(),
                value: json!(amount),
                value_decoded: None,
            },
        ],
    }
}
