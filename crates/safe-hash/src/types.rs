//! Core data types shared by the hash calculator, the batch decoder and the analyzer.

use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

use crate::serde_helpers::{deserialize_bytes_or_null, deserialize_u256};

/// How a Safe (or a batched sub-call) invokes its target.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Operation {
    /// Regular `CALL`.
    #[default]
    #[display("Call")]
    Call = 0,
    /// `DELEGATECALL`: the target code runs in the Safe's storage context.
    #[display("DelegateCall")]
    DelegateCall = 1,
}

/// An operation code other than 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid operation code {0}, expected 0 (Call) or 1 (DelegateCall)")]
pub struct InvalidOperation(pub u8);

impl TryFrom<u8> for Operation {
    type Error = InvalidOperation;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Call),
            1 => Ok(Self::DelegateCall),
            other => Err(InvalidOperation(other)),
        }
    }
}

impl From<Operation> for u8 {
    fn from(op: Operation) -> Self {
        op as Self
    }
}

impl Operation {
    /// Returns `true` for [`Operation::DelegateCall`].
    pub const fn is_delegate_call(&self) -> bool {
        matches!(self, Self::DelegateCall)
    }
}

/// The fields of a Safe transaction that are covered by the owners' signatures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeTransaction {
    /// Call target
    pub to: Address,
    /// Native value sent along
    #[serde(deserialize_with = "deserialize_u256")]
    pub value: U256,
    /// Calldata
    #[serde(default, deserialize_with = "deserialize_bytes_or_null")]
    pub data: Bytes,
    /// Call or delegate call
    pub operation: Operation,
    /// Gas forwarded to the inner call
    #[serde(deserialize_with = "deserialize_u256")]
    pub safe_tx_gas: U256,
    /// Gas costs independent of the inner call (called `dataGas` before Safe 1.0.0)
    #[serde(alias = "dataGas", deserialize_with = "deserialize_u256")]
    pub base_gas: U256,
    /// Gas price used for the refund
    #[serde(deserialize_with = "deserialize_u256")]
    pub gas_price: U256,
    /// Token the refund is paid in, zero for native currency
    #[serde(default)]
    pub gas_token: Address,
    /// Receiver of the refund, zero for `tx.origin`
    #[serde(default)]
    pub refund_receiver: Address,
    /// Safe nonce
    #[serde(deserialize_with = "deserialize_u256")]
    pub nonce: U256,
}

impl SafeTransaction {
    /// A plain `CALL` without refund parameters.
    pub fn call(to: Address, value: U256, data: Bytes, nonce: u64) -> Self {
        Self { to, value, data, nonce: U256::from(nonce), ..Default::default() }
    }

    /// Returns the transaction with `operation` replaced.
    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operation = operation;
        self
    }
}

/// The three digests of a Safe transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeHashes {
    /// EIP-712 domain separator of the Safe
    pub domain_hash: B256,
    /// EIP-712 struct hash of the transaction
    pub message_hash: B256,
    /// The digest the owners sign
    pub safe_tx_hash: B256,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_service_record() {
        let json = r#"{
            "safe": "0xf65475e74C1Ed6d004d5240b06E3088724dFDA5d",
            "to": "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
            "value": "0",
            "data": null,
            "operation": 0,
            "gasToken": "0x0000000000000000000000000000000000000000",
            "safeTxGas": 0,
            "baseGas": 0,
            "gasPrice": "0",
            "refundReceiver": "0x0000000000000000000000000000000000000000",
            "nonce": 434
        }"#;
        let tx: SafeTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.nonce, U256::from(434));
        assert_eq!(tx.operation, Operation::Call);
        assert!(tx.data.is_empty());
    }

    #[test]
    fn test_legacy_data_gas_alias() {
        let json = r#"{
            "to": "0x0000000000000000000000000000000000000001",
            "value": 0, "operation": 1, "safeTxGas": 0, "dataGas": "21000",
            "gasPrice": 0, "nonce": 0
        }"#;
        let tx: SafeTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.base_gas, U256::from(21_000));
        assert_eq!(tx.operation, Operation::DelegateCall);
        assert_eq!(tx.gas_token, Address::ZERO);
    }

    #[test]
    fn test_invalid_operation_rejected() {
        assert_eq!(Operation::try_from(2), Err(InvalidOperation(2)));
        let json = r#"{"to": "0x0000000000000000000000000000000000000001", "value": 0,
            "operation": 2, "safeTxGas": 0, "baseGas": 0, "gasPrice": 0, "nonce": 0}"#;
        assert!(serde_json::from_str::<SafeTransaction>(json).is_err());
    }
}
