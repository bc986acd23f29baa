//! EIP-712 hashing of Safe transactions.
//!
//! The Safe contracts changed their typed-data layout twice:
//! - up to 1.2.0 the domain separator commits only to the Safe address, later versions also
//!   commit to the chain id;
//! - before 1.0.0 the `baseGas` field was called `dataGas`, which changes the struct type hash.
//!
//! Everything else is plain EIP-712 struct encoding: dynamic `bytes` are hashed, every other
//! field is left-padded to a 32-byte word.

use alloy_primitives::{keccak256, Address, B256, U256};
use alloy_sol_types::SolValue;
use tracing::{debug, trace};

use crate::{
    constants::{
        DOMAIN_SEPARATOR_TYPEHASH, DOMAIN_SEPARATOR_TYPEHASH_OLD, EIP712_PREFIX,
        FIRST_BASE_GAS_VERSION, LAST_LEGACY_DOMAIN_VERSION, SAFE_TX_TYPEHASH, SAFE_TX_TYPEHASH_OLD,
    },
    validate_version, Result, SafeHashes, SafeTransaction, SafeVersion,
};

/// Computes the EIP-712 domain separator of a Safe.
pub fn domain_hash(chain_id: u64, safe: Address, version: &SafeVersion) -> B256 {
    if version.lte(&LAST_LEGACY_DOMAIN_VERSION) {
        debug!(%version, "Using chain-agnostic domain separator");
        keccak256((DOMAIN_SEPARATOR_TYPEHASH_OLD, safe).abi_encode())
    } else {
        keccak256((DOMAIN_SEPARATOR_TYPEHASH, U256::from(chain_id), safe).abi_encode())
    }
}

/// Computes the EIP-712 struct hash of a Safe transaction.
pub fn message_hash(tx: &SafeTransaction, version: &SafeVersion) -> B256 {
    let type_hash = if version.lt(&FIRST_BASE_GAS_VERSION) {
        debug!(%version, "Using pre-1.0.0 SafeTx type hash");
        SAFE_TX_TYPEHASH_OLD
    } else {
        SAFE_TX_TYPEHASH
    };
    let data_hash = keccak256(&tx.data);
    trace!(%data_hash, data_len = tx.data.len(), "Hashed transaction data");

    let encoded = (
        type_hash,
        tx.to,
        tx.value,
        data_hash,
        U256::from(u8::from(tx.operation)),
        tx.safe_tx_gas,
        tx.base_gas,
        tx.gas_price,
        tx.gas_token,
        tx.refund_receiver,
        tx.nonce,
    )
        .abi_encode();
    keccak256(encoded)
}

/// Returns the EIP-712 signing payload `0x1901 ++ domain ++ message`.
///
/// This is what the Safe's `encodeTransactionData` returns on-chain.
pub fn encode_transaction_data(domain_hash: B256, message_hash: B256) -> [u8; 66] {
    let mut payload = [0u8; 66];
    payload[..2].copy_from_slice(&EIP712_PREFIX);
    payload[2..34].copy_from_slice(domain_hash.as_slice());
    payload[34..].copy_from_slice(message_hash.as_slice());
    payload
}

/// Computes the digest that the Safe owners sign.
pub fn safe_tx_hash(domain_hash: B256, message_hash: B256) -> B256 {
    keccak256(encode_transaction_data(domain_hash, message_hash))
}

/// Computes the domain, message and safe transaction hashes.
///
/// Fails with [`crate::SafeHashError::UnsupportedVersion`] if `version` is empty, malformed or
/// older than the oldest supported Safe.
pub fn calculate_hashes(
    chain_id: u64,
    safe: Address,
    tx: &SafeTransaction,
    version: &str,
) -> Result<SafeHashes> {
    let version = validate_version(version)?;

    let domain_hash = domain_hash(chain_id, safe, &version);
    let message_hash = message_hash(tx, &version);
    let safe_tx_hash = safe_tx_hash(domain_hash, message_hash);
    debug!(chain_id, %safe, %version, %safe_tx_hash, "Calculated Safe transaction hash");

    Ok(SafeHashes { domain_hash, message_hash, safe_tx_hash })
}

/// Compares two hex-encoded hashes, ignoring case and an optional `0x` prefix.
///
/// Returns `false` if either side is not a 32-byte hex string.
pub fn hashes_match(a: &str, b: &str) -> bool {
    match (a.trim().parse::<B256>(), b.trim().parse::<B256>()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

impl SafeHashes {
    /// Returns `true` if the computed safe transaction hash equals `expected`.
    pub fn matches(&self, expected: &B256) -> bool {
        self.safe_tx_hash == *expected
    }
}
