//! Protocol-specific calldata decoders, looked up by target address.
//!
//! A [`DecoderRegistry`] is built once, then shared read-only. Decoding through the registry is
//! best effort: a missing or failing decoder yields `None`, never an error, since the decoded view
//! is informational and the signed hash does not depend on it.

mod abi;
pub use abi::*;

mod known;
pub use known::*;

use std::{fmt::Debug, panic::AssertUnwindSafe, sync::Arc};

use alloy_primitives::{hex, map::HashMap, Address};
use auto_impl::auto_impl;
use serde::Serialize;
use tracing::{trace, warn};

/// A decoded function call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedCall {
    /// Name of the protocol the target belongs to
    pub protocol: String,
    /// Function name
    pub function: String,
    /// Canonical signature, e.g. `transfer(address,uint256)`
    pub signature: String,
    /// Arguments in declaration order
    pub params: Vec<DecodedParam>,
    /// Calls wrapped by this one, e.g. the elements of a `multicall`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nested: Vec<DecodedCall>,
}

/// A decoded argument, rendered as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedParam {
    /// Argument name, `argN` if the signature does not name it
    pub name: String,
    /// Solidity type
    #[serde(rename = "type")]
    pub ty: String,
    /// Rendered value
    pub value: String,
}

/// Why a decoder could not decode some calldata.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Calldata shorter than a selector.
    #[error("calldata has no function selector")]
    MissingSelector,
    /// The decoder does not know the function.
    #[error("unknown function selector 0x{}", hex::encode(.0))]
    UnknownSelector([u8; 4]),
    /// A function signature could not be parsed.
    #[error("invalid function signature {signature:?}: {reason}")]
    InvalidSignature {
        /// The offending signature
        signature: String,
        /// Parser error
        reason: String,
    },
    /// The arguments do not match the function's ABI.
    #[error("failed to decode arguments of {function}: {reason}")]
    Abi {
        /// Function signature
        function: String,
        /// Decoder error
        reason: String,
    },
    /// Wrapped calls are nested too deep.
    #[error("wrapped calls nested deeper than {0} levels")]
    TooDeep(usize),
}

/// Decodes calls to one contract.
#[auto_impl(&, Box, Arc)]
pub trait CallDecoder: Debug + Send + Sync {
    /// Name of the protocol, e.g. `USDC`.
    fn protocol(&self) -> &str;

    /// The contract this decoder is registered for.
    fn address(&self) -> Address;

    /// The network the contract lives on, `None` if the address is the same everywhere.
    fn chain_id(&self) -> Option<u64> {
        None
    }

    /// Whether [`CallDecoder::decode`] is expected to succeed for a call to `to`.
    fn can_decode(&self, to: Address, data: &[u8]) -> bool {
        to == self.address() && data.len() >= 4
    }

    /// Decodes `data`.
    fn decode(&self, data: &[u8]) -> Result<DecodedCall, DecodeError>;

    /// Signatures of the functions this decoder understands.
    fn supported_functions(&self) -> Vec<String>;
}

type RegistryKey = (Address, Option<u64>);

/// Maps contract addresses to decoders.
#[derive(Debug, Default, Clone)]
pub struct DecoderRegistry {
    decoders: HashMap<RegistryKey, Arc<dyn CallDecoder>>,
}

impl DecoderRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `decoder` under its address and network, returning the decoder it replaces.
    pub fn register(&mut self, decoder: impl CallDecoder + 'static) -> Option<Arc<dyn CallDecoder>> {
        let key = (decoder.address(), decoder.chain_id());
        trace!(protocol = decoder.protocol(), address = %key.0, chain_id = ?key.1, "Registering decoder");
        self.decoders.insert(key, Arc::new(decoder))
    }

    /// Builder-style [`DecoderRegistry::register`].
    pub fn with(mut self, decoder: impl CallDecoder + 'static) -> Self {
        self.register(decoder);
        self
    }

    /// Finds the decoder for `address`.
    ///
    /// A decoder registered for `chain_id` wins over a network-agnostic one.
    pub fn lookup(&self, address: Address, chain_id: Option<u64>) -> Option<&dyn CallDecoder> {
        chain_id
            .and_then(|id| self.decoders.get(&(address, Some(id))))
            .or_else(|| self.decoders.get(&(address, None)))
            .map(|decoder| decoder.as_ref())
    }

    /// Decodes a call to `address`, or returns `None` if no decoder applies or decoding fails.
    pub fn decode(&self, address: Address, data: &[u8], chain_id: Option<u64>) -> Option<DecodedCall> {
        let decoder = self.lookup(address, chain_id)?;
        if !decoder.can_decode(address, data) {
            return None;
        }

        match std::panic::catch_unwind(AssertUnwindSafe(|| decoder.decode(data))) {
            Ok(Ok(call)) => Some(call),
            Ok(Err(err)) => {
                warn!(protocol = decoder.protocol(), %address, %err, "Decoder failed");
                None
            }
            Err(_) => {
                warn!(protocol = decoder.protocol(), %address, "Decoder panicked");
                None
            }
        }
    }

    /// Number of registered decoders.
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    /// Returns `true` if no decoder is registered.
    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Iterates over all registered decoders in no particular order.
    pub fn decoders(&self) -> impl Iterator<Item = &dyn CallDecoder> {
        self.decoders.values().map(|decoder| decoder.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const TOKEN: Address = address!("0x00000000000000000000000000000000000000aa");

    #[derive(Debug)]
    struct Panicking;

    impl CallDecoder for Panicking {
        fn protocol(&self) -> &str {
            "Panicking"
        }

        fn address(&self) -> Address {
            TOKEN
        }

        fn decode(&self, _data: &[u8]) -> Result<DecodedCall, DecodeError> {
            panic!("decoder bug")
        }

        fn supported_functions(&self) -> Vec<String> {
            vec![]
        }
    }

    fn erc20(protocol: &str) -> AbiDecoder {
        AbiDecoder::new(protocol, TOKEN, &["function transfer(address to, uint256 value)"]).unwrap()
    }

    #[test]
    fn test_exact_network_wins() {
        let registry = DecoderRegistry::new()
            .with(erc20("Anywhere"))
            .with(erc20("Mainnet").with_chain_id(1));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup(TOKEN, Some(1)).unwrap().protocol(), "Mainnet");
        assert_eq!(registry.lookup(TOKEN, Some(10)).unwrap().protocol(), "Anywhere");
        assert_eq!(registry.lookup(TOKEN, None).unwrap().protocol(), "Anywhere");
        assert!(registry.lookup(Address::ZERO, Some(1)).is_none());
    }

    #[test]
    fn test_network_specific_only() {
        let registry = DecoderRegistry::new().with(erc20("Mainnet").with_chain_id(1));
        assert!(registry.lookup(TOKEN, Some(1)).is_some());
        assert!(registry.lookup(TOKEN, Some(10)).is_none());
    }

    #[test]
    fn test_failures_become_none() {
        let registry = DecoderRegistry::new().with(erc20("Token"));
        assert!(registry.decode(TOKEN, &[0xde, 0xad, 0xbe, 0xef], None).is_none());
        assert!(registry.decode(TOKEN, &[0xa9], None).is_none());

        let registry = DecoderRegistry::new().with(Panicking);
        assert!(registry.decode(TOKEN, &[0xa9, 0x05, 0x9c, 0xbb], None).is_none());
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = DecoderRegistry::new();
        assert!(registry.register(erc20("First")).is_none());
        let replaced = registry.register(erc20("Second")).unwrap();
        assert_eq!(replaced.protocol(), "First");
        assert_eq!(registry.len(), 1);
    }
}
