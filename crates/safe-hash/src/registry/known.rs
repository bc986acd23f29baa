use alloy_primitives::{address, hex, Address};
use alloy_sol_types::SolCall;
use tracing::warn;

use super::{AbiDecoder, CallDecoder, DecodeError, DecodedCall, DecodedParam, DecoderRegistry};
use crate::{interfaces::IMultiSend::multiSendCall, try_decode_batch};

const ERC20_FUNCTIONS: &[&str] = &[
    "function transfer(address to, uint256 value)",
    "function transferFrom(address from, address to, uint256 value)",
    "function approve(address spender, uint256 value)",
];

const WETH_FUNCTIONS: &[&str] = &[
    "function transfer(address dst, uint256 wad)",
    "function transferFrom(address src, address dst, uint256 wad)",
    "function approve(address guy, uint256 wad)",
    "function deposit()",
    "function withdraw(uint256 wad)",
];

/// Well-known Ethereum mainnet tokens.
pub const KNOWN_MAINNET_TOKENS: &[(&str, Address)] = &[
    ("USDC", address!("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48")),
    ("USDT", address!("0xdAC17F958D2ee523a2206206994597C13D831ec7")),
    ("DAI", address!("0x6B175474E89094C44Da98b954EedeAC495271d0F")),
    ("WBTC", address!("0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599")),
];

/// Wrapped Ether on Ethereum mainnet.
pub const WETH: Address = address!("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");

/// `MultiSend` and `MultiSendCallOnly` deployments, identical on every network.
pub const MULTI_SEND_DEPLOYMENTS: &[(&str, Address)] = &[
    ("MultiSend 1.1.1", address!("0x8D29bE29923b68abfDD21e541b9374737B49cdAD")),
    ("MultiSend 1.3.0", address!("0xA238CBeb142c10Ef7Ad8442C6D1f9E89e07e7761")),
    ("MultiSend 1.3.0", address!("0x998739BFdAAdde7C933B942a68053933098f9EDa")),
    ("MultiSendCallOnly 1.3.0", address!("0x40A2aCCbd92BCA938b02010E17A5b8929b49130D")),
    ("MultiSendCallOnly 1.3.0", address!("0xA1dabEF33b3B82c7814B6D82A79e50F4AC44102B")),
    ("MultiSend 1.4.1", address!("0x38869bf66a61cF6bDB996A6aE40D5853Fd43B526")),
    ("MultiSendCallOnly 1.4.1", address!("0x9641d764fc13c8B624c04430C7356C1C7C8102e2")),
];

/// Renders the sub-calls of a `MultiSend` batch.
#[derive(Debug, Clone)]
pub struct MultiSendDecoder {
    name: &'static str,
    address: Address,
}

impl MultiSendDecoder {
    /// A decoder for the batching contract deployed at `address`.
    pub const fn new(name: &'static str, address: Address) -> Self {
        Self { name, address }
    }
}

impl CallDecoder for MultiSendDecoder {
    fn protocol(&self) -> &str {
        self.name
    }

    fn address(&self) -> Address {
        self.address
    }

    fn decode(&self, data: &[u8]) -> Result<DecodedCall, DecodeError> {
        let calls = try_decode_batch(data).map_err(|err| DecodeError::Abi {
            function: multiSendCall::SIGNATURE.to_string(),
            reason: err.to_string(),
        })?;

        let params = calls
            .iter()
            .enumerate()
            .map(|(index, call)| DecodedParam {
                name: format!("transaction{index}"),
                ty: "(uint8,address,uint256,bytes)".to_string(),
                value: format!(
                    "({}, {}, {}, {})",
                    u8::from(call.operation),
                    call.to,
                    call.value,
                    hex::encode_prefixed(&call.data)
                ),
            })
            .collect();

        Ok(DecodedCall {
            protocol: self.name.to_string(),
            function: "multiSend".to_string(),
            signature: multiSendCall::SIGNATURE.to_string(),
            params,
            nested: Vec::new(),
        })
    }

    fn supported_functions(&self) -> Vec<String> {
        vec![multiSendCall::SIGNATURE.to_string()]
    }
}

impl DecoderRegistry {
    /// A registry with decoders for the Safe batching contracts and well-known mainnet tokens.
    pub fn with_known_protocols() -> Self {
        let mut registry = Self::new();

        for &(name, address) in MULTI_SEND_DEPLOYMENTS {
            registry.register(MultiSendDecoder::new(name, address));
        }

        for &(name, address) in KNOWN_MAINNET_TOKENS {
            registry.register_signatures(name, address, Some(1), ERC20_FUNCTIONS);
        }
        registry.register_signatures("WETH", WETH, Some(1), WETH_FUNCTIONS);

        registry
    }

    /// Registers an [`AbiDecoder`] built from `signatures`. A decoder that fails to build is
    /// logged and skipped.
    pub(crate) fn register_signatures(
        &mut self,
        protocol: &str,
        address: Address,
        chain_id: Option<u64>,
        signatures: &[&str],
    ) -> bool {
        match AbiDecoder::new(protocol, address, signatures) {
            Ok(decoder) => {
                let decoder = match chain_id {
                    Some(chain_id) => decoder.with_chain_id(chain_id),
                    None => decoder,
                };
                self.register(decoder);
                true
            }
            Err(err) => {
                warn!(protocol, %address, %err, "Skipping built-in decoder");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encode_batch, Operation, SubCall};
    use alloy_primitives::{bytes, U256};

    #[test]
    fn test_signatures_parse() {
        assert!(AbiDecoder::new("ERC20", Address::ZERO, ERC20_FUNCTIONS).is_ok());
        assert!(AbiDecoder::new("WETH", WETH, WETH_FUNCTIONS).is_ok());
        let registry = DecoderRegistry::with_known_protocols();
        assert_eq!(
            registry.len(),
            MULTI_SEND_DEPLOYMENTS.len() + KNOWN_MAINNET_TOKENS.len() + 1
        );
    }

    #[test]
    fn test_broken_signature_is_skipped() {
        let mut registry = DecoderRegistry::new();
        assert!(!registry.register_signatures(
            "Broken",
            WETH,
            Some(1),
            &["function deposit(", "function withdraw(uint256 wad)"],
        ));
        assert!(registry.is_empty());

        assert!(registry.register_signatures("WETH", WETH, Some(1), WETH_FUNCTIONS));
        assert!(registry.lookup(WETH, Some(1)).is_some());
        assert!(registry.lookup(WETH, None).is_none());
    }

    #[test]
    fn test_usdc_transfer_on_mainnet_only() {
        let registry = DecoderRegistry::with_known_protocols();
        let usdc = KNOWN_MAINNET_TOKENS[0].1;
        let data = bytes!(
            "a9059cbb0000000000000000000000001111111111111111111111111111111111111111"
            "00000000000000000000000000000000000000000000000000000000000f4240"
        );

        let call = registry.decode(usdc, &data, Some(1)).unwrap();
        assert_eq!(call.protocol, "USDC");
        assert_eq!(call.params[1].value, "1000000");

        assert!(registry.decode(usdc, &data, Some(100)).is_none());
    }

    #[test]
    fn test_multisend_on_any_network() {
        let registry = DecoderRegistry::with_known_protocols();
        let (_, multi_send) = MULTI_SEND_DEPLOYMENTS[6];
        let data = encode_batch(&[SubCall {
            operation: Operation::DelegateCall,
            to: Address::repeat_byte(0x22),
            value: U256::from(3),
            data: bytes!("c0ffee"),
        }]);

        let call = registry.decode(multi_send, &data, Some(42161)).unwrap();
        assert_eq!(call.function, "multiSend");
        assert_eq!(call.params.len(), 1);
        assert_eq!(
            call.params[0].value,
            format!("(1, {}, 3, 0xc0ffee)", Address::repeat_byte(0x22))
        );
    }
}
