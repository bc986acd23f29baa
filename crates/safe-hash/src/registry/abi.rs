use std::collections::BTreeMap;

use alloy_dyn_abi::{DynSolValue, JsonAbiExt};
use alloy_json_abi::Function;
use alloy_primitives::{hex, Address, Selector};

use super::{CallDecoder, DecodeError, DecodedCall, DecodedParam};

/// Maximum nesting of `multicall(bytes[])` wrappers decoded by [`AbiDecoder`].
pub const MAX_MULTICALL_DEPTH: usize = 4;

/// A decoder built from human-readable function signatures.
///
/// ```
/// use alloy_primitives::address;
/// use safe_hash::registry::AbiDecoder;
///
/// let weth = AbiDecoder::new(
///     "WETH",
///     address!("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
///     &["function deposit()", "function withdraw(uint256 wad)"],
/// )
/// .unwrap()
/// .with_chain_id(1);
/// assert_eq!(weth.functions().count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct AbiDecoder {
    protocol: String,
    address: Address,
    chain_id: Option<u64>,
    functions: BTreeMap<Selector, Function>,
}

impl AbiDecoder {
    /// Parses `signatures`, e.g. `function transfer(address to, uint256 value)` or
    /// `transfer(address,uint256)`.
    pub fn new(
        protocol: impl Into<String>,
        address: Address,
        signatures: &[&str],
    ) -> Result<Self, DecodeError> {
        let functions = signatures
            .iter()
            .map(|signature| {
                Function::parse(signature)
                    .map(|function| (function.selector(), function))
                    .map_err(|err| DecodeError::InvalidSignature {
                        signature: signature.to_string(),
                        reason: err.to_string(),
                    })
            })
            .collect::<Result<_, _>>()?;

        Ok(Self { protocol: protocol.into(), address, chain_id: None, functions })
    }

    /// Restricts the decoder to one network.
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// The functions this decoder understands.
    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.functions.values()
    }

    fn decode_at(&self, data: &[u8], depth: usize) -> Result<DecodedCall, DecodeError> {
        let selector = data.get(..4).ok_or(DecodeError::MissingSelector)?;
        let selector = Selector::from_slice(selector);
        let function =
            self.functions.get(&selector).ok_or(DecodeError::UnknownSelector(selector.0))?;

        let signature = function.signature();
        let values = function.abi_decode_input(&data[4..], false).map_err(|err| {
            DecodeError::Abi { function: signature.clone(), reason: err.to_string() }
        })?;

        let params = function
            .inputs
            .iter()
            .zip(&values)
            .enumerate()
            .map(|(index, (input, value))| DecodedParam {
                name: if input.name.is_empty() { format!("arg{index}") } else { input.name.clone() },
                ty: input.selector_type().into_owned(),
                value: format_value(value),
            })
            .collect();

        let mut nested = Vec::new();
        if function.name == "multicall" {
            let calls = function
                .inputs
                .iter()
                .zip(&values)
                .filter(|(input, _)| input.ty == "bytes[]")
                .filter_map(|(_, value)| value.as_array())
                .flatten();
            for call in calls {
                let Some(call) = call.as_bytes() else { continue };
                if depth + 1 > MAX_MULTICALL_DEPTH {
                    return Err(DecodeError::TooDeep(MAX_MULTICALL_DEPTH));
                }
                nested.push(self.decode_at(call, depth + 1)?);
            }
        }

        Ok(DecodedCall {
            protocol: self.protocol.clone(),
            function: function.name.clone(),
            signature,
            params,
            nested,
        })
    }
}

impl CallDecoder for AbiDecoder {
    fn protocol(&self) -> &str {
        &self.protocol
    }

    fn address(&self) -> Address {
        self.address
    }

    fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    fn can_decode(&self, to: Address, data: &[u8]) -> bool {
        to == self.address &&
            data.get(..4).is_some_and(|s| self.functions.contains_key(&Selector::from_slice(s)))
    }

    fn decode(&self, data: &[u8]) -> Result<DecodedCall, DecodeError> {
        self.decode_at(data, 0)
    }

    fn supported_functions(&self) -> Vec<String> {
        self.functions.values().map(Function::signature).collect()
    }
}

/// Renders an ABI value for display.
#[allow(unreachable_patterns)]
pub fn format_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Address(address) => address.to_string(),
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Uint(n, _) => n.to_string(),
        DynSolValue::Int(n, _) => n.to_string(),
        DynSolValue::FixedBytes(word, size) => hex::encode_prefixed(&word[..*size]),
        DynSolValue::Bytes(bytes) => hex::encode_prefixed(bytes),
        DynSolValue::String(s) => s.clone(),
        DynSolValue::Function(f) => f.to_string(),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) => {
            format!("[{}]", items.iter().map(format_value).collect::<Vec<_>>().join(", "))
        }
        DynSolValue::Tuple(items) => {
            format!("({})", items.iter().map(format_value).collect::<Vec<_>>().join(", "))
        }
        other => format!("{other:?}"),
    }
}
