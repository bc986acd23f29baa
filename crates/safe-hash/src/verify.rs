//! Cross-checking of decoded calldata annotations.
//!
//! Wallet backends annotate raw calldata with a decoded form (`dataDecoded` in the Safe
//! transaction service). A compromised backend can show a harmless decoding for harmful bytes.
//! The verifier rebuilds the calldata from the decoded form and requires a byte-for-byte match
//! with what is actually signed.

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{keccak256, Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::{
    constants::MAX_BATCH_DEPTH,
    decode_batch,
    serde_helpers::{deserialize_bytes_or_null, deserialize_u256},
    Operation,
};

/// A decoded form of some calldata, as supplied by a third party.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedClaim {
    /// Function name, e.g. `transfer`
    pub method: String,
    /// Arguments in declaration order
    #[serde(default)]
    pub parameters: Vec<ClaimParameter>,
}

/// One argument of a [`DecodedClaim`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimParameter {
    /// Argument name
    pub name: String,
    /// Solidity type, e.g. `uint256` or `address[]`
    #[serde(rename = "type")]
    pub ty: String,
    /// String, bool, number or (nested) array
    pub value: Value,
    /// For `multiSend` batches: the decoded sub-calls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_decoded: Option<Value>,
}

/// A decoded `multiSend` sub-call as listed in `valueDecoded`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimSubCall {
    /// Call or delegate call
    pub operation: Operation,
    /// Call target
    pub to: Address,
    /// Native value sent along
    #[serde(deserialize_with = "deserialize_u256")]
    pub value: U256,
    /// Calldata
    #[serde(default, deserialize_with = "deserialize_bytes_or_null")]
    pub data: Bytes,
    /// Decoded calldata, if the backend could decode it
    #[serde(default)]
    pub data_decoded: Option<DecodedClaim>,
}

/// Outcome of a verification. Mismatches are reported here, never as errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    /// The claim reproduces the raw calldata exactly
    pub verified: bool,
    /// Why verification failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Calldata rebuilt from the claim, if it could be encoded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reencoded: Option<Bytes>,
}

impl VerificationResult {
    fn verified(reencoded: Bytes) -> Self {
        Self { verified: true, error: None, reencoded: Some(reencoded) }
    }

    fn failed(error: impl Into<String>, reencoded: Option<Bytes>) -> Self {
        Self { verified: false, error: Some(error.into()), reencoded }
    }
}

/// Verifies that `claim` re-encodes to exactly `raw`.
pub fn verify_decoded_claim(raw: &[u8], claim: &DecodedClaim) -> VerificationResult {
    let Some(raw_selector) = raw.get(..4) else {
        return VerificationResult::failed("missing function selector", None);
    };

    let name = method_name(&claim.method);
    let types = match claim
        .parameters
        .iter()
        .map(|param| {
            DynSolType::parse(&param.ty)
                .map_err(|err| format!("unsupported type {:?} of {:?}: {err}", param.ty, param.name))
        })
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(types) => types,
        Err(err) => return VerificationResult::failed(err, None),
    };

    let signature = format!(
        "{name}({})",
        types.iter().map(|ty| ty.sol_type_name()).collect::<Vec<_>>().join(",")
    );
    let hash = keccak256(signature.as_bytes());
    let selector = &hash[..4];
    trace!(%signature, "Rebuilding calldata from claim");

    if selector != raw_selector {
        return VerificationResult::failed(
            format!(
                "selector mismatch: {signature} has selector 0x{}, calldata starts with 0x{}",
                alloy_primitives::hex::encode(selector),
                alloy_primitives::hex::encode(raw_selector)
            ),
            None,
        );
    }

    let values = match claim
        .parameters
        .iter()
        .zip(&types)
        .map(|(param, ty)| {
            coerce_json(ty, &param.value)
                .map_err(|err| format!("cannot encode {:?} as {}: {err}", param.name, param.ty))
        })
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(values) => values,
        Err(err) => return VerificationResult::failed(err, None),
    };

    let mut reencoded = selector.to_vec();
    if !values.is_empty() {
        reencoded.extend(DynSolValue::Tuple(values).abi_encode_params());
    }
    let reencoded = Bytes::from(reencoded);

    if reencoded[..] == raw[..] {
        return VerificationResult::verified(reencoded);
    }

    let at = reencoded
        .iter()
        .zip(raw)
        .position(|(a, b)| a != b)
        .unwrap_or_else(|| reencoded.len().min(raw.len()));
    debug!(%signature, at, raw_len = raw.len(), reencoded_len = reencoded.len(), "Claim mismatch");
    VerificationResult::failed(
        format!(
            "re-encoded calldata does not match the raw calldata (argument mismatch at byte {at})"
        ),
        Some(reencoded),
    )
}

/// Like [`verify_decoded_claim`], and additionally verifies every decoded sub-call of a
/// `multiSend` claim against the batch contained in `raw`.
pub fn verify_decoded_claim_recursive(raw: &[u8], claim: &DecodedClaim) -> VerificationResult {
    verify_at_depth(raw, claim, 0)
}

fn verify_at_depth(raw: &[u8], claim: &DecodedClaim, depth: usize) -> VerificationResult {
    let result = verify_decoded_claim(raw, claim);
    if !result.verified {
        return result;
    }

    let Some(sub_calls) = claimed_sub_calls(claim) else { return result };
    let sub_calls = match sub_calls {
        Ok(sub_calls) => sub_calls,
        Err(err) => {
            return VerificationResult::failed(
                format!("malformed valueDecoded: {err}"),
                result.reencoded,
            )
        }
    };

    if depth >= MAX_BATCH_DEPTH {
        return VerificationResult::failed(
            format!("batch nested deeper than {MAX_BATCH_DEPTH} levels"),
            result.reencoded,
        );
    }

    let Some(actual) = decode_batch(raw) else {
        return VerificationResult::failed(
            "claim lists batched calls but the calldata is not a well-formed batch",
            result.reencoded,
        );
    };
    if actual.len() != sub_calls.len() {
        return VerificationResult::failed(
            format!(
                "claim lists {} batched calls, calldata contains {}",
                sub_calls.len(),
                actual.len()
            ),
            result.reencoded,
        );
    }

    for (index, (claimed, actual)) in sub_calls.iter().zip(&actual).enumerate() {
        let mismatch = if claimed.operation != actual.operation {
            Some("operation")
        } else if claimed.to != actual.to {
            Some("target")
        } else if claimed.value != actual.value {
            Some("value")
        } else if claimed.data != actual.data {
            Some("data")
        } else {
            None
        };
        if let Some(field) = mismatch {
            return VerificationResult::failed(
                format!("batched call {index}: claimed {field} does not match the calldata"),
                result.reencoded,
            );
        }

        if let Some(decoded) = &claimed.data_decoded {
            let nested = verify_at_depth(&actual.data, decoded, depth + 1);
            if !nested.verified {
                let error = nested.error.unwrap_or_default();
                return VerificationResult::failed(
                    format!("batched call {index}: {error}"),
                    result.reencoded,
                );
            }
        }
    }

    result
}

fn claimed_sub_calls(claim: &DecodedClaim) -> Option<Result<Vec<ClaimSubCall>, serde_json::Error>> {
    if method_name(&claim.method) != "multiSend" {
        return None;
    }
    let decoded = claim.parameters.first()?.value_decoded.as_ref()?;
    Some(serde_json::from_value(decoded.clone()))
}

/// Accepts both `transfer` and `transfer(address,uint256)`.
fn method_name(method: &str) -> &str {
    let method = method.trim();
    method.split_once('(').map_or(method, |(name, _)| name)
}

/// Converts a JSON value into a strictly typed ABI value.
fn coerce_json(ty: &DynSolType, value: &Value) -> Result<DynSolValue, String> {
    match (ty, value) {
        (DynSolType::Array(inner), Value::Array(items)) => {
            items.iter().map(|item| coerce_json(inner, item)).collect::<Result<_, _>>().map(DynSolValue::Array)
        }
        (DynSolType::FixedArray(inner, len), Value::Array(items)) => {
            if items.len() != *len {
                return Err(format!("expected {len} elements, got {}", items.len()));
            }
            items
                .iter()
                .map(|item| coerce_json(inner, item))
                .collect::<Result<_, _>>()
                .map(DynSolValue::FixedArray)
        }
        (DynSolType::Array(_) | DynSolType::FixedArray(..), Value::String(s))
            if s.trim_start().starts_with('[') =>
        {
            let parsed: Value = serde_json::from_str(s).map_err(|err| err.to_string())?;
            coerce_json(ty, &parsed)
        }
        (DynSolType::Bool, Value::Bool(b)) => Ok(DynSolValue::Bool(*b)),
        (DynSolType::Bool, Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(DynSolValue::Bool(true)),
            "false" => Ok(DynSolValue::Bool(false)),
            other => Err(format!("{other:?} is not a boolean")),
        },
        (DynSolType::Address, Value::String(s)) => {
            s.trim().parse::<Address>().map(DynSolValue::Address).map_err(|err| err.to_string())
        }
        (_, Value::Number(n)) => ty.coerce_str(&n.to_string()).map_err(|err| err.to_string()),
        (_, Value::String(s)) => ty.coerce_str(s).map_err(|err| err.to_string()),
        (_, other) => Err(format!("unexpected JSON value {other}")),
    }
}
