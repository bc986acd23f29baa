//! Serde helpers for the loosely typed JSON emitted by the Safe transaction service.
//!
//! Numeric fields arrive either as JSON numbers or as decimal strings, occasionally as
//! `0x`-prefixed hex, and empty calldata arrives as `null`.

use alloy_primitives::{Bytes, U256};
use serde::{de, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    String(String),
}

/// Parses a decimal or `0x`-prefixed hex string into a [`U256`].
pub fn parse_u256(s: &str) -> Result<U256, String> {
    let s = s.trim();
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        U256::from_str_radix(hex, 16)
    } else if s.is_empty() {
        return Ok(U256::ZERO);
    } else {
        U256::from_str_radix(s, 10)
    };
    parsed.map_err(|e| format!("invalid integer \"{s}\": {e}"))
}

/// Deserializes a [`U256`] from a JSON number or a numeric string.
pub fn deserialize_u256<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(U256::from(n)),
        NumberOrString::String(s) => parse_u256(&s).map_err(de::Error::custom),
    }
}

/// Deserializes hex bytes, mapping `null` to empty bytes.
pub fn deserialize_bytes_or_null<'de, D>(deserializer: D) -> Result<Bytes, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Bytes>::deserialize(deserializer)?.unwrap_or_default())
}
