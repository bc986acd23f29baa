use alloy_primitives::{Address, B256};
use safe_hash::{DecodedClaim, SafeTransaction};
use serde::Deserialize;

/// `GET /api/v1/safes/{address}/`, only the fields the inspection needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeInfo {
    /// Safe address
    pub address: Address,
    /// Nonce of the next transaction
    #[serde(default)]
    pub nonce: Option<u64>,
    /// Signature threshold
    #[serde(default)]
    pub threshold: Option<u64>,
    /// Contract version, missing for unknown master copies
    #[serde(default)]
    pub version: Option<String>,
}

/// One entry of `GET /api/v1/safes/{address}/multisig-transactions/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTransaction {
    /// Safe the transaction belongs to
    #[serde(default)]
    pub safe: Option<Address>,
    /// The signed fields
    #[serde(flatten)]
    pub tx: SafeTransaction,
    /// Hash the service computed
    #[serde(default)]
    pub safe_tx_hash: Option<B256>,
    /// The service's decoding of `data`
    #[serde(default)]
    pub data_decoded: Option<DecodedClaim>,
    /// Whether the transaction was already executed
    #[serde(default)]
    pub is_executed: bool,
}

/// Paginated list response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Page<T> {
    /// Total number of results
    pub count: u64,
    /// Results on this page
    pub results: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;

    #[test]
    fn test_deserialize_multisig_page() {
        let page: Page<ServiceTransaction> = serde_json::from_str(
            r#"{
                "count": 1,
                "next": null,
                "previous": null,
                "results": [{
                    "safe": "0xf65475e74C1Ed6d004d5240b06E3088724dFDA5d",
                    "to": "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
                    "value": "0",
                    "data": "0xa9059cbb000000000000000000000000111111111111111111111111111111111111111100000000000000000000000000000000000000000000000000000000000f4240",
                    "operation": 0,
                    "gasToken": "0x0000000000000000000000000000000000000000",
                    "safeTxGas": 0,
                    "baseGas": 0,
                    "gasPrice": "0",
                    "refundReceiver": "0x0000000000000000000000000000000000000000",
                    "nonce": 7,
                    "safeTxHash": "0x79fc2c981307e1ad129d9845aff183767ff2df81bf6e09186f1a4269d3013bd7",
                    "isExecuted": false,
                    "dataDecoded": {
                        "method": "transfer",
                        "parameters": [
                            { "name": "to", "type": "address", "value": "0x1111111111111111111111111111111111111111" },
                            { "name": "value", "type": "uint256", "value": "1000000" }
                        ]
                    },
                    "confirmations": []
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(page.count, 1);
        let record = &page.results[0];
        assert_eq!(record.tx.nonce, U256::from(7));
        assert_eq!(record.tx.data.len(), 68);
        assert!(record.safe_tx_hash.is_some());
        assert_eq!(record.data_decoded.as_ref().unwrap().method, "transfer");
        assert!(!record.is_executed);
    }

    #[test]
    fn test_deserialize_safe_info() {
        let info: SafeInfo = serde_json::from_str(
            r#"{
                "address": "0xf65475e74C1Ed6d004d5240b06E3088724dFDA5d",
                "nonce": 8,
                "threshold": 2,
                "owners": [],
                "version": "1.3.0+L2"
            }"#,
        )
        .unwrap();
        assert_eq!(info.version.as_deref(), Some("1.3.0+L2"));
        assert_eq!(info.threshold, Some(2));
    }
}
