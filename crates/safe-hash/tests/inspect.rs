//! The end-to-end inspection pipeline.

use alloy_primitives::{b256, U256};
use safe_hash::{
    inspect,
    test_utils::{batch_tx, sub_call, transfer_claim, usdc_transfer, usdc_transfer_tx, SAFE, USDC},
    DecoderRegistry, InspectRequest, RiskLevel, SafeTransaction,
};

#[test]
fn test_known_token_transfer() {
    let tx = usdc_transfer_tx();
    let claim = transfer_claim("1000000");
    let registry = DecoderRegistry::with_known_protocols();
    let request = InspectRequest::new(1, SAFE, "1.3.0", &tx)
        .with_expected_hash(b256!(
            "0x79fc2c981307e1ad129d9845aff183767ff2df81bf6e09186f1a4269d3013bd7"
        ))
        .with_claim(&claim);

    let inspection = inspect(&request, &registry).unwrap();
    assert_eq!(inspection.hash_matches, Some(true));
    assert!(inspection.verification.as_ref().unwrap().verified);
    assert_eq!(inspection.verdict.overall_risk, RiskLevel::None);
    let decoded = inspection.decoded.as_ref().unwrap();
    assert_eq!(decoded.protocol, "USDC");
    assert_eq!(decoded.function, "transfer");
    assert!(inspection.batch.is_none());
}

#[test]
fn test_expected_hash_from_computation() {
    let tx = usdc_transfer_tx();
    let registry = DecoderRegistry::new();
    let computed = inspect(&InspectRequest::new(1, SAFE, "1.4.1", &tx), &registry).unwrap();

    let request =
        InspectRequest::new(1, SAFE, "1.4.1", &tx).with_expected_hash(computed.hashes.safe_tx_hash);
    let inspection = inspect(&request, &registry).unwrap();
    assert_eq!(inspection.hash_matches, Some(true));
    assert!(inspection.is_clean());
}

#[test]
fn test_forged_claim_is_not_clean() {
    let tx = usdc_transfer_tx();
    let claim = transfer_claim("1");
    let registry = DecoderRegistry::new();
    let request = InspectRequest::new(1, SAFE, "1.3.0", &tx).with_claim(&claim);

    let inspection = inspect(&request, &registry).unwrap();
    assert!(!inspection.verification.as_ref().unwrap().verified);
    assert!(!inspection.is_clean());
}

#[test]
fn test_batch_is_unwound() {
    let tx = batch_tx(&[sub_call(USDC, usdc_transfer(1)), sub_call(USDC, usdc_transfer(2))]);
    let registry = DecoderRegistry::with_known_protocols();
    let inspection = inspect(&InspectRequest::new(10, SAFE, "1.4.1", &tx), &registry).unwrap();

    let batch = inspection.batch.as_ref().unwrap();
    assert_eq!(batch.len(), 2);
    assert_eq!(batch[1].data, usdc_transfer(2));
    assert_eq!(inspection.decoded.as_ref().unwrap().function, "multiSend");
    assert!(inspection.verdict.delegate_call.is_trusted);
    assert!(inspection.is_clean());
}

#[test]
fn test_inspection_json_shape() {
    let tx = SafeTransaction { value: U256::from(1), ..usdc_transfer_tx() };
    let registry = DecoderRegistry::new();
    let inspection = inspect(&InspectRequest::new(1, SAFE, "1.3.0", &tx), &registry).unwrap();

    let json = serde_json::to_value(&inspection).unwrap();
    assert_eq!(json["version"], "1.3.0");
    assert!(json["hashes"]["safeTxHash"].as_str().unwrap().starts_with("0x"));
    assert!(json.get("hashMatches").is_none());
    assert!(json.get("verification").is_none());
    assert_eq!(json["verdict"]["overallRisk"], "none");
}
