//! `MultiSend` batches built and taken apart through the public API.

use alloy_primitives::{Bytes, U256};
use alloy_sol_types::SolCall;
use rstest::rstest;
use safe_hash::{
    analyze_security, decode_batch, decode_packed, encode_batch, encode_packed,
    interfaces::IMultiSend::multiSendCall,
    is_batch,
    test_utils::{
        delegate_sub_call, nest_in_batches, sub_call, usdc_transfer, MULTI_SEND_CALL_ONLY, SAFE,
        USDC,
    },
    try_decode_batch, MultiSendError, Operation, RiskLevel, SafeTransaction, SubCall,
};

#[test]
fn test_round_trip_with_empty_payloads() {
    let calls = vec![
        sub_call(USDC, Bytes::new()),
        SubCall { value: U256::MAX, ..sub_call(SAFE, usdc_transfer(1)) },
        delegate_sub_call(SAFE, Bytes::new()),
    ];
    assert_eq!(decode_packed(&encode_packed(&calls)), Ok(calls.clone()));
    assert_eq!(decode_batch(&encode_batch(&calls)), Some(calls));
}

#[test]
fn test_nested_batches_decode_one_level_at_a_time() {
    let inner = encode_batch(&[sub_call(USDC, usdc_transfer(1))]);
    let outer = nest_in_batches(inner.clone(), 1);

    let level_one = decode_batch(&outer).unwrap();
    assert_eq!(level_one.len(), 1);
    assert!(is_batch(&level_one[0].data));
    assert_eq!(level_one[0].data, inner);
}

#[test]
fn test_plain_calldata_is_not_a_batch() {
    let transfer = usdc_transfer(1);
    assert!(!is_batch(&transfer));
    assert_eq!(decode_batch(&transfer), None);
    assert_eq!(try_decode_batch(&transfer), Err(MultiSendError::NotMultiSend));
}

fn truncated_record() -> Bytes {
    let packed = encode_packed(&[sub_call(USDC, usdc_transfer(1))]);
    packed[..packed.len() - 3].to_vec().into()
}

fn bad_operation_record() -> Bytes {
    let mut packed = encode_packed(&[sub_call(USDC, usdc_transfer(1))]).to_vec();
    packed[0] = 2;
    packed.into()
}

#[rstest]
#[case::truncated(truncated_record())]
#[case::bad_operation(bad_operation_record())]
fn test_malformed_records_in_valid_wrapper_are_not_a_batch(#[case] transactions: Bytes) {
    let data: Bytes = multiSendCall { transactions }.abi_encode().into();
    assert!(matches!(
        try_decode_batch(&data),
        Err(MultiSendError::MalformedBinary { .. } | MultiSendError::InvalidOperation { code: 2, .. })
    ));
    assert_eq!(decode_batch(&data), None);
    assert!(is_batch(&data));

    let tx = SafeTransaction {
        to: MULTI_SEND_CALL_ONLY,
        data,
        operation: Operation::DelegateCall,
        ..Default::default()
    };
    let verdict = analyze_security(&tx);
    assert!(verdict.delegate_call.is_trusted);
    assert!(verdict.delegate_call.nested.is_empty());
    assert!(!verdict.owners.modifies_owners);
    assert_eq!(verdict.overall_risk, RiskLevel::None);
}
