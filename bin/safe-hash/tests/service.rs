//! The transaction service client and the `api` command against a mock service.

use alloy_primitives::{b256, hex, B256};
use safe_hash::test_utils::{usdc_transfer, SAFE, USDC};
use safe_hash_cli::{
    api,
    common::{CliError, LogArgs, NetworkArgs},
    service::{ServiceError, TxServiceClient},
};
use serde_json::{json, Value};
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

const SAFE_TX_HASH: B256 =
    b256!("0x79fc2c981307e1ad129d9845aff183767ff2df81bf6e09186f1a4269d3013bd7");

fn record(amount: u64, safe_tx_hash: B256) -> Value {
    json!({
        "safe": SAFE,
        "to": USDC,
        "value": "0",
        "data": hex::encode_prefixed(usdc_transfer(amount)),
        "operation": 0,
        "gasToken": "0x0000000000000000000000000000000000000000",
        "safeTxGas": 0,
        "baseGas": 0,
        "gasPrice": "0",
        "refundReceiver": "0x0000000000000000000000000000000000000000",
        "nonce": 7,
        "safeTxHash": safe_tx_hash,
        "isExecuted": false,
        "dataDecoded": {
            "method": "transfer",
            "parameters": [
                { "name": "to", "type": "address", "value": "0x1111111111111111111111111111111111111111" },
                { "name": "value", "type": "uint256", "value": amount.to_string() }
            ]
        }
    })
}

async fn mock_service(results: Vec<Value>) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/safes/{SAFE}/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "address": SAFE,
            "nonce": 7,
            "threshold": 1,
            "version": "1.3.0+L2"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/safes/{SAFE}/multisig-transactions/")))
        .and(query_param("nonce", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": results.len(),
            "next": null,
            "previous": null,
            "results": results
        })))
        .mount(&server)
        .await;
    server
}

fn api_cmd(server: &MockServer, safe_tx_hash: Option<B256>) -> api::Cmd {
    api::Cmd {
        network: NetworkArgs {
            network: None,
            chain_id: Some(1),
            api_url: Some(server.uri()),
        },
        address: SAFE,
        nonce: 7,
        safe_tx_hash,
        safe_version: None,
        api_key: None,
        json: true,
        log_args: LogArgs::default(),
    }
}

#[tokio::test]
async fn test_safe_info_and_transactions() {
    let server = mock_service(vec![record(1_000_000, SAFE_TX_HASH)]).await;
    let client = TxServiceClient::new(server.uri(), None).unwrap();

    let info = client.safe_info(SAFE).await.unwrap();
    assert_eq!(info.version.as_deref(), Some("1.3.0+L2"));

    let record = client.transaction(SAFE, 7, None).await.unwrap();
    assert_eq!(record.safe_tx_hash, Some(SAFE_TX_HASH));
    assert_eq!(record.tx.data, usdc_transfer(1_000_000));
}

#[tokio::test]
async fn test_api_key_is_sent_as_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/safes/{SAFE}/")))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "address": SAFE })))
        .expect(1)
        .mount(&server)
        .await;

    let client = TxServiceClient::new(format!("{}/", server.uri()), Some("secret".into())).unwrap();
    assert_eq!(client.safe_info(SAFE).await.unwrap().version, None);
}

#[tokio::test]
async fn test_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("{\"detail\":\"Not found.\"}"))
        .mount(&server)
        .await;

    let client = TxServiceClient::new(server.uri(), None).unwrap();
    match client.safe_info(SAFE).await.unwrap_err() {
        ServiceError::Status { status, body } => {
            assert_eq!(status.as_u16(), 404);
            assert!(body.contains("Not found"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = TxServiceClient::new(server.uri(), None).unwrap();
    assert!(matches!(client.safe_info(SAFE).await, Err(ServiceError::Decode { .. })));
}

#[tokio::test]
async fn test_api_command_verifies_service_hash() {
    let server = mock_service(vec![record(1_000_000, SAFE_TX_HASH)]).await;
    api_cmd(&server, None).run().await.unwrap();
}

#[tokio::test]
async fn test_api_command_rejects_wrong_service_hash() {
    let wrong = B256::repeat_byte(0x42);
    let server = mock_service(vec![record(1_000_000, wrong)]).await;

    match api_cmd(&server, None).run().await.unwrap_err() {
        CliError::HashMismatch { expected, computed } => {
            assert_eq!(expected, wrong);
            assert_eq!(computed, SAFE_TX_HASH);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn test_api_command_ambiguous_nonce() {
    let other = B256::repeat_byte(0x42);
    let server =
        mock_service(vec![record(1_000_000, SAFE_TX_HASH), record(5, other)]).await;

    let err = api_cmd(&server, None).run().await.unwrap_err();
    assert!(matches!(
        err,
        CliError::Service(ServiceError::AmbiguousNonce { nonce: 7, ref hashes }) if hashes.len() == 2
    ));

    api_cmd(&server, Some(SAFE_TX_HASH)).run().await.unwrap();
}
