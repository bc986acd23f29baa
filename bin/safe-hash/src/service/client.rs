use std::time::Duration;

use alloy_primitives::{Address, B256};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::{Page, SafeInfo, ServiceTransaction};

/// Per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors that can occur when talking to the transaction service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Transport failure or timeout
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("Service returned {status}: {body}")]
    Status {
        /// HTTP status
        status: StatusCode,
        /// Response body, for diagnostics
        body: String,
    },

    /// The response body is not the expected JSON
    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        /// Request URL
        url: String,
        /// JSON error
        source: serde_json::Error,
    },

    /// No transaction is queued at the nonce
    #[error("No transaction found with nonce {nonce}")]
    NotFound {
        /// Requested nonce
        nonce: u64,
    },

    /// Several transactions share the nonce and none was selected
    #[error(
        "{} transactions share nonce {nonce}, select one with --safe-tx-hash: {}",
        hashes.len(),
        hashes.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    )]
    AmbiguousNonce {
        /// Requested nonce
        nonce: u64,
        /// `safeTxHash` of every candidate
        hashes: Vec<B256>,
    },

    /// None of the transactions at the nonce has the requested hash
    #[error("No transaction with nonce {nonce} has safeTxHash {wanted}")]
    NoMatchingHash {
        /// Requested nonce
        nonce: u64,
        /// Requested hash
        wanted: B256,
    },
}

/// Safe Transaction Service client.
#[derive(Debug, Clone)]
pub struct TxServiceClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl TxServiceClient {
    /// Create a client for the service at `base_url`, e.g.
    /// `https://safe-transaction-mainnet.safe.global`.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(Duration::from_secs(5))
            .user_agent(concat!("safe-hash/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url, api_key })
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(&self, url: String) -> Result<T, ServiceError> {
        debug!(%url, "GET");
        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ServiceError::Status { status, body });
        }
        serde_json::from_str(&body).map_err(|source| ServiceError::Decode { url, source })
    }

    /// Fetch the Safe's metadata, including its contract version.
    pub async fn safe_info(&self, safe: Address) -> Result<SafeInfo, ServiceError> {
        self.get(format!("{}/api/v1/safes/{safe}/", self.base_url)).await
    }

    /// Fetch every multisig transaction proposed at `nonce`.
    pub async fn transactions_by_nonce(
        &self,
        safe: Address,
        nonce: u64,
    ) -> Result<Vec<ServiceTransaction>, ServiceError> {
        let url =
            format!("{}/api/v1/safes/{safe}/multisig-transactions/?nonce={nonce}", self.base_url);
        let page: Page<ServiceTransaction> = self.get(url).await?;
        info!(count = page.count, nonce, "Fetched transactions");
        Ok(page.results)
    }

    /// Fetch the transactions at `nonce` and pick one with [`select_transaction`].
    pub async fn transaction(
        &self,
        safe: Address,
        nonce: u64,
        wanted: Option<B256>,
    ) -> Result<ServiceTransaction, ServiceError> {
        select_transaction(self.transactions_by_nonce(safe, nonce).await?, nonce, wanted)
    }
}

/// Picks the transaction to inspect among those sharing a nonce.
///
/// With `wanted` set, the candidate with that `safeTxHash` is returned. Without it, exactly one
/// candidate must exist. Several candidates are never resolved by API order.
pub fn select_transaction(
    mut candidates: Vec<ServiceTransaction>,
    nonce: u64,
    wanted: Option<B256>,
) -> Result<ServiceTransaction, ServiceError> {
    match (wanted, candidates.len()) {
        (_, 0) => Err(ServiceError::NotFound { nonce }),
        (Some(wanted), _) => candidates
            .into_iter()
            .find(|candidate| candidate.safe_tx_hash == Some(wanted))
            .ok_or(ServiceError::NoMatchingHash { nonce, wanted }),
        (None, 1) => Ok(candidates.swap_remove(0)),
        (None, _) => Err(ServiceError::AmbiguousNonce {
            nonce,
            hashes: candidates.iter().filter_map(|candidate| candidate.safe_tx_hash).collect(),
        }),
    }
}
