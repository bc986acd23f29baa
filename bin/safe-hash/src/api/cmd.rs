use alloy_primitives::{Address, B256, U256};
use clap::Parser;
use safe_hash::{inspect, DecoderRegistry, InspectRequest};
use tracing::{info, warn};

use crate::{
    common::{emit_inspection, CliError, LogArgs, NetworkArgs, Result},
    service::TxServiceClient,
};

/// Fetch a pending transaction from the Safe Transaction Service and inspect it
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Chain and transaction service selection
    #[command(flatten)]
    pub network: NetworkArgs,

    /// Safe address
    #[arg(long)]
    pub address: Address,

    /// Nonce of the transaction to inspect
    #[arg(long)]
    pub nonce: u64,

    /// Pick one of several transactions proposed at the same nonce
    #[arg(long = "safe-tx-hash")]
    pub safe_tx_hash: Option<B256>,

    /// Safe contract version, overrides the version the service reports
    #[arg(long = "version")]
    pub safe_version: Option<String>,

    /// Transaction service API key, sent as a bearer token
    #[arg(long = "api-key", env = "SAFE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Logging configuration
    #[command(flatten)]
    pub log_args: LogArgs,
}

impl Cmd {
    /// Execute the api command
    pub async fn run(&self) -> Result<()> {
        let network = self.network.resolve()?;
        let client = TxServiceClient::new(network.require_service_url()?, self.api_key.clone())?;

        let version = match &self.safe_version {
            Some(version) => version.clone(),
            None => client.safe_info(self.address).await?.version.ok_or_else(|| {
                CliError::InvalidInput(
                    "the transaction service reports no Safe version, pass --version".to_string(),
                )
            })?,
        };

        let record = client.transaction(self.address, self.nonce, self.safe_tx_hash).await?;
        if record.tx.nonce != U256::from(self.nonce) {
            return Err(CliError::InvalidInput(format!(
                "service returned nonce {} for a query on nonce {}",
                record.tx.nonce, self.nonce
            )));
        }
        if record.safe.is_some_and(|safe| safe != self.address) {
            warn!(requested = %self.address, "Service record belongs to another Safe");
        }
        if record.is_executed {
            info!(nonce = self.nonce, "Transaction was already executed");
        }

        let expected = record.safe_tx_hash;
        let mut request =
            InspectRequest::new(network.chain_id, self.address, &version, &record.tx);
        if let Some(expected) = expected {
            request = request.with_expected_hash(expected);
        }
        if let Some(claim) = &record.data_decoded {
            request = request.with_claim(claim);
        }
        let inspection = inspect(&request, &DecoderRegistry::with_known_protocols())?;
        emit_inspection(&inspection, expected, self.json)
    }
}
