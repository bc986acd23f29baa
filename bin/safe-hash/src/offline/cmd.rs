use std::path::PathBuf;

use alloy_primitives::{Address, B256, U256};
use clap::Parser;
use safe_hash::{
    inspect, serde_helpers::parse_u256, DecodedClaim, DecoderRegistry, InspectRequest, Operation,
    SafeTransaction,
};
use tracing::info;

use crate::{
    common::{emit_inspection, load_hex, load_json, CliError, LogArgs, NetworkArgs, Result},
    service::ServiceTransaction,
};

/// Parse `0`/`1` or `call`/`delegatecall`.
pub fn parse_operation(s: &str) -> std::result::Result<Operation, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "0" | "call" => Ok(Operation::Call),
        "1" | "delegatecall" | "delegate-call" => Ok(Operation::DelegateCall),
        other => Err(format!("invalid operation \"{other}\", expected 0 (call) or 1 (delegatecall)")),
    }
}

/// Inspect a transaction given as flags or as a JSON file
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Chain selection
    #[command(flatten)]
    pub network: NetworkArgs,

    /// Safe address, optional with a --tx-file record that names its Safe
    #[arg(long)]
    pub address: Option<Address>,

    /// Safe contract version
    #[arg(long = "version", default_value = "1.3.0")]
    pub safe_version: String,

    /// Transaction record as returned by the transaction service. '-' reads stdin
    #[arg(long = "tx-file", conflicts_with_all = ["to", "data", "data_file"])]
    pub tx_file: Option<PathBuf>,

    /// Call target
    #[arg(long, required_unless_present = "tx_file")]
    pub to: Option<Address>,

    /// Native value in wei
    #[arg(long, default_value = "0", value_parser = parse_u256)]
    pub value: U256,

    /// Calldata as hex
    #[arg(long)]
    pub data: Option<String>,

    /// File containing hex calldata. '-' reads stdin
    #[arg(long = "data-file", conflicts_with = "data")]
    pub data_file: Option<PathBuf>,

    /// 0 (call) or 1 (delegatecall)
    #[arg(long, default_value = "0", value_parser = parse_operation)]
    pub operation: Operation,

    /// Gas forwarded to the inner call
    #[arg(long = "safe-tx-gas", default_value = "0", value_parser = parse_u256)]
    pub safe_tx_gas: U256,

    /// Gas costs independent of the inner call
    #[arg(long = "base-gas", default_value = "0", value_parser = parse_u256)]
    pub base_gas: U256,

    /// Gas price used for the refund
    #[arg(long = "gas-price", default_value = "0", value_parser = parse_u256)]
    pub gas_price: U256,

    /// Refund token, native currency when omitted
    #[arg(long = "gas-token")]
    pub gas_token: Option<Address>,

    /// Refund receiver, tx.origin when omitted
    #[arg(long = "refund-receiver")]
    pub refund_receiver: Option<Address>,

    /// Safe nonce
    #[arg(long, required_unless_present = "tx_file", value_parser = parse_u256)]
    pub nonce: Option<U256>,

    /// Hash to compare against, e.g. the one shown on the signing device
    #[arg(long = "safe-tx-hash")]
    pub safe_tx_hash: Option<B256>,

    /// JSON file with the decoded data to verify against the calldata
    #[arg(long)]
    pub claim: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Logging configuration
    #[command(flatten)]
    pub log_args: LogArgs,
}

/// A transaction with the annotations that came with it.
#[derive(Debug)]
struct Loaded {
    safe: Option<Address>,
    tx: SafeTransaction,
    expected: Option<B256>,
    claim: Option<DecodedClaim>,
}

impl Cmd {
    fn load(&self) -> Result<Loaded> {
        if let Some(file) = &self.tx_file {
            let record: ServiceTransaction = load_json(file)?;
            return Ok(Loaded {
                safe: record.safe,
                tx: record.tx,
                expected: record.safe_tx_hash,
                claim: record.data_decoded,
            });
        }

        let to = self
            .to
            .ok_or_else(|| CliError::InvalidInput("--to or --tx-file is required".to_string()))?;
        let nonce = self
            .nonce
            .ok_or_else(|| CliError::InvalidInput("--nonce or --tx-file is required".to_string()))?;
        let data =
            load_hex(self.data.as_deref(), self.data_file.as_deref())?.unwrap_or_default();
        let tx = SafeTransaction {
            to,
            value: self.value,
            data,
            operation: self.operation,
            safe_tx_gas: self.safe_tx_gas,
            base_gas: self.base_gas,
            gas_price: self.gas_price,
            gas_token: self.gas_token.unwrap_or_default(),
            refund_receiver: self.refund_receiver.unwrap_or_default(),
            nonce,
        };
        Ok(Loaded { safe: None, tx, expected: None, claim: None })
    }

    /// Execute the offline command
    pub fn run(&self) -> Result<()> {
        let chain_id = self.network.resolve()?.chain_id;
        let loaded = self.load()?;
        let safe = self.address.or(loaded.safe).ok_or_else(|| {
            CliError::InvalidInput("--address is required when the record names no Safe".into())
        })?;
        let claim = match &self.claim {
            Some(file) => Some(load_json::<DecodedClaim>(file)?),
            None => loaded.claim,
        };
        let expected = self.safe_tx_hash.or(loaded.expected);
        info!(%safe, chain_id, version = %self.safe_version, "Inspecting transaction");

        let mut request = InspectRequest::new(chain_id, safe, &self.safe_version, &loaded.tx);
        if let Some(expected) = expected {
            request = request.with_expected_hash(expected);
        }
        if let Some(claim) = &claim {
            request = request.with_claim(claim);
        }
        let inspection = inspect(&request, &DecoderRegistry::with_known_protocols())?;
        emit_inspection(&inspection, expected, self.json)
    }
}
