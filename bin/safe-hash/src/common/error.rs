use std::path::PathBuf;

use alloy_primitives::{hex::FromHexError, B256};
use safe_hash::SafeHashError;

use crate::service::ServiceError;

/// Error types for the safe-hash commands
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Hash calculation failed, nothing may be signed
    #[error("Hash calculation failed: {0}")]
    Hash(#[from] SafeHashError),

    /// Safe Transaction Service error
    #[error("Transaction service error: {0}")]
    Service(#[from] ServiceError),

    /// Failed to read file or stdin
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to read a named input file
    #[error("Failed to load {}: {source}", file.display())]
    InputLoad {
        /// The file that failed to load
        file: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Failed to parse a named JSON input file
    #[error("Failed to parse {}: {source}", file.display())]
    JsonParse {
        /// The file that failed to parse
        file: PathBuf,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid hex string
    #[error("Invalid hex string: {0}")]
    InvalidHex(#[from] FromHexError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Network name not in the network table
    #[error("Unknown network \"{0}\", run `safe-hash networks` for the supported ones")]
    UnknownNetwork(String),

    /// The computed Safe transaction hash differs from the expected one
    #[error("Safe transaction hash mismatch: expected {expected}, computed {computed}")]
    HashMismatch {
        /// Hash reported by the service or given on the command line
        expected: B256,
        /// Hash recomputed locally
        computed: B256,
    },

    /// Decoded data does not describe the raw calldata
    #[error("Decoded data does not match the calldata: {0}")]
    Unverified(String),
}

/// Result type for the safe-hash commands
pub type Result<T> = std::result::Result<T, CliError>;
