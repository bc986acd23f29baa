//! The full inspection pipeline for one transaction.

use alloy_primitives::{Address, B256};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    analyze_security, calculate_hashes, clean_version, decode_batch, verify_decoded_claim_recursive,
    DecodedCall, DecodedClaim, DecoderRegistry, Result, RiskVerdict, SafeHashes, SafeTransaction,
    SubCall, VerificationResult,
};

/// Input of [`inspect`].
#[derive(Debug, Clone, Copy)]
pub struct InspectRequest<'a> {
    /// Network the Safe lives on
    pub chain_id: u64,
    /// The Safe
    pub safe: Address,
    /// Version of the Safe singleton, as reported by the Safe or a backend
    pub version: &'a str,
    /// The transaction to be signed
    pub tx: &'a SafeTransaction,
    /// Hash reported by a third party, e.g. the transaction service or the signing UI
    pub expected_hash: Option<B256>,
    /// Decoded calldata reported by a third party
    pub claim: Option<&'a DecodedClaim>,
}

impl<'a> InspectRequest<'a> {
    /// A request without third-party data to compare against.
    pub const fn new(chain_id: u64, safe: Address, version: &'a str, tx: &'a SafeTransaction) -> Self {
        Self { chain_id, safe, version, tx, expected_hash: None, claim: None }
    }

    /// Compares the computed hash with `expected`.
    pub const fn with_expected_hash(mut self, expected: B256) -> Self {
        self.expected_hash = Some(expected);
        self
    }

    /// Verifies `claim` against the calldata.
    pub const fn with_claim(mut self, claim: &'a DecodedClaim) -> Self {
        self.claim = Some(claim);
        self
    }
}

/// Everything known about a transaction after inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inspection {
    /// The Safe version the hashes were computed for, without build metadata
    pub version: String,
    /// Computed hashes
    pub hashes: SafeHashes,
    /// Whether the computed hash equals the expected one, if one was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash_matches: Option<bool>,
    /// Risk analysis
    pub verdict: RiskVerdict,
    /// Sub-calls, if the calldata is a `MultiSend` batch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<Vec<SubCall>>,
    /// Protocol-specific decoding of the calldata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoded: Option<DecodedCall>,
    /// Verification of the third-party decoding, if one was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification: Option<VerificationResult>,
}

impl Inspection {
    /// No hash mismatch, no failed verification, nothing that needs a careful review.
    pub fn is_clean(&self) -> bool {
        self.hash_matches != Some(false) &&
            self.verification.as_ref().is_none_or(|v| v.verified) &&
            !self.verdict.requires_careful_review
    }
}

/// Runs the hash calculator, the analyzer, the batch decoder, the claim verifier and the decoder
/// registry on one transaction.
///
/// Only an unsupported version is an error. Every other finding is part of the [`Inspection`].
pub fn inspect(request: &InspectRequest<'_>, registry: &DecoderRegistry) -> Result<Inspection> {
    let tx = request.tx;
    let hashes = calculate_hashes(request.chain_id, request.safe, tx, request.version)?;
    info!(safe_tx_hash = %hashes.safe_tx_hash, "Computed Safe transaction hash");

    let hash_matches = request.expected_hash.map(|expected| {
        let matches = hashes.matches(&expected);
        if !matches {
            warn!(%expected, computed = %hashes.safe_tx_hash, "Safe transaction hash mismatch");
        }
        matches
    });

    let verdict = analyze_security(tx);
    let batch = decode_batch(&tx.data);
    if let Some(batch) = &batch {
        debug!(calls = batch.len(), "Calldata is a MultiSend batch");
    }

    let decoded = registry.decode(tx.to, &tx.data, Some(request.chain_id));
    let verification = request.claim.map(|claim| verify_decoded_claim_recursive(&tx.data, claim));

    Ok(Inspection {
        version: clean_version(request.version).to_string(),
        hashes,
        hash_matches,
        verdict,
        batch,
        decoded,
        verification,
    })
}
