//! Human-readable and JSON reports.

use std::fmt::Write;

use alloy_primitives::{hex, B256};
use safe_hash::{DecodedCall, Inspection, RiskLevel, VerificationResult};
use serde::Serialize;

use super::{CliError, Result};

/// Print an inspection and fail when the computed hash differs from `expected`.
pub fn emit_inspection(inspection: &Inspection, expected: Option<B256>, json: bool) -> Result<()> {
    if json {
        println!("{}", to_json(inspection)?);
    } else {
        print!("{}", render_inspection(inspection));
    }
    match expected {
        Some(expected) if inspection.hash_matches == Some(false) => Err(CliError::HashMismatch {
            expected,
            computed: inspection.hashes.safe_tx_hash,
        }),
        _ => Ok(()),
    }
}

/// Render an inspection as the text summary printed to the terminal.
pub fn render_inspection(inspection: &Inspection) -> String {
    let mut out = String::new();
    // Writing into a `String` never fails.
    let _ = write_inspection(&mut out, inspection);
    out
}

fn write_inspection(out: &mut String, inspection: &Inspection) -> std::fmt::Result {
    let hashes = &inspection.hashes;
    writeln!(out, "=== Safe Transaction Hashes ===")?;
    writeln!(out, "Safe Version:     {}", inspection.version)?;
    writeln!(out, "Domain Hash:      {}", hashes.domain_hash)?;
    writeln!(out, "Message Hash:     {}", hashes.message_hash)?;
    writeln!(out, "Safe Tx Hash:     {}", hashes.safe_tx_hash)?;
    match inspection.hash_matches {
        Some(true) => writeln!(out, "Expected Hash:    matches")?,
        Some(false) => writeln!(out, "Expected Hash:    MISMATCH, do not sign")?,
        None => {}
    }

    if let Some(decoded) = &inspection.decoded {
        writeln!(out)?;
        writeln!(out, "=== Decoded Call ===")?;
        write_decoded(out, decoded, 0)?;
    }

    if let Some(batch) = &inspection.batch {
        writeln!(out)?;
        writeln!(out, "=== MultiSend Batch ({} calls) ===", batch.len())?;
        for (i, call) in batch.iter().enumerate() {
            writeln!(
                out,
                "#{i:<3} {:<12} to {} value {} data {}",
                call.operation.to_string(),
                call.to,
                call.value,
                abbreviate(&call.data),
            )?;
        }
    }

    if let Some(verification) = &inspection.verification {
        writeln!(out)?;
        writeln!(out, "=== Decoded Data ===")?;
        write_verification(out, verification)?;
    }

    let verdict = &inspection.verdict;
    writeln!(out)?;
    writeln!(out, "=== Security Analysis ===")?;
    writeln!(out, "Overall Risk:     {}", risk_label(verdict.overall_risk))?;
    if verdict.requires_careful_review {
        writeln!(out, "Careful review required before signing")?;
    }
    for warning in verdict.warnings() {
        writeln!(out, "  - {warning}")?;
    }
    Ok(())
}

fn write_decoded(out: &mut String, call: &DecodedCall, indent: usize) -> std::fmt::Result {
    let pad = "  ".repeat(indent);
    writeln!(out, "{pad}{}: {}", call.protocol, call.signature)?;
    for param in &call.params {
        writeln!(out, "{pad}  {} ({}): {}", param.name, param.ty, param.value)?;
    }
    for nested in &call.nested {
        write_decoded(out, nested, indent + 1)?;
    }
    Ok(())
}

fn write_verification(out: &mut String, result: &VerificationResult) -> std::fmt::Result {
    if result.verified {
        writeln!(out, "Status:           verified against calldata")
    } else {
        writeln!(
            out,
            "Status:           NOT VERIFIED: {}",
            result.error.as_deref().unwrap_or("unknown reason")
        )
    }
}

/// Render a standalone verification result.
pub fn render_verification(result: &VerificationResult) -> String {
    let mut out = String::new();
    let _ = write_verification(&mut out, result);
    if let Some(reencoded) = &result.reencoded {
        let _ = writeln!(out, "Re-encoded:       {}", abbreviate(reencoded));
    }
    out
}

fn risk_label(risk: RiskLevel) -> String {
    if risk.is_high_or_critical() {
        risk.to_string().to_uppercase()
    } else {
        risk.to_string()
    }
}

fn abbreviate(data: &[u8]) -> String {
    const SHOWN: usize = 36;
    if data.len() <= SHOWN {
        hex::encode_prefixed(data)
    } else {
        format!("{}… ({} bytes)", hex::encode_prefixed(&data[..SHOWN]), data.len())
    }
}

/// Pretty-print any report as JSON.
pub fn to_json<T: Serialize>(report: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
