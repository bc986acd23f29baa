use std::path::PathBuf;

use clap::Parser;
use safe_hash::{verify_decoded_claim_recursive, DecodedClaim};

use crate::common::{
    load_hex, load_json, render_verification, to_json, CliError, LogArgs, Result,
};

/// Check decoded calldata annotations against the raw calldata
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Raw calldata as hex
    #[arg(long, required_unless_present = "data_file")]
    pub data: Option<String>,

    /// File containing hex calldata. '-' reads stdin
    #[arg(long = "data-file", conflicts_with = "data")]
    pub data_file: Option<PathBuf>,

    /// JSON file with the decoded data, in the transaction service's `dataDecoded` shape
    #[arg(long)]
    pub claim: PathBuf,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Logging configuration
    #[command(flatten)]
    pub log_args: LogArgs,
}

impl Cmd {
    /// Execute the verify-data command
    pub fn run(&self) -> Result<()> {
        let data = load_hex(self.data.as_deref(), self.data_file.as_deref())?.ok_or_else(|| {
            CliError::InvalidInput("--data or --data-file is required".to_string())
        })?;
        let claim: DecodedClaim = load_json(&self.claim)?;
        let result = verify_decoded_claim_recursive(&data, &claim);

        if self.json {
            println!("{}", to_json(&result)?);
        } else {
            print!("{}", render_verification(&result));
        }
        if result.verified {
            Ok(())
        } else {
            Err(CliError::Unverified(result.error.unwrap_or_default()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::hex;
    use safe_hash::test_utils::{transfer_claim, usdc_transfer};
    use std::io::Write;

    fn claim_file(claim: &DecodedClaim) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string(claim).unwrap()).unwrap();
        file
    }

    fn verify_cmd(data: &[u8], claim: &tempfile::NamedTempFile) -> Cmd {
        Cmd {
            data: Some(hex::encode_prefixed(data)),
            data_file: None,
            claim: claim.path().to_path_buf(),
            json: false,
            log_args: LogArgs::default(),
        }
    }

    #[test]
    fn test_matching_claim() {
        let claim = claim_file(&transfer_claim("1000000"));
        verify_cmd(&usdc_transfer(1_000_000), &claim).run().unwrap();
    }

    #[test]
    fn test_forged_amount() {
        let claim = claim_file(&transfer_claim("1"));
        let err = verify_cmd(&usdc_transfer(1_000_000), &claim).run().unwrap_err();
        assert!(matches!(err, CliError::Unverified(ref reason) if reason.contains("does not match")));
    }

    #[test]
    fn test_data_file() {
        let claim = claim_file(&transfer_claim("1000000"));
        let mut data = tempfile::NamedTempFile::new().unwrap();
        writeln!(data, "{}", hex::encode(usdc_transfer(1_000_000))).unwrap();
        let cmd = Cmd {
            data: None,
            data_file: Some(data.path().to_path_buf()),
            json: true,
            ..verify_cmd(&[], &claim)
        };
        cmd.run().unwrap();
    }

    #[test]
    fn test_requires_data() {
        assert!(Cmd::try_parse_from(["verify-data", "--claim", "claim.json"]).is_err());
    }
}
