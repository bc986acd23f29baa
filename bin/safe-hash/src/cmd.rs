use clap::Parser;

use crate::common::{LogArgs, Result};

/// Main command enumeration for the safe-hash CLI tool
#[derive(Parser, Debug)]
#[command(name = "safe-hash", infer_subcommands = true, version)]
pub enum MainCmd {
    /// Fetch a pending transaction from the Safe Transaction Service and inspect it
    #[command(visible_alias = "fetch")]
    Api(crate::api::Cmd),
    /// Inspect a transaction given as flags or as a JSON file
    Offline(crate::offline::Cmd),
    /// Check decoded calldata annotations against the raw calldata
    VerifyData(crate::verify_data::Cmd),
    /// List networks with a known Safe Transaction Service
    Networks(crate::networks::Cmd),
}

impl MainCmd {
    const fn log_args(&self) -> &LogArgs {
        match self {
            Self::Api(cmd) => &cmd.log_args,
            Self::Offline(cmd) => &cmd.log_args,
            Self::VerifyData(cmd) => &cmd.log_args,
            Self::Networks(cmd) => &cmd.log_args,
        }
    }

    /// Execute the main command
    pub async fn run(&self) -> Result<()> {
        self.log_args().init()?;
        match self {
            Self::Api(cmd) => cmd.run().await,
            Self::Offline(cmd) => cmd.run(),
            Self::VerifyData(cmd) => cmd.run(),
            Self::Networks(cmd) => cmd.run(),
        }
    }
}
