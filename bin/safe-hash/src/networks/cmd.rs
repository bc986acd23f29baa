use clap::Parser;

use crate::common::{to_json, LogArgs, Result, NETWORKS};

/// List networks with a known Safe Transaction Service
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Print the table as JSON
    #[arg(long)]
    pub json: bool,

    /// Logging configuration
    #[command(flatten)]
    pub log_args: LogArgs,
}

impl Cmd {
    /// Render the network table.
    pub fn render(&self) -> Result<String> {
        if self.json {
            return to_json(&NETWORKS);
        }
        let mut out = format!("{:<15} {:>12}  {}\n", "NETWORK", "CHAIN ID", "TRANSACTION SERVICE");
        for network in NETWORKS {
            out.push_str(&format!(
                "{:<15} {:>12}  {}\n",
                network.name, network.chain_id, network.service_url
            ));
        }
        Ok(out)
    }

    /// Execute the networks command
    pub fn run(&self) -> Result<()> {
        print!("{}", self.render()?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_table() {
        let cmd = Cmd { json: false, log_args: LogArgs::default() };
        let table = cmd.render().unwrap();
        assert_eq!(table.lines().count(), NETWORKS.len() + 1);
        assert!(table.contains("polygon-zkevm"));
        assert!(table.contains("https://safe-transaction-mainnet.safe.global"));
    }

    #[test]
    fn test_json_table() {
        let cmd = Cmd { json: true, log_args: LogArgs::default() };
        let json: serde_json::Value = serde_json::from_str(&cmd.render().unwrap()).unwrap();
        assert_eq!(json[0]["name"], "ethereum");
        assert_eq!(json[0]["chainId"], 1);
        assert!(json[0].get("aliases").is_none());
    }
}
