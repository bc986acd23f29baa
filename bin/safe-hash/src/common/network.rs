//! Networks with a hosted Safe Transaction Service.

use clap::Parser;
use serde::Serialize;

use super::{CliError, Result};

/// A chain and the Safe Transaction Service that indexes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    /// Canonical name used on the command line
    pub name: &'static str,
    /// EIP-155 chain id
    pub chain_id: u64,
    /// Base URL of the transaction service
    pub service_url: &'static str,
    /// Other accepted names
    #[serde(skip)]
    pub aliases: &'static [&'static str],
}

const fn network(
    name: &'static str,
    chain_id: u64,
    service_url: &'static str,
    aliases: &'static [&'static str],
) -> Network {
    Network { name, chain_id, service_url, aliases }
}

/// Every network the CLI knows a transaction service for.
pub const NETWORKS: &[Network] = &[
    network("ethereum", 1, "https://safe-transaction-mainnet.safe.global", &["mainnet", "eth"]),
    network("sepolia", 11_155_111, "https://safe-transaction-sepolia.safe.global", &[]),
    network("optimism", 10, "https://safe-transaction-optimism.safe.global", &["op"]),
    network("arbitrum", 42_161, "https://safe-transaction-arbitrum.safe.global", &["arbitrum-one"]),
    network("polygon", 137, "https://safe-transaction-polygon.safe.global", &["matic"]),
    network("base", 8453, "https://safe-transaction-base.safe.global", &[]),
    network("gnosis", 100, "https://safe-transaction-gnosis-chain.safe.global", &["xdai"]),
    network("bsc", 56, "https://safe-transaction-bsc.safe.global", &["bnb"]),
    network("avalanche", 43_114, "https://safe-transaction-avalanche.safe.global", &["avax"]),
    network("zksync", 324, "https://safe-transaction-zksync.safe.global", &[]),
    network("linea", 59_144, "https://safe-transaction-linea.safe.global", &[]),
    network("scroll", 534_352, "https://safe-transaction-scroll.safe.global", &[]),
    network("celo", 42_220, "https://safe-transaction-celo.safe.global", &[]),
    network("mantle", 5000, "https://safe-transaction-mantle.safe.global", &[]),
    network("aurora", 1_313_161_554, "https://safe-transaction-aurora.safe.global", &[]),
    network("polygon-zkevm", 1101, "https://safe-transaction-zkevm.safe.global", &["zkevm"]),
];

impl Network {
    /// Looks a network up by name or alias, ignoring case.
    pub fn by_name(name: &str) -> Option<&'static Self> {
        let name = name.trim();
        NETWORKS.iter().find(|network| {
            network.name.eq_ignore_ascii_case(name) ||
                network.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(name))
        })
    }

    /// Looks a network up by chain id.
    pub fn by_chain_id(chain_id: u64) -> Option<&'static Self> {
        NETWORKS.iter().find(|network| network.chain_id == chain_id)
    }
}

/// Chain selection shared by the commands.
#[derive(Debug, Clone, Default, Parser)]
pub struct NetworkArgs {
    /// Network name, see `safe-hash networks`
    #[arg(long, conflicts_with = "chain_id")]
    pub network: Option<String>,

    /// Chain id, for chains missing from the network table
    #[arg(long = "chain-id")]
    pub chain_id: Option<u64>,

    /// Transaction service base URL, overrides the network table
    #[arg(long = "api-url", env = "SAFE_API_URL")]
    pub api_url: Option<String>,
}

/// The outcome of [`NetworkArgs::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNetwork {
    /// Chain id the hashes are computed for
    pub chain_id: u64,
    /// Transaction service base URL, if one is known
    pub service_url: Option<String>,
}

impl ResolvedNetwork {
    /// The transaction service URL, or an error naming the missing flag.
    pub fn require_service_url(&self) -> Result<&str> {
        self.service_url.as_deref().ok_or_else(|| {
            CliError::InvalidInput(format!(
                "no transaction service known for chain {}, pass --api-url",
                self.chain_id
            ))
        })
    }
}

impl NetworkArgs {
    /// Resolves the chain id and transaction service URL from the flags.
    pub fn resolve(&self) -> Result<ResolvedNetwork> {
        let (chain_id, known) = match (&self.network, self.chain_id) {
            (Some(name), _) => {
                let network =
                    Network::by_name(name).ok_or_else(|| CliError::UnknownNetwork(name.clone()))?;
                (network.chain_id, Some(network))
            }
            (None, Some(chain_id)) => (chain_id, Network::by_chain_id(chain_id)),
            (None, None) => {
                return Err(CliError::InvalidInput(
                    "either --network or --chain-id is required".to_string(),
                ))
            }
        };
        let service_url = self
            .api_url
            .clone()
            .or_else(|| known.map(|network| network.service_url.to_string()))
            .map(|url| url.trim_end_matches('/').to_string());
        Ok(ResolvedNetwork { chain_id, service_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    #[test]
    fn test_table_is_unique() {
        let names: HashSet<_> = NETWORKS.iter().map(|n| n.name).collect();
        let chains: HashSet<_> = NETWORKS.iter().map(|n| n.chain_id).collect();
        assert_eq!(names.len(), NETWORKS.len());
        assert_eq!(chains.len(), NETWORKS.len());
        assert_eq!(NETWORKS.len(), 16);
    }

    #[rstest]
    #[case("ethereum", 1)]
    #[case("Mainnet", 1)]
    #[case("xdai", 100)]
    #[case(" polygon-zkevm ", 1101)]
    fn test_by_name(#[case] name: &str, #[case] chain_id: u64) {
        assert_eq!(Network::by_name(name).unwrap().chain_id, chain_id);
    }

    #[test]
    fn test_resolve() {
        let args = NetworkArgs { network: Some("base".into()), ..Default::default() };
        assert_eq!(
            args.resolve().unwrap(),
            ResolvedNetwork {
                chain_id: 8453,
                service_url: Some("https://safe-transaction-base.safe.global".into()),
            }
        );

        let args = NetworkArgs {
            chain_id: Some(31_337),
            api_url: Some("http://localhost:8000/".into()),
            ..Default::default()
        };
        let resolved = args.resolve().unwrap();
        assert_eq!(resolved.chain_id, 31_337);
        assert_eq!(resolved.require_service_url().unwrap(), "http://localhost:8000");

        let args = NetworkArgs { chain_id: Some(31_337), ..Default::default() };
        assert!(args.resolve().unwrap().require_service_url().is_err());
    }

    #[test]
    fn test_resolve_errors() {
        assert!(matches!(NetworkArgs::default().resolve(), Err(CliError::InvalidInput(_))));
        let args = NetworkArgs { network: Some("atlantis".into()), ..Default::default() };
        assert!(matches!(args.resolve(), Err(CliError::UnknownNetwork(name)) if name == "atlantis"));
    }
}
