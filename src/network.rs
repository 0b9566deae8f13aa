//! Supported network table and endpoint resolution
//!
//! Every supported network resolves to a [`NetworkInfo`] carrying the chain
//! id, RPC endpoint, native token symbol, and block explorer. Endpoints can
//! be overridden per network through `{NAME}_RPC_URL` environment variables
//! (e.g. `BSC_TESTNET_RPC_URL`), following common Ethereum tooling
//! conventions. Callers on chains outside the table build a
//! [`NetworkInfo`] themselves with [`NetworkInfo::custom`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Networks known to the built-in table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    Arbitrum,
    ArbitrumGoerli,
    ArbitrumSepolia,
    Avalanche,
    Base,
    BaseGoerli,
    BaseSepolia,
    Bsc,
    BscTestnet,
    Ethereum,
    Fantom,
    FantomTestnet,
    Fuji,
    Goerli,
    Linea,
    LineaGoerli,
    Mumbai,
    OpBnb,
    OpBnbTestnet,
    Optimism,
    OptimismGoerli,
    OptimismSepolia,
    Polygon,
    Scroll,
    Sepolia,
    ZkSync,
}

impl Network {
    pub const ALL: [Network; 26] = [
        Network::Arbitrum,
        Network::ArbitrumGoerli,
        Network::ArbitrumSepolia,
        Network::Avalanche,
        Network::Base,
        Network::BaseGoerli,
        Network::BaseSepolia,
        Network::Bsc,
        Network::BscTestnet,
        Network::Ethereum,
        Network::Fantom,
        Network::FantomTestnet,
        Network::Fuji,
        Network::Goerli,
        Network::Linea,
        Network::LineaGoerli,
        Network::Mumbai,
        Network::OpBnb,
        Network::OpBnbTestnet,
        Network::Optimism,
        Network::OptimismGoerli,
        Network::OptimismSepolia,
        Network::Polygon,
        Network::Scroll,
        Network::Sepolia,
        Network::ZkSync,
    ];

    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Arbitrum => 42161,
            Network::ArbitrumGoerli => 421613,
            Network::ArbitrumSepolia => 421614,
            Network::Avalanche => 43114,
            Network::Base => 8453,
            Network::BaseGoerli => 84531,
            Network::BaseSepolia => 84532,
            Network::Bsc => 56,
            Network::BscTestnet => 97,
            Network::Ethereum => 1,
            Network::Fantom => 250,
            Network::FantomTestnet => 4002,
            Network::Fuji => 43113,
            Network::Goerli => 5,
            Network::Linea => 59144,
            Network::LineaGoerli => 59140,
            Network::Mumbai => 80001,
            Network::OpBnb => 204,
            Network::OpBnbTestnet => 5611,
            Network::Optimism => 10,
            Network::OptimismGoerli => 420,
            Network::OptimismSepolia => 11155420,
            Network::Polygon => 137,
            Network::Scroll => 534352,
            Network::Sepolia => 11155111,
            Network::ZkSync => 324,
        }
    }

    /// Human-readable name, also accepted by the [`FromStr`] impl.
    pub fn display_name(&self) -> &'static str {
        match self {
            Network::Arbitrum => "Arbitrum",
            Network::ArbitrumGoerli => "Arbitrum Goerli",
            Network::ArbitrumSepolia => "Arbitrum Sepolia",
            Network::Avalanche => "Avalanche",
            Network::Base => "Base",
            Network::BaseGoerli => "Base Goerli",
            Network::BaseSepolia => "Base Sepolia",
            Network::Bsc => "BSC",
            Network::BscTestnet => "BSC Testnet",
            Network::Ethereum => "Ethereum",
            Network::Fantom => "Fantom",
            Network::FantomTestnet => "Fantom Testnet",
            Network::Fuji => "Fuji",
            Network::Goerli => "Goerli",
            Network::Linea => "Linea",
            Network::LineaGoerli => "Linea Goerli",
            Network::Mumbai => "Mumbai",
            Network::OpBnb => "opBNB",
            Network::OpBnbTestnet => "opBNB Testnet",
            Network::Optimism => "Optimism",
            Network::OptimismGoerli => "Optimism Goerli",
            Network::OptimismSepolia => "Optimism Sepolia",
            Network::Polygon => "Polygon",
            Network::Scroll => "Scroll",
            Network::Sepolia => "Sepolia",
            Network::ZkSync => "zkSync",
        }
    }

    /// Symbol of the chain's native currency.
    pub fn native_token(&self) -> &'static str {
        match self {
            Network::Avalanche | Network::Fuji => "AVAX",
            Network::Bsc | Network::BscTestnet | Network::OpBnb | Network::OpBnbTestnet => "BNB",
            Network::Fantom | Network::FantomTestnet => "FTM",
            Network::Mumbai | Network::Polygon => "MATIC",
            _ => "ETH",
        }
    }

    /// Default public RPC endpoint (rate limited; override via env var or a
    /// custom [`NetworkInfo`] for production use).
    fn rpc_url(&self) -> &'static str {
        match self {
            Network::Arbitrum => "wss://arbitrum-one-rpc.publicnode.com",
            Network::ArbitrumGoerli => "wss://arbitrum-goerli-rpc.publicnode.com",
            Network::ArbitrumSepolia => "wss://arbitrum-sepolia-rpc.publicnode.com",
            Network::Avalanche => "wss://avalanche-c-chain-rpc.publicnode.com",
            Network::Base => "wss://base-rpc.publicnode.com",
            Network::BaseGoerli => "https://base-goerli.public.blastapi.io",
            Network::BaseSepolia => "wss://base-sepolia-rpc.publicnode.com",
            Network::Bsc => "wss://bsc-rpc.publicnode.com",
            Network::BscTestnet => "wss://bsc-testnet-rpc.publicnode.com",
            Network::Ethereum => "wss://ethereum-rpc.publicnode.com",
            Network::Fantom => "wss://fantom-rpc.publicnode.com",
            Network::FantomTestnet => "wss://fantom-testnet-rpc.publicnode.com",
            Network::Fuji => "wss://avalanche-fuji-c-chain-rpc.publicnode.com",
            Network::Goerli => "wss://goerli.gateway.tenderly.co",
            Network::Linea => "wss://linea.drpc.org",
            Network::LineaGoerli => "wss://linea-goerli.drpc.org",
            Network::Mumbai => "wss://polygon-mumbai-bor-rpc.publicnode.com",
            Network::OpBnb => "wss://opbnb-rpc.publicnode.com",
            Network::OpBnbTestnet => "wss://opbnb-testnet-rpc.publicnode.com",
            Network::Optimism => "wss://optimism-rpc.publicnode.com",
            Network::OptimismGoerli => "wss://optimism-testnet.drpc.org",
            Network::OptimismSepolia => "wss://optimism-sepolia-rpc.publicnode.com",
            Network::Polygon => "wss://polygon-bor-rpc.publicnode.com",
            Network::Scroll => "wss://scroll.drpc.org",
            Network::Sepolia => "wss://ethereum-sepolia-rpc.publicnode.com",
            Network::ZkSync => "wss://zksync.drpc.org",
        }
    }

    fn explorer(&self) -> &'static str {
        match self {
            Network::Arbitrum => "https://arbiscan.io",
            Network::ArbitrumGoerli => "https://goerli.arbiscan.io",
            Network::ArbitrumSepolia => "https://sepolia.arbiscan.io",
            Network::Avalanche => "https://snowtrace.io",
            Network::Base => "https://basescan.org",
            Network::BaseGoerli => "https://goerli.basescan.org",
            Network::BaseSepolia => "https://sepolia.basescan.org",
            Network::Bsc => "https://bscscan.com",
            Network::BscTestnet => "https://testnet.bscscan.com",
            Network::Ethereum => "https://etherscan.io",
            Network::Fantom => "https://ftmscan.com",
            Network::FantomTestnet => "https://testnet.ftmscan.com",
            Network::Fuji => "https://testnet.snowtrace.io",
            Network::Goerli => "https://goerli.etherscan.io",
            Network::Linea => "https://lineascan.build",
            Network::LineaGoerli => "https://goerli.lineascan.build",
            Network::Mumbai => "https://mumbai.polygonscan.com",
            Network::OpBnb => "https://opbnb.bscscan.com",
            Network::OpBnbTestnet => "https://opbnb-testnet.bscscan.com",
            Network::Optimism => "https://optimistic.etherscan.io",
            Network::OptimismGoerli => "https://goerli-optimism.etherscan.io",
            Network::OptimismSepolia => "https://sepolia-optimism.etherscan.io",
            Network::Polygon => "https://polygonscan.com",
            Network::Scroll => "https://scrollscan.com",
            Network::Sepolia => "https://sepolia.etherscan.io",
            Network::ZkSync => "https://explorer.zksync.io",
        }
    }

    /// Environment variable consulted before the built-in endpoint,
    /// e.g. `ARBITRUM_SEPOLIA_RPC_URL`.
    pub fn rpc_env_var(&self) -> String {
        let mut var: String = self
            .display_name()
            .chars()
            .map(|c| if c == ' ' { '_' } else { c.to_ascii_uppercase() })
            .collect();
        var.push_str("_RPC_URL");
        var
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Network::ALL
            .into_iter()
            .find(|network| network.display_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownNetwork(s.to_string()))
    }
}

/// Resolved connection parameters for a single network.
///
/// `chain_id` may be left empty for custom networks; the live chain id is
/// adopted when the wallet connects. When a chain id is present it must
/// match the one reported by the RPC endpoint, otherwise connecting fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub name: String,
    pub chain_id: Option<u64>,
    pub rpc_url: String,
    pub token: String,
    pub explorer: String,
}

impl NetworkInfo {
    /// Describe a network outside the built-in table.
    pub fn custom(
        name: impl Into<String>,
        chain_id: Option<u64>,
        rpc_url: impl Into<String>,
        token: impl Into<String>,
        explorer: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            chain_id,
            rpc_url: rpc_url.into(),
            token: token.into(),
            explorer: explorer.into(),
        }
    }

    /// Block explorer page for a transaction hash.
    pub fn explorer_tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer.trim_end_matches('/'), tx_hash)
    }
}

impl From<Network> for NetworkInfo {
    fn from(network: Network) -> Self {
        let rpc_url = match std::env::var(network.rpc_env_var()) {
            Ok(url) => {
                tracing::debug!(network = %network, %url, "using RPC endpoint from environment");
                url
            }
            Err(_) => network.rpc_url().to_string(),
        };

        Self {
            name: network.display_name().to_string(),
            chain_id: Some(network.chain_id()),
            rpc_url,
            token: network.native_token().to_string(),
            explorer: network.explorer().to_string(),
        }
    }
}
