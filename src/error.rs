//! Error types for the wallet crate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(
        "unknown network \"{0}\"; pass a supported network name or a full NetworkInfo for custom chains"
    )]
    UnknownNetwork(String),

    #[error("chain id mismatch: network info declares {expected}, RPC endpoint reports {actual}")]
    ChainIdMismatch { expected: u64, actual: u64 },

    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error("invalid RPC endpoint {url}: {reason}")]
    InvalidRpc { url: String, reason: String },

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("failed to build transaction: {0}")]
    TransactionBuild(String),

    #[error("RPC transport error: {0}")]
    Transport(#[from] alloy::transports::TransportError),

    #[error("contract call failed: {0}")]
    Contract(#[from] alloy::contract::Error),

    #[error("failed to start blocking runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
