//! Convenience wallet over EVM-compatible networks
//!
//! A thin layer on top of the [`alloy`] client stack: it holds a private
//! key, tracks the account nonce locally, resolves networks from a built-in
//! table, and wraps the handful of RPC calls a wallet needs: balances, gas,
//! ERC-20 reads and writes, transaction submission, explorer links.
//! Signing, RLP/ABI encoding, and transport stay alloy's job.
//!
//! # Security Model
//!
//! - Private keys live only inside [`KeySigner`], are never serialized,
//!   and are redacted from `Debug` output
//! - Transactions are signed locally and submitted as raw bytes
//! - The declared chain id is validated against the endpoint at connect
//!   time, so a misconfigured RPC URL fails fast instead of signing for
//!   the wrong chain
//!
//! # Example
//!
//! ```no_run
//! use evm_wallet::{KeySigner, Network, Wallet};
//!
//! # async fn run() -> evm_wallet::Result<()> {
//! let signer = KeySigner::from_env("PRIVATE_KEY")?;
//! let wallet = Wallet::connect(signer, Network::Sepolia).await?;
//!
//! println!("{} ETH", wallet.balance_formatted().await?);
//! # Ok(())
//! # }
//! ```

pub mod blocking;
pub mod erc20;
pub mod network;
pub mod units;
pub mod wallet;

mod error;

// Re-export commonly used types
pub use erc20::Erc20Token;
pub use error::{Error, Result};
pub use network::{Network, NetworkInfo};
pub use wallet::{KeySigner, TxParams, Wallet, DEFAULT_GAS_LIMIT};
