//! ERC-20 interface bindings and token metadata

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

alloy::sol! {
    /// Subset of the ERC-20 standard the wallet interacts with.
    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address owner) view returns (uint256);
        function decimals() view returns (uint8);
        function symbol() view returns (string);
        function transfer(address to, uint256 amount) returns (bool);
        function approve(address spender, uint256 amount) returns (bool);
    }
}

/// On-chain metadata of an ERC-20 token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Erc20Token {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

impl Erc20Token {
    pub fn new(address: Address, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            address,
            symbol: symbol.into(),
            decimals,
        }
    }
}
