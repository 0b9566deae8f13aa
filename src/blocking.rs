//! Synchronous wallet facade
//!
//! [`Wallet`](crate::blocking::Wallet) owns a current-thread tokio runtime
//! and blocks on the async wallet for every RPC-backed call. Intended for
//! scripts and other non-async callers; do not construct one inside an
//! existing tokio runtime.

use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::DynProvider;
use alloy::rpc::types::{Transaction, TransactionRequest};

use crate::error::Result;
use crate::erc20::Erc20Token;
use crate::network::NetworkInfo;
use crate::wallet::{KeySigner, TxParams, Wallet as AsyncWallet};

pub struct Wallet {
    inner: AsyncWallet,
    runtime: tokio::runtime::Runtime,
}

impl Wallet {
    pub fn connect(signer: KeySigner, network: impl Into<NetworkInfo>) -> Result<Self> {
        let runtime = new_runtime()?;
        let inner = runtime.block_on(AsyncWallet::connect(signer, network))?;
        Ok(Self { inner, runtime })
    }

    /// See [`Wallet::connect_with`](crate::Wallet::connect_with).
    pub fn connect_with(
        signer: KeySigner,
        info: NetworkInfo,
        provider: DynProvider,
    ) -> Result<Self> {
        let runtime = new_runtime()?;
        let inner = runtime.block_on(AsyncWallet::connect_with(signer, info, provider))?;
        Ok(Self { inner, runtime })
    }

    pub fn create(network: impl Into<NetworkInfo>) -> Result<Self> {
        Self::connect(KeySigner::random(), network)
    }

    pub fn switch_network(&mut self, network: impl Into<NetworkInfo>) -> Result<()> {
        self.runtime.block_on(self.inner.switch_network(network))
    }

    pub fn address(&self) -> Address {
        self.inner.address()
    }

    pub fn address_string(&self) -> String {
        self.inner.address_string()
    }

    pub fn network(&self) -> &NetworkInfo {
        self.inner.network()
    }

    pub fn chain_id(&self) -> u64 {
        self.inner.chain_id()
    }

    pub fn nonce(&self) -> u64 {
        self.inner.nonce()
    }

    pub fn native_token(&self) -> &str {
        self.inner.native_token()
    }

    pub fn is_native_token(&self, token: &str) -> bool {
        self.inner.is_native_token(token)
    }

    pub fn explorer_url(&self, tx_hash: TxHash) -> String {
        self.inner.explorer_url(tx_hash)
    }

    pub fn balance(&self) -> Result<U256> {
        self.runtime.block_on(self.inner.balance())
    }

    pub fn balance_formatted(&self) -> Result<String> {
        self.runtime.block_on(self.inner.balance_formatted())
    }

    pub fn estimate_gas(&self, request: &TransactionRequest) -> Result<u64> {
        self.runtime.block_on(self.inner.estimate_gas(request))
    }

    pub fn build_transaction(&self, params: TxParams) -> Result<TransactionRequest> {
        self.runtime.block_on(self.inner.build_transaction(params))
    }

    pub fn send_transaction(&self, request: TransactionRequest) -> Result<TxHash> {
        self.runtime.block_on(self.inner.send_transaction(request))
    }

    pub fn build_and_send(
        &self,
        to: Address,
        calldata: Bytes,
        value: U256,
        gas: Option<u64>,
        gas_price: Option<u128>,
    ) -> Result<TxHash> {
        self.runtime
            .block_on(self.inner.build_and_send(to, calldata, value, gas, gas_price))
    }

    pub fn token_balance(&self, token: Address) -> Result<U256> {
        self.runtime.block_on(self.inner.token_balance(token))
    }

    pub fn token_balance_formatted(&self, token: Address) -> Result<String> {
        self.runtime
            .block_on(self.inner.token_balance_formatted(token))
    }

    pub fn token_decimals(&self, token: Address) -> Result<u8> {
        self.runtime.block_on(self.inner.token_decimals(token))
    }

    pub fn token_metadata(&self, token: Address) -> Result<Erc20Token> {
        self.runtime.block_on(self.inner.token_metadata(token))
    }

    pub fn transfer_token(
        &self,
        token: Address,
        recipient: Address,
        amount: U256,
        gas: Option<u64>,
        gas_price: Option<u128>,
    ) -> Result<TxHash> {
        self.runtime.block_on(
            self.inner
                .transfer_token(token, recipient, amount, gas, gas_price),
        )
    }

    pub fn approve_token(&self, token: Address, spender: Address, amount: U256) -> Result<TxHash> {
        self.runtime
            .block_on(self.inner.approve_token(token, spender, amount))
    }

    pub fn transaction_history(&self, from_block: Option<u64>) -> Result<Vec<Transaction>> {
        self.runtime
            .block_on(self.inner.transaction_history(from_block))
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.inner, f)
    }
}

fn new_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Network;

    use alloy::primitives::{U128, U64};
    use alloy::providers::mock::Asserter;
    use alloy::providers::{Provider, ProviderBuilder};

    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn connected(asserter: &Asserter) -> Wallet {
        let provider = ProviderBuilder::new()
            .connect_mocked_client(asserter.clone())
            .erased();
        asserter.push_success(&U64::from(1u64)); // chain id
        asserter.push_success(&U64::from(4u64)); // nonce
        Wallet::connect_with(
            KeySigner::from_hex(TEST_KEY).unwrap(),
            NetworkInfo::from(Network::Ethereum),
            provider,
        )
        .unwrap()
    }

    #[test]
    fn blocking_facade_mirrors_async_wallet() {
        let asserter = Asserter::new();
        let wallet = connected(&asserter);

        assert_eq!(wallet.chain_id(), 1);
        assert_eq!(wallet.nonce(), 4);
        assert!(wallet.is_native_token("eth"));

        asserter.push_success(&U256::from(2_000_000_000_000_000_000u128));
        assert_eq!(wallet.balance_formatted().unwrap(), "2");

        asserter.push_success(&U128::from(1_000_000_000u64)); // gas price
        let request = wallet.build_transaction(TxParams::default()).unwrap();
        assert_eq!(request.nonce, Some(4));
        assert_eq!(request.chain_id, Some(1));
    }
}
