//! Wallet over an EVM JSON-RPC endpoint
//!
//! [`Wallet`] pairs a [`KeySigner`] with a connected provider for one
//! network at a time. It keeps two pieces of local state: the chain id
//! validated at connect time, and the account nonce, fetched once and then
//! incremented after every successful submission. Everything else is a
//! delegated RPC call.

use std::sync::atomic::{AtomicU64, Ordering};

use alloy::consensus::Transaction as _;
use alloy::eips::eip2718::Encodable2718;
use alloy::eips::BlockNumberOrTag;
use alloy::network::{TransactionBuilder, TransactionResponse};
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{Transaction, TransactionRequest};
use alloy::sol_types::SolCall;
use url::Url;

use crate::erc20::{Erc20Token, IERC20};
use crate::error::{Error, Result};
use crate::network::NetworkInfo;
use crate::units;

mod signer;

pub use signer::KeySigner;

/// Gas limit used when the caller pins none and no estimate is requested.
pub const DEFAULT_GAS_LIMIT: u64 = 250_000;

/// Caller-facing inputs for building one transaction. Transient; a fresh
/// value is built per call and never retained.
#[derive(Debug, Clone, Default)]
pub struct TxParams {
    pub to: Option<Address>,
    pub value: U256,
    pub data: Option<Bytes>,
    /// Gas limit; [`DEFAULT_GAS_LIMIT`] when unset.
    pub gas: Option<u64>,
    /// Legacy gas price in wei; the live `eth_gasPrice` when unset.
    pub gas_price: Option<u128>,
}

/// An account bound to one network.
///
/// The nonce counter is atomic, so concurrent submissions through a shared
/// reference each consume a distinct increment. The wallet does not
/// serialize submissions beyond that.
pub struct Wallet {
    signer: KeySigner,
    network: NetworkInfo,
    provider: DynProvider,
    chain_id: u64,
    nonce: AtomicU64,
}

impl Wallet {
    /// Connect to the network's RPC endpoint and validate it.
    ///
    /// Fails with [`Error::ChainIdMismatch`] when the network info declares
    /// a chain id that differs from the one the endpoint reports. The
    /// account nonce is fetched here once.
    pub async fn connect(signer: KeySigner, network: impl Into<NetworkInfo>) -> Result<Self> {
        let info = network.into();
        let provider = Self::provider_for(&info).await?;
        Self::connect_with(signer, info, provider).await
    }

    /// Like [`Wallet::connect`], but on a caller-supplied provider. Useful
    /// for custom transports and for tests.
    pub async fn connect_with(
        signer: KeySigner,
        mut info: NetworkInfo,
        provider: DynProvider,
    ) -> Result<Self> {
        let chain_id = Self::validated_chain_id(&mut info, &provider).await?;
        let nonce = provider.get_transaction_count(signer.address()).await?;

        tracing::debug!(
            network = %info.name,
            chain_id,
            nonce,
            address = %signer.address(),
            "wallet connected"
        );

        Ok(Self {
            signer,
            network: info,
            provider,
            chain_id,
            nonce: AtomicU64::new(nonce),
        })
    }

    /// Connect an all-new account with a freshly generated key.
    pub async fn create(network: impl Into<NetworkInfo>) -> Result<Self> {
        Self::connect(KeySigner::random(), network).await
    }

    /// Move the wallet to another network: new provider, chain id
    /// re-validated, nonce refetched.
    pub async fn switch_network(&mut self, network: impl Into<NetworkInfo>) -> Result<()> {
        let info = network.into();
        let provider = Self::provider_for(&info).await?;
        self.switch_network_with(info, provider).await
    }

    /// Like [`Wallet::switch_network`], but on a caller-supplied provider.
    pub async fn switch_network_with(
        &mut self,
        mut info: NetworkInfo,
        provider: DynProvider,
    ) -> Result<()> {
        let chain_id = Self::validated_chain_id(&mut info, &provider).await?;
        let nonce = provider.get_transaction_count(self.signer.address()).await?;

        tracing::info!(network = %info.name, chain_id, nonce, "switched network");

        self.network = info;
        self.provider = provider;
        self.chain_id = chain_id;
        self.nonce.store(nonce, Ordering::SeqCst);
        Ok(())
    }

    async fn provider_for(info: &NetworkInfo) -> Result<DynProvider> {
        let url: Url = info.rpc_url.parse().map_err(|e: url::ParseError| Error::InvalidRpc {
            url: info.rpc_url.clone(),
            reason: e.to_string(),
        })?;
        let provider = ProviderBuilder::new().connect(url.as_str()).await?;
        Ok(provider.erased())
    }

    /// Enforce the chain-id invariant: a declared id must match the live
    /// one; an undeclared id adopts it.
    async fn validated_chain_id(info: &mut NetworkInfo, provider: &DynProvider) -> Result<u64> {
        let actual = provider.get_chain_id().await?;
        match info.chain_id {
            Some(expected) if expected != actual => {
                Err(Error::ChainIdMismatch { expected, actual })
            }
            _ => {
                info.chain_id = Some(actual);
                Ok(actual)
            }
        }
    }

    /// The account address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// The account address as a checksummed string.
    pub fn address_string(&self) -> String {
        self.signer.address_string()
    }

    pub fn signer(&self) -> &KeySigner {
        &self.signer
    }

    pub fn network(&self) -> &NetworkInfo {
        &self.network
    }

    /// Chain id validated against the RPC endpoint at connect time.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// The locally tracked account nonce.
    pub fn nonce(&self) -> u64 {
        self.nonce.load(Ordering::SeqCst)
    }

    /// Symbol of the network's native currency.
    pub fn native_token(&self) -> &str {
        &self.network.token
    }

    /// The underlying provider, for calls this wrapper does not cover.
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// True for the network's native token symbol (case-insensitive) and
    /// for the zero address.
    pub fn is_native_token(&self, token: &str) -> bool {
        if token.eq_ignore_ascii_case(&self.network.token) {
            return true;
        }
        matches!(token.parse::<Address>(), Ok(address) if address == Address::ZERO)
    }

    /// Block explorer page for a transaction hash on the current network.
    pub fn explorer_url(&self, tx_hash: TxHash) -> String {
        self.network.explorer_tx_url(&tx_hash.to_string())
    }

    /// Native balance of the account in wei.
    pub async fn balance(&self) -> Result<U256> {
        Ok(self.provider.get_balance(self.address()).await?)
    }

    /// Native balance converted to whole currency units.
    pub async fn balance_formatted(&self) -> Result<String> {
        let wei = self.balance().await?;
        Ok(units::format_ether(wei))
    }

    /// Gas required for the given transaction, per `eth_estimateGas`.
    pub async fn estimate_gas(&self, request: &TransactionRequest) -> Result<u64> {
        Ok(self.provider.estimate_gas(request.clone()).await?)
    }

    /// Assemble a complete transaction request from [`TxParams`]:
    /// from, nonce, and chain id come from the wallet, the gas price from
    /// the endpoint when unset.
    pub async fn build_transaction(&self, params: TxParams) -> Result<TransactionRequest> {
        let gas_price = match params.gas_price {
            Some(price) => price,
            None => self.provider.get_gas_price().await?,
        };

        let mut request = TransactionRequest::default()
            .with_from(self.address())
            .with_value(params.value)
            .with_nonce(self.nonce())
            .with_gas_limit(params.gas.unwrap_or(DEFAULT_GAS_LIMIT))
            .with_gas_price(gas_price)
            .with_chain_id(self.chain_id);

        if let Some(to) = params.to {
            request = request.with_to(to);
        }
        if let Some(data) = params.data {
            request = request.with_input(data);
        }

        Ok(request)
    }

    /// Sign the request locally and submit it via `eth_sendRawTransaction`.
    /// The local nonce increments by one only on success.
    pub async fn send_transaction(&self, request: TransactionRequest) -> Result<TxHash> {
        let envelope = request
            .build(self.signer.wallet())
            .await
            .map_err(|e| Error::TransactionBuild(e.to_string()))?;

        let pending = self
            .provider
            .send_raw_transaction(&envelope.encoded_2718())
            .await?;
        let tx_hash = *pending.tx_hash();

        self.nonce.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(%tx_hash, "transaction submitted");

        Ok(tx_hash)
    }

    /// Build a contract call and submit it in one step. When the caller
    /// pins no gas limit, the built transaction is re-estimated first.
    pub async fn build_and_send(
        &self,
        to: Address,
        calldata: Bytes,
        value: U256,
        gas: Option<u64>,
        gas_price: Option<u128>,
    ) -> Result<TxHash> {
        let mut request = self
            .build_transaction(TxParams {
                to: Some(to),
                value,
                data: Some(calldata),
                gas,
                gas_price,
            })
            .await?;

        if gas.is_none() {
            let estimated = self.estimate_gas(&request).await?;
            request = request.with_gas_limit(estimated);
        }

        self.send_transaction(request).await
    }

    /// Raw ERC-20 balance of the account, undivided.
    pub async fn token_balance(&self, token: Address) -> Result<U256> {
        let erc20 = IERC20::new(token, self.provider.clone());
        Ok(erc20.balanceOf(self.address()).call().await?)
    }

    /// ERC-20 balance divided by `10^decimals`.
    pub async fn token_balance_formatted(&self, token: Address) -> Result<String> {
        let raw = self.token_balance(token).await?;
        let decimals = self.token_decimals(token).await?;
        Ok(units::format_units(raw, decimals as u32))
    }

    pub async fn token_decimals(&self, token: Address) -> Result<u8> {
        let erc20 = IERC20::new(token, self.provider.clone());
        Ok(erc20.decimals().call().await?)
    }

    /// Fetch symbol and decimals of a token contract.
    pub async fn token_metadata(&self, token: Address) -> Result<Erc20Token> {
        let erc20 = IERC20::new(token, self.provider.clone());
        let symbol = erc20.symbol().call().await?;
        let decimals = erc20.decimals().call().await?;
        Ok(Erc20Token::new(token, symbol, decimals))
    }

    /// Transfer `amount` of an ERC-20 token (in the token's smallest unit).
    pub async fn transfer_token(
        &self,
        token: Address,
        recipient: Address,
        amount: U256,
        gas: Option<u64>,
        gas_price: Option<u128>,
    ) -> Result<TxHash> {
        let call = IERC20::transferCall {
            to: recipient,
            amount,
        };
        self.build_and_send(token, call.abi_encode().into(), U256::ZERO, gas, gas_price)
            .await
    }

    /// Approve `spender` to spend `amount` of an ERC-20 token.
    pub async fn approve_token(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxHash> {
        let call = IERC20::approveCall { spender, amount };
        self.build_and_send(token, call.abi_encode().into(), U256::ZERO, None, None)
            .await
    }

    /// Transactions involving this account, found by scanning whole blocks
    /// newest to oldest down to `from_block` (genesis when `None`).
    ///
    /// This walks every block in the range with one RPC call each; on
    /// anything but a short range or a local devnet, prefer an indexer.
    pub async fn transaction_history(&self, from_block: Option<u64>) -> Result<Vec<Transaction>> {
        let latest = self.provider.get_block_number().await?;
        let start = from_block.unwrap_or(0).min(latest);
        let me = self.address();

        let mut matches = Vec::new();
        for number in (start..=latest).rev() {
            let block = self
                .provider
                .get_block_by_number(BlockNumberOrTag::Number(number))
                .full()
                .await?;
            let Some(block) = block else { continue };

            for tx in block.transactions.into_transactions() {
                if tx.from() == me || tx.to() == Some(me) {
                    matches.push(tx);
                }
            }
        }

        tracing::debug!(
            blocks = latest - start + 1,
            hits = matches.len(),
            "transaction history scan finished"
        );
        Ok(matches)
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address())
            .field("network", &self.network.name)
            .field("chain_id", &self.chain_id)
            .field("nonce", &self.nonce())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Network;

    use alloy::consensus::transaction::Recovered;
    use alloy::consensus::Header as ConsensusHeader;
    use alloy::primitives::{address, B256, U128, U64};
    use alloy::providers::mock::Asserter;
    use alloy::rpc::types::{Block, BlockTransactions, Header};
    use alloy::sol_types::SolValue;

    // Well-known anvil dev key (DO NOT use in production!)
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    const USDC: Address = address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
    const RECIPIENT: Address = address!("70997970c51812dc3a010c7d01b50e0d17dc79c8");

    fn mocked_provider(asserter: &Asserter) -> DynProvider {
        ProviderBuilder::new()
            .connect_mocked_client(asserter.clone())
            .erased()
    }

    /// Queue the two responses `connect_with` consumes: chain id and nonce.
    fn push_connect(asserter: &Asserter, chain_id: u64, nonce: u64) {
        asserter.push_success(&U64::from(chain_id));
        asserter.push_success(&U64::from(nonce));
    }

    async fn connected_wallet(asserter: &Asserter, chain_id: u64, nonce: u64) -> Wallet {
        let provider = mocked_provider(asserter);
        push_connect(asserter, chain_id, nonce);
        Wallet::connect_with(
            KeySigner::from_hex(TEST_KEY).unwrap(),
            NetworkInfo::from(Network::Ethereum),
            provider,
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn connect_rejects_chain_id_mismatch() {
        let asserter = Asserter::new();
        let provider = mocked_provider(&asserter);
        // Ethereum info declares chain id 1, endpoint claims BSC.
        asserter.push_success(&U64::from(56u64));

        let err = Wallet::connect_with(
            KeySigner::from_hex(TEST_KEY).unwrap(),
            NetworkInfo::from(Network::Ethereum),
            provider,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            Error::ChainIdMismatch {
                expected: 1,
                actual: 56
            }
        ));
    }

    #[tokio::test]
    async fn connect_adopts_live_chain_id_for_custom_networks() {
        let asserter = Asserter::new();
        let provider = mocked_provider(&asserter);
        push_connect(&asserter, 31337, 0);

        let info = NetworkInfo::custom("Devnet", None, "http://localhost:8545", "ETH", "");
        let wallet = Wallet::connect_with(KeySigner::from_hex(TEST_KEY).unwrap(), info, provider)
            .await
            .unwrap();

        assert_eq!(wallet.chain_id(), 31337);
        assert_eq!(wallet.network().chain_id, Some(31337));
    }

    #[tokio::test]
    async fn nonce_increments_only_on_successful_send() {
        let asserter = Asserter::new();
        let wallet = connected_wallet(&asserter, 1, 7).await;
        assert_eq!(wallet.nonce(), 7);

        asserter.push_success(&U128::from(2_000_000_000u64)); // eth_gasPrice
        let request = wallet
            .build_transaction(TxParams {
                to: Some(RECIPIENT),
                value: U256::from(10u64),
                ..Default::default()
            })
            .await
            .unwrap();

        let submitted_hash = B256::repeat_byte(0x11);
        asserter.push_success(&submitted_hash);
        let tx_hash = wallet.send_transaction(request.clone()).await.unwrap();
        assert_eq!(tx_hash, submitted_hash);
        assert_eq!(wallet.nonce(), 8);

        // A rejected submission must leave the counter untouched.
        asserter.push_failure_msg("nonce too low");
        assert!(wallet.send_transaction(request).await.is_err());
        assert_eq!(wallet.nonce(), 8);
    }

    #[tokio::test]
    async fn native_token_detection_is_case_insensitive_and_knows_zero_address() {
        let asserter = Asserter::new();
        let wallet = connected_wallet(&asserter, 1, 0).await;

        assert!(wallet.is_native_token("ETH"));
        assert!(wallet.is_native_token("eth"));
        assert!(wallet.is_native_token("0x0000000000000000000000000000000000000000"));
        assert!(!wallet.is_native_token("BNB"));
        assert!(!wallet.is_native_token("0x70997970c51812dc3a010c7d01b50e0d17dc79c8"));
    }

    #[tokio::test]
    async fn balance_is_raw_unless_formatted() {
        let asserter = Asserter::new();
        let wallet = connected_wallet(&asserter, 1, 0).await;

        let wei = U256::from(1_500_000_000_000_000_000u128);
        asserter.push_success(&wei);
        assert_eq!(wallet.balance().await.unwrap(), wei);

        asserter.push_success(&wei);
        assert_eq!(wallet.balance_formatted().await.unwrap(), "1.5");
    }

    #[tokio::test]
    async fn token_balance_divides_by_decimals_only_when_formatting() {
        let asserter = Asserter::new();
        let wallet = connected_wallet(&asserter, 1, 0).await;

        let raw = U256::from(250_000_000u64); // 250 USDC at 6 decimals

        asserter.push_success(&Bytes::from(raw.abi_encode()));
        assert_eq!(wallet.token_balance(USDC).await.unwrap(), raw);

        asserter.push_success(&Bytes::from(raw.abi_encode()));
        asserter.push_success(&Bytes::from(U256::from(6u8).abi_encode()));
        assert_eq!(wallet.token_balance_formatted(USDC).await.unwrap(), "250");
    }

    #[tokio::test]
    async fn token_metadata_reads_symbol_and_decimals() {
        let asserter = Asserter::new();
        let wallet = connected_wallet(&asserter, 1, 0).await;

        asserter.push_success(&Bytes::from("USDC".to_string().abi_encode()));
        asserter.push_success(&Bytes::from(U256::from(6u8).abi_encode()));

        let token = wallet.token_metadata(USDC).await.unwrap();
        assert_eq!(token, Erc20Token::new(USDC, "USDC", 6));
    }

    #[tokio::test]
    async fn build_transaction_fills_wallet_state_and_defaults() {
        let asserter = Asserter::new();
        let wallet = connected_wallet(&asserter, 1, 7).await;

        asserter.push_success(&U128::from(3_000_000_000u64)); // eth_gasPrice
        let request = wallet
            .build_transaction(TxParams {
                to: Some(RECIPIENT),
                value: U256::from(5u64),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(request.from, Some(wallet.address()));
        assert_eq!(request.nonce, Some(7));
        assert_eq!(request.chain_id, Some(1));
        assert_eq!(request.gas, Some(DEFAULT_GAS_LIMIT));
        assert_eq!(request.gas_price, Some(3_000_000_000));
        assert_eq!(request.value, Some(U256::from(5u64)));
    }

    #[tokio::test]
    async fn build_and_send_estimates_gas_when_not_pinned() {
        let asserter = Asserter::new();
        let wallet = connected_wallet(&asserter, 1, 0).await;

        asserter.push_success(&U128::from(1_000_000_000u64)); // eth_gasPrice
        asserter.push_success(&U64::from(52_000u64)); // eth_estimateGas
        asserter.push_success(&B256::repeat_byte(0x22)); // eth_sendRawTransaction

        let tx_hash = wallet
            .transfer_token(USDC, RECIPIENT, U256::from(1_000_000u64), None, None)
            .await
            .unwrap();

        assert_eq!(tx_hash, B256::repeat_byte(0x22));
        assert_eq!(wallet.nonce(), 1);
    }

    #[tokio::test]
    async fn switch_network_revalidates_and_refetches_nonce() {
        let asserter = Asserter::new();
        let mut wallet = connected_wallet(&asserter, 1, 7).await;

        let bsc_provider = mocked_provider(&asserter);
        push_connect(&asserter, 56, 3);
        wallet
            .switch_network_with(NetworkInfo::from(Network::Bsc), bsc_provider)
            .await
            .unwrap();

        assert_eq!(wallet.chain_id(), 56);
        assert_eq!(wallet.nonce(), 3);
        assert_eq!(wallet.network().name, "BSC");
        assert_eq!(wallet.native_token(), "BNB");
    }

    #[tokio::test]
    async fn explorer_url_points_at_current_network() {
        let asserter = Asserter::new();
        let wallet = connected_wallet(&asserter, 1, 0).await;

        let tx_hash = B256::repeat_byte(0xab);
        assert_eq!(
            wallet.explorer_url(tx_hash),
            format!("https://etherscan.io/tx/{tx_hash}")
        );
    }

    /// A signed transaction as the RPC layer would return it in a block.
    async fn rpc_tx(from: &KeySigner, to: Address, nonce: u64) -> Transaction {
        let request = TransactionRequest::default()
            .with_from(from.address())
            .with_to(to)
            .with_value(U256::from(1u64))
            .with_nonce(nonce)
            .with_gas_limit(21_000)
            .with_gas_price(1)
            .with_chain_id(1);
        let envelope = request.build(from.wallet()).await.unwrap();

        Transaction {
            inner: Recovered::new_unchecked(envelope, from.address()),
            block_hash: None,
            block_number: Some(1),
            transaction_index: None,
            effective_gas_price: None,
        }
    }

    fn block_with(number: u64, txs: Vec<Transaction>) -> Block {
        let mut inner = ConsensusHeader::default();
        inner.number = number;
        Block {
            header: Header {
                hash: B256::repeat_byte(number as u8 + 1),
                inner,
                total_difficulty: None,
                size: None,
            },
            uncles: vec![],
            transactions: BlockTransactions::Full(txs),
            withdrawals: None,
        }
    }

    #[tokio::test]
    async fn history_scan_keeps_only_transactions_touching_the_account() {
        let asserter = Asserter::new();
        let signer = KeySigner::from_hex(TEST_KEY).unwrap();
        let me = signer.address();
        let stranger = KeySigner::random();

        let mine = rpc_tx(&signer, RECIPIENT, 0).await;
        let incoming = rpc_tx(&stranger, me, 0).await;
        let unrelated = rpc_tx(&stranger, RECIPIENT, 1).await;

        let provider = mocked_provider(&asserter);
        push_connect(&asserter, 1, 0);
        let wallet = Wallet::connect_with(signer, NetworkInfo::from(Network::Ethereum), provider)
            .await
            .unwrap();

        asserter.push_success(&U64::from(1u64)); // eth_blockNumber
        asserter.push_success(&block_with(1, vec![unrelated, incoming.clone()]));
        asserter.push_success(&block_with(0, vec![mine.clone()]));

        let history = wallet.transaction_history(None).await.unwrap();

        // Newest block first, strangers' transfers dropped.
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].tx_hash(), incoming.tx_hash());
        assert_eq!(history[1].tx_hash(), mine.tx_hash());
    }
}
