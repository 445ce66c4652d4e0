//! Ledger node client: typed queries, submission, confirmation polling.
//!
//! # Responsibilities
//! - Wrap the JSON-RPC transport in typed query methods
//! - Drive the submission path: validate, fill nonce and fee, sign, send
//! - Poll for confirmations with a bounded deadline
//!
//! # Design Decisions
//! - The wallet is optional: a client without one serves reads and fails
//!   signing paths with [`Error::WalletNotConfigured`] before any I/O
//! - Nonce and fee are filled at submission time from live node state,
//!   never cached client-side

use std::time::Duration;

use serde_json::json;
use tokio::time::{interval, timeout};

use crate::config::ClientConfig;
use crate::contract::{Abi, AbiValue, Contract};
use crate::error::{Error, Result};
use crate::ledger::rpc::RpcTransport;
use crate::ledger::types::{
    AccountInfo, Block, BlockTag, LogEntry, LogFilter, NetworkInfo, TransactionReceipt,
};
use crate::transaction::{validate_address, validate_hash, SignedTransaction, Transaction};
use crate::wallet::Wallet;

/// Client for a single ledger node.
#[derive(Debug)]
pub struct LedgerClient {
    rpc: RpcTransport,
    config: ClientConfig,
    wallet: Option<Wallet>,
}

impl LedgerClient {
    /// Create a read-only client with no signing capability.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let rpc = RpcTransport::new(
            &config.node_url,
            Duration::from_secs(config.request_timeout_secs),
        )?;

        Ok(Self {
            rpc,
            config,
            wallet: None,
        })
    }

    /// Create a client that signs and submits with `wallet`.
    pub fn with_wallet(config: ClientConfig, wallet: Wallet) -> Result<Self> {
        let mut client = Self::new(config)?;
        tracing::info!(address = %wallet.address(), "Ledger client configured with wallet");
        client.wallet = Some(wallet);
        Ok(client)
    }

    /// The attached wallet, if any.
    pub fn wallet(&self) -> Option<&Wallet> {
        self.wallet.as_ref()
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Node identity and sync state.
    pub async fn network_info(&self) -> Result<NetworkInfo> {
        self.rpc.call("getNetworkInfo", json!([])).await
    }

    /// The current chain tip.
    pub async fn latest_block(&self) -> Result<Block> {
        self.rpc.call("getLatestBlock", json!([])).await
    }

    /// Block lookup by hash; `None` when the node does not know it.
    pub async fn block_by_hash(&self, hash: &str) -> Result<Option<Block>> {
        validate_hash(hash)?;
        self.rpc.call("getBlockByHash", json!([hash])).await
    }

    /// Block lookup by height; `None` above the current tip.
    pub async fn block_by_height(&self, height: u64) -> Result<Option<Block>> {
        self.rpc.call("getBlockByHeight", json!([height])).await
    }

    /// Account state: balance, nonce, and contract metadata.
    pub async fn account(&self, address: &str) -> Result<AccountInfo> {
        validate_address(address)?;
        self.rpc.call("getAccount", json!([address])).await
    }

    /// Transaction lookup by hash; `None` when unknown to the node.
    pub async fn transaction_by_hash(&self, hash: &str) -> Result<Option<SignedTransaction>> {
        validate_hash(hash)?;
        self.rpc.call("getTransactionByHash", json!([hash])).await
    }

    /// Receipt lookup; `None` means the transaction is still pending.
    pub async fn transaction_receipt(
        &self,
        hash: &str,
    ) -> Result<Option<TransactionReceipt>> {
        validate_hash(hash)?;
        self.rpc
            .call("getTransactionReceipt", json!([hash]))
            .await
    }

    /// Ask the node for a fee estimate for `tx`.
    pub async fn estimate_gas(&self, tx: &Transaction) -> Result<String> {
        self.rpc.call("estimateGas", json!([tx])).await
    }

    /// Execute a read-only call against the state at `block`.
    pub async fn call_at(&self, descriptor: &Transaction, block: BlockTag) -> Result<String> {
        self.rpc.call("call", json!([descriptor, block])).await
    }

    /// Fetch raw log entries matching `filter`.
    pub async fn logs(&self, filter: &LogFilter) -> Result<Vec<LogEntry>> {
        let entries: Option<Vec<LogEntry>> = self.rpc.call("getLogs", json!([filter])).await?;
        Ok(entries.unwrap_or_default())
    }

    /// Convenience: a transfer record whose sender is the configured wallet.
    pub fn create_transfer(&self, to: &str, amount: &str) -> Result<Transaction> {
        let wallet = self.wallet.as_ref().ok_or(Error::WalletNotConfigured)?;
        Ok(Transaction::transfer(&wallet.address(), to, amount))
    }

    /// Sign and submit a transaction record, returning the node-reported
    /// hash.
    ///
    /// Requires a wallet. The record is validated before any network
    /// activity; nonce and fee are filled from node state only when the
    /// caller left them unset.
    pub async fn submit(&self, tx: Transaction) -> Result<String> {
        let wallet = self.wallet.as_ref().ok_or(Error::WalletNotConfigured)?;
        tx.validate()?;

        // Two submissions racing from the same account can still pick the
        // same nonce; callers needing strict ordering serialize externally.
        let tx = match tx.nonce {
            Some(_) => tx,
            None => {
                let account = self.account(&tx.from).await?;
                tx.with_nonce(account.nonce)
            }
        };
        let tx = match tx.fee {
            Some(_) => tx,
            None => {
                let fee = self.estimate_gas(&tx).await?;
                tx.with_fee(&fee)
            }
        };

        let signed = wallet.sign_transaction(&tx).await?;
        let hash: String = self.rpc.call("sendRawTransaction", json!([signed])).await?;

        tracing::info!(hash = %hash, kind = ?tx.kind, "Transaction submitted");
        Ok(hash)
    }

    /// Poll until `tx_hash` has at least `required` confirmations.
    ///
    /// Bounded by `confirmation_timeout_secs` from the client config; use
    /// [`Self::await_confirmation_with_deadline`] for explicit control.
    pub async fn await_confirmation(
        &self,
        tx_hash: &str,
        required: u64,
    ) -> Result<TransactionReceipt> {
        self.await_confirmation_with_deadline(
            tx_hash,
            required,
            Some(Duration::from_secs(self.config.confirmation_timeout_secs)),
        )
        .await
    }

    /// Poll for confirmation with an explicit deadline; `None` polls until
    /// the threshold is met.
    ///
    /// Transient fetch errors keep the loop alive. A malformed hash is the
    /// only input rejected up front.
    pub async fn await_confirmation_with_deadline(
        &self,
        tx_hash: &str,
        required: u64,
        deadline: Option<Duration>,
    ) -> Result<TransactionReceipt> {
        validate_hash(tx_hash)?;

        let poll_interval = Duration::from_millis(self.config.poll_interval_ms);
        let poll = async {
            let mut ticker = interval(poll_interval);

            loop {
                ticker.tick().await;

                match self.transaction_receipt(tx_hash).await {
                    Ok(Some(receipt)) if receipt.confirmations >= required => {
                        tracing::debug!(
                            tx_hash = %tx_hash,
                            confirmations = receipt.confirmations,
                            "Transaction confirmed"
                        );
                        return Ok(receipt);
                    }
                    Ok(Some(receipt)) => {
                        tracing::debug!(
                            tx_hash = %tx_hash,
                            confirmations = receipt.confirmations,
                            required = required,
                            "Waiting for confirmations"
                        );
                    }
                    Ok(None) => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                    }
                    // The deadline bounds how long transient failures can
                    // keep the loop alive.
                    Err(e) => {
                        tracing::warn!(
                            tx_hash = %tx_hash,
                            error = %e,
                            "Receipt fetch failed, retrying"
                        );
                    }
                }
            }
        };

        match deadline {
            Some(limit) => match timeout(limit, poll).await {
                Ok(result) => result,
                Err(_) => Err(Error::Timeout(limit.as_secs())),
            },
            None => poll.await,
        }
    }

    /// Deploy a contract and wait for its address.
    ///
    /// Submits the bytecode (with encoded constructor arguments appended),
    /// waits for one confirmation, and returns the assigned address with
    /// the receipt. A confirmed receipt without an address is a failed
    /// deployment.
    pub async fn deploy_contract(
        &self,
        abi_json: &str,
        bytecode: &str,
        constructor_args: &[AbiValue],
    ) -> Result<(String, TransactionReceipt)> {
        let wallet = self.wallet.as_ref().ok_or(Error::WalletNotConfigured)?;
        let abi = Abi::parse(abi_json)?;
        let data = abi.encode_constructor(bytecode, constructor_args)?;

        let tx = Transaction::deploy(&wallet.address(), &data);
        let hash = self.submit(tx).await?;
        let receipt = self.await_confirmation(&hash, 1).await?;

        let address = receipt
            .contract_address
            .clone()
            .ok_or(Error::DeploymentFailed)?;

        tracing::info!(address = %address, hash = %hash, "Contract deployed");
        Ok((address, receipt))
    }

    /// Bind a deployed contract for ABI-aware interaction.
    pub fn contract(&self, address: &str, abi_json: &str) -> Result<Contract<'_>> {
        Contract::new(self, address, abi_json)
    }
}
