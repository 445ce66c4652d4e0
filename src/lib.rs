//! Client SDK for a JSON-RPC ledger node and its AI scoring service.

pub mod config;
pub mod contract;
pub mod error;
pub mod ledger;
pub mod scoring;
pub mod transaction;
pub mod wallet;

pub use config::ClientConfig;
pub use contract::{Abi, AbiValue, Contract, DecodedEvent};
pub use error::{Error, Result};
pub use ledger::{BlockTag, LedgerClient, ReceiptStatus};
pub use scoring::ScoringClient;
pub use transaction::{SignedTransaction, Transaction, TransactionKind};
pub use wallet::Wallet;
