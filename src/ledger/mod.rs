//! Ledger node integration subsystem.
//!
//! # Data Flow
//! ```text
//! ClientConfig (endpoint, timeouts)
//!     → rpc.rs (JSON-RPC envelopes over HTTP)
//!     → types.rs (camelCase wire shapes)
//!     → client.rs (typed queries, submission, confirmation polling)
//! ```

pub mod client;
pub mod rpc;
pub mod types;

pub use client::LedgerClient;
pub use types::{
    AccountInfo, Block, BlockHeader, BlockTag, LogEntry, LogFilter, NetworkInfo, ReceiptStatus,
    TransactionReceipt,
};
