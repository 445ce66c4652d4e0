//! Wire types returned by the ledger node.
//!
//! The node speaks camelCase JSON; every struct here carries the matching
//! serde rename so call sites stay snake_case Rust. Consensus proofs embedded
//! in blocks keep the scoring service's own snake_case field names, exactly
//! as the node relays them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::scoring::AiProof;
use crate::transaction::SignedTransaction;

/// Node identity and sync state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    pub name: String,
    pub network_id: String,
    pub chain_id: String,
    pub protocol_version: String,
    pub block_height: u64,
    pub consensus_mechanism: String,
    pub peer_count: u64,
    pub is_syncing: bool,
}

/// Header of a sealed block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockHeader {
    pub version: u32,
    pub prev_hash: String,
    pub merkle_root: String,
    pub timestamp: u64,
    pub height: u64,
    pub difficulty: u64,
    pub nonce: u64,
    pub shard_id: u32,
}

/// A sealed block with its transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub header: BlockHeader,
    pub hash: String,
    pub transactions: Vec<SignedTransaction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator_signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_proof: Option<AiProof>,
}

/// Account state as reported by the node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub address: String,
    pub balance: String,
    pub nonce: u64,
    pub is_contract: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<HashMap<String, String>>,
}

/// Execution outcome carried in a receipt; 1/0 on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStatus {
    Success,
    Failure,
}

impl ReceiptStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ReceiptStatus::Success)
    }
}

impl Serialize for ReceiptStatus {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(match self {
            ReceiptStatus::Success => 1,
            ReceiptStatus::Failure => 0,
        })
    }
}

impl<'de> Deserialize<'de> for ReceiptStatus {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            1 => Ok(ReceiptStatus::Success),
            0 => Ok(ReceiptStatus::Failure),
            other => Err(serde::de::Error::custom(format!(
                "invalid receipt status {}",
                other
            ))),
        }
    }
}

/// Inclusion proof for a processed transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: String,
    pub block_hash: String,
    pub block_height: u64,
    pub transaction_index: u32,
    pub from: String,
    pub to: String,
    /// Assigned address, present only for deployments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    pub gas_used: String,
    pub status: ReceiptStatus,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
    /// Blocks sealed on top of the including block, per the node's view at
    /// response time.
    pub confirmations: u64,
}

/// Raw log entry attached to a receipt or returned by a log query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub address: String,
    pub topics: Vec<String>,
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_height: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_index: Option<u32>,
}

/// Block reference accepted by query RPCs: a concrete height or the tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    Height(u64),
    Latest,
}

impl From<u64> for BlockTag {
    fn from(height: u64) -> Self {
        BlockTag::Height(height)
    }
}

impl Serialize for BlockTag {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        match self {
            BlockTag::Height(height) => serializer.serialize_u64(*height),
            BlockTag::Latest => serializer.serialize_str("latest"),
        }
    }
}

/// Filter accepted by the log query RPC.
///
/// Topics are positional: index 0 is the event topic, later indexes
/// constrain indexed parameters. `None` serializes as null, a wildcard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFilter {
    pub address: String,
    pub topics: Vec<Option<String>>,
    pub from_block: BlockTag,
    pub to_block: BlockTag,
}
