//! Wire types for the scoring service.
//!
//! The service speaks snake_case JSON, so these map 1:1 without renames.
//! That casing follows the types into blocks: a proof embedded by the node
//! keeps these field names.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metadata supplied when registering a model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub name: String,
    pub description: String,
    /// Owner's ledger address.
    pub owner: String,
    /// Runtime family, e.g. "tensorflow" or "pytorch".
    pub model_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A registered model as reported by the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiModel {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner: String,
    pub model_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: u64,
    pub file_path: String,
    pub size_bytes: u64,
    /// SHA-256 of the stored model file.
    pub hash: String,
}

/// Consensus proof over a block payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiProof {
    pub nonce: u64,
    pub hash: String,
    pub confidence: f64,
    pub timestamp: u64,
    pub model_id: String,
    /// Set by verification; generation leaves it absent.
    #[serde(default)]
    pub is_valid: bool,
}

/// Block payload a proof is generated over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockPayload {
    pub height: u64,
    pub prev_hash: String,
    pub timestamp: u64,
    #[serde(default)]
    pub transactions: Vec<Value>,
}

/// Model inference output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub model_id: String,
    pub predictions: Vec<Value>,
    /// Wall-clock inference duration in seconds.
    pub inference_time: f64,
    pub timestamp: u64,
}
