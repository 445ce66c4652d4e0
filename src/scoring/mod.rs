//! Scoring service integration: model registry, inference, and consensus
//! proofs over REST.

pub mod client;
pub mod types;

pub use client::ScoringClient;
pub use types::{AiModel, AiProof, BlockPayload, ModelMetadata, Prediction};
