//! REST client for the model registry and consensus-proof endpoints.
//!
//! # Responsibilities
//! - Model registry: list, fetch, register (multipart upload), delete
//! - Inference: run predictions through registered models
//! - Consensus: generate and verify proofs over block payloads
//!
//! Independent from the ledger client; the two share only configuration.

use std::time::Duration;

use reqwest::multipart;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::scoring::types::{AiModel, AiProof, BlockPayload, ModelMetadata, Prediction};

#[derive(Debug, Deserialize)]
struct ModelList {
    models: Vec<AiModel>,
}

#[derive(Debug, Deserialize)]
struct RegisterResponse {
    model_id: String,
}

#[derive(Debug, Deserialize)]
struct DeleteResponse {
    success: bool,
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    is_valid: bool,
}

/// Client for the scoring service.
#[derive(Debug, Clone)]
pub struct ScoringClient {
    http: reqwest::Client,
    base_url: String,
}

impl ScoringClient {
    /// Build a client from shared configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| Error::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.scoring_url.trim_end_matches('/').to_string(),
        })
    }

    /// List registered models, optionally filtered by owner and tag.
    pub async fn list_models(
        &self,
        owner: Option<&str>,
        tag: Option<&str>,
    ) -> Result<Vec<AiModel>> {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(owner) = owner {
            query.push(("owner", owner));
        }
        if let Some(tag) = tag {
            query.push(("tag", tag));
        }

        let response = self
            .http
            .get(format!("{}/models/list", self.base_url))
            .query(&query)
            .send()
            .await
            .map_err(transport)?;
        let list: ModelList = Self::decode(response).await?;
        Ok(list.models)
    }

    /// Fetch one model's registry record.
    pub async fn model(&self, model_id: &str) -> Result<AiModel> {
        let response = self
            .http
            .get(format!("{}/models/{}", self.base_url, model_id))
            .send()
            .await
            .map_err(transport)?;
        Self::decode(response).await
    }

    /// Upload and register a model file, returning its assigned id.
    ///
    /// The registry expects a multipart form: the file part plus metadata
    /// fields, with tags as a JSON-encoded array.
    pub async fn register_model(
        &self,
        file_name: &str,
        contents: Vec<u8>,
        metadata: &ModelMetadata,
    ) -> Result<String> {
        let tags = serde_json::to_string(&metadata.tags)
            .map_err(|e| Error::Transport(format!("Failed to encode tags: {}", e)))?;
        let form = multipart::Form::new()
            .part(
                "file",
                multipart::Part::bytes(contents).file_name(file_name.to_string()),
            )
            .text("name", metadata.name.clone())
            .text("description", metadata.description.clone())
            .text("owner", metadata.owner.clone())
            .text("model_type", metadata.model_type.clone())
            .text("tags", tags);

        let response = self
            .http
            .post(format!("{}/models/register", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        let registered: RegisterResponse = Self::decode(response).await?;

        tracing::info!(model_id = %registered.model_id, "Model registered");
        Ok(registered.model_id)
    }

    /// Remove a model; only its owner may do so.
    pub async fn delete_model(&self, model_id: &str, owner: &str) -> Result<bool> {
        let response = self
            .http
            .delete(format!("{}/models/{}", self.base_url, model_id))
            .query(&[("owner", owner)])
            .send()
            .await
            .map_err(transport)?;
        let deleted: DeleteResponse = Self::decode(response).await?;
        Ok(deleted.success)
    }

    /// Run inference through a registered model.
    pub async fn predict(
        &self,
        model_id: &str,
        inputs: Vec<serde_json::Value>,
        user_address: Option<&str>,
    ) -> Result<Prediction> {
        let response = self
            .http
            .post(format!("{}/models/predict", self.base_url))
            .json(&json!({
                "model_id": model_id,
                "input_data": inputs,
                "user_address": user_address,
            }))
            .send()
            .await
            .map_err(transport)?;
        Self::decode(response).await
    }

    /// Generate a consensus proof over `payload`.
    pub async fn generate_proof(
        &self,
        payload: &BlockPayload,
        model_id: Option<&str>,
    ) -> Result<AiProof> {
        let response = self
            .http
            .post(format!("{}/consensus/generate_proof", self.base_url))
            .json(&json!({
                "block_data": payload,
                "model_id": model_id,
            }))
            .send()
            .await
            .map_err(transport)?;
        Self::decode(response).await
    }

    /// Verify that `proof` covers `payload`.
    pub async fn verify_proof(&self, payload: &BlockPayload, proof: &AiProof) -> Result<bool> {
        let response = self
            .http
            .post(format!("{}/consensus/verify_proof", self.base_url))
            .json(&json!({
                "block_data": payload,
                "proof": proof,
            }))
            .send()
            .await
            .map_err(transport)?;
        let verdict: VerifyResponse = Self::decode(response).await?;
        Ok(verdict.is_valid)
    }

    /// Map a response to the expected type, surfacing error statuses with
    /// their body text intact.
    async fn decode<R: DeserializeOwned>(response: reqwest::Response) -> Result<R> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(Error::RemoteService {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| Error::Transport(format!("Malformed scoring response: {}", e)))
    }
}

fn transport(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Transport(format!("Scoring request timed out: {}", e))
    } else {
        Error::Transport(format!("Scoring request failed: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let config = ClientConfig {
            scoring_url: "http://localhost:8000/".to_string(),
            ..ClientConfig::default()
        };
        let client = ScoringClient::new(&config).unwrap();
        assert_eq!(client.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = ClientConfig {
            scoring_url: "::".to_string(),
            ..ClientConfig::default()
        };
        assert!(matches!(
            ScoringClient::new(&config).unwrap_err(),
            Error::Config(_)
        ));
    }
}
