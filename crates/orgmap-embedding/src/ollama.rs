//! Ollama HTTP client for query embedding.
//!
//! Talks to the Ollama API at /api/embeddings. Only query-time embedding
//! is needed here; the index itself is populated elsewhere.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment variable overriding the Ollama base URL.
pub const OLLAMA_URL_ENV: &str = "ORGMAP_OLLAMA_URL";

/// Default Ollama API URL.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Default embedding model.
pub const DEFAULT_MODEL: &str = "nomic-embed-text";

/// Embedding dimension produced by the default model.
pub const EMBEDDING_DIM: usize = 768;

/// Configuration for the embedding client.
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl EmbeddingConfig {
    /// Read the base URL from the environment, keeping model defaults.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var(OLLAMA_URL_ENV).unwrap_or_else(|_| DEFAULT_OLLAMA_URL.to_string()),
            ..Self::default()
        }
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

/// Ollama embedding client.
#[derive(Clone)]
pub struct OllamaClient {
    config: EmbeddingConfig,
    client: reqwest::Client,
}

impl OllamaClient {
    pub fn new(config: EmbeddingConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Self {
            config: EmbeddingConfig { base_url, ..config },
            client,
        }
    }

    /// Embed a search query into a dense vector.
    pub async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.config.model,
            prompt: text,
        };

        let response = self
            .client
            .post(format!("{}/api/embeddings", self.config.base_url))
            .json(&request)
            .send()
            .await
            .context("Failed to connect to Ollama")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Ollama API error ({}): {}", status, body);
        }

        let result: EmbeddingResponse = response
            .json()
            .await
            .context("Failed to parse Ollama response")?;

        debug!(dim = result.embedding.len(), "Embedded search query");
        Ok(result.embedding)
    }

    /// Check that Ollama is up and the configured model is present.
    pub async fn health_check(&self) -> bool {
        let response = self
            .client
            .get(format!("{}/api/tags", self.config.base_url))
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                let text = resp.text().await.unwrap_or_default();
                text.contains(&self.config.model)
            }
            _ => false,
        }
    }
}
