//! Unified OpenAI-compatible provider.
//!
//! One struct serves both collaborator roles: chat completions for answers and
//! `/embeddings` for vectors. Services differ only by endpoint URL, auth style
//! and API key.

use std::time::Duration;

use async_trait::async_trait;
use docrag_core::config::{EmbeddingConfig, LlmConfig};
use docrag_core::error::{DocRagError, Result};
use docrag_core::traits::provider::{GenerateParams, Provider};
use docrag_core::traits::Embedder;
use docrag_core::types::{EmbeddingVector, Message, ProviderResponse, Usage};
use serde_json::{Value, json};

use crate::provider_registry::{AuthStyle, ProviderConfig};

/// Connection settings shared by the `[llm]` and `[embedding]` sections.
#[derive(Debug, Clone, Default)]
pub struct ConnectionSettings {
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl From<&LlmConfig> for ConnectionSettings {
    fn from(c: &LlmConfig) -> Self {
        Self {
            api_key: c.api_key.clone(),
            endpoint: c.endpoint.clone(),
            model: c.model.clone(),
            timeout_secs: c.timeout_secs,
        }
    }
}

impl From<&EmbeddingConfig> for ConnectionSettings {
    fn from(c: &EmbeddingConfig) -> Self {
        Self {
            api_key: c.api_key.clone(),
            endpoint: c.endpoint.clone(),
            model: c.model.clone(),
            timeout_secs: c.timeout_secs,
        }
    }
}

/// A provider that works with any OpenAI-compatible API.
pub struct OpenAiCompatibleProvider {
    /// Provider name (e.g., "openai", "ollama").
    name: String,
    api_key: String,
    /// e.g. "https://api.openai.com/v1"
    base_url: String,
    chat_path: String,
    embeddings_path: Option<String>,
    /// Model used for embeddings. Chat takes its model from `GenerateParams`.
    model: String,
    auth_style: AuthStyle,
    client: reqwest::Client,
}

impl OpenAiCompatibleProvider {
    /// Create from a known provider config.
    ///
    /// Resolution order:
    /// - API key: settings > env vars > empty
    /// - Base URL: settings endpoint > env override > registry default
    pub fn from_registry(registry: &ProviderConfig, settings: &ConnectionSettings) -> Result<Self> {
        let api_key = if !settings.api_key.is_empty() {
            settings.api_key.clone()
        } else {
            registry
                .env_keys
                .iter()
                .find_map(|key| std::env::var(key).ok())
                .unwrap_or_default()
        };

        let base_url = if !settings.endpoint.is_empty() {
            settings.endpoint.trim_end_matches('/').to_string()
        } else {
            registry
                .base_url_env
                .and_then(|env_key| {
                    let val = std::env::var(env_key).ok()?;
                    // OLLAMA_HOST and friends usually omit the /v1 suffix.
                    if val.ends_with("/v1") {
                        Some(val)
                    } else {
                        Some(format!("{}/v1", val.trim_end_matches('/')))
                    }
                })
                .unwrap_or_else(|| registry.base_url.to_string())
        };

        Ok(Self {
            name: registry.name.to_string(),
            api_key,
            base_url,
            chat_path: registry.chat_path.to_string(),
            embeddings_path: registry.embeddings_path.map(String::from),
            model: settings.model.clone(),
            auth_style: registry.auth_style,
            client: build_client(settings.timeout_secs)?,
        })
    }

    /// Create for a custom endpoint (e.g., "custom:https://my-server.com/v1").
    pub fn custom(endpoint: &str, settings: &ConnectionSettings) -> Result<Self> {
        let base_url = endpoint
            .strip_prefix("custom:")
            .unwrap_or(endpoint)
            .trim_end_matches('/')
            .to_string();

        let api_key = if !settings.api_key.is_empty() {
            settings.api_key.clone()
        } else {
            std::env::var("CUSTOM_API_KEY").unwrap_or_default()
        };

        let auth_style = if api_key.is_empty() {
            AuthStyle::None
        } else {
            AuthStyle::Bearer
        };

        Ok(Self {
            name: "custom".to_string(),
            api_key,
            base_url,
            chat_path: "/chat/completions".to_string(),
            embeddings_path: Some("/embeddings".to_string()),
            model: settings.model.clone(),
            auth_style,
            client: build_client(settings.timeout_secs)?,
        })
    }

    pub fn supports_embeddings(&self) -> bool {
        self.embeddings_path.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.auth_style {
            AuthStyle::Bearer if !self.api_key.is_empty() => {
                req.header("Authorization", format!("Bearer {}", self.api_key))
            }
            _ => req,
        }
    }

    fn check_key(&self) -> Result<()> {
        if self.auth_style != AuthStyle::None && self.api_key.is_empty() {
            return Err(DocRagError::ApiKeyMissing(self.name.clone()));
        }
        Ok(())
    }

    /// POST `body` to `path`, returning the parsed JSON or a message describing the failure.
    async fn post_json(&self, path: &str, body: &Value) -> std::result::Result<Value, String> {
        let url = format!("{}{}", self.base_url, path);
        let req = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body);
        let resp = self
            .apply_auth(req)
            .send()
            .await
            .map_err(|e| format!("{} connection failed ({}): {}", self.name, url, e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(format!("{} API error {}: {}", self.name, status, text));
        }

        resp.json()
            .await
            .map_err(|e| format!("{} returned invalid JSON: {}", self.name, e))
    }
}

fn build_client(timeout_secs: u64) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if timeout_secs > 0 {
        builder = builder.timeout(Duration::from_secs(timeout_secs));
    }
    builder.build().map_err(|e| DocRagError::Http(e.to_string()))
}

/// Pull the first choice out of a chat completion response.
pub fn parse_chat_response(json: &Value) -> Result<ProviderResponse> {
    let choice = json["choices"]
        .get(0)
        .ok_or_else(|| DocRagError::Completion("No choices in response".into()))?;

    let usage = json["usage"].as_object().map(|u| Usage {
        prompt_tokens: u.get("prompt_tokens").and_then(|v| v.as_u64()).unwrap_or(0) as u32,
        completion_tokens: u
            .get("completion_tokens")
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as u32,
        total_tokens: u.get("total_tokens").and_then(|v| v.as_u64()).unwrap_or(0) as u32,
    });

    Ok(ProviderResponse {
        content: choice["message"]["content"].as_str().map(String::from),
        finish_reason: choice["finish_reason"].as_str().map(String::from),
        usage,
    })
}

/// Pull `data[0].embedding` out of an embeddings response.
pub fn parse_embedding_response(json: &Value) -> Result<EmbeddingVector> {
    let values = json["data"]
        .get(0)
        .and_then(|d| d["embedding"].as_array())
        .ok_or_else(|| DocRagError::Embedding("No embedding in response".into()))?;

    let vector: EmbeddingVector = values
        .iter()
        .map(|v| v.as_f64().map(|f| f as f32))
        .collect::<Option<_>>()
        .ok_or_else(|| DocRagError::Embedding("Non-numeric embedding value".into()))?;

    if vector.is_empty() {
        return Err(DocRagError::Embedding("Empty embedding".into()));
    }
    Ok(vector)
}

#[async_trait]
impl Provider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn chat(&self, messages: &[Message], params: &GenerateParams) -> Result<ProviderResponse> {
        self.check_key()?;

        let body = json!({
            "model": params.model,
            "temperature": params.temperature,
            "max_tokens": params.max_tokens,
            "messages": messages,
        });

        let json = self.post_json(&self.chat_path, &body).await.map_err(|e| {
            tracing::warn!("⚠️ {e}");
            DocRagError::Completion(e)
        })?;
        parse_chat_response(&json)
    }
}

#[async_trait]
impl Embedder for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> Result<EmbeddingVector> {
        self.check_key()
            .map_err(|e| DocRagError::Embedding(e.to_string()))?;
        let path = self.embeddings_path.as_deref().ok_or_else(|| {
            DocRagError::Embedding(format!("{} has no embeddings endpoint", self.name))
        })?;

        let body = json!({
            "model": self.model,
            "input": text,
        });

        let json = self.post_json(path, &body).await.map_err(|e| {
            tracing::warn!("⚠️ {e}");
            DocRagError::Embedding(e)
        })?;
        parse_embedding_response(&json)
    }
}
