//! DocRag configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{DocRagError, Result};
use crate::traits::provider::GenerateParams;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocRagConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl DocRagConfig {
    /// Load config from the default path (~/.docrag/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DocRagError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| DocRagError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the DocRag home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".docrag")
    }

    /// Completion request parameters derived from `[llm]`.
    pub fn generate_params(&self) -> GenerateParams {
        GenerateParams {
            model: self.llm.model.clone(),
            temperature: self.llm.temperature,
            max_tokens: self.llm.max_tokens,
            system_prompt: if self.llm.system_prompt.is_empty() {
                None
            } else {
                Some(self.llm.system_prompt.clone())
            },
        }
    }
}

/// Completion service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_provider")]
    pub provider: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// Empty means: look up the provider's env vars.
    #[serde(default)]
    pub api_key: String,
    /// Empty means: registry default.
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
}

fn default_llm_provider() -> String { "openai".into() }
fn default_llm_model() -> String { "gpt-4o-mini".into() }
fn default_max_tokens() -> u32 { 512 }
fn default_system_prompt() -> String {
    "Answer the question using only the provided context. \
     If the context does not contain the answer, say so."
        .into()
}
fn default_http_timeout() -> u64 { 60 }

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            model: default_llm_model(),
            api_key: String::new(),
            endpoint: String::new(),
            temperature: 0.0,
            max_tokens: default_max_tokens(),
            system_prompt: default_system_prompt(),
            timeout_secs: default_http_timeout(),
        }
    }
}

/// Embedder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Registry provider name, or "local" for the offline hashing embedder.
    #[serde(default = "default_embedding_provider")]
    pub provider: String,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub endpoint: String,
    /// Max in-flight embed calls while building the index.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Output size of the local embedder. Remote models decide their own.
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
}

fn default_embedding_provider() -> String { "openai".into() }
fn default_embedding_model() -> String { "text-embedding-3-small".into() }
fn default_concurrency() -> usize { 4 }
fn default_dimensions() -> usize { 256 }

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            model: default_embedding_model(),
            api_key: String::new(),
            endpoint: String::new(),
            concurrency: default_concurrency(),
            dimensions: default_dimensions(),
            timeout_secs: default_http_timeout(),
        }
    }
}

/// Retrieval configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_corpus_path")]
    pub corpus_path: String,
    /// Drop matches scoring below this. Unset keeps the k best regardless.
    #[serde(default)]
    pub min_similarity: Option<f32>,
}

fn default_top_k() -> usize { 3 }
fn default_corpus_path() -> String { "~/.docrag/corpus.json".into() }

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            corpus_path: default_corpus_path(),
            min_similarity: None,
        }
    }
}

/// Interactive session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Per-query budget covering embedding and completion. 0 disables.
    #[serde(default = "default_query_timeout")]
    pub query_timeout_secs: u64,
}

fn default_query_timeout() -> u64 { 120 }

impl Default for SessionConfig {
    fn default() -> Self {
        Self { query_timeout_secs: default_query_timeout() }
    }
}
