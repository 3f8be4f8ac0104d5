//! # DocRag Providers
//!
//! External collaborators for DocRag.
//!
//! Every OpenAI-compatible service (OpenAI, Mistral, Gemini, Ollama, llama.cpp,
//! vLLM, ...) is handled by a single `OpenAiCompatibleProvider`, which acts as
//! both completion provider and embedder. `HashingEmbedder` is an offline
//! fallback that needs no service at all.

pub mod local;
pub mod openai_compatible;
pub mod provider_registry;

use docrag_core::config::DocRagConfig;
use docrag_core::error::{DocRagError, Result};
use docrag_core::traits::{Embedder, Provider};

use openai_compatible::{ConnectionSettings, OpenAiCompatibleProvider};

/// Create the completion provider named by `[llm] provider`.
pub fn create_provider(config: &DocRagConfig) -> Result<Box<dyn Provider>> {
    let settings = ConnectionSettings::from(&config.llm);
    let provider = connect(&config.llm.provider, &settings)?;
    tracing::debug!("🤖 Completion provider: {}", config.llm.provider);
    Ok(Box::new(provider))
}

/// Create the embedder named by `[embedding] provider`.
pub fn create_embedder(config: &DocRagConfig) -> Result<Box<dyn Embedder>> {
    let name = config.embedding.provider.as_str();
    if name == "local" {
        return Ok(Box::new(local::HashingEmbedder::new(config.embedding.dimensions)?));
    }

    let settings = ConnectionSettings::from(&config.embedding);
    let provider = connect(name, &settings)?;
    if !provider.supports_embeddings() {
        return Err(DocRagError::ProviderNotFound(format!(
            "{name} has no embeddings endpoint (try one of: {})",
            embedding_providers().join(", ")
        )));
    }
    Ok(Box::new(provider))
}

fn connect(name: &str, settings: &ConnectionSettings) -> Result<OpenAiCompatibleProvider> {
    match name {
        // Custom endpoint: "custom:https://my-server.com/v1"
        other if other.starts_with("custom:") => {
            OpenAiCompatibleProvider::custom(other, settings)
        }
        _ => {
            let registry = provider_registry::get_provider_config(name)
                .ok_or_else(|| {
                    DocRagError::ProviderNotFound(format!(
                        "{name} (try one of: {})",
                        available_providers().join(", ")
                    ))
                })?;
            OpenAiCompatibleProvider::from_registry(registry, settings)
        }
    }
}

/// List all available completion provider names.
pub fn available_providers() -> Vec<&'static str> {
    let mut names = provider_registry::all_provider_names();
    names.push("custom");
    names
}

/// List all available embedder names.
pub fn embedding_providers() -> Vec<&'static str> {
    let mut names = provider_registry::embedding_provider_names();
    names.push("local");
    names.push("custom");
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_embedder() {
        let mut config = DocRagConfig::default();
        config.embedding.provider = "local".into();
        config.embedding.dimensions = 32;
        let e = create_embedder(&config).unwrap();
        assert_eq!(e.identity(), "local/hash-32");
    }

    #[test]
    fn test_unknown_provider() {
        let mut config = DocRagConfig::default();
        config.llm.provider = "nonexistent".into();
        let err = create_provider(&config).err().unwrap();
        assert!(matches!(err, DocRagError::ProviderNotFound(_)));
        let msg = err.to_string();
        assert!(msg.contains("nonexistent"), "{msg}");
        assert!(msg.contains("openai") && msg.contains("custom"), "{msg}");
    }

    #[test]
    fn test_embedder_requires_endpoint() {
        let mut config = DocRagConfig::default();
        config.embedding.provider = "groq".into();
        let err = create_embedder(&config).err().unwrap();
        assert!(err.to_string().contains("no embeddings endpoint"));
    }

    #[test]
    fn test_custom_provider() {
        let mut config = DocRagConfig::default();
        config.llm.provider = "custom:http://localhost:1234/v1".into();
        assert_eq!(create_provider(&config).unwrap().name(), "custom");
    }

    #[test]
    fn test_provider_lists() {
        assert!(available_providers().contains(&"custom"));
        assert!(embedding_providers().contains(&"local"));
        assert!(!embedding_providers().contains(&"deepseek"));
    }
}
