//! Provider registry: maps provider names to endpoint configurations.
//!
//! All OpenAI-compatible services are static entries here; the unified
//! `OpenAiCompatibleProvider` reads them to connect.

/// How to attach auth credentials to requests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AuthStyle {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// No authentication required (local servers).
    None,
}

/// Configuration for a single provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub name: &'static str,
    pub base_url: &'static str,
    /// Appended to `base_url` for chat completions.
    pub chat_path: &'static str,
    /// Appended to `base_url` for embeddings. `None` if the service has none.
    pub embeddings_path: Option<&'static str>,
    /// Environment variables tried in order for the API key.
    pub env_keys: &'static [&'static str],
    pub auth_style: AuthStyle,
    /// Environment variable overriding the base URL (e.g. OLLAMA_HOST).
    pub base_url_env: Option<&'static str>,
}

// ─── Registry ────────────────────────────────────────────────────────────────

static PROVIDERS: &[ProviderConfig] = &[
    ProviderConfig {
        name: "openai",
        base_url: "https://api.openai.com/v1",
        chat_path: "/chat/completions",
        embeddings_path: Some("/embeddings"),
        env_keys: &["OPENAI_API_KEY"],
        auth_style: AuthStyle::Bearer,
        base_url_env: Some("OPENAI_API_BASE"),
    },
    ProviderConfig {
        name: "openrouter",
        base_url: "https://openrouter.ai/api/v1",
        chat_path: "/chat/completions",
        embeddings_path: None,
        env_keys: &["OPENROUTER_API_KEY", "OPENAI_API_KEY"],
        auth_style: AuthStyle::Bearer,
        base_url_env: None,
    },
    ProviderConfig {
        name: "mistral",
        base_url: "https://api.mistral.ai/v1",
        chat_path: "/chat/completions",
        embeddings_path: Some("/embeddings"),
        env_keys: &["MISTRAL_API_KEY"],
        auth_style: AuthStyle::Bearer,
        base_url_env: None,
    },
    ProviderConfig {
        name: "together",
        base_url: "https://api.together.xyz/v1",
        chat_path: "/chat/completions",
        embeddings_path: Some("/embeddings"),
        env_keys: &["TOGETHER_API_KEY"],
        auth_style: AuthStyle::Bearer,
        base_url_env: None,
    },
    ProviderConfig {
        name: "gemini",
        base_url: "https://generativelanguage.googleapis.com/v1beta/openai",
        chat_path: "/chat/completions",
        embeddings_path: Some("/embeddings"),
        env_keys: &["GEMINI_API_KEY", "GOOGLE_API_KEY"],
        auth_style: AuthStyle::Bearer,
        base_url_env: None,
    },
    ProviderConfig {
        name: "groq",
        base_url: "https://api.groq.com/openai/v1",
        chat_path: "/chat/completions",
        embeddings_path: None,
        env_keys: &["GROQ_API_KEY"],
        auth_style: AuthStyle::Bearer,
        base_url_env: None,
    },
    ProviderConfig {
        name: "deepseek",
        base_url: "https://api.deepseek.com",
        chat_path: "/chat/completions",
        embeddings_path: None,
        env_keys: &["DEEPSEEK_API_KEY"],
        auth_style: AuthStyle::Bearer,
        base_url_env: None,
    },
    ProviderConfig {
        name: "ollama",
        base_url: "http://localhost:11434/v1",
        chat_path: "/chat/completions",
        embeddings_path: Some("/embeddings"),
        env_keys: &[],
        auth_style: AuthStyle::None,
        base_url_env: Some("OLLAMA_HOST"),
    },
    ProviderConfig {
        name: "llamacpp",
        base_url: "http://localhost:8080/v1",
        chat_path: "/chat/completions",
        embeddings_path: Some("/embeddings"),
        env_keys: &[],
        auth_style: AuthStyle::None,
        base_url_env: Some("LLAMACPP_HOST"),
    },
    ProviderConfig {
        name: "vllm",
        base_url: "http://localhost:8000/v1",
        chat_path: "/chat/completions",
        embeddings_path: Some("/embeddings"),
        env_keys: &["VLLM_API_KEY"],
        auth_style: AuthStyle::None,
        base_url_env: Some("VLLM_HOST"),
    },
];

/// Look up a provider config by name.
pub fn get_provider_config(name: &str) -> Option<&'static ProviderConfig> {
    let lookup = match name {
        "google" => "gemini",
        "llama.cpp" => "llamacpp",
        "together_ai" | "togetherai" => "together",
        other => other,
    };
    PROVIDERS.iter().find(|p| p.name == lookup)
}

/// List all known provider names.
pub fn all_provider_names() -> Vec<&'static str> {
    PROVIDERS.iter().map(|p| p.name).collect()
}

/// Providers that expose an embeddings endpoint.
pub fn embedding_provider_names() -> Vec<&'static str> {
    PROVIDERS
        .iter()
        .filter(|p| p.embeddings_path.is_some())
        .map(|p| p.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_aliases() {
        assert_eq!(get_provider_config("openai").unwrap().name, "openai");
        assert_eq!(get_provider_config("google").unwrap().name, "gemini");
        assert_eq!(get_provider_config("llama.cpp").unwrap().name, "llamacpp");
        assert!(get_provider_config("nope").is_none());
    }

    #[test]
    fn test_embedding_capable_subset() {
        let names = embedding_provider_names();
        assert!(names.contains(&"openai"));
        assert!(names.contains(&"ollama"));
        assert!(!names.contains(&"groq"));
        assert!(names.len() < all_provider_names().len());
    }

    #[test]
    fn test_local_servers_need_no_auth() {
        for name in ["ollama", "llamacpp", "vllm"] {
            assert_eq!(get_provider_config(name).unwrap().auth_style, AuthStyle::None);
        }
    }
}
