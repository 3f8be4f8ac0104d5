//! Completion collaborator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{DocRagError, Result};
use crate::types::{Message, ProviderResponse};

/// Parameters for a single completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateParams {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Optional system message placed ahead of the prompt.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

impl Default for GenerateParams {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".into(),
            temperature: 0.0,
            max_tokens: 512,
            system_prompt: None,
        }
    }
}

#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;

    async fn chat(&self, messages: &[Message], params: &GenerateParams)
    -> Result<ProviderResponse>;

    /// One request per prompt. No streaming, no retry.
    async fn complete(&self, prompt: &str, params: &GenerateParams) -> Result<String> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = params.system_prompt.as_deref() {
            messages.push(Message::system(system));
        }
        messages.push(Message::user(prompt));

        let response = self.chat(&messages, params).await?;
        response
            .content
            .ok_or_else(|| DocRagError::Completion(format!("{} returned no content", self.name())))
    }
}
