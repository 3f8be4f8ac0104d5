//! DocRag error types.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DocRagError>;

#[derive(Debug, Error)]
pub enum DocRagError {
    /// Corpus file missing, unreadable or malformed.
    #[error("Corpus load error: {0}")]
    CorpusLoad(String),

    /// Vectors and documents fell out of 1:1 pairing.
    #[error("Invariant violated: {0}")]
    Invariant(String),

    #[error("Dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Completion error: {0}")]
    Completion(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API key missing for provider: {0}")]
    ApiKeyMissing(String),

    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DocRagError {
    /// Transient query-time failures. The session reports every error and keeps
    /// going, but anything not recoverable is logged at error level.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Embedding(_)
                | Self::Completion(_)
                | Self::Http(_)
                | Self::ApiKeyMissing(_)
                | Self::Timeout(_)
                | Self::DimensionMismatch { .. }
        )
    }
}
