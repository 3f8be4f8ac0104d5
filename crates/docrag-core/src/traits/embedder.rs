//! Embedding collaborator.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::EmbeddingVector;

/// Maps text to a fixed-length vector.
///
/// Output must be deterministic for a given text and model, and every call on
/// one instance must return vectors of the same dimensionality.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Provider name (e.g. "openai", "local").
    fn name(&self) -> &str;

    /// Model identifier. Indexing and querying must use the same one.
    fn model(&self) -> &str;

    async fn embed(&self, text: &str) -> Result<EmbeddingVector>;

    /// `name/model`, recorded by the vector store at build time.
    fn identity(&self) -> String {
        format!("{}/{}", self.name(), self.model())
    }
}
