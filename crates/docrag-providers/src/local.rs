//! Offline hashing embedder.
//!
//! Bag-of-words feature hashing: each lower-cased alphanumeric token is hashed
//! (FNV-1a) into one of `dimensions` buckets, and the counts are L2-normalised.
//! No model, no network. Texts sharing words land close together, which is
//! enough to run the pipeline end to end without an embeddings service.

use async_trait::async_trait;
use docrag_core::error::{DocRagError, Result};
use docrag_core::traits::Embedder;
use docrag_core::types::EmbeddingVector;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

pub struct HashingEmbedder {
    dimensions: usize,
    model: String,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(DocRagError::Config("local embedder needs dimensions > 0".into()));
        }
        Ok(Self {
            dimensions,
            model: format!("hash-{dimensions}"),
        })
    }

    fn bucket(&self, token: &str) -> usize {
        let hash = token
            .bytes()
            .fold(FNV_OFFSET, |h, b| (h ^ u64::from(b)).wrapping_mul(FNV_PRIME));
        (hash % self.dimensions as u64) as usize
    }

    fn vectorize(&self, text: &str) -> EmbeddingVector {
        let mut v = vec![0.0f32; self.dimensions];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            v[self.bucket(&token.to_lowercase())] += 1.0;
        }

        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        v
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    fn name(&self) -> &str {
        "local"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> Result<EmbeddingVector> {
        Ok(self.vectorize(text))
    }
}
