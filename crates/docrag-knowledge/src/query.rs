//! Query pipeline: query text → ranked documents.

use docrag_core::error::Result;
use docrag_core::traits::Embedder;
use docrag_core::types::Document;

use crate::store::{RankedMatch, VectorStore};

/// Embed `text` and return the `k` best documents from `store`.
///
/// `embedder` must be the one the store was built with; embedder errors
/// propagate unchanged.
pub async fn query<'s>(
    text: &str,
    store: &'s VectorStore,
    embedder: &dyn Embedder,
    k: usize,
) -> Result<Vec<&'s Document>> {
    let matches = query_scored(text, store, embedder, k).await?;
    Ok(matches.into_iter().map(|m| m.document).collect())
}

/// [`query`] keeping similarity scores.
pub async fn query_scored<'s>(
    text: &str,
    store: &'s VectorStore,
    embedder: &dyn Embedder,
    k: usize,
) -> Result<Vec<RankedMatch<'s>>> {
    let identity = embedder.identity();
    if let Some(indexed) = store.embedder_identity() {
        if indexed != identity {
            tracing::warn!("⚠️ Store was built with {indexed} but queried with {identity}");
        }
    }

    let vector = embedder.embed(text).await?;
    let matches = store.search_scored(&vector, k);
    tracing::debug!(
        "🔎 k={k} hits={} best={:.3}",
        matches.len(),
        matches.first().map(|m| m.similarity).unwrap_or(0.0)
    );
    Ok(matches)
}
