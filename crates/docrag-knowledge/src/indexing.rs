//! Indexing pipeline: documents + embedder → populated [`VectorStore`].

use std::time::Instant;

use futures::stream::{self, StreamExt, TryStreamExt};

use docrag_core::error::{DocRagError, Result};
use docrag_core::traits::Embedder;
use docrag_core::types::Document;

use crate::store::VectorStore;

/// Default number of embed calls kept in flight.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Embed every document and load the results into a fresh store.
pub async fn build_index(documents: Vec<Document>, embedder: &dyn Embedder) -> Result<VectorStore> {
    build_index_with(documents, embedder, DEFAULT_CONCURRENCY).await
}

/// [`build_index`] with an explicit bound on concurrent embed calls.
///
/// Vectors come back in document order regardless of completion order. The
/// first failure aborts the build and no store is produced.
pub async fn build_index_with(
    documents: Vec<Document>,
    embedder: &dyn Embedder,
    concurrency: usize,
) -> Result<VectorStore> {
    let started = Instant::now();
    tracing::info!(
        "🧮 Embedding {} document(s) with {} (concurrency {})",
        documents.len(),
        embedder.identity(),
        concurrency.max(1)
    );

    let vectors: Vec<_> = stream::iter(documents.iter())
        .map(|doc| async move {
            embedder
                .embed(doc.text())
                .await
                .map_err(|e| as_embedding_error(e, doc.id()))
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    let mut store = VectorStore::for_embedder(embedder.identity());
    store.load(vectors, documents)?;

    tracing::info!(
        "✅ Indexed {} document(s), {} dims, in {:?}",
        store.len(),
        store.dimensions().unwrap_or(0),
        started.elapsed()
    );
    Ok(store)
}

fn as_embedding_error(e: DocRagError, doc_id: &str) -> DocRagError {
    match e {
        DocRagError::Embedding(msg) => DocRagError::Embedding(format!("document {doc_id}: {msg}")),
        other => DocRagError::Embedding(format!("document {doc_id}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Embeds to `[len, 1.0]`; sleeps longer for earlier calls so completions
    /// arrive out of order.
    struct SlowFirst {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Embedder for SlowFirst {
        fn name(&self) -> &str {
            "test"
        }
        fn model(&self) -> &str {
            "slow-first"
        }
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) as u64;
            tokio::time::sleep(Duration::from_millis(30u64.saturating_sub(n * 10))).await;
            Ok(vec![text.len() as f32, 1.0])
        }
    }

    struct FailOn(&'static str);

    #[async_trait]
    impl Embedder for FailOn {
        fn name(&self) -> &str {
            "test"
        }
        fn model(&self) -> &str {
            "fail-on"
        }
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            if text.contains(self.0) {
                Err(DocRagError::Http("503 from embedder".into()))
            } else {
                Ok(vec![1.0, 0.0])
            }
        }
    }

    fn docs(texts: &[&str]) -> Vec<Document> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Document::new(i.to_string(), "", *t))
            .collect()
    }

    #[tokio::test]
    async fn test_order_preserved_under_concurrency() {
        let embedder = SlowFirst { calls: AtomicUsize::new(0) };
        let store = build_index_with(docs(&["a", "bbb", "cc"]), &embedder, 3).await.unwrap();
        assert_eq!(store.len(), 3);

        // "bbb" embeds to [3, 1]; it must still pair with document 1.
        let top = store.search(&[3.0, 1.0], 1);
        assert_eq!(top[0].id(), "1");
        assert_eq!(store.embedder_identity(), Some("test/slow-first"));
    }

    #[tokio::test]
    async fn test_fail_fast() {
        let err = build_index(docs(&["fine", "boom", "fine"]), &FailOn("boom"))
            .await
            .unwrap_err();
        match err {
            DocRagError::Embedding(msg) => {
                assert!(msg.contains("document 1"), "{msg}");
                assert!(msg.contains("503"), "{msg}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_empty_corpus_builds_empty_store() {
        let store = build_index(vec![], &FailOn("never")).await.unwrap();
        assert!(store.is_empty());
        assert!(store.search(&[1.0, 0.0], 3).is_empty());
    }

    #[tokio::test]
    async fn test_zero_concurrency_clamped() {
        let store = build_index_with(docs(&["x"]), &FailOn("never"), 0).await.unwrap();
        assert_eq!(store.len(), 1);
    }
}
