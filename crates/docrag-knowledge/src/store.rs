//! In-memory vector store: parallel arrays of vectors and documents.
//!
//! `vectors[i]` is the embedding of `documents[i]`. The pairing is only ever
//! replaced wholesale by [`VectorStore::load`], never patched, so it cannot
//! drift. Search is an exhaustive cosine scan; at corpus sizes this crate
//! targets no index structure is worth building.
//!
//! `load` takes `&mut self` and `search` takes `&self`, so concurrent readers
//! are fine and a load can never overlap a search.

use docrag_core::error::{DocRagError, Result};
use docrag_core::types::{Document, EmbeddingVector};

use crate::similarity::cosine_similarity;

/// A document with its similarity to the query. Borrowed from the store.
#[derive(Debug, Clone, Copy)]
pub struct RankedMatch<'a> {
    pub similarity: f32,
    pub document: &'a Document,
}

#[derive(Debug, Default)]
pub struct VectorStore {
    vectors: Vec<EmbeddingVector>,
    documents: Vec<Document>,
    /// `name/model` of the embedder that produced `vectors`.
    embedder_identity: Option<String>,
}

impl VectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty store tagged with the identity of the embedder that will fill it.
    pub fn for_embedder(identity: impl Into<String>) -> Self {
        Self {
            embedder_identity: Some(identity.into()),
            ..Self::default()
        }
    }

    /// Replace the store's contents.
    ///
    /// Fails with [`DocRagError::Invariant`] on a length mismatch, leaving the
    /// previous contents untouched.
    pub fn load(&mut self, vectors: Vec<EmbeddingVector>, documents: Vec<Document>) -> Result<()> {
        if vectors.len() != documents.len() {
            return Err(DocRagError::Invariant(format!(
                "{} vectors for {} documents",
                vectors.len(),
                documents.len()
            )));
        }
        self.vectors = vectors;
        self.documents = documents;
        Ok(())
    }

    /// Top `k` documents by cosine similarity, best first.
    ///
    /// Returns `min(k, len)` documents; equal scores keep insertion order.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<&Document> {
        self.search_scored(query, k)
            .into_iter()
            .map(|m| m.document)
            .collect()
    }

    /// Same ranking as [`search`](Self::search), keeping the scores.
    ///
    /// A stored vector whose length differs from the query's is logged and
    /// skipped; the remaining comparisons still rank.
    pub fn search_scored(&self, query: &[f32], k: usize) -> Vec<RankedMatch<'_>> {
        if k == 0 || self.vectors.is_empty() {
            return Vec::new();
        }

        let mut ranked: Vec<RankedMatch<'_>> = self
            .vectors
            .iter()
            .zip(&self.documents)
            .filter_map(|(vector, document)| match cosine_similarity(query, vector) {
                Ok(similarity) => Some(RankedMatch { similarity, document }),
                Err(e) => {
                    tracing::warn!("⚠️ Skipping document {}: {e}", document.id());
                    None
                }
            })
            .collect();

        // sort_by is stable: ties stay in insertion order.
        ranked.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        ranked.truncate(k);
        ranked
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Dimensionality of the stored vectors, if any are loaded.
    pub fn dimensions(&self) -> Option<usize> {
        self.vectors.first().map(Vec::len)
    }

    pub fn embedder_identity(&self) -> Option<&str> {
        self.embedder_identity.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str) -> Document {
        Document::new(id, id, format!("Title: {id}\nContent: "))
    }

    fn store(vectors: Vec<Vec<f32>>) -> VectorStore {
        let docs = (0..vectors.len()).map(|i| doc(&i.to_string())).collect();
        let mut s = VectorStore::new();
        s.load(vectors, docs).unwrap();
        s
    }

    fn ids<'a>(docs: &[&'a Document]) -> Vec<&'a str> {
        docs.iter().map(|d| d.id()).collect()
    }

    #[test]
    fn test_load_length_mismatch() {
        let mut s = VectorStore::new();
        let err = s
            .load(vec![vec![1.0], vec![0.5], vec![0.2]], vec![doc("a"), doc("b")])
            .unwrap_err();
        assert!(matches!(err, DocRagError::Invariant(_)));
        assert!(s.is_empty());
    }

    #[test]
    fn test_failed_load_keeps_previous_contents() {
        let mut s = store(vec![vec![1.0, 0.0]]);
        assert!(s.load(vec![], vec![doc("x")]).is_err());
        assert_eq!(s.len(), 1);
        assert_eq!(s.documents()[0].id(), "0");
    }

    #[test]
    fn test_load_replaces_wholesale() {
        let mut s = store(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        s.load(vec![vec![1.0]], vec![doc("only")]).unwrap();
        assert_eq!(s.len(), 1);
        assert_eq!(s.dimensions(), Some(1));
    }

    #[test]
    fn test_result_length_is_min_k_n() {
        let s = store(vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.7, 0.7]]);
        let q = [1.0, 0.2];
        assert_eq!(s.search(&q, 0).len(), 0);
        assert_eq!(s.search(&q, 1).len(), 1);
        assert_eq!(s.search(&q, 3).len(), 3);
        assert_eq!(s.search(&q, 10).len(), 3);
    }

    #[test]
    fn test_empty_store() {
        let s = VectorStore::new();
        assert!(s.search(&[1.0, 0.0], 5).is_empty());
        assert_eq!(s.dimensions(), None);
    }

    #[test]
    fn test_sorted_non_increasing() {
        let s = store(vec![
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![0.6, 0.8],
            vec![-1.0, 0.0],
            vec![0.8, 0.6],
        ]);
        let ranked = s.search_scored(&[1.0, 0.1], 5);
        assert!(ranked.windows(2).all(|w| w[0].similarity >= w[1].similarity));
        assert_eq!(ranked[0].document.id(), "1");
        assert_eq!(ranked[4].document.id(), "3");
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let s = store(vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 0.0], vec![2.0, 0.0]]);
        let top = s.search(&[1.0, 0.0], 3);
        assert_eq!(ids(&top), ["1", "2", "3"]);
    }

    #[test]
    fn test_deterministic() {
        let s = store(vec![vec![0.3, 0.9], vec![0.9, 0.3], vec![0.5, 0.5]]);
        let q = [0.7, 0.4];
        assert_eq!(ids(&s.search(&q, 3)), ids(&s.search(&q, 3)));
    }

    #[test]
    fn test_mismatched_vector_skipped() {
        let s = store(vec![vec![1.0, 0.0], vec![1.0, 0.0, 0.0], vec![0.0, 1.0]]);
        let top = s.search(&[1.0, 0.0], 3);
        assert_eq!(ids(&top), ["0", "2"]);
    }

    #[test]
    fn test_zero_vector_ranks_as_zero() {
        let s = store(vec![vec![0.0, 0.0], vec![-1.0, 0.0], vec![1.0, 0.0]]);
        let ranked = s.search_scored(&[1.0, 0.0], 3);
        let got: Vec<_> = ranked.iter().map(|m| (m.document.id(), m.similarity)).collect();
        assert_eq!(got[0].0, "2");
        assert_eq!(got[1], ("0", 0.0));
        assert_eq!(got[2].0, "1");
    }

    #[test]
    fn test_large_components_rank_first_when_identical() {
        let s = store(vec![vec![0.0, 1.0], vec![1e20, 1e20], vec![1.0, 0.0]]);
        let ranked = s.search_scored(&[1e20, 1e20], 3);
        assert_eq!(ranked[0].document.id(), "1");
        assert!((ranked[0].similarity - 1.0).abs() < 1e-6);
        assert!(ranked.iter().all(|m| !m.similarity.is_nan()));
        assert!(ranked.windows(2).all(|w| w[0].similarity >= w[1].similarity));
    }

    #[test]
    fn test_embedder_identity() {
        assert_eq!(VectorStore::new().embedder_identity(), None);
        let s = VectorStore::for_embedder("local/hash-256");
        assert_eq!(s.embedder_identity(), Some("local/hash-256"));
    }
}
