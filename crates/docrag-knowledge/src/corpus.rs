//! Corpus loading: a JSON array of `{id, title, content}` records.

use std::path::Path;

use docrag_core::error::{DocRagError, Result};
use docrag_core::types::RawRecord;

/// Parse a corpus from JSON text.
pub fn parse_corpus(json: &str) -> Result<Vec<RawRecord>> {
    serde_json::from_str(json).map_err(|e| DocRagError::CorpusLoad(format!("Malformed corpus: {e}")))
}

/// Read and parse a corpus file.
pub fn load_corpus(path: &Path) -> Result<Vec<RawRecord>> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        DocRagError::CorpusLoad(format!("Failed to read {}: {e}", path.display()))
    })?;
    let records = parse_corpus(&json)?;
    tracing::info!("📚 Loaded {} record(s) from {}", records.len(), path.display());
    Ok(records)
}

/// Like [`load_corpus`], but a missing or malformed corpus degrades to empty.
pub fn load_corpus_or_empty(path: &Path) -> Vec<RawRecord> {
    load_corpus(path).unwrap_or_else(|e| {
        tracing::warn!("⚠️ {e}");
        Vec::new()
    })
}
