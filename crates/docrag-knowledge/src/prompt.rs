//! Grounding prompt assembly.

use docrag_core::types::Document;

/// Each document's text, separated by blank lines, followed by the query.
pub fn build_prompt(query: &str, documents: &[&Document]) -> String {
    documents
        .iter()
        .map(|d| d.text())
        .chain(std::iter::once(query))
        .collect::<Vec<_>>()
        .join("\n\n")
}
