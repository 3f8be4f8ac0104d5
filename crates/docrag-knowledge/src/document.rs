//! Raw corpus records → documents.

use docrag_core::types::{Document, RawRecord};

/// Build the embedded/displayed text of a record.
///
/// The two-line layout is part of retrieval behavior: it is exactly what gets
/// embedded and later shown to the model as context.
pub fn document_text(title: &str, content: &str) -> String {
    format!("Title: {title}\nContent: {content}")
}

/// Normalize raw records into documents, one per record, in input order.
/// No deduplication or validation; an empty input yields an empty output.
pub fn normalize(records: &[RawRecord]) -> Vec<Document> {
    records
        .iter()
        .map(|r| Document::new(&r.id, &r.title, document_text(&r.title, &r.content)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, title: &str, content: &str) -> RawRecord {
        RawRecord { id: id.into(), title: title.into(), content: content.into() }
    }

    #[test]
    fn test_text_layout() {
        let docs = normalize(&[record("1", "A", "cats are mammals")]);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].text(), "Title: A\nContent: cats are mammals");
        assert_eq!(docs[0].id(), "1");
        assert_eq!(docs[0].title(), "A");
    }

    #[test]
    fn test_empty_corpus() {
        assert!(normalize(&[]).is_empty());
    }

    #[test]
    fn test_missing_fields_and_duplicates_kept() {
        let docs = normalize(&[record("1", "", ""), record("1", "", "")]);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].text(), "Title: \nContent: ");
        assert_eq!(docs[0], docs[1]);
    }

    #[test]
    fn test_order_preserved() {
        let docs = normalize(&[record("b", "B", "x"), record("a", "A", "y")]);
        let ids: Vec<_> = docs.iter().map(|d| d.id()).collect();
        assert_eq!(ids, ["b", "a"]);
    }
}
