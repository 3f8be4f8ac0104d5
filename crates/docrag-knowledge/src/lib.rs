//! # DocRag Knowledge
//!
//! In-memory retrieval over a small, fixed corpus.
//!
//! ## How it works
//! ```text
//! corpus.json ──load──▶ RawRecord ──normalize──▶ Document
//!                                                  │ embed (concurrent, order kept)
//!                                                  ▼
//!                                     VectorStore { vectors[i] ⇄ documents[i] }
//!
//! "tell me about kittens" ──embed──▶ query vector
//!                                        │ cosine vs. every stored vector
//!                                        ▼
//!                                   top-k Documents ──▶ grounding prompt
//! ```
//!
//! The store is written once by [`build_index`] and read-only afterwards.
//! Embedders are passed explicitly to each operation that needs one.

pub mod corpus;
pub mod document;
pub mod indexing;
pub mod prompt;
pub mod query;
pub mod similarity;
pub mod store;

pub use document::normalize;
pub use indexing::build_index;
pub use prompt::build_prompt;
pub use query::query;
pub use similarity::cosine_similarity;
pub use store::{RankedMatch, VectorStore};
