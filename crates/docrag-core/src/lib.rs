//! # DocRag Core
//!
//! Shared types, collaborator traits, error taxonomy and configuration
//! used by every other DocRag crate.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::DocRagConfig;
pub use error::{DocRagError, Result};
pub use types::{Document, EmbeddingVector, RawRecord};
