//! Collaborator traits: the seams where external services plug in.

pub mod embedder;
pub mod provider;

pub use embedder::Embedder;
pub use provider::Provider;
