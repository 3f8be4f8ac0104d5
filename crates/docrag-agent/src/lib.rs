//! # DocRag Agent
//! The interactive question-answering loop.
//!
//! One query at a time: read a line, retrieve, build the grounding prompt,
//! ask the completion provider, print the answer and its sources. Query-time
//! failures are reported and the loop keeps going; only `exit` or end of
//! input stops it.

use std::time::Duration;

use docrag_core::error::{DocRagError, Result};
use docrag_core::traits::provider::GenerateParams;
use docrag_core::traits::{Embedder, Provider};
use docrag_core::types::Document;
use docrag_knowledge::{VectorStore, build_prompt, query::query_scored};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Retrieval and answer settings for a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub top_k: usize,
    pub min_similarity: Option<f32>,
    /// Budget per query (embedding + completion). `None` waits indefinitely.
    pub query_timeout: Option<Duration>,
    pub params: GenerateParams,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            top_k: 3,
            min_similarity: None,
            query_timeout: Some(Duration::from_secs(120)),
            params: GenerateParams::default(),
        }
    }
}

/// An answer and the documents it was grounded on, best match first.
#[derive(Debug, Clone)]
pub struct Answer<'s> {
    pub text: String,
    pub sources: Vec<&'s Document>,
}

/// A question-answering session over a read-only store.
pub struct Session<'a> {
    store: &'a VectorStore,
    embedder: &'a dyn Embedder,
    provider: &'a dyn Provider,
    options: SessionOptions,
}

impl<'a> Session<'a> {
    pub fn new(
        store: &'a VectorStore,
        embedder: &'a dyn Embedder,
        provider: &'a dyn Provider,
        options: SessionOptions,
    ) -> Self {
        Self { store, embedder, provider, options }
    }

    /// Retrieve context for `question` and ask the provider once.
    pub async fn ask(&self, question: &str) -> Result<Answer<'a>> {
        let mut matches =
            query_scored(question, self.store, self.embedder, self.options.top_k).await?;
        if let Some(min) = self.options.min_similarity {
            matches.retain(|m| m.similarity >= min);
        }
        let sources: Vec<&Document> = matches.iter().map(|m| m.document).collect();

        let prompt = build_prompt(question, &sources);
        let text = self
            .provider
            .complete(&prompt, &self.options.params)
            .await
            .map_err(|e| match e {
                DocRagError::Completion(_) => e,
                other => DocRagError::Completion(other.to_string()),
            })?;

        Ok(Answer { text, sources })
    }

    /// [`ask`](Self::ask) under the configured timeout. An elapsed timeout
    /// drops the in-flight call.
    pub async fn ask_with_timeout(&self, question: &str) -> Result<Answer<'a>> {
        match self.options.query_timeout {
            Some(limit) => tokio::time::timeout(limit, self.ask(question))
                .await
                .map_err(|_| DocRagError::Timeout(limit))?,
            None => self.ask(question).await,
        }
    }

    /// Read queries line by line until `exit` (any case) or end of input.
    ///
    /// Errors from individual queries are written to `output` and the loop
    /// continues; only I/O failures on `input`/`output` end it early.
    pub async fn run<R, W>(&self, input: R, mut output: W) -> Result<usize>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        let mut answered = 0usize;

        loop {
            output.write_all(b"\n> ").await?;
            output.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            if is_exit(&line) {
                break;
            }

            match self.ask_with_timeout(&line).await {
                Ok(answer) => {
                    answered += 1;
                    output.write_all(render_answer(&answer).as_bytes()).await?;
                }
                Err(e) => {
                    if e.is_recoverable() {
                        tracing::warn!("⚠️ Query failed: {e}");
                    } else {
                        tracing::error!("❌ Query failed: {e}");
                    }
                    output.write_all(format!("Error: {e}\n").as_bytes()).await?;
                }
            }
        }

        output.flush().await?;
        Ok(answered)
    }
}

/// `exit`, case-insensitive, surrounding whitespace ignored.
pub fn is_exit(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("exit")
}

/// The answer text followed by a `Sources:` list.
pub fn render_answer(answer: &Answer<'_>) -> String {
    let mut out = format!("{}\n", answer.text.trim_end());
    if answer.sources.is_empty() {
        out.push_str("\nSources: none\n");
        return out;
    }
    out.push_str("\nSources:\n");
    for doc in &answer.sources {
        out.push_str(&format!("- {} (id {})\n", doc.title(), doc.id()));
    }
    out
}
