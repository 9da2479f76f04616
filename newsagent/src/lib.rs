// Library interface for newsagent modules
// This allows tests and the CLI binary to import modules

use serde::{Deserialize, Serialize};

pub mod curation;
pub mod error;
pub mod index;
pub mod language;
pub mod llm;
pub mod pipeline;
pub mod profile;
pub mod prompts;
pub mod qa;
pub mod questions;
pub mod search;

pub use error::{PipelineError, Result};
pub use language::Language;
pub use pipeline::{NewsPipeline, PipelineOptions, PipelineRun};

/// A curated news article. The session's feed is an ordered `Vec<Article>`
/// preserving search-rank order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub link: String,
    pub source: String,
    /// Raw search-result text
    pub snippet: String,
    /// LLM-generated summary, localized to the session's target language.
    /// Falls back to the raw snippet when summarization fails.
    pub summary: String,
}

/// Result of an advisory stage that can fall back to a deterministic value
/// when the model is unavailable. The branch is part of the type so callers
/// can tell (and tests can assert) which path produced the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Synthesized<T> {
    /// Produced by the language model
    Model(T),
    /// Produced by the deterministic fallback
    Fallback(T),
}

impl<T> Synthesized<T> {
    pub fn value(&self) -> &T {
        match self {
            Synthesized::Model(v) | Synthesized::Fallback(v) => v,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Synthesized::Model(v) | Synthesized::Fallback(v) => v,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Synthesized::Fallback(_))
    }
}
