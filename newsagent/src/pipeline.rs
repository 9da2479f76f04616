//! Pipeline facade: the five curation operations plus the combined run.
//!
//! One `NewsPipeline` is one session: it owns the session's vector index,
//! and independent sessions are independent values.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::curation;
use crate::error::{PipelineError, Result};
use crate::index::FeedIndex;
use crate::language::Language;
use crate::llm::LlmProvider;
use crate::profile;
use crate::qa;
use crate::questions;
use crate::search::SearchProvider;
use crate::{Article, Synthesized};

/// Probing question text -> the user's free-text answer. A BTreeMap keeps
/// the deterministic profile fallback reproducible for identical inputs.
pub type AnswerMap = BTreeMap<String, String>;

/// Tuning knobs with code-level defaults; usually filled from
/// `common::PipelineConfig`.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Maximum number of probing questions
    pub max_questions: usize,
    /// Maximum size of the curated feed
    pub max_articles: usize,
    /// Maximum number of search queries derived from one profile
    pub max_queries: usize,
    /// Results requested per search query
    pub results_per_query: usize,
    /// Passages retrieved per follow-up question
    pub top_k: usize,
    /// Character budget per indexed passage
    pub chunk_chars: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_questions: 4,
            max_articles: 10,
            max_queries: 4,
            results_per_query: 5,
            top_k: 3,
            chunk_chars: 800,
        }
    }
}

impl PipelineOptions {
    pub fn from_config(config: &common::PipelineConfig) -> Self {
        let defaults = Self::default();
        Self {
            max_questions: config.max_questions.unwrap_or(defaults.max_questions),
            max_articles: config.max_articles.unwrap_or(defaults.max_articles),
            max_queries: config.max_queries.unwrap_or(defaults.max_queries),
            results_per_query: defaults.results_per_query,
            top_k: config.top_k.unwrap_or(defaults.top_k),
            chunk_chars: config.chunk_chars.unwrap_or(defaults.chunk_chars),
        }
    }
}

/// Result of the combined pipeline run
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub profile_summary: String,
    pub feed: Vec<Article>,
}

/// One user session's curation pipeline.
pub struct NewsPipeline {
    llm: Arc<dyn LlmProvider>,
    search: Arc<dyn SearchProvider>,
    index: FeedIndex,
    options: PipelineOptions,
}

impl NewsPipeline {
    pub fn new(llm: Arc<dyn LlmProvider>, search: Arc<dyn SearchProvider>) -> Self {
        Self::with_options(llm, search, PipelineOptions::default())
    }

    pub fn with_options(
        llm: Arc<dyn LlmProvider>,
        search: Arc<dyn SearchProvider>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            llm,
            search,
            index: FeedIndex::new(),
            options,
        }
    }

    /// Generate probing questions for an interest statement. Falls back to a
    /// fixed question set when the model is unavailable; never empty.
    pub async fn generate_questions(&self, interest_text: &str) -> Result<Synthesized<Vec<String>>> {
        let interest = require_non_empty(interest_text, "interest text")?;
        Ok(questions::generate_questions(self.llm.as_ref(), interest, self.options.max_questions)
            .await)
    }

    /// Distill interest + answers into one profile summary. Falls back to a
    /// deterministic concatenation when the model is unavailable.
    pub async fn build_profile(
        &self,
        interest_text: &str,
        answers: &AnswerMap,
    ) -> Result<Synthesized<String>> {
        let interest = require_non_empty(interest_text, "interest text")?;
        if answers.keys().any(|q| q.trim().is_empty()) {
            return Err(PipelineError::InvalidInput(
                "answer map contains an empty question".to_string(),
            ));
        }
        Ok(profile::build_profile(self.llm.as_ref(), interest, answers).await)
    }

    /// Retrieve and summarize news matching the profile, localized to
    /// `language`. Zero hits is an empty feed, not an error.
    pub async fn curate_news(
        &self,
        profile_summary: &str,
        language: Language,
    ) -> Result<Vec<Article>> {
        let profile_summary = require_non_empty(profile_summary, "profile summary")?;
        curation::curate_news(
            self.llm.as_ref(),
            self.search.as_ref(),
            profile_summary,
            language,
            &self.options,
        )
        .await
    }

    /// Rebuild the session index from a feed. All-or-nothing: on failure the
    /// prior index remains queryable.
    pub async fn index_feed(&self, feed: &[Article]) -> Result<()> {
        self.index
            .rebuild(self.llm.as_ref(), feed, self.options.chunk_chars)
            .await
            .map_err(PipelineError::IndexingFailed)
    }

    /// Answer a follow-up question from the indexed feed. Before any feed is
    /// indexed this returns a deterministic "no news yet" message.
    pub async fn answer_question(&self, question: &str, language: Language) -> Result<String> {
        let question = require_non_empty(question, "question")?;
        qa::answer_question(
            self.llm.as_ref(),
            &self.index,
            question,
            language,
            self.options.top_k,
        )
        .await
    }

    /// Profile -> curated feed -> rebuilt index, in sequence. Question
    /// generation is caller-driven since the answers arrive as input.
    pub async fn run_full_pipeline(
        &self,
        interest_text: &str,
        answers: &AnswerMap,
        language: Language,
    ) -> Result<PipelineRun> {
        let profile_summary = self.build_profile(interest_text, answers).await?.into_inner();
        let feed = self.curate_news(&profile_summary, language).await?;
        self.index_feed(&feed).await?;
        Ok(PipelineRun {
            profile_summary,
            feed,
        })
    }
}

fn require_non_empty<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(PipelineError::InvalidInput(format!("{} must not be empty", what)))
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_from_config_fill_defaults() {
        let config = common::PipelineConfig {
            max_articles: Some(6),
            top_k: Some(5),
            ..Default::default()
        };
        let options = PipelineOptions::from_config(&config);
        assert_eq!(options.max_articles, 6);
        assert_eq!(options.top_k, 5);
        assert_eq!(options.max_questions, PipelineOptions::default().max_questions);
        assert_eq!(options.chunk_chars, PipelineOptions::default().chunk_chars);
    }

    #[test]
    fn require_non_empty_trims() {
        assert!(require_non_empty("  ", "x").is_err());
        assert_eq!(require_non_empty(" ok ", "x").unwrap(), "ok");
    }
}
