//! Feed Indexer: session-scoped in-memory vector index over the current feed.
//!
//! The index is rebuilt wholesale from a feed and swapped in only once every
//! passage embedded successfully, so readers never observe a half-built
//! index and a failed or cancelled rebuild leaves the prior state intact.

use anyhow::{Context, Result};
use tokio::sync::RwLock;
use tracing::info;

use crate::llm::LlmProvider;
use crate::Article;

/// One embedded chunk of an article's text
#[derive(Debug, Clone)]
pub struct IndexedPassage {
    pub title: String,
    pub link: String,
    pub source: String,
    pub text: String,
    embedding: Vec<f32>,
}

/// A retrieval hit with its cosine similarity score
#[derive(Debug, Clone)]
pub struct ScoredPassage {
    pub passage: IndexedPassage,
    pub score: f32,
}

struct IndexSnapshot {
    passages: Vec<IndexedPassage>,
}

/// Vector index over the current session's feed. Single writer (rebuild),
/// many readers (search); each session owns its own instance.
pub struct FeedIndex {
    inner: RwLock<Option<IndexSnapshot>>,
}

impl FeedIndex {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(None),
        }
    }

    /// Rebuild the index from a feed, replacing any prior content. The new
    /// snapshot is assembled off to the side and swapped in atomically; any
    /// embedding failure aborts the rebuild as a unit.
    pub async fn rebuild<P: LlmProvider + ?Sized>(
        &self,
        provider: &P,
        feed: &[Article],
        chunk_chars: usize,
    ) -> Result<()> {
        let mut passages = Vec::new();

        for article in feed {
            let text = format!("Title: {}\nSummary: {}", article.title, article.summary);
            for chunk in chunk_text(&text, chunk_chars) {
                let embedding = provider
                    .embed(&chunk)
                    .await
                    .with_context(|| format!("failed to embed passage for {}", article.link))?;
                passages.push(IndexedPassage {
                    title: article.title.clone(),
                    link: article.link.clone(),
                    source: article.source.clone(),
                    text: chunk,
                    embedding,
                });
            }
        }

        info!(
            "feed index rebuilt: {} passages from {} articles",
            passages.len(),
            feed.len()
        );
        *self.inner.write().await = Some(IndexSnapshot { passages });
        Ok(())
    }

    /// True until the first successful rebuild, or when the current feed
    /// produced no passages.
    pub async fn is_empty(&self) -> bool {
        match self.inner.read().await.as_ref() {
            Some(snapshot) => snapshot.passages.is_empty(),
            None => true,
        }
    }

    /// Return the `limit` most similar passages to the query embedding.
    /// Insertion order does not affect the result; retrieval is
    /// similarity-ranked.
    pub async fn search(&self, query_embedding: &[f32], limit: usize) -> Vec<ScoredPassage> {
        let guard = self.inner.read().await;
        let Some(snapshot) = guard.as_ref() else {
            return Vec::new();
        };

        let mut scored: Vec<ScoredPassage> = snapshot
            .passages
            .iter()
            .map(|p| ScoredPassage {
                score: cosine_similarity(&p.embedding, query_embedding),
                passage: p.clone(),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        scored
    }
}

impl Default for FeedIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Split text into chunks of at most `max_chars` characters on word
/// boundaries. A single word longer than the budget becomes its own chunk.
fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    if text.chars().count() <= max_chars {
        let trimmed = text.trim();
        return if trimmed.is_empty() {
            Vec::new()
        } else {
            vec![trimmed.to_string()]
        };
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();
        if current_chars > 0 && current_chars + 1 + word_chars > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_chars = 0;
        }
        if current_chars > 0 {
            current.push(' ');
            current_chars += 1;
        }
        current.push_str(word);
        current_chars += word_chars;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmRequest, LlmResponse};

    #[test]
    fn chunking_respects_budget_and_keeps_words() {
        let text = "alpha beta gamma delta epsilon";
        let chunks = chunk_text(text, 12);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 12, "chunk too long: {}", chunk);
            assert!(!chunk.starts_with(' ') && !chunk.ends_with(' '));
        }
        assert_eq!(chunks.join(" "), text);
    }

    #[test]
    fn short_text_is_one_chunk_and_blank_is_none() {
        assert_eq!(chunk_text("short", 100), vec!["short".to_string()]);
        assert!(chunk_text("   ", 100).is_empty());
    }

    #[test]
    fn cosine_similarity_basics() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    struct FailingEmbedder;

    #[async_trait::async_trait]
    impl LlmProvider for FailingEmbedder {
        async fn generate(&self, _request: LlmRequest) -> anyhow::Result<LlmResponse> {
            anyhow::bail!("no model in this test")
        }
        async fn embed(&self, _text: &str) -> anyhow::Result<Vec<f32>> {
            anyhow::bail!("embedding backend down")
        }
    }

    struct ConstantEmbedder;

    #[async_trait::async_trait]
    impl LlmProvider for ConstantEmbedder {
        async fn generate(&self, _request: LlmRequest) -> anyhow::Result<LlmResponse> {
            anyhow::bail!("no model in this test")
        }
        async fn embed(&self, _text: &str) -> anyhow::Result<Vec<f32>> {
            Ok(vec![1.0, 0.0, 0.0])
        }
    }

    fn article(title: &str) -> Article {
        Article {
            title: title.to_string(),
            link: format!("https://example.com/{}", title),
            source: "example".to_string(),
            snippet: "snippet".to_string(),
            summary: "summary".to_string(),
        }
    }

    #[tokio::test]
    async fn failed_rebuild_preserves_prior_index() {
        let index = FeedIndex::new();
        index
            .rebuild(&ConstantEmbedder, &[article("first")], 800)
            .await
            .expect("initial build");
        assert!(!index.is_empty().await);

        let err = index
            .rebuild(&FailingEmbedder, &[article("second")], 800)
            .await
            .expect_err("rebuild must fail as a unit");
        assert!(err.to_string().contains("failed to embed"));

        // Old content still queryable
        let hits = index.search(&[1.0, 0.0, 0.0], 5).await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].passage.title, "first");
    }

    #[tokio::test]
    async fn index_starts_empty_and_empty_feed_rebuild_stays_empty() {
        let index = FeedIndex::new();
        assert!(index.is_empty().await);
        assert!(index.search(&[1.0], 3).await.is_empty());

        index
            .rebuild(&ConstantEmbedder, &[], 800)
            .await
            .expect("empty rebuild");
        assert!(index.is_empty().await);
    }
}
