//! News Curator: profile summary -> searched, summarized, localized feed.

use std::collections::HashSet;
use tracing::{info, warn};

use crate::error::PipelineError;
use crate::language::Language;
use crate::llm::{self, LlmProvider, LlmRequest};
use crate::pipeline::PipelineOptions;
use crate::prompts;
use crate::search::{SearchProvider, SearchResult};
use crate::Article;

/// Tombstone some search backends leave in place of a withdrawn snippet.
const REMOVED_MARKER: &str = "[Removed]";

/// Curate a feed for a profile summary: derive search queries, fan out to
/// the search service, then summarize each hit localized into `language`.
///
/// Per-article policy: a failed summarization keeps the article and uses its
/// raw snippet as the summary. Only a total search failure is an error;
/// zero hits is a normal empty feed.
pub async fn curate_news(
    llm: &dyn LlmProvider,
    search: &dyn SearchProvider,
    profile_summary: &str,
    language: Language,
    options: &PipelineOptions,
) -> Result<Vec<Article>, PipelineError> {
    let queries = derive_queries(llm, profile_summary, options.max_queries).await;

    let mut raw: Vec<SearchResult> = Vec::new();
    let mut seen_links: HashSet<String> = HashSet::new();
    let mut attempted = 0usize;
    let mut succeeded = 0usize;
    let mut last_error: Option<anyhow::Error> = None;

    for query in &queries {
        if raw.len() >= options.max_articles {
            break;
        }
        attempted += 1;
        match search.search_news(query, options.results_per_query).await {
            Ok(results) => {
                succeeded += 1;
                for result in results {
                    if raw.len() >= options.max_articles {
                        break;
                    }
                    if seen_links.insert(result.link.clone()) {
                        raw.push(result);
                    }
                }
            }
            Err(e) => {
                warn!("news search failed for query '{}': {}", query, e);
                last_error = Some(e);
            }
        }
    }

    // Every attempted query failed upstream: surface it, there is no
    // sensible fallback content. Zero hits from working queries is a
    // normal empty feed.
    if raw.is_empty() {
        if succeeded == 0 {
            if let Some(e) = last_error {
                return Err(PipelineError::SearchUnavailable(e));
            }
        }
        info!("no news found for profile after {} queries", attempted);
        return Ok(Vec::new());
    }

    // Drop hits with nothing to summarize before spending model calls.
    raw.retain(|r| {
        let usable = !r.snippet.trim().is_empty() && !r.snippet.contains(REMOVED_MARKER);
        if !usable {
            info!("skipping result without usable snippet: {}", r.link);
        }
        usable
    });

    // Per-item outcomes first, then the merge; one article failing must
    // never lose the rest of the batch.
    let mut outcomes: Vec<(SearchResult, Option<String>)> = Vec::with_capacity(raw.len());
    for result in raw {
        let summary = match summarize_result(llm, &result, language).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!(
                    "summarization failed for '{}': {}, keeping raw snippet",
                    result.link, e
                );
                None
            }
        };
        outcomes.push((result, summary));
    }

    let feed: Vec<Article> = outcomes
        .into_iter()
        .map(|(result, summary)| Article {
            summary: summary.unwrap_or_else(|| result.snippet.clone()),
            title: result.title,
            link: result.link,
            source: result.source,
            snippet: result.snippet,
        })
        .collect();

    info!("curated feed of {} articles from {} queries", feed.len(), attempted);
    Ok(feed)
}

/// Derive short search phrases from the profile. The profile summary itself
/// is always among the queries, so a model failure only narrows the search.
async fn derive_queries(
    llm: &dyn LlmProvider,
    profile_summary: &str,
    max_queries: usize,
) -> Vec<String> {
    let request = LlmRequest {
        prompt: prompts::search_queries(profile_summary, max_queries.saturating_sub(1).max(1)),
        max_tokens: Some(200),
        temperature: Some(0.7),
        timeout_seconds: None,
    };

    let mut queries = match llm.generate(request).await {
        Ok(response) => llm::extract_string_array(&response.content).unwrap_or_default(),
        Err(e) => {
            warn!("query derivation failed: {}, searching with the profile summary", e);
            Vec::new()
        }
    };

    if !queries.iter().any(|q| q == profile_summary) {
        queries.push(profile_summary.to_string());
    }
    queries.truncate(max_queries.max(1));
    queries
}

async fn summarize_result(
    llm: &dyn LlmProvider,
    result: &SearchResult,
    language: Language,
) -> anyhow::Result<String> {
    let description = if result.snippet.trim().is_empty() {
        result.title.as_str()
    } else {
        result.snippet.as_str()
    };

    let request = LlmRequest {
        prompt: prompts::article_summary(description, language),
        max_tokens: Some(250),
        temperature: Some(0.5),
        timeout_seconds: None,
    };

    let response = llm.generate(request).await?;
    let summary = response.content.trim().to_string();
    if summary.is_empty() {
        anyhow::bail!("model returned an empty summary");
    }
    Ok(summary)
}
