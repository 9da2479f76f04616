//! Feed Query Answerer: retrieval-augmented answers over the indexed feed.

use tracing::info;

use crate::error::PipelineError;
use crate::index::FeedIndex;
use crate::language::Language;
use crate::llm::{LlmProvider, LlmRequest};
use crate::prompts;

/// Deterministic response when no feed has been indexed yet. Returned
/// without touching the model or the embedder.
pub const NO_FEED_ANSWER: &str = "No news has been curated yet. Generate a news feed first.";

/// Answer a question using only the `top_k` most similar indexed passages.
pub async fn answer_question<P: LlmProvider + ?Sized>(
    provider: &P,
    index: &FeedIndex,
    question: &str,
    language: Language,
    top_k: usize,
) -> Result<String, PipelineError> {
    if index.is_empty().await {
        return Ok(NO_FEED_ANSWER.to_string());
    }

    let query_embedding = provider
        .embed(question)
        .await
        .map_err(PipelineError::AnswerFailed)?;

    let hits = index.search(&query_embedding, top_k).await;
    info!("retrieved {} passages for question", hits.len());

    let context_blocks: Vec<String> = hits
        .iter()
        .map(|hit| {
            format!(
                "{}\nSource: {} ({})",
                hit.passage.text, hit.passage.source, hit.passage.link
            )
        })
        .collect();

    let request = LlmRequest {
        prompt: prompts::grounded_answer(&context_blocks, question, language),
        max_tokens: Some(400),
        temperature: Some(0.3),
        timeout_seconds: None,
    };

    let response = provider
        .generate(request)
        .await
        .map_err(PipelineError::AnswerFailed)?;

    let answer = response.content.trim().to_string();
    if answer.is_empty() {
        return Err(PipelineError::AnswerFailed(anyhow::anyhow!(
            "model returned an empty answer"
        )));
    }
    Ok(answer)
}
