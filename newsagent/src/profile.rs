//! Profile Builder: distills interest + answers into one dense profile summary.

use tracing::warn;

use crate::llm::{LlmProvider, LlmRequest};
use crate::pipeline::AnswerMap;
use crate::prompts;
use crate::Synthesized;

/// Build a one-paragraph profile summary for downstream search and
/// summarization. Never fails: if the model is unavailable the result is a
/// deterministic concatenation of the inputs, reproducible for identical
/// inputs.
pub async fn build_profile<P: LlmProvider + ?Sized>(
    provider: &P,
    interest_text: &str,
    answers: &AnswerMap,
) -> Synthesized<String> {
    let request = LlmRequest {
        prompt: prompts::profile_summary(interest_text, answers),
        max_tokens: Some(300),
        temperature: Some(0.7),
        timeout_seconds: None,
    };

    match provider.generate(request).await {
        Ok(response) => {
            let summary = response.content.trim().to_string();
            if summary.is_empty() {
                warn!("profile synthesis returned empty output, using concatenation fallback");
                Synthesized::Fallback(fallback_profile(interest_text, answers))
            } else {
                Synthesized::Model(summary)
            }
        }
        Err(e) => {
            warn!("profile synthesis failed: {}, using concatenation fallback", e);
            Synthesized::Fallback(fallback_profile(interest_text, answers))
        }
    }
}

/// Deterministic no-model profile: the interest statement followed by each
/// question/answer pair in map order.
pub fn fallback_profile(interest_text: &str, answers: &AnswerMap) -> String {
    let mut profile = interest_text.trim().to_string();
    for (question, answer) in answers {
        profile.push_str("; ");
        profile.push_str(question.trim());
        profile.push_str(": ");
        profile.push_str(answer.trim());
    }
    profile
}
