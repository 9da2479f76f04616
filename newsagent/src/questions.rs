//! Question Generator: turns an interest statement into clarifying questions.

use tracing::warn;

use crate::llm::{self, LlmProvider, LlmRequest};
use crate::prompts;
use crate::Synthesized;

/// Generic fallback used when the model is unavailable or returns
/// something unparsable. The pipeline must always be able to proceed.
pub const FALLBACK_QUESTIONS: [&str; 3] = [
    "Could you be more specific about the topics?",
    "Are there any particular companies or people to follow?",
    "Which regions are you most interested in?",
];

/// Generate up to `max_questions` probing questions for an interest
/// statement. Never fails; the fallback branch is visible in the result.
pub async fn generate_questions<P: LlmProvider + ?Sized>(
    provider: &P,
    interest_text: &str,
    max_questions: usize,
) -> Synthesized<Vec<String>> {
    let request = LlmRequest {
        prompt: prompts::probing_questions(interest_text, max_questions),
        max_tokens: Some(300),
        temperature: Some(0.7),
        timeout_seconds: None,
    };

    match provider.generate(request).await {
        Ok(response) => match llm::extract_string_array(&response.content) {
            Some(mut questions) => {
                questions.truncate(max_questions);
                Synthesized::Model(questions)
            }
            None => {
                warn!("question generation returned unparsable output, using fallback questions");
                fallback(max_questions)
            }
        },
        Err(e) => {
            warn!("question generation failed: {}, using fallback questions", e);
            fallback(max_questions)
        }
    }
}

fn fallback(max_questions: usize) -> Synthesized<Vec<String>> {
    Synthesized::Fallback(
        FALLBACK_QUESTIONS
            .iter()
            .take(max_questions.max(1))
            .map(|q| q.to_string())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_respects_maximum_but_is_never_empty() {
        assert_eq!(fallback(2).value().len(), 2);
        assert_eq!(fallback(10).value().len(), FALLBACK_QUESTIONS.len());
        assert_eq!(fallback(0).value().len(), 1);
        assert!(fallback(3).is_fallback());
    }
}
