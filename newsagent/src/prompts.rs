//! Prompt templates for every model call in the pipeline.
//!
//! Each builder is a pure function of typed inputs, so tests can assert on
//! prompt content without going through a model.

use crate::language::Language;
use crate::pipeline::AnswerMap;

/// Prompt for generating probing questions from an interest statement.
pub fn probing_questions(interest_text: &str, count: usize) -> String {
    format!(
        r#"Based on the user's initial interest description: "{interest_text}",
generate up to {count} short, specific clarifying questions to better understand their preferences.
Focus on aspects like:
- Specific sub-topics, companies or people (breadth vs. depth).
- Preferred regions or markets (e.g., US, Europe, Asia).
- Types of news (e.g., product launches, financial results, policy changes).
- How recent the news should be.

Return the questions as a JSON array of strings. For example:
["What specific companies are you interested in?", "Are you focused on consumer products or enterprise solutions?"]

QUESTIONS:
"#
    )
}

/// Prompt for synthesizing a one-paragraph user profile.
pub fn profile_summary(interest_text: &str, answers: &AnswerMap) -> String {
    let answers_str = answers
        .iter()
        .map(|(q, a)| format!("- {}: {}", q, a))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Create a concise, one-paragraph summary of a user's news preferences.
This summary will be used to generate keywords for a news search.

User's initial interest: "{interest_text}"
User's answers to clarifying questions:
{answers_str}

Synthesize this information into a clear profile summary.
For example: "The user is interested in the latest AI developments, specifically focusing on
Nvidia and Google's recent product launches and financial performance in the US market."

PROFILE SUMMARY:
"#
    )
}

/// Prompt for deriving short search phrases from a profile summary.
pub fn search_queries(profile_summary: &str, count: usize) -> String {
    format!(
        r#"Based on this user profile: "{profile_summary}",
generate {count} diverse and specific keywords or short phrases for a news search.
Return the keywords as a JSON array of strings.

Example: ["Nvidia AI developments", "latest generative AI research", "Google AI product launches in Europe"]

KEYWORDS:
"#
    )
}

/// Prompt for summarizing one search result, localized to the target language.
pub fn article_summary(description: &str, language: Language) -> String {
    format!(
        r#"Summarize the following news article description in 3-4 sentences.
The tone should be neutral and informative.
Write the final summary in the language with the ISO 639-1 code: '{language}'.

ARTICLE DESCRIPTION:
"{description}"

SUMMARY:
"#
    )
}

/// Prompt for answering a question strictly from retrieved passages.
/// The model is told to admit uncertainty rather than invent facts.
pub fn grounded_answer(context_blocks: &[String], question: &str, language: Language) -> String {
    let context = context_blocks.join("\n\n---\n\n");
    format!(
        r#"You are answering a question about a curated news feed.
Use ONLY the news context below. Do not use outside knowledge.
If the context does not contain enough information to answer, say that you are not sure instead of guessing.
Answer in the language with the ISO 639-1 code: '{language}'.

NEWS CONTEXT:
{context}

QUESTION: "{question}"

ANSWER:
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn probing_questions_carries_interest_and_format() {
        let p = probing_questions("AI and chips", 4);
        assert!(p.contains("AI and chips"));
        assert!(p.contains("JSON array"));
        assert!(p.contains("up to 4"));
    }

    #[test]
    fn profile_summary_lists_answers() {
        let mut answers: AnswerMap = BTreeMap::new();
        answers.insert("Which regions?".to_string(), "Europe".to_string());
        let p = profile_summary("fintech", &answers);
        assert!(p.contains("- Which regions?: Europe"));
        assert!(p.contains("fintech"));
    }

    #[test]
    fn article_summary_targets_language() {
        let p = article_summary("Some headline snippet", Language::Fr);
        assert!(p.contains("'fr'"));
        assert!(p.contains("Some headline snippet"));
    }

    #[test]
    fn grounded_answer_instructs_against_hallucination() {
        let blocks = vec!["Title: A\nSummary: B".to_string()];
        let p = grounded_answer(&blocks, "What happened?", Language::En);
        assert!(p.contains("ONLY the news context"));
        assert!(p.contains("not sure"));
        assert!(p.contains("Title: A"));
        assert!(p.contains("What happened?"));
    }
}
