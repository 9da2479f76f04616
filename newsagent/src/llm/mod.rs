use anyhow::Result;

/// Core trait for LLM providers (chat completion + embeddings)
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate completion for a given prompt
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse>;

    /// Generate vector embedding for text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Request structure for LLM generation
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub prompt: String,
    pub max_tokens: Option<usize>,
    pub temperature: Option<f32>,
    pub timeout_seconds: Option<u64>,
}

impl LlmRequest {
    pub fn new(prompt: String) -> Self {
        Self {
            prompt,
            max_tokens: None,
            temperature: None,
            timeout_seconds: None,
        }
    }
}

/// Response from LLM generation
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub usage: UsageMetadata,
    pub model: String,
}

/// Token usage metadata
#[derive(Debug, Clone, Default)]
pub struct UsageMetadata {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

pub mod remote;

/// Extract a JSON string array from model output that may contain markdown
/// backticks or surrounding prose. Returns None when nothing parses.
pub fn extract_string_array(text: &str) -> Option<Vec<String>> {
    // 1. Content between ```json and ```
    if let Some(start) = text.find("```json") {
        let rest = &text[start + 7..];
        if let Some(end) = rest.find("```") {
            if let Some(items) = parse_string_array(rest[..end].trim()) {
                return Some(items);
            }
        }
    }

    // 2. Content between ``` and ```
    if let Some(start) = text.find("```") {
        let rest = &text[start + 3..];
        if let Some(end) = rest.find("```") {
            if let Some(items) = parse_string_array(rest[..end].trim()) {
                return Some(items);
            }
        }
    }

    // 3. First '[' to last ']'
    if let (Some(start), Some(end)) = (text.find('['), text.rfind(']')) {
        if start < end {
            if let Some(items) = parse_string_array(&text[start..=end]) {
                return Some(items);
            }
        }
    }

    None
}

fn parse_string_array(text: &str) -> Option<Vec<String>> {
    let items: Vec<String> = serde_json::from_str(text).ok()?;
    let items: Vec<String> = items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}
