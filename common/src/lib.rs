/*!
common/src/lib.rs

Shared configuration types for Newsagent.

This file provides:
- Config data structures (deserialized from TOML)
- An async loader for a TOML config file, with default/override merging
- API key resolution from environment variables
*/

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// LLM configuration section (OpenAI-compatible chat + embeddings API)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Chat completions endpoint, e.g. "https://api.openai.com/v1/chat/completions"
    pub api_url: Option<String>,
    /// Name of the environment variable holding the API key
    pub api_key_env: Option<String>,
    pub model: Option<String>,
    /// Model used for embeddings; defaults to `model` when absent
    pub embedding_model: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub max_tokens: Option<usize>,
    pub temperature: Option<f32>,
}

/// News search configuration section (SerpAPI-compatible endpoint)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search endpoint, e.g. "https://serpapi.com/search.json"
    pub api_url: Option<String>,
    /// Name of the environment variable holding the API key
    pub api_key_env: Option<String>,
    pub timeout_seconds: Option<u64>,
    /// Results requested per search query
    pub results_per_query: Option<usize>,
}

/// Pipeline tuning knobs; all optional, code-level defaults apply
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum number of probing questions to generate
    pub max_questions: Option<usize>,
    /// Maximum size of the curated feed
    pub max_articles: Option<usize>,
    /// Maximum number of search queries derived from one profile
    pub max_queries: Option<usize>,
    /// Passages retrieved per follow-up question
    pub top_k: Option<usize>,
    /// Character budget per indexed passage
    pub chunk_chars: Option<usize>,
    /// ISO 639-1 code used when the caller does not specify one
    pub default_language: Option<String>,
}

/// Top-level application configuration (deserialized from config.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Load configuration from a TOML file asynchronously.
    ///
    /// Example:
    ///   let cfg = Config::from_file("config.toml").await?;
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = tokio::fs::read_to_string(path.as_ref())
            .await
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let cfg: Config = toml::from_str(&data).context("Failed to parse TOML configuration")?;
        Ok(cfg)
    }

    /// Load configuration with an optional default file and an optional override file.
    /// If both are present, they are merged (override takes precedence).
    pub async fn load_with_defaults(
        default_path: Option<&Path>,
        override_path: Option<&Path>,
    ) -> Result<Self> {
        let mut config_value = toml::Value::Table(toml::map::Map::new());

        if let Some(path) = default_path {
            if path.exists() {
                let data = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read default config: {}", path.display()))?;
                let val: toml::Value =
                    toml::from_str(&data).context("Failed to parse default configuration")?;
                merge_toml(&mut config_value, val);
            }
        }

        if let Some(path) = override_path {
            if path.exists() {
                let data = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read override config: {}", path.display()))?;
                let val: toml::Value =
                    toml::from_str(&data).context("Failed to parse override configuration")?;
                merge_toml(&mut config_value, val);
            }
        }

        let cfg: Config = config_value
            .try_into()
            .context("Failed to parse merged configuration")?;
        Ok(cfg)
    }
}

impl LlmConfig {
    /// Resolve the API key from the environment variable named by `api_key_env`
    /// (default: LLM_API_KEY). An unset variable is an error so that missing
    /// credentials surface at startup rather than on the first request.
    pub fn resolve_api_key(&self) -> Result<String> {
        let var = self.api_key_env.as_deref().unwrap_or("LLM_API_KEY");
        std::env::var(var).with_context(|| format!("environment variable {} is not set", var))
    }
}

impl SearchConfig {
    /// Resolve the search API key (default env var: SEARCH_API_KEY).
    pub fn resolve_api_key(&self) -> Result<String> {
        let var = self.api_key_env.as_deref().unwrap_or("SEARCH_API_KEY");
        std::env::var(var).with_context(|| format!("environment variable {} is not set", var))
    }
}

fn merge_toml(a: &mut toml::Value, b: toml::Value) {
    match (a, b) {
        (toml::Value::Table(a_map), toml::Value::Table(b_map)) => {
            for (k, v) in b_map {
                if let Some(a_val) = a_map.get_mut(&k) {
                    merge_toml(a_val, v);
                } else {
                    a_map.insert(k, v);
                }
            }
        }
        (a_val, b_val) => *a_val = b_val,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn config_from_string() {
        let toml = r#"
            [llm]
            api_url = "http://localhost:11434/v1/chat/completions"
            model = "llama3"
            timeout_seconds = 20

            [search]
            results_per_query = 5

            [pipeline]
            max_articles = 8
            default_language = "fr"
        "#;

        let cfg: Config = toml::from_str(toml).expect("parse config");
        assert_eq!(cfg.llm.model.as_deref(), Some("llama3"));
        assert_eq!(cfg.llm.timeout_seconds, Some(20));
        assert_eq!(cfg.search.results_per_query, Some(5));
        assert_eq!(cfg.pipeline.max_articles, Some(8));
        assert_eq!(cfg.pipeline.default_language.as_deref(), Some("fr"));
    }

    #[test]
    fn empty_config_is_valid() {
        let cfg: Config = toml::from_str("").expect("parse empty config");
        assert!(cfg.llm.api_url.is_none());
        assert!(cfg.pipeline.max_articles.is_none());
    }

    #[tokio::test]
    async fn override_takes_precedence() {
        let dir = tempfile::tempdir().expect("tempdir");

        let default_path = dir.path().join("config.default.toml");
        let mut f = std::fs::File::create(&default_path).expect("create default");
        writeln!(f, "[llm]\nmodel = \"base-model\"\ntimeout_seconds = 30").expect("write");

        let override_path = dir.path().join("config.toml");
        let mut f = std::fs::File::create(&override_path).expect("create override");
        writeln!(f, "[llm]\nmodel = \"tuned-model\"").expect("write");

        let cfg = Config::load_with_defaults(Some(&default_path), Some(&override_path))
            .await
            .expect("load merged config");

        // Overridden key replaced, untouched key kept from defaults
        assert_eq!(cfg.llm.model.as_deref(), Some("tuned-model"));
        assert_eq!(cfg.llm.timeout_seconds, Some(30));
    }

    #[test]
    fn resolve_api_key_reads_named_env_var() {
        std::env::set_var("NEWSAGENT_TEST_KEY", "s3cret");
        let cfg = LlmConfig {
            api_key_env: Some("NEWSAGENT_TEST_KEY".to_string()),
            ..Default::default()
        };
        assert_eq!(cfg.resolve_api_key().expect("key"), "s3cret");

        let missing = LlmConfig {
            api_key_env: Some("NEWSAGENT_TEST_KEY_MISSING".to_string()),
            ..Default::default()
        };
        assert!(missing.resolve_api_key().is_err());
    }
}
