/*
newsagent - CLI driver
Runs one curation session end to end: probe interests, build a profile,
curate and print the feed, then optionally answer questions against it.
*/

use anyhow::{Context, Result};
use clap::Parser;
use common::Config;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use newsagent::llm::remote::RemoteLlmProvider;
use newsagent::search::SerpNewsProvider;
use newsagent::{Language, NewsPipeline, PipelineOptions};

#[derive(Parser, Debug)]
#[command(name = "newsagent", about = "Personalized news curation from the command line")]
struct Args {
    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Initial interest statement
    #[arg(long)]
    interest: String,

    /// Target language (ISO 639-1); unrecognized codes fall back to en
    #[arg(long)]
    language: Option<String>,

    /// Skip the probing questions and curate from the interest alone
    #[arg(long)]
    no_probe: bool,

    /// Answer this question against the curated feed and exit
    #[arg(long, value_name = "QUESTION")]
    ask: Option<String>,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    // Load configuration with defaults
    let default_path = PathBuf::from("config.default.toml");
    let override_path = args.config.clone().or_else(|| {
        let p = PathBuf::from("config.toml");
        p.exists().then_some(p)
    });
    let config = Config::load_with_defaults(
        if default_path.exists() { Some(&default_path) } else { None },
        override_path.as_deref(),
    )
    .await
    .context("failed to load configuration")?;

    let llm = build_llm_provider(&config)?;
    let search = build_search_provider(&config)?;

    let mut options = PipelineOptions::from_config(&config.pipeline);
    if let Some(n) = config.search.results_per_query {
        options.results_per_query = n;
    }

    let language = args
        .language
        .as_deref()
        .or(config.pipeline.default_language.as_deref())
        .map(Language::from_code)
        .unwrap_or_default();

    let pipeline = NewsPipeline::with_options(llm, search, options);

    // Probe for details unless the user opted out
    let answers = if args.no_probe {
        Default::default()
    } else {
        let generated = pipeline.generate_questions(&args.interest).await?;
        collect_answers(generated.value())?
    };

    info!("curating news feed (language: {})", language);
    let run = pipeline
        .run_full_pipeline(&args.interest, &answers, language)
        .await?;

    println!("\nProfile: {}\n", run.profile_summary);
    if run.feed.is_empty() {
        println!("No articles found for this profile.");
    }
    for (i, article) in run.feed.iter().enumerate() {
        println!("{}. {} ({})", i + 1, article.title, article.source);
        println!("   {}", article.link);
        println!("   {}\n", article.summary);
    }

    if let Some(question) = args.ask {
        let answer = pipeline.answer_question(&question, language).await?;
        println!("Q: {}\nA: {}", question, answer);
    }

    Ok(())
}

fn build_llm_provider(config: &Config) -> Result<Arc<RemoteLlmProvider>> {
    let api_url = config
        .llm
        .api_url
        .clone()
        .unwrap_or_else(|| "https://api.openai.com/v1/chat/completions".to_string());
    let model = config
        .llm
        .model
        .clone()
        .unwrap_or_else(|| "gpt-4o-mini".to_string());
    let api_key = config.llm.resolve_api_key()?;

    let mut provider = RemoteLlmProvider::new(api_url, api_key, model).with_defaults(
        config.llm.timeout_seconds.unwrap_or(30),
        config.llm.max_tokens.unwrap_or(500),
        config.llm.temperature.unwrap_or(0.7),
    );
    if let Some(ref embedding_model) = config.llm.embedding_model {
        provider = provider.with_embedding_model(embedding_model.clone());
    }
    Ok(Arc::new(provider))
}

fn build_search_provider(config: &Config) -> Result<Arc<SerpNewsProvider>> {
    let api_url = config
        .search
        .api_url
        .clone()
        .unwrap_or_else(|| "https://serpapi.com/search.json".to_string());
    let api_key = config.search.resolve_api_key()?;
    let provider =
        SerpNewsProvider::new(api_url, api_key).with_timeout(config.search.timeout_seconds.unwrap_or(15));
    Ok(Arc::new(provider))
}

/// Ask each probing question on stdin; blank answers are skipped.
fn collect_answers(questions: &[String]) -> Result<newsagent::pipeline::AnswerMap> {
    let stdin = std::io::stdin();
    let mut answers = newsagent::pipeline::AnswerMap::new();

    println!("A few questions to refine your feed (press Enter to skip):");
    for question in questions {
        print!("{} ", question);
        std::io::stdout().flush().context("failed to flush stdout")?;
        let mut line = String::new();
        stdin
            .lock()
            .read_line(&mut line)
            .context("failed to read answer")?;
        let answer = line.trim();
        if !answer.is_empty() {
            answers.insert(question.clone(), answer.to_string());
        }
    }
    Ok(answers)
}
