//! Citation matching engine - CLI entry point.
//!
//! Reads a plain-text document (one paragraph per line), runs a citation
//! pass against the configured providers, and prints the review payload as
//! JSON.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use citematch::oracle::{DocumentContext, StaticOracle};
use citematch::providers::ProviderKind;
use citematch::{CitationEngine, CitationStyle, Config, EngineOptions};

#[derive(Parser, Debug)]
#[command(name = "citematch")]
#[command(about = "Find and review academic citations for a document")]
#[command(version)]
struct Cli {
    /// Document to process (plain text, one paragraph per line)
    input: PathBuf,

    /// Citation style: APA, MLA, or Chicago
    #[arg(long, default_value = "APA")]
    style: String,

    /// Providers to search, in priority order
    #[arg(long, value_delimiter = ',', default_values_t = [
        "semantic_scholar".to_string(),
        "crossref".to_string(),
        "openalex".to_string(),
    ])]
    providers: Vec<String>,

    /// Ceiling on external provider calls (estimated from the document if unset)
    #[arg(long, env = "CITEMATCH_MAX_CALLS")]
    max_calls: Option<u32>,

    /// Minimum relevance score for a proposal
    #[arg(long, default_value_t = 0.0)]
    threshold: f64,

    /// Results requested per provider per query
    #[arg(long, default_value_t = 5)]
    top_k: usize,

    /// Include ranked runner-up candidates on each proposal
    #[arg(long)]
    return_all: bool,

    /// Abort the run after this many seconds, keeping partial results
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Document category used to enrich queries (e.g. quantum_physics)
    #[arg(long)]
    category: Option<String>,

    /// Field keywords used to enrich queries
    #[arg(long, value_delimiter = ',')]
    keywords: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    let style: CitationStyle = cli.style.parse()?;
    let kinds = cli
        .providers
        .iter()
        .map(|name| name.parse::<ProviderKind>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| anyhow::anyhow!(err))?;

    let text = std::fs::read_to_string(&cli.input)?;
    let paragraphs: Vec<String> = text.lines().map(ToString::to_string).collect();

    let options = EngineOptions {
        style,
        threshold: cli.threshold,
        top_k: cli.top_k,
        max_api_calls: cli.max_calls,
        return_all: cli.return_all,
        run_timeout: cli.timeout_secs.map(Duration::from_secs),
        ..EngineOptions::default()
    };

    let mut engine = CitationEngine::with_provider_kinds(Config::new(), options, &kinds)?;

    if cli.category.is_some() || !cli.keywords.is_empty() {
        let context = DocumentContext {
            research_context: String::new(),
            document_category: cli.category.unwrap_or_default(),
            field_keywords: cli.keywords,
        };
        engine = engine.with_oracle(Arc::new(StaticOracle(context)));
    }

    let outcome = engine.prepare_review(&paragraphs).await?;

    tracing::info!(
        citations = outcome.payload.total_citations,
        api_calls = outcome.payload.diagnostics.api_calls_made,
        "run complete"
    );

    println!("{}", serde_json::to_string_pretty(&outcome.payload)?);

    Ok(())
}
