use std::{process::ExitCode, sync::Arc};

use clap::{Parser, ValueEnum};
use digest_core::{
    HeuristicEstimator, StrategyThresholds, TiktokenEstimator, TokenBudget, TokenEstimator,
    DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use url_digest::{
    config::{DigestConfig, SplitterKind},
    fetch::UrlFetcher,
    groq::GroqClient,
    tracing::init_tracing_subscriber,
    ChainSummarizer, Digest, DigestProcessor, DigestProcessorBuilder, ValidationError,
    DEFAULT_REDUCE_TOKEN_MAX,
};

type SharedEstimator = Arc<dyn TokenEstimator>;
type Processor =
    DigestProcessor<UrlFetcher, ChainSummarizer<GroqClient, SharedEstimator>, SharedEstimator>;

#[derive(Parser)]
#[command(
    name = "url-digest",
    about = "Summarize a YouTube video or a webpage with a hosted LLM"
)]
struct Cli {
    /// URL to summarize; prompts for URLs interactively when omitted
    url: Option<String>,

    /// Groq API key
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Chat model used for every summarization call
    #[arg(long, env = "GROQ_MODEL", default_value = GroqClient::DEFAULT_MODEL)]
    model: String,

    /// OpenAI compatible API base url
    #[arg(long, env = "GROQ_BASE_URL", default_value = GroqClient::DEFAULT_BASE_URL)]
    base_url: String,

    /// Sampling temperature
    #[arg(long, default_value_t = GroqClient::DEFAULT_TEMPERATURE)]
    temperature: f32,

    /// Maximum estimated tokens of chunks sent in one summarization pass
    #[arg(long, default_value_t = TokenBudget::DEFAULT_CEILING)]
    budget: usize,

    /// Token count from which chunks are summarized and merged
    #[arg(long, default_value_t = StrategyThresholds::DEFAULT_MERGE_FROM)]
    merge_from: usize,

    /// Token count from which chunks refine a running summary
    #[arg(long, default_value_t = StrategyThresholds::DEFAULT_REFINE_FROM)]
    refine_from: usize,

    /// Chunk size in characters
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Characters shared by consecutive chunks
    #[arg(long, default_value_t = DEFAULT_CHUNK_OVERLAP)]
    chunk_overlap: usize,

    #[arg(long, value_enum, default_value_t = SplitterKind::Window)]
    splitter: SplitterKind,

    /// Preferred transcript languages, in order
    #[arg(long, value_delimiter = ',', default_values = ["en", "hi"])]
    languages: Vec<String>,

    /// Token limit of partial summaries before they are collapsed
    #[arg(long, default_value_t = DEFAULT_REDUCE_TOKEN_MAX)]
    reduce_token_max: usize,

    /// Accept invalid TLS certificates when fetching pages
    #[arg(long)]
    insecure: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// The summary only
    Text,
    /// The summary with strategy and token accounting
    Json,
}

impl Cli {
    fn to_config(&self) -> Result<DigestConfig, ValidationError> {
        let budget = TokenBudget::new(self.budget)
            .ok_or_else(|| ValidationError::InvalidSetting("--budget must be positive".into()))?;
        let thresholds =
            StrategyThresholds::new(self.merge_from, self.refine_from).ok_or_else(|| {
                ValidationError::InvalidSetting(
                    "--merge-from must not be greater than --refine-from".into(),
                )
            })?;

        Ok(DigestConfig {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            temperature: self.temperature,
            budget,
            thresholds,
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
            splitter: self.splitter,
            languages: self.languages.clone(),
            reduce_token_max: self.reduce_token_max,
            accept_invalid_certs: self.insecure,
        })
    }
}

fn load_estimator() -> SharedEstimator {
    match TiktokenEstimator::cl100k() {
        Ok(estimator) => Arc::new(estimator),
        Err(e) => {
            tracing::warn!(error = ?e, "Falling back to character based token estimates");
            Arc::new(HeuristicEstimator)
        }
    }
}

fn build_processor(config: &DigestConfig, estimator: SharedEstimator) -> anyhow::Result<Processor> {
    let groq = config.groq_client()?;
    let fetcher = UrlFetcher::new(config.languages.clone(), config.accept_invalid_certs)?;
    let summarizer = ChainSummarizer::new(groq, estimator.clone())
        .with_reduce_token_max(config.reduce_token_max);

    let processor = DigestProcessorBuilder::new()
        .fetcher(fetcher)
        .summarizer(summarizer)
        .estimator(estimator)
        .config(config)?
        .build();

    Ok(processor)
}

fn print_digest(digest: &Digest, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(digest)?),
        OutputFormat::Text if digest.summary.is_empty() => {
            eprintln!("Nothing to summarize: no content fit the token budget")
        }
        OutputFormat::Text => println!("{}", digest.summary),
    }
    Ok(())
}

struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// `None` once stdin is closed
    async fn ask(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(label.as_bytes()).await?;
        stdout.flush().await?;
        Ok(self.lines.next_line().await?.map(|line| line.trim().to_string()))
    }
}

async fn interactive(
    mut config: DigestConfig,
    estimator: SharedEstimator,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut prompt = Prompt::new();

    while config.api_key().is_err() {
        eprintln!("{}", ValidationError::MissingCredential);
        match prompt.ask("Groq API key: ").await? {
            Some(key) => config.api_key = Some(key),
            None => return Ok(()),
        }
    }

    let processor = build_processor(&config, estimator)?;
    while let Some(url) = prompt.ask("URL ('exit' to quit): ").await? {
        if matches!(url.as_str(), "exit" | "quit") {
            break;
        }

        match processor.summarize_url(&url).await {
            Ok(digest) => print_digest(&digest, format)?,
            Err(e) => eprintln!("Error: {e}"),
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber("warn")?;

    let config = match cli.to_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };
    let estimator = load_estimator();

    let Some(url) = cli.url.as_deref() else {
        interactive(config, estimator, cli.format).await?;
        return Ok(ExitCode::SUCCESS);
    };

    let processor = match build_processor(&config, estimator) {
        Ok(processor) => processor,
        Err(e) => {
            eprintln!("Error: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    match processor.summarize_url(url).await {
        Ok(digest) => {
            print_digest(&digest, cli.format)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}
