//! CLI binary for scisummary.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `SummaryConfig`, wraps a local article file into a `SummaryRequest`,
//! and prints the result.

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use scisummary::{summarize, SummaryConfig, SummaryLength, SummaryRequest};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Summarize a text article for a high-school student (stdout)
  scisummary paper.txt --context "high school student"

  # Summarize a PDF for a domain expert, long form, to a file
  scisummary paper.pdf --context "immunologist" --length large -o summary.md

  # Use a specific model
  scisummary --model gpt-4.1 --provider openai paper.txt --context "data engineer"

  # Structured JSON output ({summary, stats} or {error})
  scisummary --json paper.txt --context "science journalist" > result.json

SUPPORTED PROVIDERS & MODELS:
  Provider     Model                       Input $/1M  Output $/1M
  ─────────    ──────────────────────────  ──────────  ───────────
  openai       gpt-4.1-nano (default)      $0.10       $0.40
  openai       gpt-4.1-mini                $0.40       $1.60
  openai       gpt-4.1                     $2.00       $8.00
  anthropic    claude-sonnet-4-20250514    $3.00       $15.00
  gemini       gemini-2.0-flash            $0.10       $0.40

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY           OpenAI API key
  ANTHROPIC_API_KEY        Anthropic API key
  GEMINI_API_KEY           Google Gemini API key
  SCISUMMARY_LLM_PROVIDER  Override provider (openai, anthropic, gemini, …)
  SCISUMMARY_MODEL         Override model ID

FILE INTAKE:
  Accepted article forms are .txt (read as plain text) and .pdf (attached
  to the model call as a document; 5 MB cap). Other file types cannot be
  summarized.
"#;

/// Summarize scientific articles for a specific reader using LLMs.
#[derive(Parser, Debug)]
#[command(
    name = "scisummary",
    version,
    about = "Audience-tailored summaries of scientific articles using LLMs",
    long_about = "Summarize a scientific article (.txt or .pdf) for a specific reader. \
The summary adapts terminology and depth to the reader you describe and fits the \
requested length band. Supports OpenAI, Anthropic, Google Gemini, and any provider \
known to edgequake-llm.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Article file: .txt or .pdf.
    input: PathBuf,

    /// The reader's background or field of expertise (10–500 characters).
    #[arg(short, long, env = "SCISUMMARY_CONTEXT")]
    context: String,

    /// Desired summary length.
    #[arg(short, long, env = "SCISUMMARY_LENGTH", value_enum, default_value = "medium")]
    length: LengthArg,

    /// Write the summary to this file instead of stdout.
    #[arg(short, long, env = "SCISUMMARY_OUTPUT")]
    output: Option<PathBuf>,

    /// LLM model ID (e.g. gpt-4.1-nano, claude-sonnet-4-20250514).
    #[arg(long, env = "SCISUMMARY_MODEL")]
    model: Option<String>,

    /// LLM provider: openai, anthropic, gemini, …
    #[arg(
        long,
        env = "SCISUMMARY_LLM_PROVIDER",
        long_help = "LLM provider. Auto-detected from API key env vars if not set."
    )]
    provider: Option<String>,

    /// Max LLM output tokens.
    #[arg(long, env = "SCISUMMARY_MAX_TOKENS", default_value_t = 2048)]
    max_tokens: usize,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "SCISUMMARY_TEMPERATURE", default_value_t = 0.2)]
    temperature: f32,

    /// Timeout for the completion call in seconds.
    #[arg(long, env = "SCISUMMARY_API_TIMEOUT", default_value_t = 120)]
    api_timeout: u64,

    /// Output structured JSON ({summary, stats} or {error}) instead of text.
    #[arg(long, env = "SCISUMMARY_JSON")]
    json: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "SCISUMMARY_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SCISUMMARY_VERBOSE")]
    verbose: bool,

    /// Suppress all output except the summary and errors.
    #[arg(short, long, env = "SCISUMMARY_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum LengthArg {
    Short,
    Medium,
    Large,
}

impl From<LengthArg> for SummaryLength {
    fn from(v: LengthArg) -> Self {
        match v {
            LengthArg::Short => SummaryLength::Short,
            LengthArg::Medium => SummaryLength::Medium,
            LengthArg::Large => SummaryLength::Large,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the spinner is active; the
    // summary itself is the output that matters.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build the request ────────────────────────────────────────────────
    // Context bounds mirror the product's submission form; the library
    // core itself only requires non-empty.
    let context = cli.context.trim();
    if context.chars().count() < 10 {
        bail!("Context must be at least 10 characters — describe the reader's background.");
    }
    if context.chars().count() > 500 {
        bail!("Context must not be longer than 500 characters.");
    }

    let (article_text, pdf_data_uri) = load_article(&cli.input)?;
    let request = SummaryRequest {
        article_text,
        pdf_data_uri,
        user_context: context.to_string(),
        summary_length: cli.length.clone().into(),
    };

    let mut config = SummaryConfig::builder()
        .max_tokens(cli.max_tokens)
        .temperature(cli.temperature)
        .api_timeout_secs(cli.api_timeout)
        .build()
        .context("Invalid configuration")?;
    config.model = cli.model.clone();
    config.provider_name = cli.provider.clone();

    // ── Run the single call ──────────────────────────────────────────────
    let spinner = if show_progress {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_message(format!(
            "Summarizing {} for \"{}\"…",
            cli.input.display(),
            context
        ));
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    } else {
        None
    };

    let result = summarize(&request, &config).await;

    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    // ── Print the result ─────────────────────────────────────────────────
    let output = match result {
        Ok(output) => output,
        Err(e) => {
            tracing::error!(detail = %e, "summarization failed");
            if cli.json {
                println!("{}", serde_json::json!({ "error": e.user_message() }));
            } else {
                eprintln!("{} {}", red("✘"), e.user_message());
            }
            std::process::exit(1);
        }
    };

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialise output")?
        );
    } else if let Some(ref output_path) = cli.output {
        std::fs::write(output_path, &output.summary)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        if !cli.quiet {
            eprintln!(
                "{} summary written to {}",
                green("✔"),
                output_path.display()
            );
        }
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(output.summary.as_bytes())
            .context("Failed to write to stdout")?;
        if !output.summary.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    if !cli.quiet && !cli.json {
        eprintln!(
            "   {} tokens in  /  {} tokens out  —  {}ms total",
            dim(&output.stats.input_tokens.to_string()),
            dim(&output.stats.output_tokens.to_string()),
            output.stats.duration_ms,
        );
    }

    Ok(())
}

/// Read the article file into exactly one request form.
///
/// `.txt` is read as plain text; `.pdf` is magic-checked and wrapped into
/// a base64 data URI so it can travel through the text-typed request. The
/// intake rules (and the 5 MB PDF cap) match what the product has always
/// accepted at its upload boundary.
fn load_article(path: &Path) -> Result<(Option<String>, Option<String>)> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("txt") => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            if text.trim().is_empty() {
                bail!("Article file {} is empty", path.display());
            }
            Ok((Some(text), None))
        }
        Some("pdf") => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
                bail!("{} is not a valid PDF file", path.display());
            }
            if bytes.len() > scisummary::DEFAULT_MAX_DOCUMENT_BYTES {
                bail!("PDF files must be smaller than 5 MB (got {} bytes)", bytes.len());
            }
            let uri = format!("data:application/pdf;base64,{}", STANDARD.encode(&bytes));
            Ok((None, Some(uri)))
        }
        _ => bail!(
            "Only .txt and .pdf files can be summarized (got {})",
            path.display()
        ),
    }
}
