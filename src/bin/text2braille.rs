//! CLI binary for edgequake-text2braille.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `SummaryConfig` and prints results.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use edgequake_text2braille::{
    from_braille, summarize_document, summarize_text, summarize_to_file, to_braille, ProgressCallback,
    SummaryConfig, SummaryOutput, SummaryProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
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
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar plus a log line per window. Windows
/// complete out of order when summarised concurrently.
struct CliProgressCallback {
    bar: ProgressBar,
    start_times: Mutex<HashMap<usize, Instant>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} windows  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);
        bar.set_style(style);
        bar.set_prefix("Summarising");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
        })
    }

    fn elapsed_secs(&self, window: usize) -> f64 {
        self.start_times
            .lock()
            .ok()
            .and_then(|mut m| m.remove(&window))
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl SummaryProgressCallback for CliProgressCallback {
    fn on_summary_start(&self, total_windows: usize) {
        self.bar.set_length(total_windows as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Summarising {total_windows} windows…"))
        ));
    }

    fn on_window_start(&self, window: usize, _total: usize) {
        if let Ok(mut m) = self.start_times.lock() {
            m.insert(window, Instant::now());
        }
    }

    fn on_window_complete(&self, window: usize, total: usize, summary_len: usize) {
        let secs = self.elapsed_secs(window);
        self.bar.println(format!(
            "  {} Window {:>3}/{:<3}  {:<8}  {}",
            green("✓"),
            window + 1,
            total,
            dim(&format!("{summary_len:>5} chars")),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_window_error(&self, window: usize, total: usize, error: &str) {
        let secs = self.elapsed_secs(window);
        let msg: String = if error.chars().count() > 80 {
            format!("{}\u{2026}", error.chars().take(79).collect::<String>())
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} Window {:>3}/{:<3}  {}  {}",
            red("✗"),
            window + 1,
            total,
            red(&msg),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_summary_complete(&self, total_windows: usize, success_count: usize) {
        let failed = total_windows.saturating_sub(success_count);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} windows summarised",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} windows summarised  ({} failed)",
                if failed == total_windows { red("✘") } else { cyan("⚠") },
                bold(&success_count.to_string()),
                total_windows,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Summarise a PDF and print the braille
  text2braille summarize report.pdf

  # Summarise stdin, full JSON (summary, braille, per-window stats)
  cat notes.txt | text2braille summarize - --json

  # Summarise a literal string
  text2braille summarize --text "A long passage ..."

  # Save JSON output to a file
  text2braille summarize https://example.com/paper.pdf -o paper.json

  # Pure codec (no API key needed)
  text2braille encode "Route 66"
  text2braille decode "⠗⠕⠥⠞⠑ ⠼⠋⠼⠋"

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  GEMINI_API_KEY          Google Gemini API key
  EDGEQUAKE_LLM_PROVIDER  Override provider (openai, anthropic, gemini, ollama)
  EDGEQUAKE_MODEL         Override model ID
  PDFIUM_LIB_PATH         Path to libpdfium (otherwise ./ then the system library)

Inputs under the word threshold (default 150) are encoded verbatim and
need no API key.
"#;

/// Summarise documents with an LLM and render the result as braille.
#[derive(Parser, Debug)]
#[command(
    name = "text2braille",
    version,
    about = "Summarise documents with an LLM and render the result as six-dot braille",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "TEXT2BRAILLE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "TEXT2BRAILLE_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarise a document, stdin or literal text, then encode to braille.
    Summarize(SummarizeArgs),
    /// Encode text to braille.
    Encode(CodecArgs),
    /// Decode braille to text.
    Decode(CodecArgs),
}

#[derive(Args, Debug)]
struct SummarizeArgs {
    /// Local .txt/.md/.pdf/.docx path, HTTP/HTTPS URL, or "-" for stdin.
    #[arg(required_unless_present = "text")]
    input: Option<String>,

    /// Summarise this text instead of reading a document.
    #[arg(long, conflicts_with = "input")]
    text: Option<String>,

    /// Write JSON output to this file instead of stdout.
    #[arg(short, long, env = "TEXT2BRAILLE_OUTPUT")]
    output: Option<PathBuf>,

    /// LLM model ID (e.g. gpt-4.1-nano, gpt-4.1-mini, claude-sonnet-4-20250514).
    #[arg(long, env = "EDGEQUAKE_MODEL")]
    model: Option<String>,

    /// LLM provider: openai, anthropic, gemini, ollama, azure.
    #[arg(long, env = "EDGEQUAKE_PROVIDER")]
    provider: Option<String>,

    /// Maximum words per window.
    #[arg(long, env = "TEXT2BRAILLE_MAX_TOKENS", default_value_t = 512)]
    max_tokens: usize,

    /// Words shared by consecutive windows.
    #[arg(long, env = "TEXT2BRAILLE_OVERLAP", default_value_t = 50)]
    overlap: usize,

    /// Inputs with fewer words are returned verbatim.
    #[arg(long, env = "TEXT2BRAILLE_THRESHOLD", default_value_t = 150)]
    threshold: usize,

    /// Number of concurrent summariser calls.
    #[arg(short, long, env = "TEXT2BRAILLE_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// Path to a text file containing a custom system prompt.
    #[arg(long, env = "TEXT2BRAILLE_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "TEXT2BRAILLE_TEMPERATURE", default_value_t = 0.2)]
    temperature: f32,

    /// Retries per window on summariser failure.
    #[arg(long, env = "TEXT2BRAILLE_MAX_RETRIES", default_value_t = 2)]
    max_retries: u32,

    /// Output structured JSON (SummaryOutput) instead of braille.
    #[arg(long, env = "TEXT2BRAILLE_JSON")]
    json: bool,

    /// Print the plain-text summary instead of braille.
    #[arg(long, conflicts_with = "json")]
    plain: bool,

    /// Disable progress bar.
    #[arg(long, env = "TEXT2BRAILLE_NO_PROGRESS")]
    no_progress: bool,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "TEXT2BRAILLE_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Per-window summariser timeout in seconds.
    #[arg(long, env = "TEXT2BRAILLE_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,
}

#[derive(Args, Debug)]
struct CodecArgs {
    /// Text to transcode. Reads stdin when omitted or "-".
    text: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs while it is visible.
    let show_progress = match &cli.command {
        Command::Summarize(args) => !cli.quiet && !args.no_progress && !args.json,
        _ => false,
    };
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

    match cli.command {
        Command::Encode(args) => {
            let text = read_codec_input(args.text)?;
            print_line(&to_braille(&text))
        }
        Command::Decode(args) => {
            let text = read_codec_input(args.text)?;
            print_line(&from_braille(&text))
        }
        Command::Summarize(args) => run_summarize(args, cli.quiet, show_progress).await,
    }
}

async fn run_summarize(args: SummarizeArgs, quiet: bool, show_progress: bool) -> Result<()> {
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn SummaryProgressCallback>)
    } else {
        None
    };
    let config = build_config(&args, progress_cb).await?;

    // A document path or URL that goes straight to a file uses the library's
    // atomic writer.
    if let (Some(output_path), Some(input)) = (&args.output, args.input.as_deref()) {
        if input != "-" {
            let stats = summarize_to_file(input, output_path, &config)
                .await
                .context("Summarisation failed")?;
            if !quiet {
                eprintln!(
                    "{}  {} words → {}  {}ms",
                    if stats.failed_windows == 0 { green("✔") } else { cyan("⚠") },
                    stats.word_count,
                    bold(&output_path.display().to_string()),
                    stats.total_duration_ms,
                );
            }
            return Ok(());
        }
    }

    let output = match (args.text.as_deref(), args.input.as_deref()) {
        (Some(text), _) => summarize_text(text, &config).await,
        (None, Some("-")) | (None, None) => {
            let text = read_stdin()?;
            summarize_text(&text, &config).await
        }
        (None, Some(input)) => summarize_document(input, &config).await,
    }
    .context("Summarisation failed")?;

    if let Some(ref output_path) = args.output {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        std::fs::write(output_path, json)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
    } else if args.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if args.plain {
        print_line(&output.summary)?;
    } else {
        print_line(&output.braille)?;
    }

    if !quiet && !args.json {
        print_stats(&output);
    }

    Ok(())
}

fn print_stats(output: &SummaryOutput) {
    let stats = &output.stats;
    if !stats.summarized {
        eprintln!(
            "{}",
            dim(&format!(
                "{} words, below threshold: encoded verbatim",
                stats.word_count
            ))
        );
        return;
    }
    if stats.fallback_used {
        eprintln!("{} every window failed; fallback summary used", red("✘"));
    }
    eprintln!(
        "   {} words → {} words  {} tokens in  /  {} tokens out  —  {}ms total",
        stats.word_count,
        output.summary.split_whitespace().count(),
        dim(&stats.total_input_tokens.to_string()),
        dim(&stats.total_output_tokens.to_string()),
        stats.total_duration_ms,
    );
}

/// Map CLI args to `SummaryConfig`.
async fn build_config(args: &SummarizeArgs, progress: Option<ProgressCallback>) -> Result<SummaryConfig> {
    let mut builder = SummaryConfig::builder()
        .max_tokens(args.max_tokens)
        .overlap(args.overlap)
        .threshold_words(args.threshold)
        .concurrency(args.concurrency)
        .temperature(args.temperature)
        .max_retries(args.max_retries)
        .download_timeout_secs(args.download_timeout)
        .api_timeout_secs(args.api_timeout);

    if let Some(ref path) = args.system_prompt {
        let prompt = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read system prompt from {:?}", path))?;
        builder = builder.system_prompt(prompt);
    }
    if let Some(ref model) = args.model {
        builder = builder.model(model.clone());
    }
    if let Some(ref provider) = args.provider {
        builder = builder.provider_name(provider.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

fn read_codec_input(arg: Option<String>) -> Result<String> {
    match arg {
        Some(text) if text != "-" => Ok(text),
        _ => {
            let text = read_stdin()?;
            Ok(text.strip_suffix('\n').unwrap_or(&text).to_string())
        }
    }
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read stdin")?;
    Ok(buf)
}

fn print_line(s: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(s.as_bytes())
        .context("Failed to write to stdout")?;
    if !s.ends_with('\n') {
        handle.write_all(b"\n").ok();
    }
    Ok(())
}
