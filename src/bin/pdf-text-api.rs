//! CLI binary for pdf-text-api.
//!
//! `serve` runs the HTTP service; `parse` runs the same pipeline on a
//! local file and prints the success envelope.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pdf_text_api::backend::PdfiumBackend;
use pdf_text_api::server::{self, AppState, ApiSuccess, ServerConfig};
use pdf_text_api::{
    parse, upload_from_path, ExtractionConfig, ExtractionProgressCallback, PdfBackend,
};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers ──────────────────────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

// ── CLI progress callback ────────────────────────────────────────────────────

/// Per-page log lines on stderr for `parse --progress`.
struct CliProgressCallback {
    errors: AtomicUsize,
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_page_complete(&self, page_num: usize, total: usize, text_len: usize) {
        eprintln!(
            "  {} Page {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{text_len:>6} chars")),
        );
    }

    fn on_page_error(&self, page_num: usize, total: usize, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);
        eprintln!(
            "  {} Page {:>3}/{:<3}  {}",
            red("✗"),
            page_num,
            total,
            red(error)
        );
    }

    fn on_extraction_complete(&self, total_pages: usize, success_count: usize) {
        let failed = self.errors.load(Ordering::SeqCst);
        eprintln!(
            "{} {}/{} pages extracted{}",
            if failed == 0 { green("✔") } else { red("⚠") },
            success_count,
            total_pages,
            if failed == 0 {
                String::new()
            } else {
                format!("  ({failed} failed)")
            }
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Start the service on the default port (5001)
  pdf-text-api serve

  # Allow a different frontend origin and a 20MB ceiling
  pdf-text-api serve --cors-origin https://app.example.com --max-file-size-mb 20

  # Extract a local file and print the JSON envelope
  pdf-text-api parse report.pdf --pretty

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH               Path to an existing libpdfium
  PDF_TEXT_API_HOST             Listen address
  PDF_TEXT_API_PORT             Listen port
  PDF_TEXT_API_CORS_ORIGINS     Comma-separated allowed origins
  PDF_TEXT_API_MAX_FILE_SIZE_MB Upload ceiling in MB
  RUST_LOG                      Overrides --verbose
"#;

/// Extract text and metadata from PDF uploads.
#[derive(Parser, Debug)]
#[command(
    name = "pdf-text-api",
    version,
    about = "Extract text and metadata from PDF uploads",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "PDF_TEXT_API_VERBOSE")]
    verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true, env = "PDF_TEXT_API_LOG_JSON")]
    log_json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service.
    Serve(ServeArgs),
    /// Extract one local PDF and print the result as JSON.
    Parse(ParseArgs),
}

#[derive(Args, Debug)]
struct ExtractionArgs {
    /// Largest accepted upload, in MB.
    #[arg(long, env = "PDF_TEXT_API_MAX_FILE_SIZE_MB", default_value_t = 100,
          value_parser = clap::value_parser!(u64).range(1..))]
    max_file_size_mb: u64,

    /// Accepted file extension (repeatable).
    #[arg(
        long = "allowed-extension",
        env = "PDF_TEXT_API_ALLOWED_EXTENSIONS",
        value_delimiter = ',',
        default_value = "pdf"
    )]
    allowed_extensions: Vec<String>,
}

#[derive(Args, Debug)]
struct ServeArgs {
    #[arg(long, env = "PDF_TEXT_API_HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(short, long, env = "PDF_TEXT_API_PORT", default_value_t = 5001)]
    port: u16,

    /// Allowed CORS origin (repeatable).
    #[arg(
        long = "cors-origin",
        env = "PDF_TEXT_API_CORS_ORIGINS",
        value_delimiter = ',',
        default_values_t = ServerConfig::default().cors_origins
    )]
    cors_origins: Vec<String>,

    #[command(flatten)]
    extraction: ExtractionArgs,
}

#[derive(Args, Debug)]
struct ParseArgs {
    /// Local PDF file.
    file: PathBuf,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,

    /// Print a line per page on stderr.
    #[arg(long)]
    progress: bool,

    #[command(flatten)]
    extraction: ExtractionArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let default_filter = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }

    // ── PDF engine ───────────────────────────────────────────────────────
    let backend: Arc<dyn PdfBackend> = Arc::new(
        PdfiumBackend::bind()
            .context("Failed to load the PDFium library (set PDFIUM_LIB_PATH)")?,
    );

    match cli.command {
        Command::Serve(args) => {
            let config = build_config(&args.extraction, false)?;
            let server_config = ServerConfig {
                host: args.host,
                port: args.port,
                cors_origins: args.cors_origins,
            };
            server::serve(AppState::new(backend, config), server_config)
                .await
                .context("Server failed")?;
        }
        Command::Parse(args) => {
            let config = Arc::new(build_config(&args.extraction, args.progress)?);
            let request = upload_from_path(&args.file)
                .await
                .with_context(|| format!("Failed to read {}", args.file.display()))?;
            let result = parse(request, backend, config)
                .await
                .with_context(|| format!("Failed to parse {}", args.file.display()))?;

            let envelope = ApiSuccess::new(result);
            let json = if args.pretty {
                serde_json::to_string_pretty(&envelope)
            } else {
                serde_json::to_string(&envelope)
            }
            .context("Failed to serialise output")?;
            println!("{json}");
        }
    }

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(args: &ExtractionArgs, progress: bool) -> Result<ExtractionConfig> {
    let max_file_size = usize::try_from(args.max_file_size_mb)
        .ok()
        .and_then(|mb| mb.checked_mul(1024 * 1024))
        .context("--max-file-size-mb is too large for this platform")?;

    let mut builder = ExtractionConfig::builder()
        .max_file_size(max_file_size)
        .allowed_extensions(args.allowed_extensions.iter());
    if progress {
        builder = builder.progress_callback(Arc::new(CliProgressCallback {
            errors: AtomicUsize::new(0),
        }));
    }
    builder.build().context("Invalid extraction settings")
}
