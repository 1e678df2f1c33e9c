// Entrypoint for the CLI application.
// - Parses flags, installs logging and resolves configuration.
// - With exactly one source argument, scans it once; otherwise starts the
//   prompt loop.

use anyhow::{Context, Result};
use clap::Parser;
use ocr_scanner::{
    api::ApiClient,
    config::{Config, Overrides},
    extract::Scanner,
    ui::{self, Interrupt, LineReader, TerminalReader},
};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Extract text from an image file or URL using the APIVerve OCR API.
#[derive(Parser, Debug)]
#[command(name = "ocr-scanner", version, about)]
struct Cli {
    /// Image path or http(s) URL. Anything other than exactly one starts
    /// interactive mode.
    #[arg(allow_hyphen_values = true)]
    sources: Vec<String>,

    /// APIVerve API key.
    #[arg(long, env = "APIVERVE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// OCR endpoint.
    #[arg(long, env = "OCR_SCANNER_API_URL")]
    api_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, env = "OCR_SCANNER_TIMEOUT", value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Config file (default: <config dir>/ocr-scanner/config.json).
    #[arg(long, env = "OCR_SCANNER_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let overrides = Overrides {
        api_key: cli.api_key,
        api_url: cli.api_url,
        timeout_secs: cli.timeout,
    };
    let config = Config::load(cli.config.as_deref(), overrides)
        .context("Failed to load configuration")?;
    if !config.has_api_key() {
        tracing::warn!("no API key configured; requests will be refused");
    }

    let api = ApiClient::new(&config)?;
    let scanner = Scanner::new(api);
    let mut stdout = io::stdout();

    if let [source] = cli.sources.as_slice() {
        ui::run_once(&scanner, source, &mut stdout)?;
        return Ok(());
    }

    let interrupt = Interrupt::default();
    let handler = interrupt.clone();
    ctrlc::set_handler(move || handler.trigger()).context("Failed to install Ctrl-C handler")?;

    if io::stdin().is_terminal() {
        ui::interactive(&scanner, &mut TerminalReader, &mut stdout, &interrupt)?;
    } else {
        let mut reader = LineReader::new(io::stdin().lock());
        ui::interactive(&scanner, &mut reader, &mut stdout, &interrupt)?;
    }
    Ok(())
}
