// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Shelfpick CLI - library acquisition triage from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Show this week's bestsellers
//! shelfpick
//!
//! # Librarian picks (needs a library key)
//! shelfpick discover --source editor
//!
//! # Search by author, page 2
//! shelfpick search "한강" --target author --page 2
//!
//! # Store and check keys
//! shelfpick keys set --catalog ttbXXXX
//! shelfpick keys validate
//!
//! # Interactive triage session
//! shelfpick session
//! ```

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use shelfpick_providers::CatalogError;
use shelfpick_store::{LogLevel, SettingsStore, StoreError};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{config, discover, keys, search, session};

// ============================================================================
// CLI Definition
// ============================================================================

/// Shelfpick CLI - library acquisition triage.
#[derive(Parser)]
#[command(name = "shelfpick")]
#[command(about = "Library acquisition triage CLI")]
#[command(long_about = r#"
Shelfpick pulls candidate books from catalog listings, lets you shortlist
and confirm them, asks Gemini for a purchase justification and exports
the confirmed list as a purchase-order CSV.

Discovery sources:
  • Bestseller (bestseller)
  • Notable new releases (new)
  • Librarian picks (editor)
  • Bestseller + new releases (combined)

Examples:
  shelfpick                          # Bestsellers, page 1
  shelfpick discover -s combined     # Merged listing
  shelfpick search "과학" -t title    # Catalog search
  shelfpick session                  # Interactive triage
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run. If none, runs 'discover' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// List a discovery source (default if no command specified).
    #[command(visible_alias = "d")]
    Discover(discover::DiscoverArgs),

    /// Search the catalog.
    #[command(visible_alias = "s")]
    Search(search::SearchArgs),

    /// Run an interactive triage session.
    Session(session::SessionArgs),

    /// Manage API keys.
    Keys(keys::KeysArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// A required key is not configured.
    MissingCredential = 2,
    /// Provider payload could not be understood.
    ParseError = 3,
    /// Every relay failed.
    Network = 4,
}

impl ExitCode {
    /// Picks the exit code for a failed command.
    pub fn for_error(err: &anyhow::Error) -> Self {
        let catalog = err.downcast_ref::<CatalogError>().or_else(|| {
            match err.downcast_ref::<StoreError>() {
                Some(StoreError::Catalog(e)) => Some(e),
                _ => None,
            }
        });

        match catalog {
            Some(CatalogError::MissingCredential(_)) => Self::MissingCredential,
            Some(CatalogError::Parse(_)) => Self::ParseError,
            Some(CatalogError::Network(_)) => Self::Network,
            _ => Self::Error,
        }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

/// Filter directive for the configured level. `--verbose` wins over
/// `RUST_LOG`, which wins over the settings file.
fn filter_directive(verbose: bool, env: Option<&str>, level: LogLevel) -> String {
    if verbose {
        return "shelfpick=debug,info".to_string();
    }
    match env.map(str::trim).filter(|e| !e.is_empty()) {
        Some(env) => env.to_string(),
        None => format!("shelfpick={level}"),
    }
}

fn setup_logging(verbose: bool, quiet: bool, level: LogLevel) {
    if quiet {
        return;
    }

    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = filter_directive(verbose, env.as_deref(), level);
    let filter = EnvFilter::try_new(&directive)
        .unwrap_or_else(|_| EnvFilter::new(format!("shelfpick={level}")));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match SettingsStore::load_default().await {
        Ok(store) => store.get().await.log_level,
        Err(_) => LogLevel::default(),
    };
    setup_logging(cli.verbose, cli.quiet, level);

    let result = match &cli.command {
        Some(Commands::Discover(args)) => discover::run(args, &cli).await,
        Some(Commands::Search(args)) => search::run(args, &cli).await,
        Some(Commands::Session(args)) => session::run(args, &cli).await,
        Some(Commands::Keys(args)) => keys::run(args, &cli).await,
        Some(Commands::Config(args)) => config::run(args, &cli).await,
        None => discover::run(&discover::DiscoverArgs::default(), &cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(ExitCode::for_error(&e) as i32);
    }

    Ok(())
}
