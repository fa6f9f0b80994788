//! Config command - manage configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use shelfpick_store::{
    default_config_dir, default_credentials_path, default_export_dir, default_settings_path,
    SettingsStore,
};
use tracing::info;

use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Reset to defaults.
    Reset,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli).await,
        ConfigAction::Path => show_paths(cli),
        ConfigAction::Reset => reset_config().await,
    }
}

async fn show_config(cli: &Cli) -> Result<()> {
    let store = SettingsStore::load_default().await?;
    let settings = store.get().await;

    match cli.format {
        OutputFormat::Text => {
            println!("Shelfpick Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("Relays:");
            for relay in &settings.relays {
                println!("  • {relay}");
            }
            println!();
            println!(
                "Attempts per relay: {} ({} ms apart)",
                settings.max_attempts_per_relay, settings.retry_delay_ms
            );
            println!("Request timeout: {}s", settings.request_timeout_secs);
            println!("Catalog API: {}", settings.catalog_base_url);
            println!("Library API: {}", settings.library_base_url);
            println!("Analysis model: {}", settings.analysis_model);
            println!("Key storage: {}", settings.credential_backend);
            println!("Default source: {}", settings.default_source);
            println!(
                "Export dir: {}",
                settings
                    .export_dir
                    .clone()
                    .unwrap_or_else(default_export_dir)
                    .display()
            );
            println!("Log level: {}", settings.log_level);
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&settings)?);
        }
    }

    Ok(())
}

fn show_paths(cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let settings_path = default_settings_path();
    let credentials_path = default_credentials_path();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:       {}", config_dir.display());
            println!("Settings file:    {}", settings_path.display());
            println!("Credentials file: {}", credentials_path.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "settings_file": settings_path.display().to_string(),
                "credentials_file": credentials_path.display().to_string(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn reset_config() -> Result<()> {
    let path = default_settings_path();

    if tokio::fs::try_exists(&path).await? {
        tokio::fs::remove_file(&path).await?;
        info!(path = %path.display(), "Settings reset");
        println!("Configuration reset to defaults");
    } else {
        println!("No configuration file to reset");
    }

    Ok(())
}
