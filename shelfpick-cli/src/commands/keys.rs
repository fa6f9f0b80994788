//! Keys command - manage provider API keys.

use anyhow::Result;
use clap::{Args, Subcommand};
use futures::future::join_all;
use shelfpick_core::{ApiKeys, CredentialKind};
use tracing::info;

use crate::context::AppContext;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the keys command.
#[derive(Args)]
pub struct KeysArgs {
    #[command(subcommand)]
    pub action: KeysAction,
}

/// Keys subcommands.
#[derive(Subcommand)]
pub enum KeysAction {
    /// Show stored keys (masked).
    Show,

    /// Store one or both keys.
    Set {
        /// Commercial catalog (TTB) key.
        #[arg(long)]
        catalog: Option<String>,

        /// Library data key.
        #[arg(long)]
        library: Option<String>,
    },

    /// Check stored keys against their providers.
    Validate,

    /// Remove both keys.
    Clear,
}

/// Runs the keys command.
pub async fn run(args: &KeysArgs, cli: &Cli) -> Result<()> {
    let ctx = AppContext::load().await?;

    match &args.action {
        KeysAction::Show => show_keys(&ctx, cli).await,
        KeysAction::Set { catalog, library } => {
            set_keys(&ctx, catalog.as_deref(), library.as_deref(), cli).await
        }
        KeysAction::Validate => validate_keys(&ctx, cli).await,
        KeysAction::Clear => clear_keys(&ctx).await,
    }
}

async fn show_keys(ctx: &AppContext, cli: &Cli) -> Result<()> {
    let keys = ctx.credentials().await.keys().await;
    print_keys(&keys, &[], cli)
}

async fn set_keys(
    ctx: &AppContext,
    catalog: Option<&str>,
    library: Option<&str>,
    cli: &Cli,
) -> Result<()> {
    if catalog.is_none() && library.is_none() {
        anyhow::bail!("Nothing to set. Use --catalog and/or --library");
    }

    let store = ctx.credentials().await;
    for (kind, value) in [
        (CredentialKind::Catalog, catalog),
        (CredentialKind::Library, library),
    ] {
        if let Some(value) = value {
            store.set(kind, value.trim()).await;
            info!(kind = %kind, "Key updated");
        }
    }
    store.flush().await?;

    print_keys(&store.keys().await, &[], cli)
}

async fn validate_keys(ctx: &AppContext, cli: &Cli) -> Result<()> {
    let keys = ctx.credentials().await.keys().await;

    let checks = CredentialKind::all().iter().map(|kind| {
        let catalog = &ctx.catalog;
        let key = keys.get(*kind);
        async move { (*kind, catalog.validate_credential(*kind, key).await) }
    });
    let results = join_all(checks).await;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            for (kind, valid) in &results {
                println!("{}", formatter.format_validation(*kind, *valid));
            }
        }
        OutputFormat::Json => print_keys(&keys, &results, cli)?,
    }

    Ok(())
}

async fn clear_keys(ctx: &AppContext) -> Result<()> {
    let store = ctx.credentials().await;
    store.replace(ApiKeys::default()).await;
    store.flush().await?;

    info!("Keys cleared");
    println!("Keys cleared");
    Ok(())
}

fn print_keys(keys: &ApiKeys, validation: &[(CredentialKind, bool)], cli: &Cli) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_keys(keys));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_keys(keys, validation)?);
        }
    }
    Ok(())
}
