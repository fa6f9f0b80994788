//! Discover command - list one discovery source.

use anyhow::Result;
use clap::Args;
use shelfpick_core::{CredentialKind, DiscoverySource};
use tracing::info;

use crate::context::AppContext;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the discover command.
#[derive(Args, Default)]
pub struct DiscoverArgs {
    /// Source: bestseller, new, editor, combined. Defaults to the configured source.
    #[arg(long, short)]
    pub source: Option<DiscoverySource>,

    /// Page number, starting at 1.
    #[arg(long, short, default_value = "1")]
    pub page: u32,
}

/// Runs the discover command.
pub async fn run(args: &DiscoverArgs, cli: &Cli) -> Result<()> {
    let ctx = AppContext::load().await?;
    let source = args.source.unwrap_or(ctx.settings.default_source);
    let page = args.page.max(1);

    let keys = ctx.credentials().await.keys().await;
    info!(source = %source, page, "Fetching discovery listing");

    let books = ctx
        .catalog
        .fetch(
            source,
            keys.configured(CredentialKind::Catalog),
            keys.configured(CredentialKind::Library),
            page,
        )
        .await?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!(
                "{}",
                formatter.format_books(&format!("{source} · page {page}"), &books)
            );
            if books.is_empty() && keys.configured(source.credential()).is_none() {
                eprintln!("Hint: no {} key is set; try `shelfpick keys set`.", source.credential());
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_books(source.cli_name(), page, &books)?);
        }
    }

    Ok(())
}
