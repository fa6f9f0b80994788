//! Search command - query the catalog.

use anyhow::Result;
use clap::Args;
use shelfpick_core::{CredentialKind, SearchTarget};
use shelfpick_providers::CatalogError;
use tracing::info;

use crate::context::AppContext;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Search text.
    pub query: String,

    /// Field to match: keyword, title, author, publisher.
    #[arg(long, short, default_value = "keyword")]
    pub target: SearchTarget,

    /// Page number, starting at 1.
    #[arg(long, short, default_value = "1")]
    pub page: u32,
}

/// Runs the search command.
pub async fn run(args: &SearchArgs, cli: &Cli) -> Result<()> {
    let ctx = AppContext::load().await?;
    let keys = ctx.credentials().await.keys().await;
    let key = keys
        .configured(CredentialKind::Catalog)
        .ok_or(CatalogError::MissingCredential(CredentialKind::Catalog))?;

    let page = args.page.max(1);
    info!(query = %args.query, target = %args.target, page, "Searching catalog");
    let books = ctx.catalog.search(&args.query, key, args.target, page).await?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            let title = format!("\"{}\" in {} · page {page}", args.query.trim(), args.target);
            println!("{}", formatter.format_books(&title, &books));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_books("search", page, &books)?);
        }
    }

    Ok(())
}
