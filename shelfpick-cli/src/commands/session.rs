//! Session command - interactive triage.
//!
//! Reads one command per line from stdin and applies it to a
//! [`Session`]. Type `help` for the command list.

use anyhow::Result;
use clap::Args;
use shelfpick_core::{CredentialKind, DiscoverySource, DiscoveryUpdate, SearchTarget, Transition};
use shelfpick_store::{default_export_dir, Session, StoreError};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

use crate::context::AppContext;
use crate::output::{format_price, JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

const HELP: &str = "\
Commands:
  source <bestseller|new|editor|combined>   switch discovery source
  search [keyword|title|author|publisher] <text>
  page <n> | next | prev                    move between pages
  add <id>                                  discovery -> review
  approve <id>                              review -> confirmed
  return <id>                               confirmed -> review, review -> discarded
  list                                      show the board
  cart                                      show confirmed books and total
  analyze                                   request a purchase justification
  export [dir]                              write the confirmed list as CSV
  key <catalog|library> <value>             store a key and reload
  validate                                  check stored keys
  quit                                      save and exit";

/// Arguments for the session command.
#[derive(Args)]
pub struct SessionArgs {
    /// Source shown first. Defaults to the configured source.
    #[arg(long, short)]
    pub source: Option<DiscoverySource>,
}

// ============================================================================
// Command parsing
// ============================================================================

/// One line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Switch discovery source.
    Source(DiscoverySource),
    /// Search the catalog.
    Search {
        /// Search text.
        query: String,
        /// Field matched.
        target: SearchTarget,
    },
    /// Jump to a page.
    Page(u32),
    /// Next page.
    Next,
    /// Previous page.
    Prev,
    /// Shortlist a book.
    Add(String),
    /// Confirm a book.
    Approve(String),
    /// Send a book back one stage.
    Return(String),
    /// Show the board.
    List,
    /// Show confirmed books.
    Cart,
    /// Request analysis.
    Analyze,
    /// Export CSV.
    Export(Option<PathBuf>),
    /// Store a key.
    Key(CredentialKind, String),
    /// Check stored keys.
    Validate,
    /// Show help.
    Help,
    /// Leave.
    Quit,
}

fn required_arg<'a>(arg: Option<&'a str>, usage: &str) -> Result<&'a str, String> {
    arg.map(str::trim)
        .filter(|a| !a.is_empty())
        .ok_or_else(|| format!("usage: {usage}"))
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<ReplCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, Some(rest.trim())),
        None => (line, None),
    };

    let command = match word.to_lowercase().as_str() {
        "source" | "src" => {
            let name = required_arg(rest, "source <bestseller|new|editor|combined>")?;
            ReplCommand::Source(name.parse().map_err(|e| format!("{e}"))?)
        }
        "search" | "find" => {
            let text = required_arg(rest, "search [target] <text>")?;
            let (target, query) = match text.split_once(char::is_whitespace) {
                Some((first, query)) => match first.parse::<SearchTarget>() {
                    Ok(target) => (target, query.trim()),
                    Err(_) => (SearchTarget::Keyword, text),
                },
                None => (SearchTarget::Keyword, text),
            };
            ReplCommand::Search {
                query: query.to_string(),
                target,
            }
        }
        "page" | "p" => {
            let n = required_arg(rest, "page <n>")?;
            let page: u32 = n.parse().map_err(|_| format!("not a page number: {n}"))?;
            ReplCommand::Page(page.max(1))
        }
        "next" | "n" => ReplCommand::Next,
        "prev" => ReplCommand::Prev,
        "add" | "a" => ReplCommand::Add(required_arg(rest, "add <id>")?.to_string()),
        "approve" | "ok" => ReplCommand::Approve(required_arg(rest, "approve <id>")?.to_string()),
        "return" | "back" => ReplCommand::Return(required_arg(rest, "return <id>")?.to_string()),
        "list" | "ls" | "board" => ReplCommand::List,
        "cart" => ReplCommand::Cart,
        "analyze" | "analyse" => ReplCommand::Analyze,
        "export" => ReplCommand::Export(rest.filter(|r| !r.is_empty()).map(PathBuf::from)),
        "key" => {
            let usage = "key <catalog|library> <value>";
            let text = required_arg(rest, usage)?;
            let (kind, value) = text
                .split_once(char::is_whitespace)
                .ok_or_else(|| format!("usage: {usage}"))?;
            let kind = match kind.to_lowercase().as_str() {
                "catalog" | "ttb" => CredentialKind::Catalog,
                "library" | "lib" => CredentialKind::Library,
                _ => return Err(format!("usage: {usage}")),
            };
            ReplCommand::Key(kind, value.trim().to_string())
        }
        "validate" => ReplCommand::Validate,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        other => return Err(format!("unknown command '{other}', type 'help'")),
    };

    Ok(Some(command))
}

// ============================================================================
// Loop
// ============================================================================

/// Runs the session command.
pub async fn run(args: &SessionArgs, cli: &Cli) -> Result<()> {
    let ctx = AppContext::load().await?;
    let source = args.source.unwrap_or(ctx.settings.default_source);
    let export_dir = ctx.settings.export_dir.clone().unwrap_or_else(default_export_dir);

    let credentials = ctx.credentials().await;
    let mut session = Session::new(ctx.catalog.clone(), ctx.analysis.clone(), credentials, source).await;
    let printer = Printer::new(cli);

    report_load(&printer, session.reload().await);
    printer.board(&session)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"shelfpick> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                printer.error(&message);
                continue;
            }
        };
        debug!(?command, "Session command");

        if command == ReplCommand::Quit {
            break;
        }
        execute(&mut session, command, &export_dir, &printer).await?;
    }

    session.close().await?;
    Ok(())
}

async fn execute(
    session: &mut Session,
    command: ReplCommand,
    export_dir: &Path,
    printer: &Printer,
) -> Result<()> {
    match command {
        ReplCommand::Source(source) => {
            report_load(printer, session.select_source(source).await);
            printer.board(session)?;
        }
        ReplCommand::Search { query, target } => {
            report_load(printer, session.search(&query, target).await);
            printer.board(session)?;
        }
        ReplCommand::Page(page) => {
            report_load(printer, session.go_to_page(page).await);
            printer.board(session)?;
        }
        ReplCommand::Next => {
            let page = session.page() + 1;
            report_load(printer, session.go_to_page(page).await);
            printer.board(session)?;
        }
        ReplCommand::Prev => {
            let page = session.page().saturating_sub(1).max(1);
            report_load(printer, session.go_to_page(page).await);
            printer.board(session)?;
        }
        ReplCommand::Add(id) => printer.moved(&id, session.add(&id)),
        ReplCommand::Approve(id) => printer.moved(&id, session.approve(&id)),
        ReplCommand::Return(id) => printer.moved(&id, session.return_book(&id)),
        ReplCommand::List => printer.board(session)?,
        ReplCommand::Cart => printer.cart(session)?,
        ReplCommand::Analyze => match session.analyze().await {
            Ok(report) => printer.report(&report)?,
            Err(StoreError::Analysis(e)) => {
                warn!(error = %e, "Analysis failed");
                printer.error(e.user_message());
            }
            Err(e) => printer.error(&e.to_string()),
        },
        ReplCommand::Export(dir) => {
            let dir = dir.as_deref().unwrap_or(export_dir);
            match session.export(dir).await {
                Ok(path) => println!(
                    "Exported {} books to {}",
                    session.board().confirmed().len(),
                    path.display()
                ),
                Err(e) => printer.error(&e.to_string()),
            }
        }
        ReplCommand::Key(kind, value) => {
            report_load(printer, session.set_key(kind, &value).await);
            println!("{kind} key saved");
        }
        ReplCommand::Validate => {
            for kind in CredentialKind::all() {
                let valid = session.validate_key(*kind).await;
                println!("{}", printer.text.format_validation(*kind, valid));
            }
        }
        ReplCommand::Help => println!("{HELP}"),
        ReplCommand::Quit => {}
    }
    Ok(())
}

fn report_load(printer: &Printer, result: Result<DiscoveryUpdate, StoreError>) {
    match result {
        Ok(DiscoveryUpdate::Applied { excluded, .. }) if excluded > 0 => {
            println!("({excluded} already triaged books hidden)");
        }
        Ok(_) => {}
        Err(e) => printer.error(&e.to_string()),
    }
}

// ============================================================================
// Printing
// ============================================================================

struct Printer {
    text: TextFormatter,
    json: JsonFormatter,
    format: OutputFormat,
}

impl Printer {
    fn new(cli: &Cli) -> Self {
        Self {
            text: TextFormatter::new(!cli.no_color),
            json: JsonFormatter::new(cli.pretty),
            format: cli.format,
        }
    }

    fn board(&self, session: &Session) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                let heading = format!("{} · page {}", session.mode(), session.page());
                println!("{}", self.text.format_board(session.board(), &heading));
            }
            OutputFormat::Json => println!("{}", self.json.format_board(session.board(), session.cart())?),
        }
        Ok(())
    }

    fn cart(&self, session: &Session) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                println!("{}", self.text.format_books("Confirmed", session.board().confirmed()));
                println!("Total: {}", format_price(session.cart_total()));
            }
            OutputFormat::Json => println!("{}", self.json.format(&session.cart())?),
        }
        Ok(())
    }

    fn report(&self, report: &shelfpick_core::AnalysisReport) -> Result<()> {
        match self.format {
            OutputFormat::Text => println!("{}", self.text.format_report(report)),
            OutputFormat::Json => println!("{}", self.json.format(report)?),
        }
        Ok(())
    }

    fn moved(&self, id: &str, result: Result<Transition, StoreError>) {
        match result {
            Ok(transition) => match transition.target() {
                Some(status) => println!("{id} → {status}"),
                None => println!("{id} discarded"),
            },
            Err(e) => self.error(&e.to_string()),
        }
    }

    fn error(&self, message: &str) {
        eprintln!("{}", self.text.format_error(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line() {
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn test_board_moves() {
        assert_eq!(parse_command("add 123"), Ok(Some(ReplCommand::Add("123".into()))));
        assert_eq!(parse_command("APPROVE  nlk-4"), Ok(Some(ReplCommand::Approve("nlk-4".into()))));
        assert_eq!(parse_command("return 9"), Ok(Some(ReplCommand::Return("9".into()))));
        assert!(parse_command("add").is_err());
    }

    #[test]
    fn test_source_and_pages() {
        assert_eq!(
            parse_command("source editor"),
            Ok(Some(ReplCommand::Source(DiscoverySource::EditorRecommend)))
        );
        assert!(parse_command("source weekly").is_err());
        assert_eq!(parse_command("page 0"), Ok(Some(ReplCommand::Page(1))));
        assert!(parse_command("page two").is_err());
        assert_eq!(parse_command("next"), Ok(Some(ReplCommand::Next)));
    }

    #[test]
    fn test_search_target_is_optional() {
        assert_eq!(
            parse_command("search author 한강"),
            Ok(Some(ReplCommand::Search {
                query: "한강".into(),
                target: SearchTarget::Author,
            }))
        );
        assert_eq!(
            parse_command("search 소년이 온다"),
            Ok(Some(ReplCommand::Search {
                query: "소년이 온다".into(),
                target: SearchTarget::Keyword,
            }))
        );
        assert_eq!(
            parse_command("search title"),
            Ok(Some(ReplCommand::Search {
                query: "title".into(),
                target: SearchTarget::Keyword,
            }))
        );
    }

    #[test]
    fn test_key_and_export() {
        assert_eq!(
            parse_command("key library abc123"),
            Ok(Some(ReplCommand::Key(CredentialKind::Library, "abc123".into())))
        );
        assert!(parse_command("key gemini abc").is_err());
        assert!(parse_command("key catalog").is_err());
        assert_eq!(parse_command("export"), Ok(Some(ReplCommand::Export(None))));
        assert_eq!(
            parse_command("export /tmp/out"),
            Ok(Some(ReplCommand::Export(Some(PathBuf::from("/tmp/out")))))
        );
    }

    #[test]
    fn test_unknown_command() {
        let err = parse_command("dance").unwrap_err();
        assert!(err.contains("unknown command"));
    }
}
