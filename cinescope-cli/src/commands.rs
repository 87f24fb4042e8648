//! CLI command implementations

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use cinescope_core::CinescopeConfig;
use cinescope_search::{SearchGateway, SearchSession, SearchSnapshot};
use clap::Subcommand;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::render;

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Search the catalog once and print the results
    Search {
        /// Free-text query; omit to list featured movies
        query: Vec<String>,
        /// Print canonical records as JSON
        #[arg(long)]
        json: bool,
        /// Print the full details of every result
        #[arg(long, conflicts_with = "json")]
        details: bool,
    },
    /// Interactive session: each input line is a new query
    Browse,
}

/// Handle the CLI command
///
/// # Errors
/// - `std::io::Error` - Writing to stdout or reading stdin failed
/// - `serde_json::Error` - JSON output could not be written
pub async fn handle_command(command: Commands, config: &CinescopeConfig) -> Result<()> {
    match command {
        Commands::Search {
            query,
            json,
            details,
        } => search_once(config, &query.join(" "), json, details).await,
        Commands::Browse => browse(config).await,
    }
}

/// Run one gateway search and print the results
///
/// # Errors
/// - `std::io::Error` - Writing to stdout failed
/// - `serde_json::Error` - JSON output could not be written
pub async fn search_once(
    config: &CinescopeConfig,
    query: &str,
    json: bool,
    details: bool,
) -> Result<()> {
    let gateway = SearchGateway::new(&config.search);
    let records = gateway.search_movies(query).await;

    let mut out = std::io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &records)?;
        writeln!(out)?;
    } else if details && config.feature_flags.enable_details_modal && !records.is_empty() {
        for record in &records {
            writeln!(out, "{}\n", render::details(record))?;
        }
    } else {
        render::write_records(&mut out, &records)?;
    }

    Ok(())
}

/// A parsed line of interactive input.
#[derive(Debug, PartialEq, Eq)]
pub enum BrowseInput {
    Query(String),
    Open(usize),
    Dismiss,
    Quit,
    Invalid(String),
}

impl BrowseInput {
    /// Lines starting with `:` are commands; anything else is a query.
    pub fn parse(line: &str) -> Self {
        let Some(command) = line.trim().strip_prefix(':') else {
            return BrowseInput::Query(line.to_string());
        };

        let mut parts = command.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("q" | "quit"), None) => BrowseInput::Quit,
            (Some("dismiss"), None) => BrowseInput::Dismiss,
            (Some("open"), Some(n)) => match n.parse::<usize>() {
                Ok(n) if n > 0 => BrowseInput::Open(n),
                _ => BrowseInput::Invalid(format!("Not a result number: {n}")),
            },
            _ => BrowseInput::Invalid(format!("Unknown command: {}", line.trim())),
        }
    }
}

/// Interactive search session over stdin
///
/// # Errors
/// - `std::io::Error` - Reading stdin or writing stdout failed
pub async fn browse(config: &CinescopeConfig) -> Result<()> {
    let gateway = Arc::new(SearchGateway::new(&config.search));
    let session = SearchSession::start(gateway, config.search.debounce_delay);

    println!("Type to search. Commands: :open <n>, :dismiss, :quit");

    let mut updates = session.subscribe();
    let renderer = tokio::spawn(async move {
        loop {
            let snapshot = updates.borrow_and_update().clone();
            if let Err(e) = print_snapshot(&snapshot) {
                tracing::warn!(error = %e, "Failed to render search state");
            }
            if updates.changed().await.is_err() {
                break;
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut quit = false;
    let mut last_query = None;
    while let Some(line) = lines.next_line().await? {
        match BrowseInput::parse(&line) {
            BrowseInput::Query(query) => {
                session.input(query.clone());
                last_query = Some(query);
            }
            BrowseInput::Dismiss => session.dismiss_advisory(),
            BrowseInput::Open(n) => open_details(config, &session.snapshot(), n),
            BrowseInput::Invalid(message) => println!("{message}"),
            BrowseInput::Quit => {
                quit = true;
                break;
            }
        }
    }

    if let (false, Some(query)) = (quit, last_query) {
        wait_for_pending_search(&session, config, &query).await;
    }

    drop(session);
    renderer.abort();
    Ok(())
}

fn print_snapshot(snapshot: &SearchSnapshot) -> std::io::Result<()> {
    let mut out = std::io::stdout().lock();
    writeln!(out)?;
    render::write_snapshot(&mut out, snapshot)?;
    out.flush()
}

fn open_details(config: &CinescopeConfig, snapshot: &SearchSnapshot, n: usize) {
    if !config.feature_flags.enable_details_modal {
        println!("Details view is disabled.");
        return;
    }
    match snapshot.visible_records().get(n - 1) {
        Some(record) => println!("\n{}\n", render::details(record)),
        None => println!("No result #{n}."),
    }
}

/// Lets the last query typed before end-of-file settle and resolve.
async fn wait_for_pending_search(session: &SearchSession, config: &CinescopeConfig, query: &str) {
    let mut updates = session.subscribe();
    let limit = config.search.debounce_delay * 2 + config.search.request_timeout;

    let settled = updates
        .wait_for(|snapshot| snapshot.state.query() == Some(query) && !snapshot.state.is_loading());

    if tokio::time::timeout(limit, settled).await.is_err() {
        tracing::debug!(query, "Gave up waiting for the last search to finish");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_lines_are_queries() {
        assert_eq!(
            BrowseInput::parse("  dark knight "),
            BrowseInput::Query("  dark knight ".to_string())
        );
        assert_eq!(BrowseInput::parse(""), BrowseInput::Query(String::new()));
    }

    #[test]
    fn test_commands() {
        assert_eq!(BrowseInput::parse(":quit"), BrowseInput::Quit);
        assert_eq!(BrowseInput::parse(" :q "), BrowseInput::Quit);
        assert_eq!(BrowseInput::parse(":dismiss"), BrowseInput::Dismiss);
        assert_eq!(BrowseInput::parse(":open 3"), BrowseInput::Open(3));
    }

    #[test]
    fn test_invalid_commands() {
        assert!(matches!(BrowseInput::parse(":open 0"), BrowseInput::Invalid(_)));
        assert!(matches!(BrowseInput::parse(":open x"), BrowseInput::Invalid(_)));
        assert!(matches!(BrowseInput::parse(":open"), BrowseInput::Invalid(_)));
        assert!(matches!(BrowseInput::parse(":rewind"), BrowseInput::Invalid(_)));
    }
}
