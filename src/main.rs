use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use nota::api::{NotesApi, NotesClientBuilder};
use nota::form::NoteDraft;
use nota::models::TagFilter;

/// nota - terminal client for a remote notes service
#[derive(Parser)]
#[command(name = "nota")]
#[command(about = "Browse, search, and create notes from the terminal")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Browse notes interactively
    Browse(BrowseCommand),
    /// Add a new note without opening the browser
    Add(AddCommand),
}

/// Browse notes interactively
#[derive(Parser)]
struct BrowseCommand {
    /// Initial tag filter: one of the note tags, or "All"
    #[arg(value_name = "TAG")]
    tag: Option<String>,
}

/// Add a new note
#[derive(Parser)]
struct AddCommand {
    /// The note title (3-50 characters)
    #[arg(value_name = "TITLE")]
    title: String,

    /// The note body (up to 500 characters)
    #[arg(short, long, value_name = "CONTENT", default_value = "")]
    content: String,

    /// Tag to assign (Todo, Work, Personal, Meeting, Shopping)
    #[arg(short, long, value_name = "TAG", default_value = "Todo")]
    tag: String,
}

fn main() {
    // Environment files feed client configuration
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.command {
        Some(Commands::Add(cmd)) => handle_add(cmd),
        Some(Commands::Browse(cmd)) => handle_browse(cmd.tag.as_deref()),
        None => handle_browse(None),
    };

    if let Err(e) = result {
        // Determine exit code based on error type
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e}");
        std::process::exit(exit_code);
    }
}

/// Initializes tracing with verbosity from the command line.
///
/// `RUST_LOG` still wins when set, so `-v` only raises the crate's own
/// level.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("nota={level}").parse().expect("valid log directive")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors include local validation failures; internal errors include
/// network and service failures.
fn is_user_error(error: &anyhow::Error) -> bool {
    let error_msg = error.to_string();
    error_msg.contains("Invalid note")
}

/// Handles the browse command by starting the TUI.
///
/// The tag segment behaves like a route filter: recognized tags scope the
/// view, anything else (including nothing) means "All".
fn handle_browse(segment: Option<&str>) -> Result<()> {
    let tag = TagFilter::from_segment(segment);
    nota::tui::run(tag)
}

/// Handles the add command by validating and submitting a new note.
fn handle_add(cmd: &AddCommand) -> Result<()> {
    let draft = NoteDraft::new(&cmd.title, &cmd.content, &cmd.tag);

    // Local validation; an invalid draft never reaches the service
    let note = match draft.validate() {
        Ok(note) => note,
        Err(errors) => {
            let details = errors.values().cloned().collect::<Vec<_>>().join("; ");
            anyhow::bail!("Invalid note: {details}");
        }
    };

    let client = NotesClientBuilder::new()
        .build()
        .context("Failed to configure notes API client")?;

    let created = client.create_note(&note).context("Failed to create note")?;
    println!("Note created (id: {})", created.id);

    Ok(())
}
