use std::collections::BTreeSet;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::{Parser, Subcommand};

use crate::config::UserConfig;
use crate::logging;
use crate::models::{HIGHLIGHT_CLOSE, HIGHLIGHT_OPEN, Role};
use crate::responder::{KnowledgeBase, reply_or_fallback};
use crate::search::{NO_MATCHES_PLACEHOLDER, SearchEngine};
use crate::transcript::{load_transcript, restore};
use crate::tui;
use crate::utils::{default_config_path, default_log_path, format_path_with_tilde};

// Bold yellow, for match highlighting on a terminal
const ANSI_HIGHLIGHT_OPEN: &str = "\x1b[1;33m";
const ANSI_RESET: &str = "\x1b[0m";

#[derive(Parser)]
#[command(name = "quantum-chat")]
#[command(version)]
#[command(about = "Terminal chat with the AMOS quantum knowledge base and live history search", long_about = None)]
pub struct Cli {
    /// Config file (default: <config dir>/quantum-chat/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Save the chat transcript here on exit, continuing it if it exists
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,

    /// Write logs of the interactive chat to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask the knowledge base a single question
    Ask {
        #[arg(required = true)]
        message: Vec<String>,
    },
    /// List the knowledge base topics
    Topics,
    /// Search a saved transcript
    Search {
        query: String,
        /// Transcript to search (default: `transcript` from the config file)
        #[arg(long, value_name = "PATH")]
        transcript: Option<PathBuf>,
    },
    /// Show statistics about a saved transcript
    Stats {
        /// Transcript to summarise (default: `transcript` from the config file)
        #[arg(long, value_name = "PATH")]
        transcript: Option<PathBuf>,
    },
}

pub fn run() -> Result<()> {
    let Cli { config, transcript, log_file, command } = Cli::parse();

    let Some(command) = command else {
        let config = load_config(config.as_deref())?.with_overrides(transcript, log_file);
        return run_chat(&config);
    };

    logging::init_stderr("warn");
    let config = load_config(config.as_deref())?;

    match command {
        Commands::Ask { message } => ask(&config, &message.join(" ")),
        Commands::Topics => {
            list_topics(&config);
            Ok(())
        }
        Commands::Search { query, transcript } => {
            search_transcript(&transcript_path(transcript, &config)?, &query)
        }
        Commands::Stats { transcript } => show_stats(&transcript_path(transcript, &config)?),
    }
}

/// Explicit config must exist; the default location is optional
fn load_config(explicit: Option<&Path>) -> Result<UserConfig> {
    match explicit {
        Some(path) => {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            UserConfig::load(path)
        }
        None => match default_config_path() {
            Ok(path) => UserConfig::load(&path),
            Err(e) => {
                tracing::debug!(error = %e, "no platform config directory");
                Ok(UserConfig::default())
            }
        },
    }
}

fn transcript_path(explicit: Option<PathBuf>, config: &UserConfig) -> Result<PathBuf> {
    explicit
        .or_else(|| config.transcript.clone())
        .context("No transcript given: pass --transcript or set `transcript` in the config file")
}

fn knowledge_base(config: &UserConfig) -> KnowledgeBase {
    KnowledgeBase::new().with_topics(config.topics.clone())
}

fn run_chat(config: &UserConfig) -> Result<()> {
    let log_path = match &config.log_file {
        Some(path) => path.clone(),
        None => default_log_path()?,
    };
    logging::init_file(&log_path, "info")?;

    if let Some(saved) = tui::run_interactive(config)? {
        println!("Transcript saved to {}", format_path_with_tilde(&saved));
    }
    Ok(())
}

fn ask(config: &UserConfig, message: &str) -> Result<()> {
    if message.trim().is_empty() {
        bail!("Message is empty");
    }
    let mut kb = knowledge_base(config);
    println!("{}", reply_or_fallback(&mut kb, message));
    Ok(())
}

fn list_topics(config: &UserConfig) {
    let kb = knowledge_base(config);
    println!("Knowledge base topics ({}):", kb.len());
    for topic in kb.topics() {
        println!("  {}", topic);
    }
}

fn search_transcript(path: &Path, query: &str) -> Result<()> {
    let engine = SearchEngine::new();
    if !engine.is_searchable(query) {
        bail!("Search query must be at least 2 characters");
    }

    let (store, _) = restore(&load_transcript(path)?);
    let results = engine.search(&store, query);
    if results.is_empty() {
        println!("{}", NO_MATCHES_PLACEHOLDER);
        return Ok(());
    }

    let (open, close) = if std::io::stdout().is_terminal() {
        (ANSI_HIGHLIGHT_OPEN, ANSI_RESET)
    } else {
        (HIGHLIGHT_OPEN, HIGHLIGHT_CLOSE)
    };

    for result in &results {
        let entry = store.get(result.source_index)?;
        println!(
            "#{} {} • {}",
            result.source_index + 1,
            result.role.label(),
            entry.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
        );
        for line in result.snippet.marked(open, close).lines() {
            println!("  {}", line);
        }
    }
    println!();
    println!("{} matching messages", results.len());

    Ok(())
}

fn show_stats(path: &Path) -> Result<()> {
    let lines = load_transcript(path)?;
    let (store, board) = restore(&lines);
    let snapshot = store.all();

    let user = snapshot.iter().filter(|e| e.role == Role::User).count();
    let assistant = snapshot.iter().filter(|e| e.role == Role::Assistant).count();
    let sessions: BTreeSet<_> = lines.iter().map(|line| line.session_id).collect();

    println!("Quantum Chat Transcript Statistics");
    println!("==================================");
    println!("Total messages: {}", snapshot.len());
    println!("  User: {}", user);
    println!("  AI: {}", assistant);
    println!("Reactions: {}", board.total());
    println!("Sessions: {}", sessions.len());
    println!();
    println!("Transcript: {}", format_path_with_tilde(path));

    let first = snapshot.iter().map(|e| e.timestamp).min();
    let last = snapshot.iter().map(|e| e.timestamp).max();
    if let Some(first) = first {
        println!("First message: {}", first.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(last) = last {
        println!("Last message: {}", last.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"));
    }

    Ok(())
}
