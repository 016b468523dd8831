//! Command-line interface for memovox.
//!
//! Provides commands for processing memos, browsing memos and their
//! extracted todos, editing todo state, and inspecting configuration.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::adapters::{ConverterClient, MemoStore, ProcessorClient, SupabaseStore};
use crate::config;
use crate::core::{resolve_deadline, MemoPipeline};
use crate::domain::Todo;

/// memovox - voice-memo processing pipeline
#[derive(Parser, Debug)]
#[command(name = "memovox")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process a memo: convert, transcribe, summarize, extract todos
    Process {
        /// Memo ID
        memo_id: String,

        /// Re-process even if the memo already has results
        #[arg(long)]
        force: bool,
    },

    /// List recent memos
    Memos {
        /// Maximum number of memos to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show a memo with its summary, transcription, and todos
    Show {
        /// Memo ID
        memo_id: String,

        /// Include the full transcription
        #[arg(short, long)]
        full: bool,
    },

    /// Delete a memo
    Delete {
        /// Memo ID
        memo_id: String,

        /// Skip the confirmation requirement
        #[arg(long)]
        yes: bool,
    },

    /// Edit a todo extracted from a memo
    Todo {
        #[command(subcommand)]
        command: TodoCommands,
    },

    /// Resolve a free-text deadline to a timestamp (debug aid)
    Resolve {
        /// Deadline text, e.g. "tomorrow" or "in 3 days"
        text: String,
    },

    /// Show resolved configuration
    Config,
}

#[derive(Subcommand, Debug)]
pub enum TodoCommands {
    /// Mark a todo as completed (or not)
    Done {
        /// Todo ID
        todo_id: String,

        /// Mark as not completed instead
        #[arg(long)]
        undo: bool,
    },

    /// Set a todo's due date from free text or an explicit date
    Due {
        /// Todo ID
        todo_id: String,

        /// Deadline text, e.g. "next week" or "2025-04-20"
        text: String,
    },
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Process { memo_id, force } => process_memo(&memo_id, force).await,
            Commands::Memos { limit } => list_memos(limit).await,
            Commands::Show { memo_id, full } => show_memo(&memo_id, full).await,
            Commands::Delete { memo_id, yes } => delete_memo(&memo_id, yes).await,
            Commands::Todo { command } => match command {
                TodoCommands::Done { todo_id, undo } => set_todo_done(&todo_id, !undo).await,
                TodoCommands::Due { todo_id, text } => set_todo_due(&todo_id, &text).await,
            },
            Commands::Resolve { text } => resolve_text(&text),
            Commands::Config => show_config(),
        }
    }
}

/// Build the store client from resolved configuration
fn open_store() -> Result<SupabaseStore> {
    let cfg = config::config()?;
    Ok(SupabaseStore::new(
        cfg.supabase_url.clone(),
        cfg.supabase_key.clone(),
        cfg.user_id.clone(),
    ))
}

/// Process one memo end to end
async fn process_memo(memo_id: &str, force: bool) -> Result<()> {
    let cfg = config::config()?;

    let converter = ConverterClient::new(
        cfg.converter_url.clone(),
        cfg.supabase_key.clone(),
        cfg.user_id.clone(),
    );
    let processor = ProcessorClient::new(cfg.process_url.clone(), cfg.supabase_key.clone());
    let pipeline = MemoPipeline::new(converter, processor, open_store()?);

    eprintln!("🎙️  Processing memo {}", memo_id);

    let outcome = pipeline.process_memo(memo_id, force).await?;

    println!();
    println!("Summary:");
    println!("{}", outcome.summary);

    if !outcome.tasks.is_empty() {
        println!();
        println!("Tasks:");
        for task in &outcome.tasks {
            let marker = if task.is_priority { "★" } else { " " };
            println!("  {} {} (due: {})", marker, task.text, task.deadline);
        }
    }

    eprintln!();
    eprintln!(
        "✅ Memo processed ({} todo(s) created)",
        outcome.todos_created
    );

    Ok(())
}

/// List recent memos
async fn list_memos(limit: usize) -> Result<()> {
    let store = open_store()?;
    let memos = store.list_memos(limit).await?;

    if memos.is_empty() {
        println!("No memos found");
        return Ok(());
    }

    println!("{:<38} {:<10} {:<40}", "ID", "STATUS", "TITLE");
    println!("{}", "-".repeat(88));

    for memo in &memos {
        let status = if memo.is_processed() { "processed" } else { "pending" };
        let title = if memo.title.chars().count() > 37 {
            let cut: String = memo.title.chars().take(37).collect();
            format!("{}...", cut)
        } else {
            memo.title.clone()
        };
        println!("{:<38} {:<10} {:<40}", memo.id, status, title);
    }

    println!("\nTotal: {} memo(s)", memos.len());

    Ok(())
}

/// Show one memo with its todos
async fn show_memo(memo_id: &str, full: bool) -> Result<()> {
    let store = open_store()?;
    let memo = store.get_memo(memo_id).await?;

    println!("ID:      {}", memo.id);
    println!("Title:   {}", memo.title);
    if let Some(created) = memo.created_at {
        println!("Created: {}", created.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(path) = &memo.storage_path {
        println!("Audio:   {}", path);
    }

    if let Some(summary) = memo.summary.as_deref().filter(|s| !s.is_empty()) {
        println!("\nSummary:\n{}", summary);
    } else {
        println!("\n(not processed yet)");
        return Ok(());
    }

    if full {
        if let Some(transcription) = memo.transcription.as_deref().filter(|s| !s.is_empty()) {
            println!("\nTranscription:\n{}", transcription);
        }
    }

    let todos = store.todos_for_memo(&memo.id).await?;
    if !todos.is_empty() {
        println!("\nTodos:");
        for todo in &todos {
            println!("  {}", format_todo(todo));
        }
    }

    if !full {
        println!("\nUse --full to show the transcription");
    }

    Ok(())
}

fn format_todo(todo: &Todo) -> String {
    let check = if todo.is_completed { "[x]" } else { "[ ]" };
    let due = todo.due_date.as_deref().unwrap_or("-");
    format!("{} {} (due: {}) [{}]", check, todo.title, due, todo.id)
}

/// Delete a memo
async fn delete_memo(memo_id: &str, yes: bool) -> Result<()> {
    if !yes {
        anyhow::bail!("Deleting is permanent. Re-run with --yes to confirm");
    }

    let store = open_store()?;

    // Surface not-found/ownership errors before deleting
    let memo = store.get_memo(memo_id).await?;
    store.delete_memo(&memo.id).await?;

    eprintln!("🗑️  Deleted memo: {}", memo.title);

    Ok(())
}

/// Toggle a todo's completion state
async fn set_todo_done(todo_id: &str, completed: bool) -> Result<()> {
    let store = open_store()?;
    store.set_todo_completed(todo_id, completed).await?;

    if completed {
        eprintln!("✅ Todo {} marked done", todo_id);
    } else {
        eprintln!("↩️  Todo {} reopened", todo_id);
    }

    Ok(())
}

/// Set a todo's due date from free text
async fn set_todo_due(todo_id: &str, text: &str) -> Result<()> {
    let due_date = resolve_deadline(text);

    let store = open_store()?;
    store
        .set_todo_due_date(todo_id, &due_date)
        .await
        .with_context(|| format!("Failed to update due date for todo {}", todo_id))?;

    eprintln!("📅 Todo {} due {}", todo_id, due_date);

    Ok(())
}

/// Resolve a deadline string and print the result
fn resolve_text(text: &str) -> Result<()> {
    println!("{}", resolve_deadline(text));
    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("Memovox Configuration");
    println!("══════════════════════════════════════════════════════════════");
    println!();
    println!(
        "Config file:   {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using env/defaults)".to_string())
    );
    println!();
    println!("Supabase URL:  {}", cfg.supabase_url);
    println!("Process URL:   {}", cfg.process_url);
    println!(
        "Converter URL: {}",
        cfg.converter_url
            .as_deref()
            .unwrap_or("(unset - conversion skipped)")
    );
    println!("User:          {}", cfg.user_id);
    println!("API key:       {}", mask_key(&cfg.supabase_key));

    Ok(())
}

/// Show only the first characters of a secret
fn mask_key(key: &str) -> String {
    if key.chars().count() > 8 {
        let prefix: String = key.chars().take(8).collect();
        format!("{}…", prefix)
    } else {
        "(set)".to_string()
    }
}
