//! Reading tracker CLI - record page checkpoints and project completion.

mod format;
mod transfer;

use std::fmt::Display;
use std::io::{self, Write};
use std::path::PathBuf;
use anyhow::{ensure, Result};
use chrono::{Local, TimeZone, Utc};
use clap::{ArgAction, Parser, Subcommand};
use readtrack_core::{Book, BookId, CheckpointId, Time};
use readtrack_progress::{estimate, Estimation};
use readtrack_storage::{BookStore, JsonStorage};
use tracing_subscriber::EnvFilter;
use crate::format::{format_duration, format_eta, format_percent, format_speed};

#[derive(Parser)]
#[command(name = "readtrack")]
#[command(about = "Track reading progress and estimate completion", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path of the tracker data file
    #[arg(
        short,
        long,
        global = true,
        env = "READTRACK_DATA",
        default_value = ".readtrack/data.json"
    )]
    data: PathBuf,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List books with their progress
    List,
    /// Add a new book
    Add {
        /// Book name
        name: String,
        /// Total number of pages
        #[arg(allow_negative_numbers = true)]
        total_pages: i64,
        /// When reading started (RFC 3339), defaults to now
        #[arg(long)]
        start: Option<Time>,
    },
    /// Show a book with its estimation and checkpoints
    Show {
        /// Book ID
        id: String,
    },
    /// Delete a book and its checkpoints
    Delete {
        /// Book ID
        id: String,
    },
    /// Manage checkpoints
    Checkpoint {
        #[command(subcommand)]
        command: CheckpointCommands,
    },
    /// Export all data to a JSON file
    Export {
        /// Directory for the dated export file
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        /// Exact output path, overrides --dir
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace all data with a JSON export
    Import {
        /// File to import
        file: PathBuf,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum CheckpointCommands {
    /// Record the page reached
    Add {
        /// Book ID
        book_id: String,
        /// Page reached
        #[arg(allow_negative_numbers = true)]
        page: i64,
        /// When the page was reached (RFC 3339), defaults to now
        #[arg(long)]
        at: Option<Time>,
        /// Notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a checkpoint
    Delete {
        /// Book ID
        book_id: String,
        /// Checkpoint ID
        checkpoint_id: String,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout carries command output only
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut store = BookStore::new(JsonStorage::new(&cli.data));

    match cli.command {
        Commands::List => {
            let books = store.list_books()?;
            let now = Utc::now();

            println!("Books ({})", books.len());
            for book in books {
                let est = estimate(&book, now);
                println!("{}", list_line(&book, &est, now, &Local));
            }
        }
        Commands::Add {
            name,
            total_pages,
            start,
        } => {
            let book = store.add_book(&name, total_pages, start)?;
            println!("Added book: {} - {}", book.id, book.name);
        }
        Commands::Show { id } => {
            let Some(book) = store.get_book(&BookId::new(id))? else {
                println!("Book not found");
                return Ok(());
            };
            print_book(&book, &estimate(&book, Utc::now()));
        }
        Commands::Delete { id } => {
            store.delete_book(&BookId::new(id.as_str()))?;
            println!("Deleted book: {}", id);
        }
        Commands::Checkpoint { command } => match command {
            CheckpointCommands::Add {
                book_id,
                page,
                at,
                notes,
            } => {
                let book_id = BookId::new(book_id);
                let Some(book) = store.get_book(&book_id)? else {
                    println!("Book not found");
                    return Ok(());
                };
                ensure!(
                    (0..=i64::from(book.total_pages)).contains(&page),
                    "Page must be between 0 and {}",
                    book.total_pages
                );

                let notes = clean_notes(notes);
                if let Some(checkpoint) = store.add_checkpoint(&book_id, page, at, notes)? {
                    println!("Added checkpoint: {} - page {}", checkpoint.id, checkpoint.page);
                }
            }
            CheckpointCommands::Delete {
                book_id,
                checkpoint_id,
            } => {
                let checkpoint_id = CheckpointId::new(checkpoint_id);
                store.delete_checkpoint(&BookId::new(book_id), &checkpoint_id)?;
                println!("Deleted checkpoint: {}", checkpoint_id);
            }
        },
        Commands::Export { dir, out } => {
            let path = match out {
                Some(path) => {
                    transfer::export_to(&store, &path)?;
                    path
                }
                None => transfer::export_into(&store, &dir, Utc::now())?,
            };
            println!("Data exported to {}", path.display());
        }
        Commands::Import { file, yes } => {
            if !yes && !confirm("Import will replace all current data. Continue?")? {
                println!("Import cancelled");
                return Ok(());
            }
            let document = transfer::import_from(&mut store, &file)?;
            println!("Data imported successfully ({} books)", document.books.len());
        }
    }

    Ok(())
}

/// One `list` row: id, name, pages read, percent and ETA.
fn list_line<Tz>(book: &Book, est: &Estimation, now: Time, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "  {} | {} | {}/{} ({}) | ETA {}",
        book.id,
        book.name,
        est.current_page(),
        book.total_pages,
        format_percent(est.percent()),
        format_eta(est.eta(), now, tz),
    )
}

/// Trimmed notes; blank notes are dropped.
fn clean_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}

fn print_book(book: &Book, est: &Estimation) {
    let now = Utc::now();

    println!("Book: {}", book.id);
    println!("  Name: {}", book.name);
    println!("  Started: {}", book.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"));
    println!(
        "  Progress: {} / {} pages ({})",
        est.current_page(),
        book.total_pages,
        format_percent(est.percent())
    );
    println!("  Remaining: {} pages", est.pages_remaining());
    println!("  Speed: {}", format_speed(est.speed()));
    println!("  Time left: {}", format_duration(est.hours_remaining()));
    println!("  ETA: {}", format_eta(est.eta(), now, &Local));
    if !est.is_estimated() {
        println!("  (add another checkpoint to estimate speed)");
    }

    println!("Checkpoints ({})", book.checkpoints.len());
    for cp in &book.checkpoints {
        println!(
            "  {} | {} | page {}{}",
            cp.id,
            cp.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            cp.page,
            cp.notes.as_deref().map(|n| format!(" | {}", n)).unwrap_or_default(),
        );
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use readtrack_core::Checkpoint;

    fn t0() -> Time {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_clean_notes() {
        assert_eq!(clean_notes(None), None);
        assert_eq!(clean_notes(Some("   ".into())), None);
        assert_eq!(clean_notes(Some("  ch. 3 ".into())), Some("ch. 3".to_string()));
    }

    #[test]
    fn test_list_line_shows_eta() {
        let mut book = Book::new("Dune", 300, t0()).unwrap();
        book.insert_checkpoint(Checkpoint::new(100, t0() + Duration::hours(10), None));
        let now = t0() + Duration::hours(10);

        let line = list_line(&book, &estimate(&book, now), now, &Utc);
        assert_eq!(
            line,
            format!("  {} | Dune | 100/300 (33.3%) | ETA Mar 02, 2024 14:00", book.id)
        );
    }

    #[test]
    fn test_list_line_without_estimate() {
        let book = Book::new("Emma", 320, t0()).unwrap();

        let line = list_line(&book, &estimate(&book, t0()), t0(), &Utc);
        assert!(line.ends_with("| 0/320 (0.0%) | ETA ~100 years"));
    }
}
