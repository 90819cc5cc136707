//! tweetbox CLI - a tiny tweet manager for the terminal.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::debug;
use std::io::{self, Read};
use std::path::PathBuf;
use tweetbox_core::{Editor, NoteStore, Notice};
use tweetbox_files::FileStore;

const TWEETBOX_DIR: &str = ".tweetbox";

#[derive(Parser)]
#[command(name = "tweetbox", about = "Tiny tweet manager", version)]
struct Cli {
    /// Store directory (defaults to the nearest .tweetbox directory)
    #[arg(long, global = true, env = "TWEETBOX_DIR")]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new tweetbox store in the current directory
    Init {
        /// Delete existing tweets and reinitialize
        #[arg(long)]
        reinitialize: bool,
    },
    /// Add a new tweet
    Add {
        /// Tweet text (reads from stdin if not provided)
        text: Vec<String>,
    },
    /// List tweets
    Ls {
        /// Truncate each tweet to this many characters (0 for full text)
        #[arg(short = 'w', long, default_value = "140")]
        width: usize,
    },
    /// Show one or more tweets
    Show {
        /// Comma-separated tweet IDs
        ids: String,
    },
    /// Replace the text of a tweet
    Edit {
        /// Tweet ID
        id: i64,
        /// New text (reads from stdin if not provided)
        text: Vec<String>,
    },
    /// Delete one or more tweets
    Rm {
        /// Comma-separated tweet IDs
        ids: String,
    },
}

/// Find the .tweetbox directory by searching up from current directory
fn find_tweetbox_dir() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;
    loop {
        let path = current.join(TWEETBOX_DIR);
        if path.is_dir() {
            return Some(path);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Get the store directory, or error if not initialized
fn get_tweetbox_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        if !dir.is_dir() {
            bail!(
                "{} does not exist. Run 'tweetbox init' to initialize it.",
                dir.display()
            );
        }
        return Ok(dir);
    }
    match find_tweetbox_dir() {
        Some(dir) => Ok(dir),
        None => bail!("No .tweetbox directory found. Run 'tweetbox init' to initialize a new store."),
    }
}

fn parse_ids(ids: &str) -> Result<Vec<i64>> {
    ids.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<i64>().context(format!("Invalid tweet ID: {}", s)))
        .collect()
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read from stdin")?;
    Ok(buf)
}

fn is_stdin_tty() -> bool {
    atty::is(atty::Stream::Stdin)
}

/// Text from the positional words, or from stdin when there are none.
fn text_or_stdin(words: Vec<String>) -> Result<String> {
    if !words.is_empty() {
        return Ok(words.join(" "));
    }
    if is_stdin_tty() {
        bail!("No text given. Pass it as arguments or pipe it on stdin.");
    }
    read_stdin()
}

/// Print a notice, or turn an error notice into a failure.
fn report(notice: Notice) -> Result<()> {
    if notice.is_error() {
        bail!(notice.message);
    }
    println!("{}", notice.message);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if let Commands::Init { reinitialize } = cli.command {
        let dir = cli.dir.unwrap_or_else(|| PathBuf::from(TWEETBOX_DIR));

        if FileStore::holds_store(&dir) && !reinitialize {
            bail!("tweetbox is already initialized in this directory. Use --reinitialize to delete and recreate.");
        }

        // Only the stored tweets are removed; other files in the directory stay.
        FileStore::init(&dir, reinitialize).context("Failed to create store")?;

        if reinitialize {
            println!("Reinitialized tweetbox in {}", dir.display());
        } else {
            println!("Initialized tweetbox in {}", dir.display());
        }
        return Ok(());
    }

    // All other commands need the store
    let dir = get_tweetbox_dir(cli.dir)?;
    debug!("using store at {}", dir.display());
    let files = FileStore::open(&dir).context("Failed to open store")?;

    match cli.command {
        Commands::Init { .. } => unreachable!(),

        Commands::Add { text } => {
            let text = text_or_stdin(text)?;
            let _lock = files.lock()?;
            let mut editor = Editor::new(NoteStore::load(&files).context("Failed to load tweets")?);

            let notice = match editor.submit(&text) {
                Ok(submitted) => Notice::from(submitted),
                Err(e) => Notice::from(&e),
            };
            report(notice)?;
        }

        Commands::Ls { width } => {
            let store = NoteStore::load(&files).context("Failed to load tweets")?;
            for note in store.notes() {
                let text = if width == 0 {
                    note.text.clone()
                } else {
                    note.preview(width)
                };
                println!("{}: {}", note.id, text);
            }
        }

        Commands::Show { ids } => {
            let ids = parse_ids(&ids)?;
            if ids.is_empty() {
                eprintln!("No tweet IDs provided");
                std::process::exit(1);
            }

            let store = NoteStore::load(&files).context("Failed to load tweets")?;
            let mut not_found = Vec::new();
            let mut first = true;

            for id in &ids {
                match store.get(*id) {
                    Some(note) => {
                        if !first {
                            println!("\n{}\n", "=".repeat(40));
                        }
                        first = false;
                        println!("# {}\n", note.id);
                        println!("{}", note.text);
                    }
                    None => not_found.push(*id),
                }
            }

            if !not_found.is_empty() {
                for id in &not_found {
                    eprintln!("Tweet {} not found", id);
                }
                std::process::exit(1);
            }
        }

        Commands::Edit { id, text } => {
            let text = text_or_stdin(text)?;
            let _lock = files.lock()?;
            let mut editor = Editor::new(NoteStore::load(&files).context("Failed to load tweets")?);

            if editor.begin_edit(id).is_none() {
                eprintln!("Tweet {} not found", id);
                std::process::exit(1);
            }
            let notice = match editor.submit(&text) {
                Ok(submitted) => Notice::from(submitted),
                Err(e) => Notice::from(&e),
            };
            report(notice)?;
        }

        Commands::Rm { ids } => {
            let ids = parse_ids(&ids)?;
            if ids.is_empty() {
                eprintln!("No tweet IDs provided");
                std::process::exit(1);
            }

            let _lock = files.lock()?;
            let mut editor = Editor::new(NoteStore::load(&files).context("Failed to load tweets")?);
            let mut deleted = Vec::new();
            let mut not_found = Vec::new();

            for id in &ids {
                if editor.delete(*id)? {
                    deleted.push(*id);
                } else {
                    not_found.push(*id);
                }
            }

            for id in &deleted {
                println!("Tweet deleted: {}", id);
            }

            if !not_found.is_empty() {
                for id in &not_found {
                    eprintln!("Tweet {} not found", id);
                }
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
