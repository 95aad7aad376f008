//! heft - live, cached directory sizes for the command line.
//!
//! Usage:
//!   heft [PATH]          List a directory's children by size
//!   heft probe PATH      Re-test whether a directory is accessible
//!   heft --help          Show help

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use humansize::{BINARY, format_size};
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use heft_scan::{
    ListingSnapshot, ScanOptions, ScanSession, SizeCache, SizeOutcome, probe_access,
};

#[derive(Parser)]
#[command(
    name = "heft",
    version,
    about = "Directory sizes, computed live",
    long_about = "heft lists the immediate children of a directory with their \
                  recursive sizes, largest first, streaming the running total \
                  while the walk is still underway. Omit PATH to weigh the \
                  filesystem root."
)]
struct Cli {
    /// Directory to list (defaults to the filesystem root)
    path: Option<PathBuf>,

    /// Include well-known OS-protected roots in a root listing
    #[arg(short = 'p', long)]
    include_protected: bool,

    /// Print the final listing as JSON
    #[arg(long)]
    json: bool,

    /// Show size-cache statistics after the listing
    #[arg(long)]
    stats: bool,

    /// Snapshot refresh period in milliseconds
    #[arg(long, default_value = "250")]
    tick_ms: u64,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Re-test whether a directory can be listed right now
    Probe {
        /// Directory to probe
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Some(Command::Probe { path }) = cli.command {
        return run_probe(&path);
    }

    let options = ScanOptions::builder()
        .include_protected(cli.include_protected)
        .tick_interval(Duration::from_millis(cli.tick_ms.max(1)))
        .build()
        .map_err(|err| eyre!(err))?;

    let cache = Arc::new(SizeCache::new());
    let session = ScanSession::new(Arc::clone(&cache), options);

    let handle = session
        .start(cli.path.clone())
        .await
        .wrap_err("could not list the requested directory")?;

    let mut updates = handle.subscribe();
    let progress_task = tokio::spawn(async move {
        loop {
            match updates.recv().await {
                Ok(snapshot) if snapshot.any_calculating => {
                    let pending = snapshot.rows.iter().filter(|row| row.calculating).count();
                    eprint!(
                        "\r{} so far, {pending} of {} still sizing...",
                        format_size(snapshot.grand_total, BINARY),
                        snapshot.len(),
                    );
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let listing = handle.wait().await?;
    progress_task.abort();
    eprint!("\r\x1b[2K");

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        print_listing(&listing);
    }

    if cli.stats {
        let stats = cache.stats();
        println!(
            "cache: {} directories, {} files, {} errors",
            stats.directories, stats.files, stats.errors
        );
    }

    Ok(())
}

fn print_listing(listing: &ListingSnapshot) {
    println!("{}", listing.root.display());

    if listing.is_empty() {
        println!("  (empty)");
        return;
    }

    for row in &listing.rows {
        let size = match row.outcome {
            SizeOutcome::Computed(bytes) => format_size(bytes, BINARY),
            SizeOutcome::Error(_) => "access denied".to_string(),
            SizeOutcome::Pending => "...".to_string(),
        };
        let marker = if row.entry.is_dir() { "/" } else { "" };
        println!("  {size:>12}  {}{marker}", row.entry.name);
    }

    println!("  {:>12}  total", format_size(listing.grand_total, BINARY));
    if listing.has_errors {
        println!("  note: some entries could not be read and are excluded from the total");
    }
}

fn run_probe(path: &Path) -> Result<()> {
    let probe = probe_access(path);
    if probe.accessible {
        println!("{}: accessible", probe.path.display());
    } else {
        let raw = probe.raw_error.as_deref().unwrap_or("unknown error");
        let note = if probe.expected {
            " (routinely protected)"
        } else {
            ""
        };
        println!("{}: not accessible{note}: {raw}", probe.path.display());
        std::process::exit(2);
    }
    Ok(())
}
