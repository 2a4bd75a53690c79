//! lobrec - rebuild a limit order book from a per-order delta capture

#![deny(warnings)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]
#![deny(dead_code)]
#![deny(unused)]
#![deny(missing_docs)]
#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use common::Px;
use lob::OrderBook;
use replay::{ReplayConfig, ReplayStatus, Replayer};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lobrec")]
#[command(about = "Rebuild a limit order book from a per-order delta capture")]
#[command(version)]
struct Cli {
    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a capture, logging full book state after every delta
    Replay {
        /// Capture path (.csv or .csv.gz)
        file: PathBuf,

        /// Also write the corrected capture to this path
        #[arg(long)]
        corrected: Option<PathBuf>,

        /// Reject malformed deltas instead of coercing them
        #[arg(long)]
        strict: bool,

        /// Keep the capture's px/qty columns as-is
        #[arg(long)]
        no_swap: bool,

        /// Suppress per-delta state logging
        #[arg(long)]
        quiet: bool,
    },
    /// Replay a capture silently and print the final book summary
    Summary {
        /// Capture path (.csv or .csv.gz)
        file: PathBuf,

        /// Reject malformed deltas instead of coercing them
        #[arg(long)]
        strict: bool,

        /// Keep the capture's px/qty columns as-is
        #[arg(long)]
        no_swap: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    match cli.command {
        Commands::Replay {
            file,
            corrected,
            strict,
            no_swap,
            quiet,
        } => {
            let mut config = ReplayConfig::new(file);
            config.corrected = corrected;
            config.strict = strict;
            config.swap_px_qty = !no_swap;
            config.log_state = !quiet;

            let (_, status) = Replayer::new(config).run()?;
            info!(
                rows = status.rows,
                applied = status.applied,
                dropped = status.dropped,
                "replay finished"
            );
        }
        Commands::Summary {
            file,
            strict,
            no_swap,
        } => {
            let mut config = ReplayConfig::new(file);
            config.strict = strict;
            config.swap_px_qty = !no_swap;
            config.log_state = false;

            let (book, status) = Replayer::new(config).run()?;
            print_summary(&book, status);
        }
    }

    Ok(())
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }

    Ok(())
}

fn print_summary(book: &OrderBook, status: ReplayStatus) {
    println!(
        "replayed {} rows ({} applied, {} dropped)",
        status.rows, status.applied, status.dropped
    );

    println!("best bid  {}", fmt_sentinel(book.best_bid(), Px::ZERO));
    println!("best ask  {}", fmt_sentinel(book.best_ask(), Px::MAX));
    match book.mid() {
        Some(mid) => println!("mid       {mid}"),
        None => println!("mid       n/a"),
    }
    if book.best_ask() == Px::MAX || book.is_crossed() {
        println!("spread    {}", spread_label(book));
    } else {
        println!("spread    {}", Px::from_i64(book.spread()));
    }

    let l2 = book.render_l2();
    println!("bids:");
    for level in &l2.bids {
        println!("  {}  {}", level.price, level.size);
    }
    println!("asks:");
    for level in &l2.asks {
        println!("  {}  {}", level.price, level.size);
    }

    let stats = book.stats();
    println!(
        "deltas: {} adds, {} updates, {} deletes, {} dropped",
        stats.adds, stats.updates, stats.deletes, stats.dropped
    );
}

fn fmt_sentinel(px: Px, sentinel: Px) -> String {
    if px == sentinel {
        "n/a".to_string()
    } else {
        px.to_string()
    }
}

fn spread_label(book: &OrderBook) -> String {
    if book.best_ask() == Px::MAX {
        "n/a".to_string()
    } else {
        format!("{} (crossed)", Px::from_i64(book.spread()))
    }
}
