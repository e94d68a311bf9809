//! Stockroom inventory console
//!
//! Lists, edits and exports a product table. Every change, whether a single
//! `add`/`set`/`remove` or a bulk `save` of an edited JSON listing, is
//! reconciled against the current snapshot and applied row by row.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use reconcile_engine::{EditedRow, RecordId};
use stockroom::config::StockroomConfig;
use stockroom::console::{parse_assignments, render, Console};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the inventory console.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Database file (overrides config and STOCKROOM_DB)
    #[arg(long)]
    db: Option<String>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show all products
    List,
    /// Add a product: `add name=Drill quantity=5`
    Add {
        #[arg(required = true)]
        fields: Vec<String>,
    },
    /// Change fields of a product: `set 3 quantity=8`
    Set {
        id: i64,
        #[arg(required = true)]
        fields: Vec<String>,
    },
    /// Delete a product
    Remove { id: i64 },
    /// Reconcile a full edited listing (JSON array of rows) into storage
    Save { edits: PathBuf },
    /// Write the plain-text product listing
    Export {
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => StockroomConfig::from_file(path)?,
        None => StockroomConfig::default(),
    }
    .with_env();
    if let Some(db) = args.db {
        config.database = db;
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let mut console = Console::new(config.open_storage()?, config.reconciler());
    if config.is_ephemeral() {
        console.seed(&config.starter_stock)?;
    }

    let outcome = match args.command {
        Command::List => {
            print!("{}", render::table(&console.snapshot()?));
            return Ok(());
        }
        Command::Export { output } => {
            let listing = render::listing(&console.snapshot()?);
            match output {
                Some(path) => std::fs::write(&path, listing)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => print!("{}", listing),
            }
            return Ok(());
        }
        Command::Add { fields } => console.add(parse_assignments(&fields)?)?,
        Command::Set { id, fields } => console.set(RecordId(id), parse_assignments(&fields)?)?,
        Command::Remove { id } => console.remove(RecordId(id))?,
        Command::Save { edits } => {
            let raw = std::fs::read_to_string(&edits)
                .with_context(|| format!("reading {}", edits.display()))?;
            let rows: Vec<EditedRow> = serde_json::from_str(&raw)
                .with_context(|| format!("parsing {}", edits.display()))?;
            console.save_edits(&rows)?
        }
    };

    print!("{}", render::outcome(&outcome));
    print!("{}", render::table(&outcome.snapshot));
    Ok(())
}
