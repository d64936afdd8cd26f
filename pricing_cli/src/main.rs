//! # cennik
//!
//! Command-line front end for the pricing engine.
//!
//! ```text
//! cennik init                               create a workbook with the shipped price lists
//! cennik price -m semmelrock -s umbriano    priced product list
//! cennik chimney --system izolowany -H 7,5  chimney bill of materials and totals
//! cennik catalog list | set-price ID PRICE  chimney component catalog
//! ```
//!
//! The workbook path comes from `--workbook` or `CENNIK_WORKBOOK`. Logging
//! goes to stderr and follows `RUST_LOG`; `-v` raises the default level.

mod catalog;
mod chimney;
mod output;
mod price;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pricing_core::file_io::{save_workbook, JsonFileStore};
use pricing_core::workbook::Workbook;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cennik", version, about = "Building materials price calculator")]
pub struct Cli {
    /// Workbook file with price lists, catalog and saved quotes
    #[arg(long, global = true, env = "CENNIK_WORKBOOK", default_value = "cennik.cennik")]
    pub workbook: PathBuf,

    /// Who is editing (recorded in the workbook lock)
    #[arg(long, global = true, env = "CENNIK_USER", default_value = "cennik")]
    pub user: String,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a workbook seeded with the shipped price lists
    Init {
        /// Overwrite an existing workbook
        #[arg(long)]
        force: bool,
    },
    /// Price a manufacturer's product list
    Price(price::PriceArgs),
    /// Build a chimney bill of materials
    Chimney(chimney::ChimneyArgs),
    /// Inspect or edit the chimney component catalog
    Catalog(catalog::CatalogArgs),
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn init_workbook(cli: &Cli, force: bool) -> Result<()> {
    if cli.workbook.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            cli.workbook.display()
        );
    }
    let workbook = Workbook::with_builtin_data(cli.user.clone()).context("loading builtin price lists")?;
    save_workbook(&workbook, &cli.workbook)
        .with_context(|| format!("writing {}", cli.workbook.display()))?;
    info!(path = %cli.workbook.display(), "workbook created");
    println!("Created {}", cli.workbook.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let store = JsonFileStore::new(cli.workbook.clone(), cli.user.clone());
    match &cli.command {
        Command::Init { force } => init_workbook(&cli, *force),
        Command::Price(args) => price::execute(&store, args),
        Command::Chimney(args) => chimney::execute(&store, args),
        Command::Catalog(args) => catalog::execute(&store, args),
    }
}
