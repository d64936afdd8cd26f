use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use pricing_core::file_io::{JsonFileStore, SnapshotStore};
use pricing_core::units::format_currency;
use tracing::info;

use crate::output::{self, OutputFormat};

#[derive(Args, Debug, Clone)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CatalogCommand {
    /// List components, optionally filtered by id or name
    List {
        #[arg(short, long, default_value = "")]
        search: String,

        #[arg(short, long, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Change the list net price of a component
    SetPrice { id: String, price: f64 },
    /// Add a component or replace its name and price
    Upsert { id: String, name: String, price: f64 },
    /// Remove a component from the catalog
    Remove { id: String },
}

pub fn execute(store: &JsonFileStore, args: &CatalogArgs) -> Result<()> {
    let mut workbook = store.load_or_builtin().context("loading workbook")?;
    let catalog = &mut workbook.chimney.catalog;

    match &args.command {
        CatalogCommand::List { search, format } => {
            let components = catalog.search(search);
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&components)?),
                OutputFormat::Table => {
                    let rows = components
                        .iter()
                        .map(|c| vec![c.id.clone(), c.name.clone(), format_currency(c.price)])
                        .collect();
                    println!("{}", output::table(vec!["Id", "Nazwa", "Cena netto"], rows, 2));
                    println!("{} components", components.len());
                }
            }
            return Ok(());
        }
        CatalogCommand::SetPrice { id, price } => {
            catalog.set_price(id, *price)?;
            info!(component = %id, price, "price changed");
        }
        CatalogCommand::Upsert { id, name, price } => {
            catalog.upsert(id.clone(), name.clone(), *price);
            info!(component = %id, "component saved");
        }
        CatalogCommand::Remove { id } => {
            if catalog.remove(id).is_none() {
                bail!("no component '{}' in the catalog", id);
            }
            info!(component = %id, "component removed");
        }
    }

    workbook.touch();
    store.save(&workbook).context("saving workbook")?;
    println!("Saved {}", store.path().display());
    Ok(())
}
