use anyhow::{Context, Result};
use clap::Args;
use pricing_core::file_io::{JsonFileStore, SnapshotStore};
use pricing_core::pricing::{Manufacturer, PricedRow};
use pricing_core::units::format_currency;
use tracing::debug;

use crate::output::{self, OutputFormat};

fn parse_manufacturer(s: &str) -> Result<Manufacturer, String> {
    Manufacturer::from_str_flexible(s).map_err(|e| e.to_string())
}

#[derive(Args, Debug, Clone)]
pub struct PriceArgs {
    /// porotherm, solbet, brukbet, semmelrock, polbruk or leier
    #[arg(short, long, value_parser = parse_manufacturer)]
    pub manufacturer: Manufacturer,

    /// Only products whose searchable fields contain this text
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Price under this Porotherm agreement instead of the active one
    #[arg(long)]
    pub agreement: Option<String>,

    /// Ship Bruk-Bet products from this factory
    #[arg(long)]
    pub factory: Option<String>,

    /// Remember --agreement / --factory in the workbook
    #[arg(long)]
    pub save: bool,

    #[arg(short, long, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

pub fn execute(store: &JsonFileStore, args: &PriceArgs) -> Result<()> {
    let mut workbook = store.load_or_builtin().context("loading workbook")?;

    if let Some(id) = &args.agreement {
        workbook.manufacturers.porotherm.select_agreement(id)?;
    }
    if let Some(id) = &args.factory {
        workbook.manufacturers.brukbet.settings.select_factory(id)?;
    }
    if args.save && (args.agreement.is_some() || args.factory.is_some()) {
        workbook.touch();
        store.save(&workbook).context("saving workbook")?;
    }

    let rows = workbook.manufacturers.price_rows(args.manufacturer, &args.search);
    debug!(manufacturer = args.manufacturer.code(), rows = rows.len(), "priced");

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Table => print_table(args.manufacturer, &rows),
    }
    Ok(())
}

fn print_table(manufacturer: Manufacturer, rows: &[PricedRow]) {
    println!("{} - {}", manufacturer.display_name(), manufacturer.product_type());
    let body = rows
        .iter()
        .map(|r| {
            vec![
                r.symbol.clone(),
                r.name.clone(),
                r.unit.clone(),
                format_currency(r.list_price),
                format!("{:.2}%", r.pricing.discount_percent),
                format_currency(r.pricing.price_after_discount),
                format_currency(r.pricing.transport_per_unit),
                format_currency(r.pricing.customer_net_price),
                format_currency(r.pricing.customer_gross_price),
            ]
        })
        .collect();
    let table = output::table(
        vec!["Symbol", "Nazwa", "J.m.", "Cennik", "Rabat", "Po rabacie", "Transport", "Netto", "Brutto"],
        body,
        3,
    );
    println!("{table}");
    println!("{} products", rows.len());
}
