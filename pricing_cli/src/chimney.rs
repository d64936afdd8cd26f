use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use pricing_core::chimney::ventilation::parse_height_entries;
use pricing_core::chimney::VentilationHeights;
use pricing_core::chimney::{
    BomReport, ChimneyConfig, ChimneyQuote, ChimneySystemKind, ClientData, HeightInput, OptionCode, ReportTotals,
};
use pricing_core::errors::CalcError;
use pricing_core::file_io::{JsonFileStore, SnapshotStore};
use pricing_core::units::format_currency;
use pricing_core::workbook::QuoteRequest;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::output::{self, OutputFormat};

fn parse_system(s: &str) -> Result<ChimneySystemKind, String> {
    ChimneySystemKind::parse_code("system", s).map_err(|e| e.to_string())
}

#[derive(Args, Debug, Clone)]
pub struct ChimneyArgs {
    /// izolowany, smart, smartplus, basic, turbo, multi, turbos, stal, duostal, duo
    #[arg(short, long, value_parser = parse_system, required_unless_present = "config")]
    pub system: Option<ChimneySystemKind>,

    /// Read the chimney configuration from a JSON file
    #[arg(long, value_name = "FILE", conflicts_with = "system")]
    pub config: Option<PathBuf>,

    /// Chimney height in meters (4-30, decimal comma accepted)
    #[arg(short = 'H', long)]
    pub height: Option<String>,

    /// Flue diameter in cm
    #[arg(long)]
    pub diameter: Option<String>,

    /// Second flue diameter (dual-flue systems)
    #[arg(long)]
    pub second_diameter: Option<String>,

    /// Vent channel (bez, went, podwojny) or steel enclosure block (LK1..LK4-P)
    #[arg(long)]
    pub block: Option<String>,

    /// Block height: 33 or 25
    #[arg(long)]
    pub block_height: Option<String>,

    /// tynk or obmurowka
    #[arg(long)]
    pub finish: Option<String>,

    /// szalunek or czapa
    #[arg(long)]
    pub termination: Option<String>,

    /// Stove connector angle: 90 or 45
    #[arg(long)]
    pub connector: Option<String>,

    /// Number of stoves (Turbo, Multi)
    #[arg(long)]
    pub stoves: Option<u8>,

    /// Add the 8/6 reducer (steel systems)
    #[arg(long)]
    pub reducer: bool,

    /// Ventilation channel height, e.g. --vent LK1=2,6 (repeatable)
    #[arg(long = "vent", value_name = "TYPE=HEIGHT")]
    pub vent: Vec<String>,

    /// Purchase discount on chimney parts, percent
    #[arg(long)]
    pub discount: Option<f64>,

    /// Sales margin on chimney parts, percent
    #[arg(long)]
    pub margin: Option<f64>,

    /// Purchase discount on ventilation blocks, percent
    #[arg(long)]
    pub vent_discount: Option<f64>,

    /// Sales margin on ventilation blocks, percent
    #[arg(long)]
    pub vent_margin: Option<f64>,

    /// Save the request in the workbook under this label
    #[arg(long, value_name = "LABEL")]
    pub save: Option<String>,

    #[arg(short, long, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// Start from the system defaults (or a config file) and apply the flags
/// through the same JSON shape saved quotes use, so option values are
/// checked by the same rules.
fn build_config(args: &ChimneyArgs) -> Result<ChimneyConfig> {
    let base = match (&args.config, args.system) {
        (Some(path), _) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        (None, Some(kind)) => ChimneyConfig::default_for(kind),
        (None, None) => bail!("either --system or --config is required"),
    };

    let mut value = serde_json::to_value(&base)?;
    let Value::Object(fields) = &mut value else {
        bail!("chimney configuration must be a JSON object");
    };
    let overrides = [
        ("fi", &args.diameter),
        ("fi2", &args.second_diameter),
        ("pustak", &args.block),
        ("pustakh", &args.block_height),
        ("wykonczenie", &args.finish),
        ("zakonczenie", &args.termination),
        ("rurapp", &args.connector),
    ];
    for (key, flag) in overrides {
        if let Some(v) = flag {
            set_option(fields, key, Value::String(v.clone()))?;
        }
    }
    if let Some(stoves) = args.stoves {
        if !(1..=10).contains(&stoves) {
            bail!("--stoves must be within 1-10");
        }
        set_option(fields, "piece", Value::from(stoves))?;
    }
    if args.reducer {
        set_option(fields, "redukcja", Value::String("tak".to_string()))?;
    }

    let mut config: ChimneyConfig =
        serde_json::from_value(value).context("option not valid for this chimney system")?;
    if let Some(h) = &args.height {
        config.set_height(HeightInput::Text(h.clone()));
    }
    Ok(config)
}

/// Set an option key, refusing keys the system does not take.
fn set_option(fields: &mut Map<String, Value>, key: &str, value: Value) -> Result<()> {
    if !fields.contains_key(key) {
        let system = fields.get("system").and_then(Value::as_str).unwrap_or("?");
        bail!("option '{}' does not apply to system '{}'", key, system);
    }
    fields.insert(key.to_string(), value);
    Ok(())
}

fn client_terms(base: &ClientData, args: &ChimneyArgs) -> ClientData {
    let mut client = base.clone();
    if let Some(v) = args.discount {
        client.chimney_discount = v;
    }
    if let Some(v) = args.margin {
        client.chimney_margin = v;
    }
    if let Some(v) = args.vent_discount {
        client.vent_discount = v;
    }
    if let Some(v) = args.vent_margin {
        client.vent_margin = v;
    }
    client
}

pub fn execute(store: &JsonFileStore, args: &ChimneyArgs) -> Result<()> {
    let mut workbook = store.load_or_builtin().context("loading workbook")?;
    let config = build_config(args)?;
    let client = client_terms(&workbook.chimney.client, args);
    let ventilation = if args.vent.is_empty() {
        workbook.chimney.ventilation.clone()
    } else {
        parse_height_entries(args.vent.iter().map(String::as_str))?
    };
    debug!(system = %config.kind(), "building chimney quote");

    let quote = match ChimneyQuote::build(&config, &ventilation, &client, &workbook.chimney.catalog) {
        Ok(quote) => quote,
        Err(CalcError::NotImplemented { feature }) => {
            bail!("{} has no bill-of-materials rules yet", feature)
        }
        Err(e) => return Err(e).context("invalid chimney input"),
    };

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&quote)?),
        OutputFormat::Table => print_quote(&quote, &ventilation),
    }

    if let Some(label) = &args.save {
        let id = workbook.add_quote(QuoteRequest {
            label: label.clone(),
            config,
            ventilation,
            client,
        });
        store.save(&workbook).context("saving workbook")?;
        info!(%id, "quote request saved");
        eprintln!("Saved as {id}");
    }
    Ok(())
}

fn print_report(title: &str, report: &BomReport) {
    println!("{title}");
    if report.is_empty() {
        println!("  (no items)");
        return;
    }
    let rows = report
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            vec![
                (i + 1).to_string(),
                item.name.clone(),
                format_currency(item.price),
                output::quantity(item.quantity),
                format_currency(item.total),
            ]
        })
        .collect();
    println!("{}", output::table(vec!["Lp.", "Nazwa", "Cena netto", "Ilość", "Wartość"], rows, 2));
    print_totals(report.margin, &report.totals());
}

fn print_totals(margin: f64, totals: &ReportTotals) {
    println!("  Wartość netto:                {}", format_currency(totals.total_net));
    if margin > 0.0 {
        println!(
            "  Wartość netto po marży ({}%): {}",
            margin,
            format_currency(totals.total_net_after_margin)
        );
    }
    println!(
        "  Wartość brutto:               {}",
        format_currency(totals.total_gross_after_margin)
    );
}

fn print_quote(quote: &ChimneyQuote, ventilation: &VentilationHeights) {
    if !quote.client.name.is_empty() {
        println!("Klient: {} {}", quote.client.name, quote.client.address());
    }
    print_report(&format!("System kominowy {}", quote.system), &quote.chimney);
    if !quote.ventilation.is_empty() {
        println!();
        for (block, height) in ventilation.channels() {
            println!("  {}: {} m", block.label(), height);
        }
        print_report("Pustaki wentylacyjne", &quote.ventilation);
    }
    println!();
    println!("Razem netto:  {}", format_currency(quote.grand_total_net()));
    println!("Razem brutto: {}", format_currency(quote.grand_total_gross()));
}
