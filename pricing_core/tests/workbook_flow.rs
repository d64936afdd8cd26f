//! Workbook round trip through a file store, then pricing a saved quote.

use std::path::PathBuf;

use pricing_core::chimney::{ChimneyConfig, ChimneySystemKind, ClientData, VentilationBlock, VentilationHeights};
use pricing_core::file_io::{FileLock, JsonFileStore, SnapshotStore};
use pricing_core::{Manufacturer, QuoteRequest, Workbook};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("cennik_flow_{}_{}.cennik", name, std::process::id()))
}

#[test]
fn test_saved_quote_survives_reload() {
    let path = temp_path("reload");
    let store = JsonFileStore::new(&path, "Anna");
    assert!(!store.exists());

    let mut workbook = store.load_or_builtin().unwrap();
    let mut ventilation = VentilationHeights::new();
    ventilation.set(VentilationBlock::Lk1, 2.5);
    let id = workbook.add_quote(QuoteRequest {
        label: "Dom Polna 3".to_string(),
        config: ChimneyConfig::default_for(ChimneySystemKind::Insulated),
        ventilation,
        client: ClientData::default(),
    });
    store.save(&workbook).unwrap();
    assert!(FileLock::check(&path).is_none());

    let reloaded = store.load().unwrap();
    assert_eq!(reloaded.quote_count(), 1);
    assert_eq!(reloaded.meta.owner, "Anna");
    assert!(reloaded.manufacturers.product_count(Manufacturer::Leier) > 0);

    let before = workbook.build_quote(&id).unwrap();
    let after = reloaded.build_quote(&id).unwrap();
    let lines = |q: &pricing_core::chimney::ChimneyQuote| {
        q.chimney.items.iter().map(|i| (i.id.clone(), i.quantity)).collect::<Vec<_>>()
    };
    assert_eq!(lines(&before), lines(&after));
    assert_eq!(after.ventilation.items.len(), 1);
    assert_eq!(after.ventilation.items[0].quantity, 10.0);
    assert!(after.grand_total_gross() > after.grand_total_net());

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_catalog_price_change_reprices_quote() {
    let path = temp_path("reprice");
    let store = JsonFileStore::new(&path, "Anna");
    let mut workbook = Workbook::with_builtin_data("Anna").unwrap();
    let id = workbook.add_quote(QuoteRequest {
        label: String::new(),
        config: ChimneyConfig::default_for(ChimneySystemKind::Insulated),
        ventilation: VentilationHeights::new(),
        client: ClientData::default(),
    });
    let base = workbook.build_quote(&id).unwrap().grand_total_net();

    workbook.chimney.catalog.set_price("KPR", 0.0).unwrap();
    store.save(&workbook).unwrap();

    let reloaded = store.load().unwrap();
    let quote = reloaded.build_quote(&id).unwrap();
    assert!(quote.chimney.items.iter().all(|item| item.id != "KPR"));
    assert!(quote.grand_total_net() < base);

    let _ = std::fs::remove_file(&path);
}
