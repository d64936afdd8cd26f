//! # Chimney Bill of Materials
//!
//! Expands a [`ChimneyConfig`] into catalog lines. The height is checked
//! first; a bad height fails the whole expansion, never a partial list.
//!
//! Quantities:
//!
//! | Part | Quantity |
//! |------|----------|
//! | ceramic block (K35..K57) | `ceil(h / 0.335)` |
//! | Smart / Duo block | `ceil(h / block height)` |
//! | straight flue pipe | `ceil((h - 1.485) / 0.33)` |
//! | mineral wool | `h` rounded to the nearest half metre |
//! | sealant | `ceil(h / 15)` |
//! | steel enclosure block | `ceil(h / 0.25)` |
//! | steel pipe | `floor(h)`, or `floor(h - 1)` next to a ceramic flue |
//!
//! Parts missing from the catalog, or priced at zero, are left out.

use tracing::{debug, trace};

use super::catalog::ComponentCatalog;
use super::keys;
use super::report::ReportItem;
use super::system::{
    BlockHeight, CeramicOptions, ChimneyConfig, ConnectorAngle, DuoSteelOptions, Finish, FlueDiameter, SmartOptions,
    SteelOptions, Termination,
};
use crate::errors::{CalcError, CalcResult};
use crate::units::Percentage;

/// Height of the Insulated/Basic block course
pub const CERAMIC_COURSE_M: f64 = 0.335;
/// Flue height not covered by straight pipe (inspection and connector pipes)
pub const FLUE_FITTINGS_M: f64 = 1.485;
/// Length of one straight flue pipe
pub const FLUE_PIPE_M: f64 = 0.33;
/// One sealant pack per this many meters
pub const SEALANT_COVERAGE_M: f64 = 15.0;
/// Height of a steel enclosure block
pub const STEEL_COURSE_M: f64 = 0.25;

/// Collects lines, skipping parts that cannot be ordered.
pub(crate) struct BomBuilder<'a> {
    catalog: &'a ComponentCatalog,
    discount: Percentage,
    items: Vec<ReportItem>,
}

impl<'a> BomBuilder<'a> {
    pub(crate) fn new(catalog: &'a ComponentCatalog, purchase_discount_percent: f64) -> Self {
        BomBuilder {
            catalog,
            discount: Percentage::from_percent(purchase_discount_percent),
            items: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, id: &str, quantity: f64) {
        if quantity.is_nan() || quantity <= 0.0 {
            trace!(component = id, quantity, "skipped: no quantity");
            return;
        }
        match self.catalog.orderable(id) {
            Some(component) => {
                let price = component.price * self.discount.complement();
                self.items.push(ReportItem::new(id, component.name.clone(), price, quantity));
            }
            None => trace!(component = id, "skipped: not orderable"),
        }
    }

    pub(crate) fn finish(self) -> Vec<ReportItem> {
        self.items
    }
}

fn flue_pipes(h: f64) -> f64 {
    ((h - FLUE_FITTINGS_M) / FLUE_PIPE_M).ceil()
}

fn half_metres(h: f64) -> f64 {
    (h * 2.0).round() / 2.0
}

fn sealant_packs(h: f64) -> f64 {
    (h / SEALANT_COVERAGE_M).ceil()
}

/// Expand a chimney configuration into bill-of-materials lines.
///
/// # Errors
///
/// - [`CalcError::InvalidInput`] when the height is not a number or lies
///   outside 4-30 m
/// - [`CalcError::NotImplemented`] for systems without expansion rules
///   (Turbo, Multi, Turbo-S, Duo), reported only for a valid height
pub fn expand(
    config: &ChimneyConfig,
    purchase_discount_percent: f64,
    catalog: &ComponentCatalog,
) -> CalcResult<Vec<ReportItem>> {
    let h = config.height().resolve()?.0;
    let kind = config.kind();
    debug!(system = %kind, height = h, "expanding chimney");

    let mut bom = BomBuilder::new(catalog, purchase_discount_percent);
    match config {
        ChimneyConfig::Insulated(o) => ceramic(&mut bom, o, h, true),
        ChimneyConfig::Basic(o) => ceramic(&mut bom, o, h, false),
        ChimneyConfig::Smart(o) => smart(&mut bom, o, h, false),
        ChimneyConfig::SmartPlus(o) => smart(&mut bom, o, h, true),
        ChimneyConfig::Steel(o) => steel(&mut bom, o, h),
        ChimneyConfig::DuoSteel(o) => duo_steel(&mut bom, o, h),
        ChimneyConfig::Turbo(_) | ChimneyConfig::Multi(_) | ChimneyConfig::TurboS(_) | ChimneyConfig::Duo(_) => {
            return Err(CalcError::not_implemented(kind.display_name()));
        }
    }
    Ok(bom.finish())
}

fn flue(bom: &mut BomBuilder<'_>, fi: FlueDiameter, angle: ConnectorAngle, h: f64) {
    bom.add(&keys::straight_pipe(fi), flue_pipes(h));
    bom.add(&keys::inspection_pipe(fi), 1.0);
    bom.add(&keys::connector_pipe(angle, fi), 1.0);
}

fn ceramic(bom: &mut BomBuilder<'_>, o: &CeramicOptions, h: f64, insulated: bool) {
    let fi = o.diameter;
    let size = fi.block_size();

    bom.add(&keys::block(size, o.vent), (h / CERAMIC_COURSE_M).ceil());
    flue(bom, fi, o.connector, h);

    if insulated {
        bom.add(&keys::condensate_drain(fi.connector_group()), 1.0);
        bom.add(keys::FRONT_PLATE, 1.0);
        bom.add(&keys::wool(fi), half_metres(h));
        bom.add(keys::VENT_GRILLE, 1.0);
    } else {
        bom.add(&keys::basic_front_plate(fi), 1.0);
        bom.add(keys::INSULATION_BRACKET, 3.0);
    }
    bom.add(&keys::cover(fi), 1.0);

    bom.add(keys::INSPECTION_DOOR, 1.0);
    bom.add(keys::SEALANT, sealant_packs(h));
    match o.termination {
        Termination::Formwork => bom.add(&keys::formwork(fi), 1.0),
        Termination::Cap => bom.add(&keys::cap(o.finish, size, o.vent), 1.0),
    }
    if o.finish == Finish::Masonry {
        bom.add(&keys::cladding_plate(size, o.vent), 1.0);
    }
}

fn smart(bom: &mut BomBuilder<'_>, o: &SmartOptions, h: f64, plus: bool) {
    let fi = o.diameter;
    let size = fi.block_size();

    bom.add(
        &keys::smart_block(size, o.vent, o.block_height),
        (h / o.block_height.meters()).ceil(),
    );
    flue(bom, fi.flue(), o.connector, h);
    bom.add(&keys::condensate_drain(fi.flue().connector_group()), 1.0);
    bom.add(&keys::smart_wool(fi), half_metres(h));
    bom.add(&keys::smart_cover(fi, plus), 1.0);
    bom.add(keys::INSPECTION_DOOR, 1.0);
    bom.add(keys::VENT_GRILLE, 1.0);
    bom.add(keys::SEALANT, sealant_packs(h));
    match o.termination {
        Termination::Formwork => bom.add(&keys::smart_formwork(fi), 1.0),
        Termination::Cap => bom.add(&keys::smart_cap(o.finish, size, o.vent), 1.0),
    }
}

fn steel_fittings(bom: &mut BomBuilder<'_>, reducer: bool) {
    bom.add(keys::STEEL_ELBOW, 1.0);
    bom.add(keys::STEEL_CLEANOUT, 1.0);
    bom.add(keys::STEEL_TERMINATION, 1.0);
    if reducer {
        bom.add(keys::STEEL_REDUCER, 1.0);
    }
}

fn steel(bom: &mut BomBuilder<'_>, o: &SteelOptions, h: f64) {
    bom.add(&keys::steel_enclosure(o.enclosure), (h / STEEL_COURSE_M).ceil());
    bom.add(keys::STEEL_PIPE, h.floor());
    steel_fittings(bom, o.reducer);
}

fn duo_steel(bom: &mut BomBuilder<'_>, o: &DuoSteelOptions, h: f64) {
    let block_height: BlockHeight = o.block_height;
    bom.add(&keys::duo_steel_block(block_height), (h / block_height.meters()).ceil());
    flue(bom, o.diameter.flue(), o.connector, h);

    bom.add(keys::STEEL_PIPE, (h - 1.0).floor());
    bom.add(keys::STEEL_CLEANOUT, 1.0);
    bom.add(keys::STEEL_ELBOW, 1.0);
    bom.add(keys::STEEL_TERMINATION, 1.0);
    if o.reducer {
        bom.add(keys::STEEL_REDUCER, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chimney::system::{
        ChimneySystemKind, HeightInput, OptionCode, SmartDiameter, SmartVentChannel, SteelEnclosure, VentChannel,
    };

    fn builtin() -> ComponentCatalog {
        ComponentCatalog::builtin().unwrap()
    }

    fn insulated(h: HeightInput) -> ChimneyConfig {
        let mut config = ChimneyConfig::default_for(ChimneySystemKind::Insulated);
        config.set_height(h);
        config
    }

    fn line<'a>(items: &'a [ReportItem], id: &str) -> Option<&'a ReportItem> {
        items.iter().find(|i| i.id == id)
    }

    #[test]
    fn test_insulated_18_at_6m() {
        let items = expand(&insulated(6.0_f64.into()), 0.0, &builtin()).unwrap();
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["PK_40", "RP_18", "RR_18", "RPP_90_18", "EOS_18-20", "PC", "WM_18", "KPR", "OZK_18", "DRK", "KU", "SCK_18"]
        );
        assert_eq!(line(&items, "PK_40").unwrap().quantity, 18.0);
        assert_eq!(line(&items, "RP_18").unwrap().quantity, 14.0);
        assert_eq!(line(&items, "WM_18").unwrap().quantity, 6.0);
        assert_eq!(line(&items, "KU").unwrap().quantity, 1.0);
        assert_eq!(line(&items, "PK_40").unwrap().total, 18.0 * 41.0);
    }

    #[test]
    fn test_height_boundaries() {
        let catalog = builtin();
        assert!(expand(&insulated(3.999_f64.into()), 0.0, &catalog).is_err());
        assert!(expand(&insulated(4.0_f64.into()), 0.0, &catalog).is_ok());
        assert!(expand(&insulated(30.0_f64.into()), 0.0, &catalog).is_ok());
        let err = expand(&insulated(30.001_f64.into()), 0.0, &catalog).unwrap_err();
        assert!(err.is_validation());
        assert!(expand(&insulated("abc".into()), 0.0, &catalog).is_err());
    }

    #[test]
    fn test_wool_rounds_to_half_metre() {
        let items = expand(&insulated("6,3".into()), 0.0, &builtin()).unwrap();
        assert_eq!(line(&items, "WM_18").unwrap().quantity, 6.5);
        let items = expand(&insulated(6.2_f64.into()), 0.0, &builtin()).unwrap();
        assert_eq!(line(&items, "WM_18").unwrap().quantity, 6.0);
    }

    #[test]
    fn test_sealant_per_fifteen_metres() {
        let items = expand(&insulated(16.0_f64.into()), 0.0, &builtin()).unwrap();
        assert_eq!(line(&items, "KU").unwrap().quantity, 2.0);
    }

    #[test]
    fn test_purchase_discount_applies_to_every_line() {
        let items = expand(&insulated(6.0_f64.into()), 10.0, &builtin()).unwrap();
        let block = line(&items, "PK_40").unwrap();
        assert!((block.price - 41.0 * 0.9).abs() < 1e-12);
        assert!((block.total - block.price * 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_cap_and_cladding() {
        let config = ChimneyConfig::Insulated(CeramicOptions {
            height: 6.0_f64.into(),
            diameter: FlueDiameter::D18,
            vent: VentChannel::Single,
            finish: Finish::Masonry,
            termination: Termination::Cap,
            connector: ConnectorAngle::Deg45,
        });
        let mut catalog = ComponentCatalog::new();
        for id in ["PK_40L", "RPP_45_18", "CK_M_40L", "PPO_40L", "SCK_18"] {
            catalog.upsert(id, id, 10.0);
        }
        let ids: Vec<String> = expand(&config, 0.0, &catalog).unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["PK_40L", "RPP_45_18", "CK_M_40L", "PPO_40L"]);
    }

    #[test]
    fn test_basic_lines() {
        let mut config = ChimneyConfig::default_for(ChimneySystemKind::Basic);
        config.set_height(6.0_f64.into());
        let items = expand(&config, 0.0, &builtin()).unwrap();
        assert_eq!(line(&items, "WI").unwrap().quantity, 3.0);
        assert!(line(&items, "PC_18").is_some());
        assert!(line(&items, "WM_18").is_none());
        assert!(line(&items, "KPR").is_none());
    }

    #[test]
    fn test_smart_lines() {
        let config = ChimneyConfig::SmartPlus(SmartOptions {
            height: 6.0_f64.into(),
            diameter: SmartDiameter::D18,
            vent: SmartVentChannel::None,
            block_height: BlockHeight::Cm33,
            finish: Finish::Plaster,
            termination: Termination::Formwork,
            connector: ConnectorAngle::Deg90,
        });
        let items = expand(&config, 0.0, &builtin()).unwrap();
        assert_eq!(line(&items, "PK_S_36").unwrap().quantity, 19.0);
        assert!(line(&items, "OZK_SP_18").is_some());
        assert!(line(&items, "OZK_S_18").is_none());
        assert_eq!(line(&items, "WM_S_18").unwrap().quantity, 6.0);
        assert!(line(&items, "SCK_S_18-20").is_some());
    }

    #[test]
    fn test_steel_parts_unpriced() {
        let config = ChimneyConfig::Steel(SteelOptions {
            height: 6.0_f64.into(),
            enclosure: SteelEnclosure::Lk1,
            reducer: true,
            ..Default::default()
        });
        let items = expand(&config, 0.0, &builtin()).unwrap();
        // Only the enclosure block carries a price in the shipped catalog
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "PV_LK1");
        assert_eq!(items[0].quantity, 24.0);
    }

    #[test]
    fn test_steel_quantities_with_prices() {
        let mut catalog = ComponentCatalog::new();
        for id in ["PV_LK2", "STAL_RP_8", "STAL_KOLANO_8", "STAL_WYCZYSTKA_8", "STAL_ZAKONCZENIE_8", "STAL_REDUKCJA_8_6"] {
            catalog.upsert(id, id, 5.0);
        }
        let config = ChimneyConfig::Steel(SteelOptions {
            height: 6.7_f64.into(),
            enclosure: SteelEnclosure::Lk2,
            reducer: false,
            ..Default::default()
        });
        let items = expand(&config, 0.0, &catalog).unwrap();
        assert_eq!(line(&items, "PV_LK2").unwrap().quantity, 27.0);
        assert_eq!(line(&items, "STAL_RP_8").unwrap().quantity, 6.0);
        assert!(line(&items, "STAL_REDUKCJA_8_6").is_none());
    }

    #[test]
    fn test_duo_steel_order() {
        let mut catalog = ComponentCatalog::new();
        for id in ["PK_DUO_STAL", "RP_18", "STAL_RP_8", "STAL_WYCZYSTKA_8", "STAL_KOLANO_8"] {
            catalog.upsert(id, id, 5.0);
        }
        let config = ChimneyConfig::default_for(ChimneySystemKind::DuoSteel);
        let items = expand(&config, 0.0, &catalog).unwrap();
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["PK_DUO_STAL", "RP_18", "STAL_RP_8", "STAL_WYCZYSTKA_8", "STAL_KOLANO_8"]);
        assert_eq!(items[2].quantity, 5.0);
    }

    #[test]
    fn test_zero_price_parts_never_appear() {
        let catalog = builtin();
        for kind in ChimneySystemKind::ALL.iter().filter(|k| k.is_implemented()) {
            let items = expand(&ChimneyConfig::default_for(*kind), 0.0, &catalog).unwrap();
            assert!(items.iter().all(|i| i.price > 0.0 && i.quantity > 0.0), "{}", kind);
        }
    }

    #[test]
    fn test_not_implemented_after_height_check() {
        let catalog = builtin();
        let mut config = ChimneyConfig::default_for(ChimneySystemKind::Turbo);
        let err = expand(&config, 0.0, &catalog).unwrap_err();
        assert_eq!(err.error_code(), "NOT_IMPLEMENTED");
        assert!(!err.is_validation());

        config.set_height(2.0_f64.into());
        let err = expand(&config, 0.0, &catalog).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_expand_is_idempotent() {
        let catalog = builtin();
        let config = insulated(7.5_f64.into());
        assert_eq!(expand(&config, 5.0, &catalog).unwrap(), expand(&config, 5.0, &catalog).unwrap());
    }
}
