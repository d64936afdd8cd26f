//! Catalog id construction. Ids follow the manufacturer's part numbering,
//! e.g. `PK_40L` (K40 block with a vent channel) or `RPP_45_18`.

use super::system::{
    BlockHeight, BlockSize, ConnectorAngle, ConnectorGroup, Finish, FlueDiameter, OptionCode, SmartBlockSize, SmartDiameter,
    SmartVentChannel, SteelEnclosure, VentChannel,
};
use super::ventilation::VentilationBlock;

pub const FRONT_PLATE: &str = "PC";
pub const VENT_GRILLE: &str = "KPR";
pub const INSPECTION_DOOR: &str = "DRK";
pub const SEALANT: &str = "KU";
pub const INSULATION_BRACKET: &str = "WI";

pub const STEEL_PIPE: &str = "STAL_RP_8";
pub const STEEL_ELBOW: &str = "STAL_KOLANO_8";
pub const STEEL_CLEANOUT: &str = "STAL_WYCZYSTKA_8";
pub const STEEL_TERMINATION: &str = "STAL_ZAKONCZENIE_8";
pub const STEEL_REDUCER: &str = "STAL_REDUKCJA_8_6";

// Ceramic flue parts, shared by every system with a ceramic liner

pub fn straight_pipe(fi: FlueDiameter) -> String {
    format!("RP_{}", fi.code())
}

pub fn inspection_pipe(fi: FlueDiameter) -> String {
    format!("RR_{}", fi.code())
}

pub fn connector_pipe(angle: ConnectorAngle, fi: FlueDiameter) -> String {
    format!("RPP_{}_{}", angle.code(), fi.code())
}

pub fn condensate_drain(group: ConnectorGroup) -> String {
    format!("EOS_{}", group.code())
}

// Insulated / Basic

pub fn block(size: BlockSize, vent: VentChannel) -> String {
    format!("PK_{}{}", size.code(), vent.suffix())
}

pub fn wool(fi: FlueDiameter) -> String {
    format!("WM_{}", fi.code())
}

pub fn basic_front_plate(fi: FlueDiameter) -> String {
    format!("PC_{}", fi.code())
}

pub fn cover(fi: FlueDiameter) -> String {
    format!("OZK_{}", fi.code())
}

pub fn formwork(fi: FlueDiameter) -> String {
    format!("SCK_{}", fi.code())
}

pub fn cap(finish: Finish, size: BlockSize, vent: VentChannel) -> String {
    format!("CK_{}_{}{}", finish.cap_letter(), size.code(), vent.suffix())
}

pub fn cladding_plate(size: BlockSize, vent: VentChannel) -> String {
    format!("PPO_{}{}", size.code(), vent.suffix())
}

// Smart / Smart Plus

pub fn smart_block(size: SmartBlockSize, vent: SmartVentChannel, height: BlockHeight) -> String {
    let height_suffix = match height {
        BlockHeight::Cm33 => "",
        BlockHeight::Cm24_5 => "_245",
    };
    format!("PK_S_{}{}{}", size.code(), vent.suffix(), height_suffix)
}

pub fn smart_wool(fi: SmartDiameter) -> String {
    format!("WM_S_{}", fi.flue().code())
}

pub fn smart_cover(fi: SmartDiameter, plus: bool) -> String {
    let line = if plus { "SP" } else { "S" };
    format!("OZK_{}_{}", line, fi.flue().code())
}

pub fn smart_formwork(fi: SmartDiameter) -> String {
    format!("SCK_S_{}", fi.formwork_group())
}

pub fn smart_cap(finish: Finish, size: SmartBlockSize, vent: SmartVentChannel) -> String {
    format!("CK_S_{}_{}{}", finish.cap_letter(), size.code(), vent.suffix())
}

// Steel and ventilation

pub fn duo_steel_block(height: BlockHeight) -> String {
    match height {
        BlockHeight::Cm33 => "PK_DUO_STAL".to_string(),
        BlockHeight::Cm24_5 => "PK_DUO_STAL_25".to_string(),
    }
}

pub fn steel_enclosure(enclosure: SteelEnclosure) -> String {
    ventilation_block(enclosure.as_ventilation_block())
}

pub fn ventilation_block(block: VentilationBlock) -> String {
    format!("PV_{}", block.code())
}
