//! # Chimney Systems and Options
//!
//! The ten Leier chimney systems and the options each one takes. Every
//! option is a closed enumeration, so a Smart chimney cannot be asked for a
//! 30 cm flue and a steel chimney cannot be asked for a masonry finish.
//!
//! Option values serialize to the short codes used in saved quotes
//! (`"tynk"`, `"szalunek"`, `"18"`...).

use serde::{Deserialize, Serialize};

use super::ventilation::VentilationBlock;
use crate::errors::{CalcError, CalcResult};
use crate::units::Meters;

/// Shared behaviour of the option enumerations.
pub trait OptionCode: Sized + Copy + 'static {
    /// Every value, in menu order
    const ALL: &'static [Self];

    /// Short code used in catalog keys and saved quotes
    fn code(&self) -> &'static str;

    /// Parse a code (case-insensitive, surrounding whitespace ignored)
    fn parse_code(field: &str, text: &str) -> CalcResult<Self> {
        let wanted = text.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.code().to_lowercase() == wanted)
            .ok_or_else(|| {
                let allowed: Vec<&str> = Self::ALL.iter().map(|v| v.code()).collect();
                CalcError::invalid_input(field, text, format!("Expected one of: {}", allowed.join(", ")))
            })
    }
}

// ============================================================================
// System kinds
// ============================================================================

/// The ten chimney systems offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChimneySystemKind {
    #[serde(rename = "izolowany")]
    Insulated,
    #[serde(rename = "smart")]
    Smart,
    #[serde(rename = "smartplus")]
    SmartPlus,
    #[serde(rename = "basic")]
    Basic,
    #[serde(rename = "turbo")]
    Turbo,
    #[serde(rename = "multi")]
    Multi,
    #[serde(rename = "turbos")]
    TurboS,
    #[serde(rename = "stal")]
    Steel,
    #[serde(rename = "duostal")]
    DuoSteel,
    #[serde(rename = "duo")]
    Duo,
}

impl ChimneySystemKind {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            ChimneySystemKind::Insulated => "LEIER IZOLOWANY",
            ChimneySystemKind::Smart => "LEIER SMART",
            ChimneySystemKind::SmartPlus => "LEIER SMART PLUS",
            ChimneySystemKind::Basic => "LEIER BASIC",
            ChimneySystemKind::Turbo => "LEIER TURBO",
            ChimneySystemKind::Multi => "LEIER MULTI",
            ChimneySystemKind::TurboS => "LEIER TURBO-S",
            ChimneySystemKind::Steel => "LEIER STAL",
            ChimneySystemKind::DuoSteel => "LEIER DUO STAL",
            ChimneySystemKind::Duo => "LEIER DUO",
        }
    }

    /// Whether a bill of materials can be generated for this system
    pub fn is_implemented(&self) -> bool {
        !matches!(
            self,
            ChimneySystemKind::Turbo | ChimneySystemKind::Multi | ChimneySystemKind::TurboS | ChimneySystemKind::Duo
        )
    }
}

impl OptionCode for ChimneySystemKind {
    const ALL: &'static [Self] = &[
        ChimneySystemKind::Insulated,
        ChimneySystemKind::Smart,
        ChimneySystemKind::SmartPlus,
        ChimneySystemKind::Basic,
        ChimneySystemKind::Turbo,
        ChimneySystemKind::Multi,
        ChimneySystemKind::TurboS,
        ChimneySystemKind::Steel,
        ChimneySystemKind::DuoSteel,
        ChimneySystemKind::Duo,
    ];

    fn code(&self) -> &'static str {
        match self {
            ChimneySystemKind::Insulated => "izolowany",
            ChimneySystemKind::Smart => "smart",
            ChimneySystemKind::SmartPlus => "smartplus",
            ChimneySystemKind::Basic => "basic",
            ChimneySystemKind::Turbo => "turbo",
            ChimneySystemKind::Multi => "multi",
            ChimneySystemKind::TurboS => "turbos",
            ChimneySystemKind::Steel => "stal",
            ChimneySystemKind::DuoSteel => "duostal",
            ChimneySystemKind::Duo => "duo",
        }
    }
}

impl std::fmt::Display for ChimneySystemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Diameters and block sizes
// ============================================================================

/// Ceramic flue diameter in cm (Insulated, Basic, Turbo).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlueDiameter {
    #[serde(rename = "14")]
    D14,
    #[serde(rename = "16")]
    D16,
    #[default]
    #[serde(rename = "18")]
    D18,
    #[serde(rename = "20")]
    D20,
    #[serde(rename = "22")]
    D22,
    #[serde(rename = "25")]
    D25,
    #[serde(rename = "30")]
    D30,
}

impl FlueDiameter {
    /// Chimney block that houses this flue
    pub fn block_size(&self) -> BlockSize {
        match self {
            FlueDiameter::D14 | FlueDiameter::D16 => BlockSize::K35,
            FlueDiameter::D18 | FlueDiameter::D20 => BlockSize::K40,
            FlueDiameter::D22 | FlueDiameter::D25 => BlockSize::K48,
            FlueDiameter::D30 => BlockSize::K57,
        }
    }

    /// Diameter group of the condensate drain
    pub fn connector_group(&self) -> ConnectorGroup {
        match self {
            FlueDiameter::D14 | FlueDiameter::D16 => ConnectorGroup::G14To16,
            FlueDiameter::D18 | FlueDiameter::D20 => ConnectorGroup::G18To20,
            FlueDiameter::D22 => ConnectorGroup::G22,
            FlueDiameter::D25 => ConnectorGroup::G25,
            FlueDiameter::D30 => ConnectorGroup::G30,
        }
    }
}

impl OptionCode for FlueDiameter {
    const ALL: &'static [Self] = &[
        FlueDiameter::D14,
        FlueDiameter::D16,
        FlueDiameter::D18,
        FlueDiameter::D20,
        FlueDiameter::D22,
        FlueDiameter::D25,
        FlueDiameter::D30,
    ];

    fn code(&self) -> &'static str {
        match self {
            FlueDiameter::D14 => "14",
            FlueDiameter::D16 => "16",
            FlueDiameter::D18 => "18",
            FlueDiameter::D20 => "20",
            FlueDiameter::D22 => "22",
            FlueDiameter::D25 => "25",
            FlueDiameter::D30 => "30",
        }
    }
}

/// Flue diameter of the Smart line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SmartDiameter {
    #[serde(rename = "16")]
    D16,
    #[default]
    #[serde(rename = "18")]
    D18,
    #[serde(rename = "20")]
    D20,
}

impl SmartDiameter {
    /// Same diameter on the full ceramic range (pipes, connectors)
    pub fn flue(&self) -> FlueDiameter {
        match self {
            SmartDiameter::D16 => FlueDiameter::D16,
            SmartDiameter::D18 => FlueDiameter::D18,
            SmartDiameter::D20 => FlueDiameter::D20,
        }
    }

    pub fn block_size(&self) -> SmartBlockSize {
        match self {
            SmartDiameter::D16 => SmartBlockSize::K32,
            SmartDiameter::D18 | SmartDiameter::D20 => SmartBlockSize::K36,
        }
    }

    /// Diameter group of the Smart cap formwork
    pub fn formwork_group(&self) -> &'static str {
        match self {
            SmartDiameter::D16 => "14-16",
            SmartDiameter::D18 | SmartDiameter::D20 => "18-20",
        }
    }
}

impl OptionCode for SmartDiameter {
    const ALL: &'static [Self] = &[SmartDiameter::D16, SmartDiameter::D18, SmartDiameter::D20];

    fn code(&self) -> &'static str {
        self.flue().code()
    }
}

/// Flue diameter of the Multi system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MultiDiameter {
    #[default]
    #[serde(rename = "14")]
    D14,
    #[serde(rename = "16")]
    D16,
    #[serde(rename = "18")]
    D18,
    #[serde(rename = "20")]
    D20,
}

impl OptionCode for MultiDiameter {
    const ALL: &'static [Self] = &[MultiDiameter::D14, MultiDiameter::D16, MultiDiameter::D18, MultiDiameter::D20];

    fn code(&self) -> &'static str {
        match self {
            MultiDiameter::D14 => "14",
            MultiDiameter::D16 => "16",
            MultiDiameter::D18 => "18",
            MultiDiameter::D20 => "20",
        }
    }
}

/// Main (ceramic) flue of the dual-flue systems.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DuoDiameter {
    #[default]
    #[serde(rename = "18")]
    D18,
    #[serde(rename = "20")]
    D20,
}

impl DuoDiameter {
    pub fn flue(&self) -> FlueDiameter {
        match self {
            DuoDiameter::D18 => FlueDiameter::D18,
            DuoDiameter::D20 => FlueDiameter::D20,
        }
    }
}

impl OptionCode for DuoDiameter {
    const ALL: &'static [Self] = &[DuoDiameter::D18, DuoDiameter::D20];

    fn code(&self) -> &'static str {
        self.flue().code()
    }
}

/// Small flue diameters (Turbo-S, second flue of Duo).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SmallDiameter {
    #[default]
    #[serde(rename = "8")]
    D8,
    #[serde(rename = "10")]
    D10,
    #[serde(rename = "12")]
    D12,
    #[serde(rename = "14")]
    D14,
}

impl OptionCode for SmallDiameter {
    const ALL: &'static [Self] = &[SmallDiameter::D8, SmallDiameter::D10, SmallDiameter::D12, SmallDiameter::D14];

    fn code(&self) -> &'static str {
        match self {
            SmallDiameter::D8 => "8",
            SmallDiameter::D10 => "10",
            SmallDiameter::D12 => "12",
            SmallDiameter::D14 => "14",
        }
    }
}

/// Steel liner diameter; only 8 cm is offered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SteelDiameter {
    #[default]
    #[serde(rename = "8")]
    D8,
}

impl OptionCode for SteelDiameter {
    const ALL: &'static [Self] = &[SteelDiameter::D8];

    fn code(&self) -> &'static str {
        "8"
    }
}

/// Outer size of the Insulated/Basic chimney block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockSize {
    K35,
    K40,
    K48,
    K57,
}

impl BlockSize {
    pub fn code(&self) -> &'static str {
        match self {
            BlockSize::K35 => "35",
            BlockSize::K40 => "40",
            BlockSize::K48 => "48",
            BlockSize::K57 => "57",
        }
    }
}

/// Outer size of the Smart chimney block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SmartBlockSize {
    K32,
    K36,
}

impl SmartBlockSize {
    pub fn code(&self) -> &'static str {
        match self {
            SmartBlockSize::K32 => "32",
            SmartBlockSize::K36 => "36",
        }
    }
}

/// Diameter group of the condensate drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorGroup {
    G14To16,
    G18To20,
    G22,
    G25,
    G30,
}

impl ConnectorGroup {
    pub fn code(&self) -> &'static str {
        match self {
            ConnectorGroup::G14To16 => "14-16",
            ConnectorGroup::G18To20 => "18-20",
            ConnectorGroup::G22 => "22",
            ConnectorGroup::G25 => "25",
            ConnectorGroup::G30 => "30",
        }
    }
}

// ============================================================================
// Other choices
// ============================================================================

/// Ventilation channel alongside the flue (Insulated, Basic, Turbo).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VentChannel {
    #[default]
    #[serde(rename = "bez")]
    None,
    #[serde(rename = "went")]
    Single,
}

impl VentChannel {
    /// Suffix appended to block, cap and cladding keys
    pub fn suffix(&self) -> &'static str {
        match self {
            VentChannel::None => "",
            VentChannel::Single => "L",
        }
    }
}

impl OptionCode for VentChannel {
    const ALL: &'static [Self] = &[VentChannel::None, VentChannel::Single];

    fn code(&self) -> &'static str {
        match self {
            VentChannel::None => "bez",
            VentChannel::Single => "went",
        }
    }
}

/// Ventilation channels of a Smart block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SmartVentChannel {
    #[default]
    #[serde(rename = "bez")]
    None,
    #[serde(rename = "went")]
    Single,
    #[serde(rename = "podwojny")]
    Double,
}

impl SmartVentChannel {
    pub fn suffix(&self) -> &'static str {
        match self {
            SmartVentChannel::None => "",
            SmartVentChannel::Single => "L",
            SmartVentChannel::Double => "L2",
        }
    }
}

impl OptionCode for SmartVentChannel {
    const ALL: &'static [Self] = &[SmartVentChannel::None, SmartVentChannel::Single, SmartVentChannel::Double];

    fn code(&self) -> &'static str {
        match self {
            SmartVentChannel::None => "bez",
            SmartVentChannel::Single => "went",
            SmartVentChannel::Double => "podwojny",
        }
    }
}

/// Outer finish above the roof.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Finish {
    /// Rendered ("pod tynk")
    #[default]
    #[serde(rename = "tynk")]
    Plaster,
    /// Brick cladding ("pod obmurówkę")
    #[serde(rename = "obmurowka")]
    Masonry,
}

impl Finish {
    /// Letter used in cap keys
    pub fn cap_letter(&self) -> &'static str {
        match self {
            Finish::Plaster => "T",
            Finish::Masonry => "M",
        }
    }
}

impl OptionCode for Finish {
    const ALL: &'static [Self] = &[Finish::Plaster, Finish::Masonry];

    fn code(&self) -> &'static str {
        match self {
            Finish::Plaster => "tynk",
            Finish::Masonry => "obmurowka",
        }
    }
}

/// How the chimney top is closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Termination {
    /// Cap cast on site in a formwork
    #[default]
    #[serde(rename = "szalunek")]
    Formwork,
    /// Precast chimney cap
    #[serde(rename = "czapa")]
    Cap,
}

impl OptionCode for Termination {
    const ALL: &'static [Self] = &[Termination::Formwork, Termination::Cap];

    fn code(&self) -> &'static str {
        match self {
            Termination::Formwork => "szalunek",
            Termination::Cap => "czapa",
        }
    }
}

/// Angle of the stove connector pipe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectorAngle {
    #[default]
    #[serde(rename = "90")]
    Deg90,
    #[serde(rename = "45")]
    Deg45,
}

impl OptionCode for ConnectorAngle {
    const ALL: &'static [Self] = &[ConnectorAngle::Deg90, ConnectorAngle::Deg45];

    fn code(&self) -> &'static str {
        match self {
            ConnectorAngle::Deg90 => "90",
            ConnectorAngle::Deg45 => "45",
        }
    }
}

/// Height of one chimney block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockHeight {
    #[default]
    #[serde(rename = "33")]
    Cm33,
    #[serde(rename = "25")]
    Cm24_5,
}

impl BlockHeight {
    pub fn meters(&self) -> f64 {
        match self {
            BlockHeight::Cm33 => 0.33,
            BlockHeight::Cm24_5 => 0.245,
        }
    }
}

impl OptionCode for BlockHeight {
    const ALL: &'static [Self] = &[BlockHeight::Cm33, BlockHeight::Cm24_5];

    fn code(&self) -> &'static str {
        match self {
            BlockHeight::Cm33 => "33",
            BlockHeight::Cm24_5 => "25",
        }
    }
}

/// Enclosure block of the steel chimney.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SteelEnclosure {
    #[default]
    #[serde(rename = "LK1")]
    Lk1,
    #[serde(rename = "LK2")]
    Lk2,
    #[serde(rename = "LK3")]
    Lk3,
    #[serde(rename = "LK4")]
    Lk4,
    #[serde(rename = "LK2-P")]
    Lk2P,
    #[serde(rename = "LK3-P")]
    Lk3P,
    #[serde(rename = "LK4-P")]
    Lk4P,
}

impl SteelEnclosure {
    /// The ventilation block this enclosure is made of
    pub fn as_ventilation_block(&self) -> VentilationBlock {
        match self {
            SteelEnclosure::Lk1 => VentilationBlock::Lk1,
            SteelEnclosure::Lk2 => VentilationBlock::Lk2,
            SteelEnclosure::Lk3 => VentilationBlock::Lk3,
            SteelEnclosure::Lk4 => VentilationBlock::Lk4,
            SteelEnclosure::Lk2P => VentilationBlock::Lk2P,
            SteelEnclosure::Lk3P => VentilationBlock::Lk3P,
            SteelEnclosure::Lk4P => VentilationBlock::Lk4P,
        }
    }
}

impl OptionCode for SteelEnclosure {
    const ALL: &'static [Self] = &[
        SteelEnclosure::Lk1,
        SteelEnclosure::Lk2,
        SteelEnclosure::Lk3,
        SteelEnclosure::Lk4,
        SteelEnclosure::Lk2P,
        SteelEnclosure::Lk3P,
        SteelEnclosure::Lk4P,
    ];

    fn code(&self) -> &'static str {
        match self {
            SteelEnclosure::Lk1 => "LK1",
            SteelEnclosure::Lk2 => "LK2",
            SteelEnclosure::Lk3 => "LK3",
            SteelEnclosure::Lk4 => "LK4",
            SteelEnclosure::Lk2P => "LK2-P",
            SteelEnclosure::Lk3P => "LK3-P",
            SteelEnclosure::Lk4P => "LK4-P",
        }
    }
}

// ============================================================================
// Height
// ============================================================================

/// Lowest chimney the systems are rated for
pub const MIN_HEIGHT_M: f64 = 4.0;
/// Highest chimney the systems are rated for
pub const MAX_HEIGHT_M: f64 = 30.0;

/// Chimney height as entered: a number, or text that may use a decimal comma.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeightInput {
    Number(f64),
    Text(String),
}

impl Default for HeightInput {
    fn default() -> Self {
        HeightInput::Text("6".to_string())
    }
}

impl From<f64> for HeightInput {
    fn from(value: f64) -> Self {
        HeightInput::Number(value)
    }
}

impl From<&str> for HeightInput {
    fn from(value: &str) -> Self {
        HeightInput::Text(value.to_string())
    }
}

impl HeightInput {
    /// Parse and range-check the height.
    pub fn resolve(&self) -> CalcResult<Meters> {
        let (parsed, raw) = match self {
            HeightInput::Number(v) => (Some(Meters(*v)).filter(|m| m.0.is_finite()), v.to_string()),
            HeightInput::Text(s) => (Meters::parse_leading(s), s.clone()),
        };
        match parsed {
            Some(h) if (MIN_HEIGHT_M..=MAX_HEIGHT_M).contains(&h.0) => Ok(h),
            Some(_) => Err(CalcError::invalid_input(
                "height",
                raw,
                "Chimney height must be within 4-30 m",
            )),
            None => Err(CalcError::invalid_input("height", raw, "Chimney height is not a number")),
        }
    }
}

// ============================================================================
// Per-system options
// ============================================================================

/// Options of the Insulated and Basic systems.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CeramicOptions {
    #[serde(rename = "h")]
    pub height: HeightInput,
    #[serde(rename = "fi")]
    pub diameter: FlueDiameter,
    #[serde(rename = "pustak", default)]
    pub vent: VentChannel,
    #[serde(rename = "wykonczenie", default)]
    pub finish: Finish,
    #[serde(rename = "zakonczenie", default)]
    pub termination: Termination,
    #[serde(rename = "rurapp", default)]
    pub connector: ConnectorAngle,
}

/// Options of the Smart and Smart Plus systems.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmartOptions {
    #[serde(rename = "h")]
    pub height: HeightInput,
    #[serde(rename = "fi")]
    pub diameter: SmartDiameter,
    #[serde(rename = "pustak", default)]
    pub vent: SmartVentChannel,
    #[serde(rename = "pustakh", default)]
    pub block_height: BlockHeight,
    #[serde(rename = "wykonczenie", default)]
    pub finish: Finish,
    #[serde(rename = "zakonczenie", default)]
    pub termination: Termination,
    #[serde(rename = "rurapp", default)]
    pub connector: ConnectorAngle,
}

/// Options of the Turbo system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurboOptions {
    #[serde(rename = "h")]
    pub height: HeightInput,
    #[serde(rename = "fi")]
    pub diameter: FlueDiameter,
    /// Number of stoves connected (1-10)
    #[serde(rename = "piece", default = "one_stove")]
    pub stoves: u8,
    #[serde(rename = "pustak", default)]
    pub vent: VentChannel,
    #[serde(rename = "wykonczenie", default)]
    pub finish: Finish,
    #[serde(rename = "zakonczenie", default)]
    pub termination: Termination,
}

/// Options of the Multi system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiOptions {
    #[serde(rename = "h")]
    pub height: HeightInput,
    #[serde(rename = "fi")]
    pub diameter: MultiDiameter,
    #[serde(rename = "piece", default = "one_stove")]
    pub stoves: u8,
    #[serde(rename = "pustak", default)]
    pub vent: VentChannel,
    #[serde(rename = "wykonczenie", default)]
    pub finish: Finish,
    #[serde(rename = "zakonczenie", default)]
    pub termination: Termination,
}

/// Options of the Turbo-S system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurboSOptions {
    #[serde(rename = "h")]
    pub height: HeightInput,
    #[serde(rename = "fi")]
    pub diameter: SmallDiameter,
    #[serde(rename = "pustak", default)]
    pub vent: VentChannel,
    #[serde(rename = "wykonczenie", default)]
    pub finish: Finish,
    #[serde(rename = "zakonczenie", default)]
    pub termination: Termination,
}

/// Options of the steel-liner system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SteelOptions {
    #[serde(rename = "h")]
    pub height: HeightInput,
    #[serde(rename = "fi", default)]
    pub diameter: SteelDiameter,
    #[serde(rename = "pustak", default)]
    pub enclosure: SteelEnclosure,
    /// Add an 8 -> 6 cm reducer
    #[serde(rename = "redukcja", default, with = "yes_no")]
    pub reducer: bool,
}

/// Options of the ceramic + steel dual-flue system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DuoSteelOptions {
    #[serde(rename = "h")]
    pub height: HeightInput,
    #[serde(rename = "fi")]
    pub diameter: DuoDiameter,
    #[serde(rename = "fi2", default)]
    pub second_diameter: SteelDiameter,
    #[serde(rename = "pustakh", default)]
    pub block_height: BlockHeight,
    #[serde(rename = "zakonczenie", default)]
    pub termination: Termination,
    #[serde(rename = "rurapp", default)]
    pub connector: ConnectorAngle,
    #[serde(rename = "redukcja", default, with = "yes_no")]
    pub reducer: bool,
}

/// Options of the ceramic dual-flue system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DuoOptions {
    #[serde(rename = "h")]
    pub height: HeightInput,
    #[serde(rename = "fi")]
    pub diameter: DuoDiameter,
    #[serde(rename = "fi2")]
    pub second_diameter: SmallDiameter,
    #[serde(rename = "zakonczenie", default)]
    pub termination: Termination,
    #[serde(rename = "rurapp", default)]
    pub connector: ConnectorAngle,
}

fn one_stove() -> u8 {
    1
}

/// `"tak"` / `"nie"` flags as booleans.
mod yes_no {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "tak" } else { "nie" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Flag {
            Bool(bool),
            Text(String),
        }
        Ok(match Flag::deserialize(deserializer)? {
            Flag::Bool(b) => b,
            Flag::Text(s) => s.trim().eq_ignore_ascii_case("tak"),
        })
    }
}

/// A chimney configuration: the system together with its options.
///
/// Serializes as `{"system": "izolowany", "h": "6", "fi": "18", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "system")]
pub enum ChimneyConfig {
    #[serde(rename = "izolowany")]
    Insulated(CeramicOptions),
    #[serde(rename = "smart")]
    Smart(SmartOptions),
    #[serde(rename = "smartplus")]
    SmartPlus(SmartOptions),
    #[serde(rename = "basic")]
    Basic(CeramicOptions),
    #[serde(rename = "turbo")]
    Turbo(TurboOptions),
    #[serde(rename = "multi")]
    Multi(MultiOptions),
    #[serde(rename = "turbos")]
    TurboS(TurboSOptions),
    #[serde(rename = "stal")]
    Steel(SteelOptions),
    #[serde(rename = "duostal")]
    DuoSteel(DuoSteelOptions),
    #[serde(rename = "duo")]
    Duo(DuoOptions),
}

impl ChimneyConfig {
    /// The starting configuration offered for each system.
    pub fn default_for(kind: ChimneySystemKind) -> Self {
        let ceramic = CeramicOptions {
            height: HeightInput::default(),
            diameter: FlueDiameter::D18,
            ..Default::default()
        };
        let smart = SmartOptions {
            height: HeightInput::default(),
            diameter: SmartDiameter::D18,
            ..Default::default()
        };
        match kind {
            ChimneySystemKind::Insulated => ChimneyConfig::Insulated(ceramic),
            ChimneySystemKind::Basic => ChimneyConfig::Basic(ceramic),
            ChimneySystemKind::Smart => ChimneyConfig::Smart(smart),
            ChimneySystemKind::SmartPlus => ChimneyConfig::SmartPlus(smart),
            ChimneySystemKind::Turbo => ChimneyConfig::Turbo(TurboOptions {
                diameter: FlueDiameter::D14,
                stoves: 1,
                ..Default::default()
            }),
            ChimneySystemKind::Multi => ChimneyConfig::Multi(MultiOptions {
                diameter: MultiDiameter::D14,
                stoves: 1,
                ..Default::default()
            }),
            ChimneySystemKind::TurboS => ChimneyConfig::TurboS(TurboSOptions {
                diameter: SmallDiameter::D8,
                ..Default::default()
            }),
            ChimneySystemKind::Steel => ChimneyConfig::Steel(SteelOptions::default()),
            ChimneySystemKind::DuoSteel => ChimneyConfig::DuoSteel(DuoSteelOptions {
                diameter: DuoDiameter::D18,
                ..Default::default()
            }),
            ChimneySystemKind::Duo => ChimneyConfig::Duo(DuoOptions {
                height: HeightInput::default(),
                diameter: DuoDiameter::D18,
                second_diameter: SmallDiameter::D8,
                termination: Termination::Formwork,
                connector: ConnectorAngle::Deg90,
            }),
        }
    }

    pub fn kind(&self) -> ChimneySystemKind {
        match self {
            ChimneyConfig::Insulated(_) => ChimneySystemKind::Insulated,
            ChimneyConfig::Smart(_) => ChimneySystemKind::Smart,
            ChimneyConfig::SmartPlus(_) => ChimneySystemKind::SmartPlus,
            ChimneyConfig::Basic(_) => ChimneySystemKind::Basic,
            ChimneyConfig::Turbo(_) => ChimneySystemKind::Turbo,
            ChimneyConfig::Multi(_) => ChimneySystemKind::Multi,
            ChimneyConfig::TurboS(_) => ChimneySystemKind::TurboS,
            ChimneyConfig::Steel(_) => ChimneySystemKind::Steel,
            ChimneyConfig::DuoSteel(_) => ChimneySystemKind::DuoSteel,
            ChimneyConfig::Duo(_) => ChimneySystemKind::Duo,
        }
    }

    /// Height as entered
    pub fn height(&self) -> &HeightInput {
        match self {
            ChimneyConfig::Insulated(o) | ChimneyConfig::Basic(o) => &o.height,
            ChimneyConfig::Smart(o) | ChimneyConfig::SmartPlus(o) => &o.height,
            ChimneyConfig::Turbo(o) => &o.height,
            ChimneyConfig::Multi(o) => &o.height,
            ChimneyConfig::TurboS(o) => &o.height,
            ChimneyConfig::Steel(o) => &o.height,
            ChimneyConfig::DuoSteel(o) => &o.height,
            ChimneyConfig::Duo(o) => &o.height,
        }
    }

    /// Replace the height
    pub fn set_height(&mut self, height: HeightInput) {
        let slot = match self {
            ChimneyConfig::Insulated(o) | ChimneyConfig::Basic(o) => &mut o.height,
            ChimneyConfig::Smart(o) | ChimneyConfig::SmartPlus(o) => &mut o.height,
            ChimneyConfig::Turbo(o) => &mut o.height,
            ChimneyConfig::Multi(o) => &mut o.height,
            ChimneyConfig::TurboS(o) => &mut o.height,
            ChimneyConfig::Steel(o) => &mut o.height,
            ChimneyConfig::DuoSteel(o) => &mut o.height,
            ChimneyConfig::Duo(o) => &mut o.height,
        };
        *slot = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_boundaries() {
        assert!(HeightInput::Number(3.999).resolve().is_err());
        assert_eq!(HeightInput::Number(4.0).resolve().unwrap(), Meters(4.0));
        assert_eq!(HeightInput::Number(30.0).resolve().unwrap(), Meters(30.0));
        assert!(HeightInput::Number(30.001).resolve().is_err());
    }

    #[test]
    fn test_height_text_with_comma() {
        assert_eq!(HeightInput::from("7,5").resolve().unwrap(), Meters(7.5));
        let err = HeightInput::from("wysoki").resolve().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(HeightInput::Number(f64::NAN).resolve().is_err());
    }

    #[test]
    fn test_height_text_reads_leading_number() {
        assert_eq!(HeightInput::from("6m").resolve().unwrap(), Meters(6.0));
        assert_eq!(HeightInput::from("12,5 m").resolve().unwrap(), Meters(12.5));
        assert!(HeightInput::from("3m").resolve().unwrap_err().is_validation());
    }

    #[test]
    fn test_block_size_table() {
        assert_eq!(FlueDiameter::D14.block_size(), BlockSize::K35);
        assert_eq!(FlueDiameter::D20.block_size(), BlockSize::K40);
        assert_eq!(FlueDiameter::D25.block_size(), BlockSize::K48);
        assert_eq!(FlueDiameter::D30.block_size(), BlockSize::K57);
        assert_eq!(FlueDiameter::D22.connector_group().code(), "22");
        assert_eq!(FlueDiameter::D16.connector_group().code(), "14-16");
    }

    #[test]
    fn test_smart_tables() {
        assert_eq!(SmartDiameter::D16.block_size(), SmartBlockSize::K32);
        assert_eq!(SmartDiameter::D20.block_size(), SmartBlockSize::K36);
        assert_eq!(SmartDiameter::D20.formwork_group(), "18-20");
    }

    #[test]
    fn test_config_json_shape() {
        let json = r#"{"system":"izolowany","h":"6","fi":"18","pustak":"went",
            "wykonczenie":"obmurowka","zakonczenie":"czapa","rurapp":"45"}"#;
        let config: ChimneyConfig = serde_json::from_str(json).unwrap();
        match &config {
            ChimneyConfig::Insulated(o) => {
                assert_eq!(o.diameter, FlueDiameter::D18);
                assert_eq!(o.vent, VentChannel::Single);
                assert_eq!(o.finish, Finish::Masonry);
                assert_eq!(o.termination, Termination::Cap);
                assert_eq!(o.connector, ConnectorAngle::Deg45);
            }
            other => panic!("unexpected config {:?}", other),
        }
        let back = serde_json::to_string(&config).unwrap();
        assert!(back.contains("\"system\":\"izolowany\""));
    }

    #[test]
    fn test_smart_rejects_unsupported_diameter() {
        let json = r#"{"system":"smart","h":"6","fi":"30"}"#;
        assert!(serde_json::from_str::<ChimneyConfig>(json).is_err());
    }

    #[test]
    fn test_reducer_flag() {
        let json = r#"{"system":"stal","h":6,"pustak":"LK2-P","redukcja":"tak"}"#;
        let config: ChimneyConfig = serde_json::from_str(json).unwrap();
        match config {
            ChimneyConfig::Steel(o) => {
                assert!(o.reducer);
                assert_eq!(o.enclosure, SteelEnclosure::Lk2P);
                assert_eq!(o.height, HeightInput::Number(6.0));
            }
            other => panic!("unexpected config {:?}", other),
        }
    }

    #[test]
    fn test_default_for_every_system() {
        for kind in ChimneySystemKind::ALL {
            let config = ChimneyConfig::default_for(*kind);
            assert_eq!(config.kind(), *kind);
            assert_eq!(config.height().resolve().unwrap(), Meters(6.0));
        }
    }

    #[test]
    fn test_parse_code() {
        assert_eq!(ChimneySystemKind::parse_code("system", "SmartPlus").unwrap(), ChimneySystemKind::SmartPlus);
        assert_eq!(SteelEnclosure::parse_code("pustak", "lk3-p").unwrap(), SteelEnclosure::Lk3P);
        assert!(FlueDiameter::parse_code("fi", "19").is_err());
    }

    #[test]
    fn test_unimplemented_systems() {
        let missing: Vec<_> = ChimneySystemKind::ALL.iter().filter(|k| !k.is_implemented()).collect();
        assert_eq!(missing.len(), 4);
    }
}
