//! Unit conversion and unit preferences.
//!
//! Every conversion pair carries its own hand-authored factor rather than
//! going through a base unit, so `a -> b -> a` is only approximately the
//! identity. Conversions the tables do not know about return the input value
//! unchanged.

use crate::errors::{Error, Result};
use crate::storage::{Loaded, Storage, UNITS_KEY, load_json, save_json};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// Family of units a quantity is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    /// kg, g, lb, oz
    Weight,
    /// L, mL, gal, fl oz
    Volume,
    /// m, cm, ft, in
    Length,
    /// Discrete counts; there is nothing to convert between
    Count,
}

impl UnitType {
    /// Lowercase name, as stored.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weight => "weight",
            Self::Volume => "volume",
            Self::Length => "length",
            Self::Count => "count",
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "weight" => Ok(Self::Weight),
            "volume" => Ok(Self::Volume),
            "length" => Ok(Self::Length),
            "count" => Ok(Self::Count),
            other => Err(Error::Config {
                message: format!("Unknown unit type '{other}'"),
            }),
        }
    }
}

type FactorTable = &'static [(&'static str, &'static [(&'static str, f64)])];

const WEIGHT_FACTORS: FactorTable = &[
    ("kg", &[("g", 1000.0), ("lb", 2.20462), ("oz", 35.274)]),
    ("g", &[("kg", 0.001), ("lb", 0.00220462), ("oz", 0.035274)]),
    ("lb", &[("kg", 0.453592), ("g", 453.592), ("oz", 16.0)]),
    ("oz", &[("kg", 0.0283495), ("g", 28.3495), ("lb", 0.0625)]),
];

const VOLUME_FACTORS: FactorTable = &[
    ("L", &[("mL", 1000.0), ("gal", 0.264172), ("fl oz", 33.814)]),
    ("mL", &[("L", 0.001), ("gal", 0.000264172), ("fl oz", 0.033814)]),
    ("gal", &[("L", 3.78541), ("mL", 3785.41), ("fl oz", 128.0)]),
    ("fl oz", &[("L", 0.0295735), ("mL", 29.5735), ("gal", 0.0078125)]),
];

const LENGTH_FACTORS: FactorTable = &[
    ("m", &[("cm", 100.0), ("ft", 3.28084), ("in", 39.3701)]),
    ("cm", &[("m", 0.01), ("ft", 0.0328084), ("in", 0.393701)]),
    ("ft", &[("m", 0.3048), ("cm", 30.48), ("in", 12.0)]),
    ("in", &[("m", 0.0254), ("cm", 2.54), ("ft", 0.083_333_3)]),
];

const COUNT_UNITS: &[&str] = &["each", "pack", "case", "dozen"];

const fn factor_table(unit_type: UnitType) -> Option<FactorTable> {
    match unit_type {
        UnitType::Weight => Some(WEIGHT_FACTORS),
        UnitType::Volume => Some(VOLUME_FACTORS),
        UnitType::Length => Some(LENGTH_FACTORS),
        UnitType::Count => None,
    }
}

/// Looks up the authored factor for `from -> to`.
#[must_use]
pub fn conversion_factor(from_unit: &str, to_unit: &str, unit_type: UnitType) -> Option<f64> {
    factor_table(unit_type)?
        .iter()
        .find(|(unit, _)| *unit == from_unit)?
        .1
        .iter()
        .find(|(unit, _)| *unit == to_unit)
        .map(|(_, factor)| *factor)
}

/// Converts `value` between two units of the same family.
///
/// Same-unit conversions return `value` as is. Unknown units, or a family
/// without a table, also return `value` unchanged.
#[must_use]
pub fn convert_unit(value: f64, from_unit: &str, to_unit: &str, unit_type: UnitType) -> f64 {
    if from_unit == to_unit {
        return value;
    }

    conversion_factor(from_unit, to_unit, unit_type).map_or(value, |factor| value * factor)
}

/// Units offered for a family, in display order.
#[must_use]
pub fn units_for(unit_type: UnitType) -> Vec<&'static str> {
    factor_table(unit_type).map_or_else(
        || COUNT_UNITS.to_vec(),
        |table| table.iter().map(|(unit, _)| *unit).collect(),
    )
}

/// Default unit picked for each family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitPreferences {
    /// Preferred weight unit
    pub weight: String,
    /// Preferred volume unit
    pub volume: String,
    /// Preferred length unit
    pub length: String,
    /// Preferred count unit
    pub count: String,
}

impl Default for UnitPreferences {
    fn default() -> Self {
        Self {
            weight: "kg".to_string(),
            volume: "L".to_string(),
            length: "m".to_string(),
            count: "each".to_string(),
        }
    }
}

impl UnitPreferences {
    /// Preferred unit for `unit_type`.
    #[must_use]
    pub fn unit_for(&self, unit_type: UnitType) -> &str {
        match unit_type {
            UnitType::Weight => &self.weight,
            UnitType::Volume => &self.volume,
            UnitType::Length => &self.length,
            UnitType::Count => &self.count,
        }
    }

    /// Converts `value` from `from_unit` into the preferred unit of its family.
    #[must_use]
    pub fn to_preferred(&self, value: f64, from_unit: &str, unit_type: UnitType) -> f64 {
        convert_unit(value, from_unit, self.unit_for(unit_type), unit_type)
    }
}

/// Loads unit preferences, falling back to kg / L / m / each.
pub async fn get_unit_preferences(storage: &dyn Storage) -> Loaded<UnitPreferences> {
    load_json(storage, UNITS_KEY).await
}

/// Persists unit preferences.
pub async fn save_unit_preferences(
    storage: &dyn Storage,
    preferences: &UnitPreferences,
) -> Result<()> {
    save_json(storage, UNITS_KEY, preferences).await?;
    info!("Saved unit preferences: {:?}", preferences);
    Ok(())
}
