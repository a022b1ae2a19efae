//! Unit converter — presentation-only weight formatting.
//!
//! Stored weights are always whole grams. Conversion happens on the way out
//! and never feeds back into stored data.

use serde::Serialize;

use crate::error::PackError;
use crate::model::Unit;
use crate::services::summary::Summary;

/// Grams per international avoirdupois ounce.
pub const GRAMS_PER_OUNCE: f64 = 28.349523125;

/// Convert grams to ounces rounded to one decimal place, half away from zero.
#[must_use]
pub fn grams_to_ounces(weight_grams: i64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let ounces = weight_grams as f64 / GRAMS_PER_OUNCE;
    (ounces * 10.0).round() / 10.0
}

/// Render a gram weight in `unit` with its suffix: `"800 g"`, `"1.0 oz"`.
#[must_use]
pub fn to_display(weight_grams: i64, unit: Unit) -> String {
    match unit {
        Unit::Gram => format!("{weight_grams} {}", unit.as_str()),
        Unit::Ounce => format!("{:.1} {}", grams_to_ounces(weight_grams), unit.as_str()),
    }
}

/// Parse a caller-supplied unit name.
///
/// # Errors
///
/// Returns `PackError::Validation` for anything but gram or ounce spellings.
pub fn parse_unit(raw: &str) -> Result<Unit, PackError> {
    Unit::parse(raw).ok_or_else(|| PackError::validation(format!("unknown unit: {raw}")))
}

/// A `Summary` rendered in a list's display unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplaySummary {
    pub base_weight: String,
    pub consumable_weight: String,
    pub worn_weight: String,
    pub total_pack: String,
}

#[must_use]
pub fn display_summary(summary: &Summary, unit: Unit) -> DisplaySummary {
    DisplaySummary {
        base_weight: to_display(summary.base_weight_g, unit),
        consumable_weight: to_display(summary.consumable_weight_g, unit),
        worn_weight: to_display(summary.worn_weight_g, unit),
        total_pack: to_display(summary.total_pack_g, unit),
    }
}

#[cfg(test)]
#[path = "units_test.rs"]
mod tests;
