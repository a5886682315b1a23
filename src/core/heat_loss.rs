use crate::core::units::{
    kilowatts_to_watts, watts_to_kilowatts, AIR_CHANGE_RATE, AIR_VOLUMETRIC_HEAT_CAPACITY,
    BASE_TEMPERATURE_DIFFERENCE,
};
use crate::errors::ConfigurationError;
use crate::input::{
    ConstructionYearBand, InsulationLevel, LocationRegion, PropertyAttributes, PropertyType,
    WindowsQuality,
};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt::Display;
use std::hash::Hash;
use std::sync::LazyLock;
use strum::{Display as StrumDisplay, EnumIter};
use tracing::{debug, instrument};

// This module provides a coarse steady-state heat loss estimate for a property, split out by
// building component.

// base U-values, in W/(m².K), before insulation and construction age corrections
const WALL_BASE_U_VALUE: f64 = 1.0;
const ROOF_BASE_U_VALUE: f64 = 0.8;
const FLOOR_BASE_U_VALUE: f64 = 0.7;

/// Share of the wall area assumed to be glazed
const WINDOW_TO_WALL_RATIO: f64 = 0.15;

/// A lookup from an input category to a dimensionless multiplier (or, for windows, a U-value).
#[derive(Clone, Debug)]
pub struct CoefficientTable<K> {
    name: &'static str,
    factors: IndexMap<K, f64>,
}

impl<K: Copy + Display + Eq + Hash> CoefficientTable<K> {
    pub fn new(name: &'static str, factors: impl IntoIterator<Item = (K, f64)>) -> Self {
        Self {
            name,
            factors: factors.into_iter().collect(),
        }
    }

    pub fn factor(&self, key: K) -> Result<f64, ConfigurationError> {
        self.factors
            .get(&key)
            .copied()
            .ok_or_else(|| ConfigurationError::MissingCoefficient {
                table: self.name,
                key: key.to_string(),
            })
    }

    #[cfg(test)]
    pub(crate) fn without(mut self, key: K) -> Self {
        self.factors.shift_remove(&key);
        self
    }
}

#[derive(Clone, Debug)]
pub struct CoefficientTables {
    pub insulation: CoefficientTable<InsulationLevel>,
    pub construction: CoefficientTable<ConstructionYearBand>,
    /// Window U-values, in W/(m².K)
    pub windows: CoefficientTable<WindowsQuality>,
    pub property_type: CoefficientTable<PropertyType>,
    pub location: CoefficientTable<LocationRegion>,
}

impl Default for CoefficientTables {
    fn default() -> Self {
        Self {
            insulation: CoefficientTable::new(
                "insulation",
                [
                    (InsulationLevel::Poor, 1.5),
                    (InsulationLevel::BelowAverage, 1.2),
                    (InsulationLevel::Average, 1.0),
                    (InsulationLevel::Good, 0.8),
                    (InsulationLevel::Excellent, 0.6),
                ],
            ),
            construction: CoefficientTable::new(
                "construction",
                [
                    (ConstructionYearBand::Pre1919, 1.4),
                    (ConstructionYearBand::From1919To1944, 1.3),
                    (ConstructionYearBand::From1945To1964, 1.2),
                    (ConstructionYearBand::From1965To1980, 1.1),
                    (ConstructionYearBand::From1981To2000, 0.9),
                    (ConstructionYearBand::Post2000, 0.7),
                ],
            ),
            windows: CoefficientTable::new(
                "windows",
                [
                    (WindowsQuality::SingleGlazed, 5.0),
                    (WindowsQuality::DoubleGlazedOld, 3.0),
                    (WindowsQuality::DoubleGlazedNew, 1.8),
                    (WindowsQuality::TripleGlazed, 1.0),
                ],
            ),
            property_type: CoefficientTable::new(
                "property type",
                [
                    (PropertyType::Detached, 1.3),
                    (PropertyType::SemiDetached, 1.1),
                    (PropertyType::Terraced, 1.0),
                    (PropertyType::Apartment, 0.9),
                    (PropertyType::Bungalow, 1.2),
                ],
            ),
            location: CoefficientTable::new(
                "location",
                [
                    (LocationRegion::North, 1.15),
                    (LocationRegion::Midlands, 1.05),
                    (LocationRegion::South, 1.0),
                    (LocationRegion::Scotland, 1.2),
                    (LocationRegion::Wales, 1.1),
                    (LocationRegion::NorthernIreland, 1.1),
                ],
            ),
        }
    }
}

pub static COEFFICIENT_TABLES: LazyLock<CoefficientTables> =
    LazyLock::new(CoefficientTables::default);

/// Letter grade from A (best) to F (worst).
#[derive(
    Clone, Copy, Debug, EnumIter, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, StrumDisplay,
)]
pub enum EfficiencyRating {
    A,
    B,
    C,
    D,
    E,
    F,
}

/// Upper bounds (exclusive) of each band, in W/m²
const EFFICIENCY_RATING_THRESHOLDS: [(f64, EfficiencyRating); 5] = [
    (40., EfficiencyRating::A),
    (60., EfficiencyRating::B),
    (90., EfficiencyRating::C),
    (120., EfficiencyRating::D),
    (150., EfficiencyRating::E),
];

impl EfficiencyRating {
    pub fn from_heat_loss_per_sqm(heat_loss_per_sqm: f64) -> Self {
        EFFICIENCY_RATING_THRESHOLDS
            .iter()
            .find(|(upper_bound, _)| heat_loss_per_sqm < *upper_bound)
            .map(|(_, rating)| *rating)
            .unwrap_or(EfficiencyRating::F)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HeatLossResult {
    /// in kW
    pub wall_loss: f64,
    /// in kW
    pub roof_loss: f64,
    /// in kW
    pub window_loss: f64,
    /// in kW
    pub floor_loss: f64,
    /// in kW
    pub ventilation_loss: f64,
    /// in kW
    pub total_heat_loss: f64,
    /// in W/m²
    pub heat_loss_per_sqm: f64,
    pub efficiency_rating: EfficiencyRating,
}

pub fn estimate(attributes: &PropertyAttributes) -> Result<HeatLossResult, ConfigurationError> {
    estimate_with_tables(attributes, &COEFFICIENT_TABLES)
}

/// Estimate heat loss using the given coefficient tables.
///
/// Arguments:
/// * `attributes` - validated property attributes
/// * `tables` - coefficient tables; a category missing from a table is an error
#[instrument(skip_all)]
pub fn estimate_with_tables(
    attributes: &PropertyAttributes,
    tables: &CoefficientTables,
) -> Result<HeatLossResult, ConfigurationError> {
    let PropertyAttributes {
        property_type,
        construction_year_band,
        floor_area,
        ceiling_height,
        insulation_level,
        windows_quality,
        location_region,
        ..
    } = *attributes;

    let insulation_factor = tables.insulation.factor(insulation_level)?;
    let construction_factor = tables.construction.factor(construction_year_band)?;
    let window_u_value = tables.windows.factor(windows_quality)?;
    let property_type_factor = tables.property_type.factor(property_type)?;
    let location_factor = tables.location.factor(location_region)?;

    let volume = floor_area * ceiling_height;

    // treat the floor plan as a square to get at the wall area
    let perimeter = 4. * floor_area.sqrt();
    let wall_area = perimeter * ceiling_height;

    let fabric_loss = |area: f64, base_u_value: f64| {
        let u_value = base_u_value * insulation_factor * construction_factor;
        watts_to_kilowatts(area * u_value * BASE_TEMPERATURE_DIFFERENCE)
    };

    let wall_loss = fabric_loss(wall_area, WALL_BASE_U_VALUE);
    let roof_loss = fabric_loss(floor_area, ROOF_BASE_U_VALUE);
    let floor_loss = fabric_loss(floor_area, FLOOR_BASE_U_VALUE);

    let window_area = wall_area * WINDOW_TO_WALL_RATIO;
    let window_loss =
        watts_to_kilowatts(window_area * window_u_value * BASE_TEMPERATURE_DIFFERENCE);

    let ventilation_loss = watts_to_kilowatts(
        volume * AIR_CHANGE_RATE * AIR_VOLUMETRIC_HEAT_CAPACITY * BASE_TEMPERATURE_DIFFERENCE,
    );

    let total_heat_loss = (wall_loss + roof_loss + window_loss + floor_loss + ventilation_loss)
        * property_type_factor
        * location_factor;

    let heat_loss_per_sqm = kilowatts_to_watts(total_heat_loss) / floor_area;
    let efficiency_rating = EfficiencyRating::from_heat_loss_per_sqm(heat_loss_per_sqm);

    debug!(
        total_heat_loss,
        heat_loss_per_sqm,
        %efficiency_rating,
        "estimated heat loss"
    );

    Ok(HeatLossResult {
        wall_loss,
        roof_loss,
        window_loss,
        floor_loss,
        ventilation_loss,
        total_heat_loss,
        heat_loss_per_sqm,
        efficiency_rating,
    })
}
