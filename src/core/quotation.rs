use crate::core::catalog::PackageCatalogEntry;
use crate::core::heat_loss::{EfficiencyRating, HeatLossResult};
use crate::core::units::SQUARE_METRES_PER_SIZE_UNIT;
use crate::errors::ConfigurationError;
use crate::input::{
    ConstructionYearBand, InsulationLevel, PropertyAttributes, PropertyType, WindowsQuality,
};
use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde::{Serialize, Serializer};
use tracing::{debug, instrument, warn};

const MAX_ALTERNATIVE_PACKS: usize = 3;

const DETACHED_COMPLEXITY_FACTOR: f64 = 1.2;
const OLD_CONSTRUCTION_COMPLEXITY_FACTOR: f64 = 1.4;
const RADIATOR_UPGRADE_FACTOR: f64 = 1.3;

pub const INSULATION_ADVICE: &str =
    "Improve wall and loft insulation to maximize heat pump efficiency";
pub const WINDOWS_ADVICE: &str =
    "Upgrade windows to improve insulation for optimal heat pump performance";
pub const EMITTERS_ADVICE: &str =
    "Consider upgrading to larger radiators or underfloor heating for optimal heat pump operation";
pub const GENERAL_ADVICE: [&str; 3] = [
    "Install smart controls to optimize heat pump performance throughout the day",
    "Consider adding an additional hot water cylinder for increased efficiency",
    "Check eligibility for renewable heat incentive payments from the government",
];

/// Fixed cost figures a quotation is built from, all in £.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuotationAssumptions {
    /// Installation cost for a 100m² property of low complexity
    pub base_installation_cost: f64,
    /// Annual cost of heating with gas
    pub average_gas_heating_cost: f64,
    /// Annual cost of electricity to run a heat pump
    pub average_electricity_cost_for_ashp: f64,
}

impl Default for QuotationAssumptions {
    fn default() -> Self {
        Self {
            base_installation_cost: 3500.,
            average_gas_heating_cost: 1200.,
            average_electricity_cost_for_ashp: 800.,
        }
    }
}

/// Time taken for savings to cover the total cost. `Never` when no savings are expected, and
/// orders after every number of years.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub enum PaybackPeriod {
    Years(f64),
    Never,
}

impl PaybackPeriod {
    pub fn from_cost_and_savings(total_cost: f64, annual_savings: f64) -> Self {
        if annual_savings > 0. {
            PaybackPeriod::Years(total_cost / annual_savings)
        } else {
            PaybackPeriod::Never
        }
    }

    pub fn years(&self) -> Option<f64> {
        match self {
            PaybackPeriod::Years(years) => Some(*years),
            PaybackPeriod::Never => None,
        }
    }
}

impl Serialize for PaybackPeriod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PaybackPeriod::Years(years) => serializer.serialize_f64(*years),
            PaybackPeriod::Never => serializer.serialize_str("never"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuotationResult {
    pub recommended_pack: PackageCatalogEntry,
    /// cheapest first
    pub alternative_packs: Vec<PackageCatalogEntry>,
    pub installation_cost: f64,
    pub total_cost: f64,
    pub estimated_annual_savings: f64,
    pub payback_period: PaybackPeriod,
    pub additional_recommendations: Vec<String>,
}

pub fn quote(
    heat_loss: &HeatLossResult,
    catalog: &[PackageCatalogEntry],
    attributes: &PropertyAttributes,
) -> Result<QuotationResult, ConfigurationError> {
    quote_with_assumptions(
        heat_loss,
        catalog,
        attributes,
        &QuotationAssumptions::default(),
    )
}

#[instrument(skip_all)]
pub fn quote_with_assumptions(
    heat_loss: &HeatLossResult,
    catalog: &[PackageCatalogEntry],
    attributes: &PropertyAttributes,
    assumptions: &QuotationAssumptions,
) -> Result<QuotationResult, ConfigurationError> {
    let recommended_pack = select_recommended_pack(heat_loss.total_heat_loss, catalog)?;
    debug!(
        total_heat_loss = heat_loss.total_heat_loss,
        package = %recommended_pack.id,
        "selected recommended package"
    );

    let alternative_packs = catalog
        .iter()
        .filter(|pack| pack.id != recommended_pack.id)
        .sorted_by_key(|pack| OrderedFloat(pack.price))
        .take(MAX_ALTERNATIVE_PACKS)
        .cloned()
        .collect();

    let installation_cost = installation_cost(attributes, assumptions.base_installation_cost);
    let total_cost = recommended_pack.price + installation_cost;

    let base_savings =
        assumptions.average_gas_heating_cost - assumptions.average_electricity_cost_for_ashp;
    let estimated_annual_savings =
        base_savings * savings_multiplier(heat_loss.efficiency_rating);

    Ok(QuotationResult {
        recommended_pack: recommended_pack.clone(),
        alternative_packs,
        installation_cost,
        total_cost,
        estimated_annual_savings,
        payback_period: PaybackPeriod::from_cost_and_savings(total_cost, estimated_annual_savings),
        additional_recommendations: additional_recommendations(attributes),
    })
}

/// Choose the package whose range midpoint is closest to the total heat loss, from among the
/// packages whose range covers it. Ties go to the package listed first.
///
/// When no range covers the total heat loss, the package with the lowest minimum is used if the
/// heat loss is below every minimum in the catalog; otherwise (including when the heat loss falls
/// in a gap between ranges) the package with the highest maximum is used.
pub fn select_recommended_pack(
    total_heat_loss: f64,
    catalog: &[PackageCatalogEntry],
) -> Result<&PackageCatalogEntry, ConfigurationError> {
    if catalog.is_empty() {
        return Err(ConfigurationError::EmptyCatalog);
    }

    let suitable_packs = catalog
        .iter()
        .filter(|pack| pack.covers(total_heat_loss))
        .collect_vec();

    let candidates = if suitable_packs.is_empty() {
        let lowest_minimum = catalog
            .iter()
            .map(|pack| pack.min_heat_loss)
            .fold(f64::INFINITY, f64::min);

        let fallback = if total_heat_loss < lowest_minimum {
            catalog
                .iter()
                .min_by_key(|pack| OrderedFloat(pack.min_heat_loss))
        } else {
            catalog.iter().reduce(|highest, pack| {
                if pack.max_heat_loss > highest.max_heat_loss {
                    pack
                } else {
                    highest
                }
            })
        }
        .ok_or(ConfigurationError::EmptyCatalog)?;

        warn!(
            total_heat_loss,
            package = %fallback.id,
            "no package range covers the heat loss, falling back to nearest end of the catalog"
        );
        vec![fallback]
    } else {
        suitable_packs
    };

    candidates
        .into_iter()
        .min_by_key(|pack| OrderedFloat((total_heat_loss - pack.midpoint()).abs()))
        .ok_or(ConfigurationError::EmptyCatalog)
}

/// Installation cost in £, scaled by floor area and by the work the property is likely to need.
pub fn installation_cost(attributes: &PropertyAttributes, base_installation_cost: f64) -> f64 {
    let size_factor = attributes.floor_area / SQUARE_METRES_PER_SIZE_UNIT;

    let mut complexity_factor = 1.0;
    if matches!(
        attributes.property_type,
        PropertyType::Detached | PropertyType::Bungalow
    ) {
        complexity_factor *= DETACHED_COMPLEXITY_FACTOR;
    }
    if matches!(
        attributes.construction_year_band,
        ConstructionYearBand::Pre1919 | ConstructionYearBand::From1919To1944
    ) {
        complexity_factor *= OLD_CONSTRUCTION_COMPLEXITY_FACTOR;
    }

    // radiators are likely to need upgrading to run at heat pump flow temperatures
    let radiator_upgrade_factor = if has_poor_insulation(attributes)
        || attributes.windows_quality == WindowsQuality::SingleGlazed
    {
        RADIATOR_UPGRADE_FACTOR
    } else {
        1.0
    };

    base_installation_cost * size_factor * complexity_factor * radiator_upgrade_factor
}

pub fn savings_multiplier(efficiency_rating: EfficiencyRating) -> f64 {
    match efficiency_rating {
        EfficiencyRating::A => 1.3,
        EfficiencyRating::B => 1.2,
        EfficiencyRating::C => 1.1,
        EfficiencyRating::D => 1.0,
        EfficiencyRating::E => 0.9,
        EfficiencyRating::F => 0.8,
    }
}

pub fn additional_recommendations(attributes: &PropertyAttributes) -> Vec<String> {
    let mut recommendations = vec![];

    if has_poor_insulation(attributes) {
        recommendations.push(INSULATION_ADVICE.to_string());
    }
    if matches!(
        attributes.windows_quality,
        WindowsQuality::SingleGlazed | WindowsQuality::DoubleGlazedOld
    ) {
        recommendations.push(WINDOWS_ADVICE.to_string());
    }
    if matches!(
        attributes.construction_year_band,
        ConstructionYearBand::Pre1919
            | ConstructionYearBand::From1919To1944
            | ConstructionYearBand::From1945To1964
    ) {
        recommendations.push(EMITTERS_ADVICE.to_string());
    }

    recommendations.extend(GENERAL_ADVICE.iter().map(|advice| advice.to_string()));

    recommendations
}

fn has_poor_insulation(attributes: &PropertyAttributes) -> bool {
    attributes.insulation_level <= InsulationLevel::BelowAverage
}
