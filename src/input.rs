use crate::errors::ValidationError;
use serde::{Deserialize, Serialize};
use serde_valid::Validate;
use std::io::{BufReader, Read};
use strum::{Display, EnumIter};

/// Reads a JSON property-attributes record and checks it against its declared bounds.
pub fn ingest_property_attributes(json: impl Read) -> Result<PropertyAttributes, ValidationError> {
    let reader = BufReader::new(json);

    let attributes: PropertyAttributes = serde_json::from_reader(reader)?;
    attributes.ensure_valid()?;

    Ok(attributes)
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct PropertyAttributes {
    pub property_type: PropertyType,
    #[serde(rename = "construction_year")]
    pub construction_year_band: ConstructionYearBand,
    /// in m²
    #[validate(minimum = 10.)]
    #[validate(maximum = 1000.)]
    pub floor_area: f64,
    /// in m
    #[validate(minimum = 2.)]
    #[validate(maximum = 5.)]
    pub ceiling_height: f64,
    pub insulation_level: InsulationLevel,
    pub windows_quality: WindowsQuality,
    // only carried through to the report
    #[validate(minimum = 1)]
    #[validate(maximum = 10)]
    pub num_bedrooms: u32,
    #[serde(rename = "location")]
    pub location_region: LocationRegion,
}

impl PropertyAttributes {
    pub fn ensure_valid(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("floor_area", self.floor_area),
            ("ceiling_height", self.ceiling_height),
        ] {
            if !value.is_finite() {
                return Err(ValidationError::NotFinite { field, value });
            }
        }

        self.validate()
            .map_err(|errors| ValidationError::OutOfBounds(errors.to_string()))
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Display, EnumIter, Eq, Hash, PartialEq, Serialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub enum PropertyType {
    #[serde(rename = "Detached House")]
    #[strum(serialize = "Detached House")]
    Detached,
    #[serde(rename = "Semi-Detached House")]
    #[strum(serialize = "Semi-Detached House")]
    SemiDetached,
    #[serde(rename = "Terraced House")]
    #[strum(serialize = "Terraced House")]
    Terraced,
    #[serde(rename = "Apartment/Flat")]
    #[strum(serialize = "Apartment/Flat")]
    Apartment,
    Bungalow,
}

#[derive(Clone, Copy, Debug, Deserialize, Display, EnumIter, Eq, Hash, PartialEq, Serialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub enum ConstructionYearBand {
    #[serde(rename = "Pre-1919")]
    #[strum(serialize = "Pre-1919")]
    Pre1919,
    #[serde(rename = "1919-1944")]
    #[strum(serialize = "1919-1944")]
    From1919To1944,
    #[serde(rename = "1945-1964")]
    #[strum(serialize = "1945-1964")]
    From1945To1964,
    #[serde(rename = "1965-1980")]
    #[strum(serialize = "1965-1980")]
    From1965To1980,
    #[serde(rename = "1981-2000")]
    #[strum(serialize = "1981-2000")]
    From1981To2000,
    #[serde(rename = "Post-2000")]
    #[strum(serialize = "Post-2000")]
    Post2000,
}

/// Ordered from worst to best.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    EnumIter,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub enum InsulationLevel {
    Poor,
    #[serde(rename = "Below Average")]
    #[strum(serialize = "Below Average")]
    BelowAverage,
    Average,
    Good,
    Excellent,
}

#[derive(Clone, Copy, Debug, Deserialize, Display, EnumIter, Eq, Hash, PartialEq, Serialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub enum WindowsQuality {
    #[serde(rename = "Single Glazed")]
    #[strum(serialize = "Single Glazed")]
    SingleGlazed,
    #[serde(rename = "Double Glazed (Old)")]
    #[strum(serialize = "Double Glazed (Old)")]
    DoubleGlazedOld,
    #[serde(rename = "Double Glazed (New)")]
    #[strum(serialize = "Double Glazed (New)")]
    DoubleGlazedNew,
    #[serde(rename = "Triple Glazed")]
    #[strum(serialize = "Triple Glazed")]
    TripleGlazed,
}

#[derive(Clone, Copy, Debug, Deserialize, Display, EnumIter, Eq, Hash, PartialEq, Serialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub enum LocationRegion {
    North,
    Midlands,
    South,
    Scotland,
    Wales,
    #[serde(rename = "Northern Ireland")]
    #[strum(serialize = "Northern Ireland")]
    NorthernIreland,
}
