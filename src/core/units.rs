pub const WATTS_PER_KILOWATT: u32 = 1_000;
pub(crate) const SQUARE_METRES_PER_SIZE_UNIT: f64 = 100.;

/// Fixed indoor-outdoor temperature difference the estimate is made at, in K
pub const BASE_TEMPERATURE_DIFFERENCE: f64 = 20.;

/// Average air changes per hour assumed for ventilation losses
pub const AIR_CHANGE_RATE: f64 = 0.5;

/// Volumetric heat capacity of air, in Wh/(m³.K)
pub const AIR_VOLUMETRIC_HEAT_CAPACITY: f64 = 0.33;

pub fn watts_to_kilowatts(watts: f64) -> f64 {
    watts / WATTS_PER_KILOWATT as f64
}

pub fn kilowatts_to_watts(kilowatts: f64) -> f64 {
    kilowatts * WATTS_PER_KILOWATT as f64
}
