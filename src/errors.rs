use thiserror::Error;

#[derive(Debug, Error)]
pub enum AshpError {
    #[error("Request was considered invalid due to error: {0}")]
    InvalidRequest(#[from] ValidationError),
    #[error("Error identified during heat loss or quotation calculation: {0}")]
    FailureInCalculation(#[from] ConfigurationError),
    #[error("Error while writing out results: {0}")]
    ErrorInOutput(#[from] OutputError),
}

/// A property-attributes record that could not be accepted at the boundary.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Property attributes could not be read: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Property attributes were out of bounds: {0}")]
    OutOfBounds(String),
    #[error("Field '{field}' must be a finite number but was {value}")]
    NotFinite { field: &'static str, value: f64 },
}

/// Reference data (coefficient tables or the package catalog) is missing something a
/// calculation needs. These are never defaulted over.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Coefficient table '{table}' has no entry for '{key}'")]
    MissingCoefficient { table: &'static str, key: String },
    #[error("The package catalog is empty")]
    EmptyCatalog,
    #[error("The package catalog could not be read: {0}")]
    MalformedCatalog(#[from] serde_json::Error),
    #[error("Package id '{id}' appears more than once in the catalog")]
    DuplicatePackageId { id: String },
    #[error("Package '{id}' has a price of {price}, which is not a positive amount")]
    InvalidPackagePrice { id: String, price: f64 },
    #[error("Package '{id}' has an invalid heat loss range of {min} to {max} kW")]
    InvalidPackageRange { id: String, min: f64, max: f64 },
}

#[derive(Debug, Error)]
#[error(transparent)]
pub struct OutputError {
    error: anyhow::Error,
}

impl OutputError {
    pub(crate) fn new(error: anyhow::Error) -> Self {
        Self { error }
    }
}
