use crate::errors::ConfigurationError;
use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::{BufReader, Read};
use std::sync::{Arc, LazyLock};
use tracing::info;

/// An air source heat pump package as offered for sale, along with the range of total heat loss
/// (in kW, inclusive at both ends) it is intended for.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct PackageCatalogEntry {
    pub id: String,
    pub name: String,
    pub description: String,
    pub min_heat_loss: f64,
    pub max_heat_loss: f64,
    pub price: f64,
    pub features: Vec<String>,
    /// informational only, not used when choosing a package
    pub ideal_for: Vec<String>,
}

impl PackageCatalogEntry {
    pub(crate) fn covers(&self, total_heat_loss: f64) -> bool {
        (self.min_heat_loss..=self.max_heat_loss).contains(&total_heat_loss)
    }

    pub(crate) fn midpoint(&self) -> f64 {
        (self.min_heat_loss + self.max_heat_loss) / 2.
    }
}

/// A validated, non-empty list of packages. Ranges may overlap or leave gaps.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PackageCatalog(Vec<PackageCatalogEntry>);

impl PackageCatalog {
    pub fn new(entries: Vec<PackageCatalogEntry>) -> Result<Self, ConfigurationError> {
        let catalog = Self(entries);
        catalog.validate()?;

        Ok(catalog)
    }

    pub fn from_json(json: impl Read) -> Result<Self, ConfigurationError> {
        let reader = BufReader::new(json);
        let entries: Vec<PackageCatalogEntry> = serde_json::from_reader(reader)?;

        Self::new(entries)
    }

    pub fn default_catalog() -> Self {
        DEFAULT_CATALOG.clone()
    }

    pub fn entries(&self) -> &[PackageCatalogEntry] {
        &self.0
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.0.is_empty() {
            return Err(ConfigurationError::EmptyCatalog);
        }

        let mut seen_ids = HashSet::with_capacity(self.0.len());
        for entry in &self.0 {
            if !seen_ids.insert(entry.id.as_str()) {
                return Err(ConfigurationError::DuplicatePackageId {
                    id: entry.id.clone(),
                });
            }
            if !(entry.price.is_finite() && entry.price > 0.) {
                return Err(ConfigurationError::InvalidPackagePrice {
                    id: entry.id.clone(),
                    price: entry.price,
                });
            }
            if !(entry.min_heat_loss.is_finite()
                && entry.max_heat_loss.is_finite()
                && entry.min_heat_loss <= entry.max_heat_loss)
            {
                return Err(ConfigurationError::InvalidPackageRange {
                    id: entry.id.clone(),
                    min: entry.min_heat_loss,
                    max: entry.max_heat_loss,
                });
            }
        }

        Ok(())
    }
}

static DEFAULT_CATALOG: LazyLock<PackageCatalog> = LazyLock::new(|| {
    PackageCatalog::from_json(include_str!("default_catalog.json").as_bytes())
        .expect("embedded default catalog should be valid")
});

static ACTIVE_CATALOG: LazyLock<ArcSwap<PackageCatalog>> =
    LazyLock::new(|| ArcSwap::from_pointee(PackageCatalog::default_catalog()));

/// A snapshot of the catalog currently in use by this process. The snapshot does not change even
/// if the active catalog is replaced while it is held.
pub fn active_catalog() -> Arc<PackageCatalog> {
    ACTIVE_CATALOG.load_full()
}

/// Validate and then swap in a new process-wide catalog.
pub fn replace_active_catalog(catalog: PackageCatalog) -> Result<(), ConfigurationError> {
    catalog.validate()?;
    info!(packages = catalog.0.len(), "replacing active package catalog");
    ACTIVE_CATALOG.store(Arc::new(catalog));

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    pub(crate) fn entry(
        id: &str,
        min_heat_loss: f64,
        max_heat_loss: f64,
        price: f64,
    ) -> PackageCatalogEntry {
        PackageCatalogEntry {
            id: id.to_string(),
            name: format!("{id} package"),
            description: format!("Package {id}"),
            min_heat_loss,
            max_heat_loss,
            price,
            features: vec!["Air Source Heat Pump".to_string()],
            ideal_for: vec![],
        }
    }

    #[rstest]
    fn should_load_embedded_default_catalog() {
        let catalog = PackageCatalog::default_catalog();

        assert_eq!(
            catalog
                .entries()
                .iter()
                .map(|entry| entry.id.as_str())
                .collect::<Vec<_>>(),
            vec![
                "basic_ashp",
                "standard_ashp",
                "premium_ashp",
                "elite_ashp",
                "hybrid_ashp"
            ]
        );
        let hybrid = &catalog.entries()[4];
        assert_eq!(hybrid.name, "Hybrid ASHP Package");
        assert_eq!((hybrid.min_heat_loss, hybrid.max_heat_loss), (10., 25.));
        assert_eq!(hybrid.price, 12499.99);
        assert_eq!(hybrid.features.len(), 8);
    }

    #[rstest]
    fn should_treat_range_as_inclusive() {
        let package = entry("standard", 5., 10., 100.);

        assert!(package.covers(5.));
        assert!(package.covers(10.));
        assert!(!package.covers(10.000001));
        assert!(!package.covers(4.999999));
        assert_eq!(package.midpoint(), 7.5);
    }

    #[rstest]
    fn should_reject_empty_catalog() {
        assert!(matches!(
            PackageCatalog::new(vec![]).unwrap_err(),
            ConfigurationError::EmptyCatalog
        ));
    }

    #[rstest]
    fn should_reject_duplicate_ids() {
        let error = PackageCatalog::new(vec![entry("a", 0., 5., 1.), entry("a", 5., 10., 2.)])
            .unwrap_err();

        assert!(matches!(error, ConfigurationError::DuplicatePackageId { id } if id == "a"));
    }

    #[rstest]
    #[case(0.)]
    #[case(-10.)]
    #[case(f64::NAN)]
    fn should_reject_non_positive_prices(#[case] price: f64) {
        assert!(matches!(
            PackageCatalog::new(vec![entry("a", 0., 5., price)]).unwrap_err(),
            ConfigurationError::InvalidPackagePrice { .. }
        ));
    }

    #[rstest]
    fn should_reject_inverted_ranges() {
        assert!(matches!(
            PackageCatalog::new(vec![entry("a", 10., 5., 1.)]).unwrap_err(),
            ConfigurationError::InvalidPackageRange { .. }
        ));
    }

    #[rstest]
    fn should_reject_malformed_json() {
        assert!(matches!(
            PackageCatalog::from_json(r#"[{"id": "a"}]"#.as_bytes()).unwrap_err(),
            ConfigurationError::MalformedCatalog(_)
        ));
    }

    #[rstest]
    fn should_keep_held_snapshot_when_active_catalog_is_replaced() {
        let before = active_catalog();
        let replacement = PackageCatalog::new(vec![entry("only", 0., 100., 1000.)]).unwrap();

        replace_active_catalog(replacement.clone()).unwrap();
        let after = active_catalog();
        replace_active_catalog(PackageCatalog::default_catalog()).unwrap();

        assert_eq!(after.as_ref(), &replacement);
        assert_ne!(before.as_ref(), &replacement);
    }
}
