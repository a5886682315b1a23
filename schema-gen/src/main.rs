use ashp_quote::core::catalog::PackageCatalogEntry;
use ashp_quote::input::PropertyAttributes;
use schemars::schema_for;

/// Prints the JSON schema for property attributes, or for a package catalog when run with
/// `catalog` as its argument.
fn main() {
    let schema = match std::env::args().nth(1).as_deref() {
        Some("catalog") => schema_for!(Vec<PackageCatalogEntry>),
        _ => schema_for!(PropertyAttributes),
    };
    println!("{}", serde_json::to_string_pretty(&schema).unwrap());
}
