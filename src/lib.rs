pub mod core;
pub mod errors;
pub mod input;
pub mod output;
pub mod report;

use crate::core::catalog::PackageCatalog;
use crate::core::heat_loss::{estimate, HeatLossResult};
use crate::core::quotation::{quote, QuotationResult};
use crate::errors::{AshpError, OutputError};
use crate::input::{ingest_property_attributes, PropertyAttributes};
use crate::output::Output;
use crate::report::{render_quotation_report, write_heat_loss_breakdown};
use chrono::NaiveDate;
use serde::Serialize;
use std::io::{Read, Write};
use tracing::{debug, instrument};

/// Everything produced for one property.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProjectResults {
    pub property_attributes: PropertyAttributes,
    pub heat_loss: HeatLossResult,
    pub quotation: QuotationResult,
}

/// Read a JSON property-attributes record, estimate its heat loss, quote for it against the
/// given catalog and write out the results.
#[instrument(skip_all)]
pub fn run_project(
    input: impl Read,
    output: impl Output,
    catalog: &PackageCatalog,
    generated_on: NaiveDate,
) -> Result<ProjectResults, AshpError> {
    let property_attributes = ingest_property_attributes(input)?;

    let heat_loss = estimate(&property_attributes)?;
    let quotation = quote(&heat_loss, catalog.entries(), &property_attributes)?;

    let results = ProjectResults {
        property_attributes,
        heat_loss,
        quotation,
    };

    if !output.is_noop() {
        write_output_files(&output, &results, generated_on).map_err(OutputError::new)?;
    }

    Ok(results)
}

fn write_output_files(
    output: &impl Output,
    results: &ProjectResults,
    generated_on: NaiveDate,
) -> anyhow::Result<()> {
    let ProjectResults {
        property_attributes,
        heat_loss,
        quotation,
    } = results;

    debug!("writing out results");
    let mut writer = output.writer_for_location_key("results", "json")?;
    serde_json::to_writer_pretty(&mut writer, results)?;
    writer.flush()?;

    debug!("writing out heat loss breakdown");
    write_heat_loss_breakdown(
        output.writer_for_location_key("heat_loss", "csv")?,
        heat_loss,
    )?;

    debug!("writing out quotation");
    let mut writer = output.writer_for_location_key("quotation", "txt")?;
    writer.write_all(
        render_quotation_report(heat_loss, quotation, property_attributes, generated_on).as_bytes(),
    )?;
    writer.flush()?;

    Ok(())
}
