use crate::core::catalog::PackageCatalogEntry;
use crate::core::heat_loss::HeatLossResult;
use crate::core::quotation::{PaybackPeriod, QuotationResult};
use crate::input::PropertyAttributes;
use chrono::NaiveDate;
use csv::WriterBuilder;
use std::io::Write;

const SECTION_RULE_WIDTH: usize = 50;

const DISCLAIMER: &str = "This is an estimated quotation based on the information provided. A detailed site survey would be required for a final quotation. Prices are inclusive of VAT. The estimated savings are based on average energy usage and may vary depending on your specific usage patterns and energy prices.";

/// Render the plain-text quotation handed to the homeowner. Figures are rounded here and only
/// here.
pub fn render_quotation_report(
    heat_loss: &HeatLossResult,
    quotation: &QuotationResult,
    attributes: &PropertyAttributes,
    generated_on: NaiveDate,
) -> String {
    let mut lines: Vec<String> = vec![];
    let rule = "-".repeat(SECTION_RULE_WIDTH);
    let section = |lines: &mut Vec<String>, title: &str| {
        lines.push(title.to_string());
        lines.push(rule.clone());
    };

    lines.push("AIR SOURCE HEAT PUMP QUOTATION".to_string());
    lines.push(format!("Generated on {}", generated_on.format("%Y-%m-%d")));
    lines.push("\n".to_string());

    section(&mut lines, "PROPERTY INFORMATION");
    lines.push(format!("Property Type: {}", attributes.property_type));
    lines.push(format!("Construction Year: {}", attributes.construction_year_band));
    lines.push(format!("Floor Area: {} m²", attributes.floor_area));
    lines.push(format!("Insulation Level: {}", attributes.insulation_level));
    lines.push(format!("Windows Quality: {}", attributes.windows_quality));
    lines.push("\n".to_string());

    section(&mut lines, "HEAT LOSS ASSESSMENT");
    lines.push(format!("Total Heat Loss: {:.2} kW", heat_loss.total_heat_loss));
    lines.push(format!("Heat Loss per m²: {:.2} W/m²", heat_loss.heat_loss_per_sqm));
    lines.push(format!("Energy Efficiency Rating: {}", heat_loss.efficiency_rating));
    lines.push("\n".to_string());

    section(&mut lines, "HEAT LOSS BREAKDOWN");
    for (component, loss) in [
        ("Wall", heat_loss.wall_loss),
        ("Roof", heat_loss.roof_loss),
        ("Window", heat_loss.window_loss),
        ("Floor", heat_loss.floor_loss),
        ("Ventilation", heat_loss.ventilation_loss),
    ] {
        lines.push(format!("{component} Heat Loss: {loss:.2} kW"));
    }
    lines.push("\n".to_string());

    let pack = &quotation.recommended_pack;
    section(&mut lines, "RECOMMENDED AIR SOURCE HEAT PUMP SOLUTION");
    lines.push(format!("Package: {}", pack.name));
    lines.push(format!("Description: {}", pack.description));
    lines.push("\nFeatures:".to_string());
    lines.extend(pack.features.iter().map(|feature| format!("- {feature}")));

    section(&mut lines, "\nPRICING DETAILS");
    lines.push(format!("Product Price: £{:.2}", pack.price));
    lines.push(format!("Installation Cost: £{:.2}", quotation.installation_cost));
    lines.push(format!("Total Cost: £{:.2}", quotation.total_cost));
    lines.push("\n".to_string());

    section(&mut lines, "POTENTIAL SAVINGS");
    lines.push(format!(
        "Estimated Annual Savings: £{:.2}",
        quotation.estimated_annual_savings
    ));
    lines.push(format!(
        "Payback Period: {}",
        describe_payback(quotation.payback_period)
    ));
    lines.push("\n".to_string());

    section(&mut lines, "PACKAGE COMPARISON");
    lines.push(format!(
        "Installation Cost (all packages): £{:.2}",
        quotation.installation_cost
    ));
    lines.push(compare_package(pack, pack, quotation));
    lines.extend(
        quotation
            .alternative_packs
            .iter()
            .map(|alternative| compare_package(alternative, pack, quotation)),
    );
    lines.push("\n".to_string());

    section(&mut lines, "ADDITIONAL RECOMMENDATIONS");
    lines.extend(
        quotation
            .additional_recommendations
            .iter()
            .map(|recommendation| format!("- {recommendation}")),
    );

    section(&mut lines, "\nDISCLAIMER");
    lines.push(DISCLAIMER.to_string());

    lines.join("\n")
}

fn describe_payback(payback_period: PaybackPeriod) -> String {
    match payback_period {
        PaybackPeriod::Years(years) => format!("{years:.1} years"),
        PaybackPeriod::Never => "Not applicable (no estimated savings)".to_string(),
    }
}

/// One comparison line for a package, costed with the same installation and savings figures as
/// the recommended package. Features are counted against the recommended package's list.
fn compare_package(
    pack: &PackageCatalogEntry,
    recommended_pack: &PackageCatalogEntry,
    quotation: &QuotationResult,
) -> String {
    let total_cost = pack.price + quotation.installation_cost;
    let payback_period =
        PaybackPeriod::from_cost_and_savings(total_cost, quotation.estimated_annual_savings);
    let shared_features = recommended_pack
        .features
        .iter()
        .filter(|feature| pack.features.contains(*feature))
        .count();
    let marker = if pack.id == recommended_pack.id {
        " (recommended)"
    } else {
        ""
    };

    format!(
        "- {}{marker}: Product Price: £{:.2}, Total Cost: £{total_cost:.2}, Payback Period: {}, {shared_features} of {} recommended features",
        pack.name,
        pack.price,
        describe_payback(payback_period),
        recommended_pack.features.len()
    )
}

/// Write the heat loss breakdown as CSV: a heading row, a units row, then the values.
pub fn write_heat_loss_breakdown(
    writer: impl Write,
    heat_loss: &HeatLossResult,
) -> anyhow::Result<()> {
    let mut writer = WriterBuilder::new().from_writer(writer);

    writer.write_record([
        "Wall heat loss",
        "Roof heat loss",
        "Window heat loss",
        "Floor heat loss",
        "Ventilation heat loss",
        "Total heat loss",
        "Heat loss per m2",
        "Efficiency rating",
    ])?;
    writer.write_record([
        "[kW]", "[kW]", "[kW]", "[kW]", "[kW]", "[kW]", "[W/m2]", "[rating]",
    ])?;
    writer.write_record([
        heat_loss.wall_loss.to_string(),
        heat_loss.roof_loss.to_string(),
        heat_loss.window_loss.to_string(),
        heat_loss.floor_loss.to_string(),
        heat_loss.ventilation_loss.to_string(),
        heat_loss.total_heat_loss.to_string(),
        heat_loss.heat_loss_per_sqm.to_string(),
        heat_loss.efficiency_rating.to_string(),
    ])?;

    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::PackageCatalog;
    use crate::core::heat_loss::estimate;
    use crate::core::quotation::quote;
    use crate::input::{
        ConstructionYearBand, InsulationLevel, LocationRegion, PropertyType, WindowsQuality,
    };
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn attributes() -> PropertyAttributes {
        PropertyAttributes {
            property_type: PropertyType::SemiDetached,
            construction_year_band: ConstructionYearBand::From1965To1980,
            floor_area: 100.,
            ceiling_height: 2.4,
            insulation_level: InsulationLevel::Average,
            windows_quality: WindowsQuality::DoubleGlazedOld,
            num_bedrooms: 3,
            location_region: LocationRegion::South,
        }
    }

    #[fixture]
    fn results(attributes: PropertyAttributes) -> (HeatLossResult, QuotationResult) {
        let heat_loss = estimate(&attributes).unwrap();
        let quotation = quote(
            &heat_loss,
            PackageCatalog::default_catalog().entries(),
            &attributes,
        )
        .unwrap();

        (heat_loss, quotation)
    }

    #[rstest]
    fn should_render_rounded_figures_and_labels(
        attributes: PropertyAttributes,
        results: (HeatLossResult, QuotationResult),
    ) {
        let (heat_loss, quotation) = results;

        let report = render_quotation_report(
            &heat_loss,
            &quotation,
            &attributes,
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
        );

        for expected in [
            "AIR SOURCE HEAT PUMP QUOTATION\nGenerated on 2024-03-09",
            "Property Type: Semi-Detached House",
            "Construction Year: 1965-1980",
            "Floor Area: 100 m²",
            "Windows Quality: Double Glazed (Old)",
            "Total Heat Loss: 7.77 kW",
            "Heat Loss per m²: 77.75 W/m²",
            "Energy Efficiency Rating: C",
            "Wall Heat Loss: 2.11 kW",
            "Ventilation Heat Loss: 0.79 kW",
            "Package: Multizone ASHP Package",
            "- Dual zone heating control",
            "Product Price: £8499.99",
            "Installation Cost: £3500.00",
            "Total Cost: £11999.99",
            "Estimated Annual Savings: £440.00",
            "Payback Period: 27.3 years",
            "- Upgrade windows to improve insulation for optimal heat pump performance",
        ] {
            assert!(report.contains(expected), "report did not contain {expected:?}");
        }
        assert!(report.contains(&format!(
            "DISCLAIMER\n{}\nThis is an estimated quotation",
            "-".repeat(50)
        )));
    }

    #[rstest]
    fn should_render_payback_that_never_happens(
        attributes: PropertyAttributes,
        results: (HeatLossResult, QuotationResult),
    ) {
        let (heat_loss, mut quotation) = results;
        quotation.payback_period = PaybackPeriod::Never;

        let report = render_quotation_report(
            &heat_loss,
            &quotation,
            &attributes,
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
        );

        assert!(report.contains("Payback Period: Not applicable (no estimated savings)"));
    }

    #[rstest]
    fn should_compare_recommended_package_with_alternatives(
        attributes: PropertyAttributes,
        results: (HeatLossResult, QuotationResult),
    ) {
        let (heat_loss, quotation) = results;

        let report = render_quotation_report(
            &heat_loss,
            &quotation,
            &attributes,
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
        );

        let comparison = report
            .lines()
            .skip_while(|line| *line != "PACKAGE COMPARISON")
            .skip(2)
            .take_while(|line| !line.is_empty())
            .collect::<Vec<_>>();
        assert_eq!(
            comparison,
            vec![
                "Installation Cost (all packages): £3500.00",
                "- Multizone ASHP Package (recommended): Product Price: £8499.99, Total Cost: £11999.99, Payback Period: 27.3 years, 7 of 7 recommended features",
                "- Bufferless ASHP Package: Product Price: £6999.99, Total Cost: £10499.99, Payback Period: 23.9 years, 0 of 7 recommended features",
                "- Buffer Driven ASHP Package: Product Price: £10999.99, Total Cost: £14499.99, Payback Period: 33.0 years, 0 of 7 recommended features",
                "- Hybrid ASHP Package: Product Price: £12499.99, Total Cost: £15999.99, Payback Period: 36.4 years, 1 of 7 recommended features",
            ]
        );
    }

    #[rstest]
    fn should_compare_packages_that_never_pay_back(
        attributes: PropertyAttributes,
        results: (HeatLossResult, QuotationResult),
    ) {
        let (heat_loss, mut quotation) = results;
        quotation.estimated_annual_savings = 0.;
        quotation.payback_period = PaybackPeriod::Never;

        let report = render_quotation_report(
            &heat_loss,
            &quotation,
            &attributes,
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
        );

        assert!(report.contains(
            "- Bufferless ASHP Package: Product Price: £6999.99, Total Cost: £10499.99, Payback Period: Not applicable (no estimated savings), 0 of 7 recommended features"
        ));
    }

    #[rstest]
    fn should_write_breakdown_csv(results: (HeatLossResult, QuotationResult)) {
        let (heat_loss, _) = results;
        let mut buffer = vec![];

        write_heat_loss_breakdown(&mut buffer, &heat_loss).unwrap();

        let csv = String::from_utf8(buffer).unwrap();
        let lines = csv.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Wall heat loss,Roof heat loss"));
        assert_eq!(lines[1], "[kW],[kW],[kW],[kW],[kW],[kW],[W/m2],[rating]");
        assert!(lines[2].ends_with(",C"));
    }
}
