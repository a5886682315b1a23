extern crate ashp_quote;

use ashp_quote::core::catalog::{active_catalog, replace_active_catalog, PackageCatalog};
use ashp_quote::output::FileOutput;
use ashp_quote::run_project;
use chrono::Local;
use clap::Parser;
use rayon::prelude::*;
use std::ffi::OsStr;
use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser, Default, Debug)]
#[clap(author, version, about, long_about = None)]
struct QuoteArgs {
    #[arg(
        required = true,
        help = "Paths to property attribute files in .json format"
    )]
    input_files: Vec<String>,
    #[arg(
        long,
        short,
        help = "Path to a package catalog in .json format, replacing the built-in catalog"
    )]
    catalog_file: Option<String>,
    #[clap(long, default_value_t = false, help = "Whether to log out spans")]
    log_spans: bool,
}

fn main() -> anyhow::Result<()> {
    let args = QuoteArgs::parse();

    // set up basic tracing
    let tracing_subscriber = {
        let mut builder = tracing_subscriber::fmt::fmt().with_max_level(tracing::Level::DEBUG);

        if args.log_spans {
            builder = builder.with_span_events(FmtSpan::CLOSE);
        }

        builder.finish()
    };
    tracing::subscriber::set_global_default(tracing_subscriber)
        .expect("setting tracing subscriber failed");

    if let Some(catalog_file) = &args.catalog_file {
        replace_active_catalog(PackageCatalog::from_json(File::open(catalog_file)?)?)?;
    }
    let catalog = active_catalog();
    let generated_on = Local::now().date_naive();

    let failures = args
        .input_files
        .par_iter()
        .map(|input_file| {
            let outcome = quote_for_file(input_file, &catalog, generated_on);
            if let Err(err) = &outcome {
                error!("{input_file}: {err:#}");
            }
            outcome
        })
        .filter(Result::is_err)
        .count();

    if failures > 0 {
        anyhow::bail!(
            "{failures} of {} quotations could not be produced",
            args.input_files.len()
        );
    }

    Ok(())
}

fn quote_for_file(
    input_file: &str,
    catalog: &PackageCatalog,
    generated_on: chrono::NaiveDate,
) -> anyhow::Result<()> {
    let input_file_ext = Path::new(input_file).extension().and_then(OsStr::to_str);
    let input_file_stem = match input_file_ext {
        Some(ext) => &input_file[..(input_file.len() - ext.len() - 1)],
        None => input_file,
    };
    let input_file_stem = PathBuf::from(input_file_stem);

    let mut output_path = PathBuf::new();
    output_path.push(format!("{}__results", input_file_stem.display()));
    fs::create_dir_all(&output_path)?;
    let input_file_name = input_file_stem
        .file_name()
        .and_then(OsStr::to_str)
        .ok_or_else(|| anyhow::anyhow!("Input file {input_file} has no usable file name"))?;
    let file_output = FileOutput::new(output_path, format!("{input_file_name}__{{}}.{{}}"));

    let results = run_project(
        BufReader::new(File::open(Path::new(input_file))?),
        &file_output,
        catalog,
        generated_on,
    )?;

    info!(
        "{input_file}: {:.2} kW heat loss (rating {}), recommending {} at £{:.2}",
        results.heat_loss.total_heat_loss,
        results.heat_loss.efficiency_rating,
        results.quotation.recommended_pack.name,
        results.quotation.total_cost
    );

    Ok(())
}
