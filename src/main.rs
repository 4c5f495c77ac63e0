use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bol_consistency::schema::{members, shipment_type};
use bol_consistency::{
    build_archive, classify_with, read_csv_path, report, ClassifierOptions, LoadStatus,
    PartialRoleMapping,
};

/// ETA/ATA consistency analysis of container rows grouped by bill of lading
#[derive(Parser, Debug)]
#[command(name = "bolcheck", version)]
struct Args {
    /// Shipment CSV file
    input: PathBuf,

    /// TOML file with the column mapping (identifier, shipment_type, bol_id, aj, ak)
    #[arg(long, env = "BOLCHECK_MAPPING")]
    mapping: Option<PathBuf>,

    /// Identifier column
    #[arg(long)]
    identifier: Option<String>,

    /// Shipment type column
    #[arg(long)]
    shipment_type: Option<String>,

    /// BOL ID column
    #[arg(long)]
    bol_id: Option<String>,

    /// AJ (ETA Destino) column
    #[arg(long)]
    aj: Option<String>,

    /// AK (ATA Destino) column
    #[arg(long)]
    ak: Option<String>,

    /// Shipment type value that marks a container row
    #[arg(long, default_value = shipment_type::CONTAINER)]
    container_value: String,

    /// Where to write the ZIP archive
    #[arg(short, long, default_value = members::DEFAULT_ARCHIVE_NAME)]
    output: PathBuf,

    /// Print the detected columns and exit
    #[arg(long)]
    list_columns: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    fn overrides(&self) -> PartialRoleMapping {
        PartialRoleMapping {
            identifier: self.identifier.clone(),
            shipment_type: self.shipment_type.clone(),
            bol_id: self.bol_id.clone(),
            field_a: self.aj.clone(),
            field_b: self.ak.clone(),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error processing file: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    info!("Starting bolcheck v{}", env!("CARGO_PKG_VERSION"));

    let table = read_csv_path(&args.input)?;
    let status = LoadStatus::of(&table);
    println!("{}", report::load_status_message(&status));

    if args.list_columns {
        for name in &status.column_names {
            println!("  {name}");
        }
        return Ok(());
    }

    let file_mapping = match &args.mapping {
        Some(path) => PartialRoleMapping::from_toml_file(path)?,
        None => PartialRoleMapping::default(),
    };
    let mapping = file_mapping.merge(args.overrides()).resolve()?;
    let options = ClassifierOptions {
        container_value: args.container_value.clone(),
    };

    let analysis = classify_with(&table, &mapping, &options)?;
    let message = report::outcome_message(&analysis);
    let Some(tables) = analysis.into_classified() else {
        println!("Warning: {message}");
        return Ok(());
    };
    println!("{message}");

    let archive = build_archive(&tables)?;
    std::fs::write(&args.output, &archive)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!(path = %args.output.display(), bytes = archive.len(), "archive written");

    println!(
        "Analysis completed. Archive written to {}.",
        args.output.display()
    );
    println!();
    println!("Summary (preview)");
    println!("{}", report::summary_preview(&tables.summary));
    Ok(())
}
