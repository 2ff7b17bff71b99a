use clap::Parser;
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;

use punch_sheet_reader::marksheet::annotate::annotate_sheet;
use punch_sheet_reader::marksheet::config::{DARK_THRESHOLD, DEFAULT_COLUMNS};
use punch_sheet_reader::{DefinitionTable, SheetConfig, SheetReading, read_sheet};

#[derive(Parser, Debug)]
#[command(
    name = "punch_reader",
    about = "Decode a scanned punch-card mark sheet into a line of text",
    version
)]
struct Cli {
    /// Tab-separated definition file mapping punch rows to characters
    definition: PathBuf,

    /// Scanned sheet image
    image: PathBuf,

    /// Number of columns per mark sheet
    #[arg(short = 'c', long = "column", default_value_t = DEFAULT_COLUMNS)]
    column: usize,

    /// Highest channel value still counted as ink
    #[arg(long, default_value_t = DARK_THRESHOLD)]
    threshold: u8,

    /// Print a JSON report with the detected geometry instead of the bare line
    #[arg(long)]
    json: bool,

    /// Write an overlay of the detected grid to this PNG
    #[arg(long)]
    annotate: Option<PathBuf>,
}

#[derive(Serialize)]
struct Report<'a> {
    line: &'a str,
    #[serde(flatten)]
    reading: &'a SheetReading,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let table = DefinitionTable::load(&cli.definition)
        .map_err(|e| format!("{}: {e}", cli.definition.display()))?;
    if table.is_empty() {
        log::warn!("{} holds no definitions", cli.definition.display());
    }
    log::debug!("loaded {} definitions", table.len());

    let rgb = image::open(&cli.image)
        .map_err(|e| format!("Failed to open {}: {e}", cli.image.display()))?
        .to_rgb8();

    let config = SheetConfig {
        dark_threshold: cli.threshold,
        columns: cli.column,
    };
    let reading = read_sheet(&rgb, &config)?;

    if let Some(out) = &cli.annotate {
        annotate_sheet(&rgb, &reading)
            .save(out)
            .map_err(|e| format!("Failed to write overlay {}: {e}", out.display()))?;
    }

    let line = reading.decode(&table)?;
    if cli.json {
        let report = Report {
            line: &line,
            reading: &reading,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{line}");
    }

    Ok(())
}
