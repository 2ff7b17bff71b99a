use clap::Parser;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

use punch_sheet_reader::DefinitionTable;
use punch_sheet_reader::marksheet::config::DEFAULT_COLUMNS;
use punch_sheet_reader::sheet_gen::{SheetLayout, encode_text, render_sheet};

#[derive(Parser, Debug)]
#[command(
    name = "sheet_gen",
    about = "Render a punch-card mark sheet for a line of text",
    version
)]
struct Cli {
    /// Tab-separated definition file mapping punch rows to characters
    definition: PathBuf,

    /// Text to punch, one character per column
    text: String,

    /// Output image path
    #[arg(short = 'o', long = "out", default_value = "sheet.png")]
    out: PathBuf,

    /// Number of columns per mark sheet
    #[arg(short = 'c', long = "column", default_value_t = DEFAULT_COLUMNS)]
    column: usize,

    /// Height of each punch row in pixels
    #[arg(long, default_value_t = SheetLayout::default().row_height)]
    row_height: u32,

    /// Width of each column in pixels
    #[arg(long, default_value_t = SheetLayout::default().column_width)]
    column_width: u32,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let table = DefinitionTable::load(&cli.definition)
        .map_err(|e| format!("{}: {e}", cli.definition.display()))?;
    let patterns = encode_text(&table, &cli.text)?;

    let layout = SheetLayout {
        columns: cli.column,
        row_height: cli.row_height,
        column_width: cli.column_width,
        ..SheetLayout::default()
    };
    let sheet = render_sheet(&layout, &patterns)?;

    if let Some(parent) = cli.out.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    sheet.save(&cli.out)?;
    log::info!(
        "wrote {} ({}x{}, {} columns)",
        cli.out.display(),
        sheet.width(),
        sheet.height(),
        layout.columns
    );

    Ok(())
}
