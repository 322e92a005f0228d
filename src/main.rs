// ShipSearch - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading (CLI path or platform default)
// 3. Logging initialisation (debug mode support)
// 4. One search interaction: load, query, print a page, optionally export

use shipsearch::app::pipeline::QueryRequest;
use shipsearch::app::session::Session;
use shipsearch::core::date;
use shipsearch::core::query::ColumnSelector;
use shipsearch::platform::config::{self, PlatformPaths};
use shipsearch::ui::text_table;
use shipsearch::util::{self, error::ShipSearchError};

use chrono::NaiveDate;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// ShipSearch - search the import shipment database.
///
/// Loads a spreadsheet of customs import records, filters it by keyword or
/// submission date, prints one page of results and can export the full
/// result set.
#[derive(Parser, Debug)]
#[command(name = "shipsearch", version, about)]
struct Cli {
    /// Dataset file (.xlsx, .xls or .csv). Defaults to [data] file in config.toml.
    file: Option<PathBuf>,

    /// Column to search: a column name, "Semua Kolom" for every column, or
    /// "Pilih Kolom" for none.
    #[arg(short = 'c', long = "column")]
    column: Option<String>,

    /// Keyword to look for in the selected column.
    #[arg(short = 'k', long = "keyword", default_value = "")]
    keyword: String,

    /// First submission date to include (with --column "TANGGAL PENGAJUAN").
    #[arg(short = 's', long = "start", value_parser = parse_cli_date)]
    start: Option<NaiveDate>,

    /// Last submission date to include (with --column "TANGGAL PENGAJUAN").
    #[arg(short = 'e', long = "end", value_parser = parse_cli_date)]
    end: Option<NaiveDate>,

    /// Page to show (1-based).
    #[arg(short = 'n', long = "page", default_value_t = 1)]
    page: usize,

    /// Export the result set. The extension picks the format (.xlsx, .csv,
    /// .json); defaults to [export] file in config.toml.
    #[arg(short = 'x', long = "export", num_args = 0..=1)]
    export: Option<Option<PathBuf>>,

    /// List searchable columns and exit.
    #[arg(short = 'l', long = "list-columns")]
    list_columns: bool,

    /// Use this config file instead of the platform default.
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn parse_cli_date(value: &str) -> Result<NaiveDate, String> {
    date::parse_date(value).ok_or_else(|| format!("'{value}' is not a recognised date"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PlatformPaths::resolve().config_file());
    let (app_config, config_warnings) = config::load_config(&config_path);

    // Initialise logging subsystem
    util::logging::init(cli.debug, app_config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "ShipSearch starting"
    );
    for warning in &config_warnings {
        tracing::warn!(config = %config_path.display(), "{}", warning);
    }

    let Some(data_file) = cli.file.clone().or_else(|| app_config.data_file.clone()) else {
        eprintln!(
            "Error: no dataset file given. Pass FILE or set [data] file in {}",
            config_path.display()
        );
        return ExitCode::FAILURE;
    };

    let mut session = Session::new(&app_config);
    match run(&cli, &data_file, &mut session) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Request failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, data_file: &Path, session: &mut Session) -> Result<(), ShipSearchError> {
    let table = session.open(data_file)?;
    tracing::info!(
        rows = table.len(),
        columns = table.columns().len(),
        "Dataset ready"
    );

    println!("{}", util::constants::APP_TITLE);

    if cli.list_columns {
        print!("{}", text_table::render_columns(&session.columns()));
        return Ok(());
    }

    let request = QueryRequest {
        column: cli
            .column
            .as_deref()
            .map(ColumnSelector::from_label)
            .unwrap_or_default(),
        keyword: cli.keyword.clone(),
        start: cli.start,
        end: cli.end,
    };

    session.run(data_file, request)?;
    let response = session.set_page(cli.page)?;
    print!("{}", text_table::render_response(response));

    if let Some(target) = &cli.export {
        if !response.export_allowed {
            println!("Tidak ada hasil untuk diekspor. Masukkan kata kunci atau pilih kolom tanggal.");
            return Ok(());
        }
        if let Some(path) = session.export(target.as_deref())? {
            println!("Hasil disimpan ke {}", path.display());
        }
    }

    Ok(())
}
