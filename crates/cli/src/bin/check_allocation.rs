use anyhow::{Context, Result};
use clap::Parser;
use std::{
    io::{self, IsTerminal, Write},
    path::PathBuf,
    process::ExitCode,
};

use allocation_engine::{AccountFilter, analyze, write_report_json};
use allocation_export::{ReadError, read_raw_table};
use data_normalization::{NormalizeError, normalize};
use logger::TimestampedTee;
use report::{ConsoleRenderer, PdfRenderer, PlainRenderer, assemble, render_document};
use settings_loader::{DEFAULT_CONFIG_FILE, SettingsError, load_settings, resolve_excel_path};

/// Summarize the asset allocation of a brokerage "Asset Allocation" export.
#[derive(Debug, Parser)]
#[command(name = "check-allocation", version)]
struct Args {
    /// Path to the JSON configuration file
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Restrict the analysis to these accounts (repeatable or comma-separated, e.g. "*1234")
    #[arg(short, long, value_name = "ACCOUNT", value_delimiter = ',')]
    account: Vec<String>,

    /// Spreadsheet to read instead of the configured excel_filename
    #[arg(long, value_name = "PATH")]
    excel: Option<PathBuf>,

    /// Also write the report to a PDF file
    #[arg(long, value_name = "PATH")]
    pdf: Option<PathBuf>,

    /// Also write the aggregated report as JSON
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// History log to append to instead of the configured history_log
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,

    /// Fixed-width text tables instead of boxed tables
    #[arg(long)]
    plain: bool,

    /// Disable colored titles
    #[arg(long)]
    no_color: bool,
}

impl Args {
    fn use_color(&self) -> bool {
        !self.no_color && std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal()
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let config = load_settings(&args.config)?;
    let excel_path = match &args.excel {
        Some(path) => path.clone(),
        None => resolve_excel_path(&args.config, &config),
    };

    let raw = read_raw_table(&excel_path)?;
    let table = normalize(&raw)
        .with_context(|| format!("reading holdings from {}", excel_path.display()))?;
    tracing::info!(
        holdings = table.holdings.len(),
        asset_classes = table.asset_columns.len(),
        path = %excel_path.display(),
        "loaded allocation export"
    );

    let filter = AccountFilter::new(&args.account);
    let report = analyze(&table, &config.cash_symbol_set(), filter.as_ref());
    let doc = assemble(&report, &config.account_nicknames);

    let log_path = args
        .log
        .clone()
        .unwrap_or_else(|| PathBuf::from(config.history_log_path()));
    let mut tee = TimestampedTee::open(&log_path, io::stdout())
        .with_context(|| format!("opening history log {}", log_path.display()))?;

    if args.plain {
        render_document(&doc, &mut PlainRenderer::new(&mut tee))?;
    } else {
        render_document(&doc, &mut ConsoleRenderer::new(&mut tee, args.use_color()))?;
    }

    if let Some(pdf_path) = &args.pdf {
        let mut pdf = PdfRenderer::new(pdf_path, "Asset Allocation");
        match render_document(&doc, &mut pdf) {
            Ok(()) => {
                writeln!(tee)?;
                writeln!(tee, "PDF report written to {}", pdf_path.display())?;
            }
            // The console report is already out; a PDF failure does not fail the run.
            Err(err) => {
                tracing::error!(path = %pdf_path.display(), error = %err, "PDF report failed");
                eprintln!("Warning: {}", err);
            }
        }
    }

    if let Some(json_path) = &args.json {
        write_report_json(&report, json_path)
            .with_context(|| format!("writing JSON report {}", json_path.display()))?;
        writeln!(tee, "JSON report written to {}", json_path.display())?;
    }

    tee.finish()
        .with_context(|| format!("closing history log {}", log_path.display()))?;
    Ok(())
}

fn report_failure(err: &anyhow::Error) {
    eprintln!("Error: {}", err);
    for cause in err.chain().skip(1) {
        eprintln!("  caused by: {}", cause);
    }
    if let Some(e) = err.downcast_ref::<SettingsError>() {
        eprintln!("\n{}", e.remediation());
    } else if let Some(e) = err.downcast_ref::<ReadError>() {
        eprintln!("\n{}", e.remediation());
    } else if err.downcast_ref::<NormalizeError>().is_some() {
        eprintln!(
            "\nThe export must keep the brokerage layout: a disclaimer on row 1 and the \
             column headers (Symbol, Description, Account, asset classes) on row 2. \
             Run inspect-workbook on the file to see what it contains."
        );
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_failure(&err);
            ExitCode::FAILURE
        }
    }
}
