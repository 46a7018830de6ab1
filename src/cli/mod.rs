pub mod config;
#[cfg(feature = "pdf")]
pub mod export;
pub mod statement;
pub mod totals;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use crate::error::Result;
use crate::fmt::display_date;
use crate::loader::load_path;
use crate::models::Transaction;
use crate::normalizer::parse_iso_date;
use crate::scope::StatementScope;

fn parse_date_arg(s: &str) -> std::result::Result<NaiveDate, String> {
    parse_iso_date(s).map_err(|e| e.to_string())
}

fn parse_scope_arg(s: &str) -> std::result::Result<StatementScope, String> {
    s.parse::<StatementScope>().map_err(|e| e.to_string())
}

/// Human label for a reporting window, as printed under statement headings.
pub(crate) fn range_label(from: Option<NaiveDate>, to: Option<NaiveDate>) -> String {
    match (from, to) {
        (Some(f), Some(t)) => format!("{} to {}", display_date(f), display_date(t)),
        (Some(f), None) => format!("From {}", display_date(f)),
        (None, Some(t)) => format!("Up to {}", display_date(t)),
        (None, None) => "All dates".to_string(),
    }
}

/// Load a listing, warning on stderr about records that were skipped.
pub(crate) fn load_listing(input: &Path) -> Result<Vec<Transaction>> {
    let report = load_path(input)?;
    if !report.rejected.is_empty() {
        eprintln!(
            "{} skipped {} record(s) that could not be read:",
            "Warning:".yellow().bold(),
            report.rejected.len()
        );
        for r in &report.rejected {
            eprintln!("  #{}: {}", r.index, r.reason);
        }
    }
    Ok(report.transactions)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Csv,
}

#[derive(Parser)]
#[command(
    name = "passbook",
    version,
    about = "Bank & cash statements with running balances, printed or exported to PDF."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a statement with opening balance and running balances.
    Statement {
        /// JSON transaction listing ("-" reads stdin)
        input: PathBuf,
        /// all, bank, bank:<name> or cash
        #[arg(long, default_value = "all", value_parser = parse_scope_arg)]
        scope: StatementScope,
        /// First day of the window (YYYY-MM-DD)
        #[arg(long = "from", value_parser = parse_date_arg)]
        from_date: Option<NaiveDate>,
        /// Last day of the window (YYYY-MM-DD)
        #[arg(long = "to", value_parser = parse_date_arg)]
        to_date: Option<NaiveDate>,
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Credit and debit totals per bank and for cash.
    Totals {
        /// JSON transaction listing ("-" reads stdin)
        input: PathBuf,
    },
    /// Export statements to PDF.
    #[cfg(feature = "pdf")]
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },
    /// Show or change settings.
    Config {
        /// Company name printed on statements
        #[arg(long)]
        company: Option<String>,
        /// Default directory for exported PDFs
        #[arg(long = "export-dir")]
        export_dir: Option<String>,
        /// Page margin in millimetres for raster exports
        #[arg(long)]
        margin: Option<f64>,
        /// Resolution assumed for raster images
        #[arg(long)]
        dpi: Option<f64>,
    },
}

#[cfg(feature = "pdf")]
#[derive(Subcommand)]
pub enum ExportCommands {
    /// Render a statement as a vector PDF.
    Statement {
        input: PathBuf,
        #[arg(long, default_value = "all", value_parser = parse_scope_arg)]
        scope: StatementScope,
        #[arg(long = "from", value_parser = parse_date_arg)]
        from_date: Option<NaiveDate>,
        #[arg(long = "to", value_parser = parse_date_arg)]
        to_date: Option<NaiveDate>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Split one tall statement snapshot across A4 pages.
    Raster {
        /// PNG or JPEG image
        image: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
        /// Shrink the whole image onto a single page instead
        #[arg(long)]
        fit: bool,
    },
}
