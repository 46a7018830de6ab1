use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::cli::{load_listing, range_label};
use crate::error::Result;
use crate::ledger::build_ledger;
use crate::pdf::{load_image, render_fitted, render_raster, render_statement};
use crate::scope::StatementScope;
use crate::settings::{get_export_dir, load_settings};

/// `<export_dir>/<scope file name>`
fn statement_path(scope: &StatementScope, from: Option<NaiveDate>, to: Option<NaiveDate>) -> PathBuf {
    get_export_dir().join(scope.file_name(from, to))
}

/// `<export_dir>/<image stem>.pdf`
fn raster_path(image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "statement".to_string());
    get_export_dir().join(format!("{stem}.pdf"))
}

fn write_pdf(bytes: &[u8], path: &Path) -> Result<String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    let display = format!("{}", path.display());
    println!("Wrote {display}");
    Ok(display)
}

pub fn statement(
    input: &Path,
    scope: &StatementScope,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    output: Option<PathBuf>,
) -> Result<String> {
    let transactions = load_listing(input)?;
    let view = build_ledger(&scope.filter(&transactions), from, to);
    let company = load_settings().company_name;
    let bytes = render_statement(&view, scope, &range_label(from, to), &company)?;
    let path = output.unwrap_or_else(|| statement_path(scope, from, to));
    write_pdf(&bytes, &path)
}

pub fn raster(image: &Path, output: Option<PathBuf>, fit: bool) -> Result<String> {
    let settings = load_settings();
    settings.validate()?;
    let img = load_image(&std::fs::read(image)?)?;
    let layout = settings.layout();
    let bytes = if fit {
        render_fitted(&img, &layout, settings.raster_dpi)?
    } else {
        render_raster(&img, &layout, settings.raster_dpi)?
    };
    let path = output.unwrap_or_else(|| raster_path(image));
    write_pdf(&bytes, &path)
}
