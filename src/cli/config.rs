use colored::Colorize;

use crate::error::Result;
use crate::settings::{load_settings, save_settings, settings_path, Settings};

fn show(settings: &Settings) {
    let company = if settings.company_name.is_empty() {
        "(not set)".dimmed().to_string()
    } else {
        settings.company_name.clone()
    };
    println!("{}", settings_path().display().to_string().dimmed());
    println!("  company_name    {company}");
    println!("  export_dir      {}", settings.export_dir);
    println!("  page_margin_mm  {}", settings.page_margin_mm);
    println!("  raster_dpi      {}", settings.raster_dpi);
}

/// With no flags, print the current settings; otherwise update and save them.
pub fn run(
    company: Option<String>,
    export_dir: Option<String>,
    margin: Option<f64>,
    dpi: Option<f64>,
) -> Result<()> {
    let mut settings = load_settings();
    if company.is_none() && export_dir.is_none() && margin.is_none() && dpi.is_none() {
        show(&settings);
        return Ok(());
    }

    if let Some(c) = company {
        settings.company_name = c.trim().to_string();
    }
    if let Some(d) = export_dir {
        settings.export_dir = d;
    }
    if let Some(m) = margin {
        settings.page_margin_mm = m;
    }
    if let Some(d) = dpi {
        settings.raster_dpi = d;
    }
    save_settings(&settings)?;
    println!("{} {}", "Saved".green(), settings_path().display());
    show(&settings);
    Ok(())
}
