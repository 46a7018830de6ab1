mod cli;
mod error;
mod fmt;
mod ledger;
mod loader;
mod models;
mod normalizer;
mod paginate;
#[cfg(feature = "pdf")]
mod pdf;
mod scope;
mod settings;

use clap::Parser;

#[cfg(feature = "pdf")]
use cli::ExportCommands;
use cli::{Cli, Commands};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Statement {
            input,
            scope,
            from_date,
            to_date,
            format,
        } => cli::statement::run(&input, &scope, from_date, to_date, format),
        Commands::Totals { input } => cli::totals::run(&input),
        #[cfg(feature = "pdf")]
        Commands::Export { command } => match command {
            ExportCommands::Statement {
                input,
                scope,
                from_date,
                to_date,
                output,
            } => cli::export::statement(&input, &scope, from_date, to_date, output).map(|_| ()),
            ExportCommands::Raster { image, output, fit } => {
                cli::export::raster(&image, output, fit).map(|_| ())
            }
        },
        Commands::Config {
            company,
            export_dir,
            margin,
            dpi,
        } => cli::config::run(company, export_dir, margin, dpi),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
