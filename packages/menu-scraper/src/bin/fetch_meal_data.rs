//! Scrape the meals on a menu page into a CSV file.
//!
//! Prints the meals as JSON on stdout, or `{"error": ..., "kind": ...}`.

use clap::Parser;
use menu_scraper::{cli, commands};
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "Usage: fetch-meal-data <menu_url> <output_csv>";

#[derive(Parser)]
#[command(name = "fetch-meal-data", version, about = "Scrape the meals on a menu page into a CSV file")]
struct Args {
    /// Menu page to scrape
    #[arg(value_parser = cli::parse_url)]
    menu_url: String,

    /// Where to write the meals CSV
    output_csv: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    cli::init_tracing();

    let args = match cli::parse_args::<Args>(USAGE) {
        Ok(args) => args,
        Err(code) => return code,
    };

    let result: menu_scraper::Result<String> = async {
        let scraper = cli::scraper_from_env()?;
        commands::fetch_meal_data(&scraper, &args.menu_url, &args.output_csv).await
    }
    .await;

    cli::report(result)
}
