//! Scrape vendor metadata and review links from a vendor page.

use clap::Parser;
use menu_scraper::{cli, commands};
use std::process::ExitCode;

const USAGE: &str = "Usage: fetch-vendor-data <vendor_url>";

#[derive(Parser)]
#[command(name = "fetch-vendor-data", version, about = "Scrape vendor metadata as JSON")]
struct Args {
    /// Vendor page to scrape
    #[arg(value_parser = cli::parse_url)]
    vendor_url: String,
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
        commands::fetch_vendor_data(&scraper, &args.vendor_url).await
    }
    .await;

    cli::report(result)
}
