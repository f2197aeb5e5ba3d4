//! Scrape a vendor's full menu, with vendor metadata per item.

use clap::Parser;
use menu_scraper::{cli, commands};
use std::process::ExitCode;

const USAGE: &str = "Usage: fetch-menu-data <vendor_id> <menu_url>";

#[derive(Parser)]
#[command(name = "fetch-menu-data", version, about = "Scrape a vendor's full menu as JSON")]
struct Args {
    /// Vendor the menu belongs to; copied onto every record
    vendor_id: String,

    /// Menu page to scrape
    #[arg(value_parser = cli::parse_url)]
    menu_url: String,
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
        commands::fetch_menu_data(&scraper, &args.vendor_id, &args.menu_url).await
    }
    .await;

    cli::report(result)
}
