//! The three tools, as functions returning the JSON they print.

use fetchfox_client::ExtractionApi;
use std::path::Path;

use crate::error::Result;
use crate::output::{to_json, to_json_pretty, write_meals_csv};
use crate::pipeline::Scraper;
use crate::questions::{MealQuestions, MenuQuestions, VendorQuestions};

/// Scrape the meals on `menu_url`, write them to `output_csv`, and return
/// them as compact JSON. Nothing is written when no meal survives.
pub async fn fetch_meal_data<A: ExtractionApi>(
    scraper: &Scraper<A>,
    menu_url: &str,
    output_csv: &Path,
) -> Result<String> {
    let meals = scraper.scrape(&MealQuestions, menu_url).await?;
    write_meals_csv(output_csv, &meals)?;
    to_json(&meals)
}

/// Scrape the full menu and vendor metadata on `menu_url` for `vendor_id`.
pub async fn fetch_menu_data<A: ExtractionApi>(
    scraper: &Scraper<A>,
    vendor_id: &str,
    menu_url: &str,
) -> Result<String> {
    let menu = scraper
        .scrape(&MenuQuestions::new(vendor_id), menu_url)
        .await?;
    to_json_pretty(&menu)
}

/// Scrape vendor metadata from `vendor_url`.
pub async fn fetch_vendor_data<A: ExtractionApi>(
    scraper: &Scraper<A>,
    vendor_url: &str,
) -> Result<String> {
    let vendors = scraper.scrape(&VendorQuestions, vendor_url).await?;
    to_json_pretty(&vendors)
}
