//! Normalized records handed to callers.
//!
//! Every field is a string; absent answers hold `"NA"`.

use serde::{Deserialize, Serialize};

/// Header row of the meals CSV, in column order.
pub const MEAL_CSV_HEADER: [&str; 6] = [
    "Meal Name",
    "Description",
    "Ingredients",
    "Dietary Alignment",
    "Price",
    "Meal Photos",
];

/// One meal from a menu page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealRecord {
    pub meal_name: String,
    pub description: String,
    pub ingredients: String,
    pub dietary_alignment: String,
    pub price: String,
    pub meal_photos: String,
}

impl MealRecord {
    /// Values in [`MEAL_CSV_HEADER`] order.
    pub fn csv_row(&self) -> [&str; 6] {
        [
            self.meal_name.as_str(),
            self.description.as_str(),
            self.ingredients.as_str(),
            self.dietary_alignment.as_str(),
            self.price.as_str(),
            self.meal_photos.as_str(),
        ]
    }
}

/// One meal plus the vendor metadata found alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuRecord {
    pub vendor_id: String,
    pub meal_name: String,
    pub description: String,
    pub ingredients: String,
    pub dietary_alignment: String,
    pub price: String,
    pub vendor_name: String,
    pub website: String,
    pub instagram: String,
    pub google_maps: String,
    pub third_party_review_links: String,
    pub vendor_description: String,
    pub meal_photos: String,
    pub vendor_logo: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewLinks {
    pub infatuation: String,
    pub eater: String,
}

/// Vendor metadata from a vendor page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorRecord {
    pub vendor_name: String,
    pub website: String,
    pub instagram: String,
    pub google_maps: String,
    pub vendor_description: String,
    pub vendor_logo: String,
    pub review_links: ReviewLinks,
}
