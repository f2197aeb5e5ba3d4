//! Question sets: what to ask of each page and how answers become records.

use fetchfox_client::ExtractedItem;
use serde::Serialize;

use crate::records::{MealRecord, MenuRecord, ReviewLinks, VendorRecord};

/// A fixed set of extraction questions and the record shape built from
/// each answered item.
pub trait QuestionSet {
    type Record: Serialize;

    /// Field that names the record. Items without a usable value here are
    /// dropped.
    const PRIMARY_FIELD: &'static str;

    /// Reported when the job returns no items at all.
    const NO_ITEMS: &'static str;

    /// Reported when every returned item was dropped.
    const NO_VALID_ITEMS: &'static str;

    /// `(field, question)` pairs, in submission order.
    fn questions(&self) -> &'static [(&'static str, &'static str)];

    /// Build a record from an item whose primary field read `name`.
    fn to_record(&self, name: String, item: &ExtractedItem) -> Self::Record;
}

const MEAL_QUESTIONS: &[(&str, &str)] = &[
    (
        "meal_name",
        "What is the name of this meal? If unavailable, answer NA.",
    ),
    (
        "description",
        "What is the description of this meal? If there is no description available, try to generate an accurate description from the ingredients, meal name and the picture. If it's not possible, return NA.",
    ),
    (
        "ingredients",
        "What are the exact ingredients of this meal? Provide a structured CSV format with each ingredient as a separate field. If none, answer NA.",
    ),
    (
        "dietary_alignment",
        "Extract the dietary alignment as explicitly mentioned in the menu (symbols or item name). Use only these formats: V (Vegan), VG (Vegetarian), DF (Dairy-Free), KE (Keto), PA (Paleo). If not explicitly stated, return NA. Strictly No assumptions based on ingredients. If you're unsure or not completely sure, return NA",
    ),
    (
        "price",
        "What is the price of this meal? Include the currency (e.g., $12.99). It should only be a price, not text. If unavailable, answer NA.",
    ),
    (
        "meal_photos",
        "Some Menu cards have images along with the menu item. Extract those image URLs. If there are multiple images, Extract the best or first one, whichever is better. If unavailable, answer NA.",
    ),
];

const MENU_QUESTIONS: &[(&str, &str)] = &[
    ("meal_name", "What is the name of this meal? If unavailable, answer NA."),
    ("description", "What is the description of this meal? If unavailable, answer NA."),
    ("ingredients", "What are the ingredients of this meal? If unavailable, answer NA."),
    ("dietary_alignment", "What is the dietary alignment of this meal? If none, answer NA."),
    ("price", "What is the price of this meal? If unavailable, answer NA."),
    ("vendor_name", "What is the name of the vendor? If unavailable, answer NA."),
    ("website", "What is the website URL? If unavailable, answer NA."),
    ("instagram", "What is the Instagram URL? If unavailable, answer NA."),
    ("google_maps", "What is the Google Maps URL? If unavailable, answer NA."),
    ("third_party_review_links", "What are the third-party review links? If none, answer NA."),
    ("vendor_description", "What is the description of the vendor? If unavailable, answer NA."),
    ("meal_photos", "What are the image URLs for the meal photos? If unavailable, answer NA."),
    ("vendor_logo", "What is the URL for the vendor's logo? If unavailable, answer NA."),
    ("url", "What is the URL? If unavailable, answer NA."),
];

const VENDOR_QUESTIONS: &[(&str, &str)] = &[
    ("vendor_name", "What is the name of the vendor? If unavailable, answer NA."),
    ("website", "What is the website URL? If unavailable, answer NA."),
    ("instagram", "What is the Instagram URL? If unavailable, answer NA."),
    ("google_maps", "What is the Google Maps URL? If unavailable, answer NA."),
    ("infatuation_link", "What is the Infatuation review URL? If unavailable, answer NA."),
    ("eater_link", "What is the Eater review URL? If unavailable, answer NA."),
    (
        "vendor_description",
        "Generate a high-quality description of the vendor's webpage, ingredients or any other relevant data. If unavailable, answer NA.",
    ),
    ("vendor_logo", "What is the URL for the vendor's logo? If unavailable, answer NA."),
];

/// Meals on a menu page, exported to CSV.
#[derive(Debug, Clone, Copy, Default)]
pub struct MealQuestions;

impl QuestionSet for MealQuestions {
    type Record = MealRecord;

    const PRIMARY_FIELD: &'static str = "meal_name";
    const NO_ITEMS: &'static str = "No menu items found";
    const NO_VALID_ITEMS: &'static str = "No valid meals extracted";

    fn questions(&self) -> &'static [(&'static str, &'static str)] {
        MEAL_QUESTIONS
    }

    fn to_record(&self, name: String, item: &ExtractedItem) -> MealRecord {
        MealRecord {
            meal_name: name,
            description: item.answer_or_na("description"),
            ingredients: item.answer_or_na("ingredients"),
            dietary_alignment: item.answer_or_na("dietary_alignment"),
            price: item.answer_or_na("price"),
            meal_photos: item.answer_or_na("meal_photos"),
        }
    }
}

/// Full menu with vendor metadata, tagged with the caller's vendor id.
#[derive(Debug, Clone)]
pub struct MenuQuestions {
    pub vendor_id: String,
}

impl MenuQuestions {
    pub fn new(vendor_id: impl Into<String>) -> Self {
        Self {
            vendor_id: vendor_id.into(),
        }
    }
}

impl QuestionSet for MenuQuestions {
    type Record = MenuRecord;

    const PRIMARY_FIELD: &'static str = "meal_name";
    const NO_ITEMS: &'static str = "No menu items found";
    const NO_VALID_ITEMS: &'static str = "No valid meals extracted";

    fn questions(&self) -> &'static [(&'static str, &'static str)] {
        MENU_QUESTIONS
    }

    fn to_record(&self, name: String, item: &ExtractedItem) -> MenuRecord {
        MenuRecord {
            vendor_id: self.vendor_id.clone(),
            meal_name: name,
            description: item.answer_or_na("description"),
            ingredients: item.answer_or_na("ingredients"),
            dietary_alignment: item.answer_or_na("dietary_alignment"),
            price: item.answer_or_na("price"),
            vendor_name: item.answer_or_na("vendor_name"),
            website: item.answer_or_na("website"),
            instagram: item.answer_or_na("instagram"),
            google_maps: item.answer_or_na("google_maps"),
            third_party_review_links: item.answer_or_na("third_party_review_links"),
            vendor_description: item.answer_or_na("vendor_description"),
            meal_photos: item.answer_or_na("meal_photos"),
            vendor_logo: item.answer_or_na("vendor_logo"),
            url: item.answer_or_na("url"),
        }
    }
}

/// Vendor-only metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct VendorQuestions;

impl QuestionSet for VendorQuestions {
    type Record = VendorRecord;

    const PRIMARY_FIELD: &'static str = "vendor_name";
    const NO_ITEMS: &'static str = "No vendor metadata found";
    const NO_VALID_ITEMS: &'static str = "No valid vendor metadata extracted";

    fn questions(&self) -> &'static [(&'static str, &'static str)] {
        VENDOR_QUESTIONS
    }

    fn to_record(&self, name: String, item: &ExtractedItem) -> VendorRecord {
        VendorRecord {
            vendor_name: name,
            website: item.answer_or_na("website"),
            instagram: item.answer_or_na("instagram"),
            google_maps: item.answer_or_na("google_maps"),
            vendor_description: item.answer_or_na("vendor_description"),
            vendor_logo: item.answer_or_na("vendor_logo"),
            review_links: ReviewLinks {
                infatuation: item.answer_or_na("infatuation_link"),
                eater: item.answer_or_na("eater_link"),
            },
        }
    }
}
