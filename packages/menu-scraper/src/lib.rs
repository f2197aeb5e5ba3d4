//! Menu and vendor extraction tools.
//!
//! Each tool submits one URL to FetchFox with a fixed question set, waits
//! for the job, and prints the normalized records as JSON on stdout.
//! `fetch-meal-data` also writes them to a CSV file.
//!
//! # Modules
//!
//! - [`questions`] - Question sets and how items become records
//! - [`normalize`] - Defaulting, flattening and name filtering
//! - [`pipeline`] - Submit, poll and normalize for one URL
//! - [`commands`] - The three tools as library functions
//! - [`output`] - CSV and JSON emitters
//! - [`config`] - Environment configuration

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod questions;
pub mod records;

pub use config::Config;
pub use error::{ErrorKind, OutputError, Result, ScrapeError};
pub use pipeline::Scraper;
pub use questions::{MealQuestions, MenuQuestions, QuestionSet, VendorQuestions};
pub use records::{MealRecord, MenuRecord, ReviewLinks, VendorRecord};
