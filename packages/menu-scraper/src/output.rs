//! What the tools emit: CSV files and JSON on stdout.

use serde::Serialize;
use std::path::Path;

use crate::error::{ErrorKind, Result, ScrapeError};
use crate::records::{MealRecord, MEAL_CSV_HEADER};

/// Write meals to `path` with the fixed six-column header.
pub fn write_meals_csv(path: &Path, meals: &[MealRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(MEAL_CSV_HEADER)?;
    for meal in meals {
        writer.write_record(meal.csv_row())?;
    }
    writer.flush().map_err(csv::Error::from)?;

    tracing::info!(path = %path.display(), rows = meals.len(), "Wrote meals CSV");
    Ok(())
}

/// Compact JSON, one line.
pub fn to_json<T: Serialize>(records: &[T]) -> Result<String> {
    Ok(serde_json::to_string(records)?)
}

/// JSON indented by two spaces.
pub fn to_json_pretty<T: Serialize>(records: &[T]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// The single JSON object printed in place of results on failure.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub error: String,
    pub kind: ErrorKind,
}

impl ErrorReport {
    pub fn usage(usage: impl Into<String>) -> Self {
        Self {
            error: usage.into(),
            kind: ErrorKind::Usage,
        }
    }

    pub fn to_json(&self) -> String {
        // Only strings and a unit enum; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"error":"unknown error"}"#.to_string())
    }
}

impl From<&ScrapeError> for ErrorReport {
    fn from(err: &ScrapeError) -> Self {
        Self {
            error: err.to_string(),
            kind: err.kind(),
        }
    }
}
