use fetchfox_client::{ExtractedItem, NOT_FOUND};

use crate::questions::QuestionSet;

/// A name is usable when it is non-blank and not the "NA" sentinel.
pub fn is_valid_name(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty() && !name.eq_ignore_ascii_case(NOT_FOUND)
}

/// Turn extracted items into records, dropping items without a usable name.
///
/// The primary field is trimmed; every other field is defaulted to "NA"
/// and list answers are joined with ", ".
pub fn normalize<S: QuestionSet>(set: &S, items: &[ExtractedItem]) -> Vec<S::Record> {
    items
        .iter()
        .filter_map(|item| {
            let name = item.answer(S::PRIMARY_FIELD).unwrap_or_default();
            if !is_valid_name(&name) {
                tracing::debug!(field = S::PRIMARY_FIELD, value = %name, "Dropping item without a name");
                return None;
            }
            Some(set.to_record(name.trim().to_string(), item))
        })
        .collect()
}
