//! Search-as-you-type over record names and the tag vocabulary.

use crate::model::{same_tag, Record};

/// Name suggestions shown under the search box.
pub const NAME_SUGGESTION_LIMIT: usize = 6;

/// Tag suggestions shown under the keyword picker.
pub const TAG_SUGGESTION_LIMIT: usize = 10;

fn normalize_query(query: &str) -> Option<String> {
    let q = query.trim().to_lowercase();
    (!q.is_empty()).then_some(q)
}

fn name_contains(record: &Record, query: &str) -> bool {
    record
        .name
        .as_deref()
        .is_some_and(|name| name.to_lowercase().contains(query))
}

/// Records whose name contains the query (case-insensitive), in source order.
pub fn suggest_names<'a>(records: &'a [Record], query: &str, limit: usize) -> Vec<&'a Record> {
    let Some(query) = normalize_query(query) else {
        return Vec::new();
    };
    records
        .iter()
        .filter(|r| name_contains(r, &query))
        .take(limit)
        .collect()
}

/// First record whose name contains the query.
pub fn find_by_name<'a>(records: &'a [Record], query: &str) -> Option<&'a Record> {
    let query = normalize_query(query)?;
    records.iter().find(|r| name_contains(r, &query))
}

/// Vocabulary tags containing the query, skipping tags already selected.
pub fn suggest_tags<'a>(vocabulary: &'a [String], query: &str, selected: &[String]) -> Vec<&'a str> {
    let Some(query) = normalize_query(query) else {
        return Vec::new();
    };
    vocabulary
        .iter()
        .filter(|tag| tag.to_lowercase().contains(&query))
        .filter(|tag| !selected.iter().any(|s| same_tag(s, tag)))
        .take(TAG_SUGGESTION_LIMIT)
        .map(String::as_str)
        .collect()
}
