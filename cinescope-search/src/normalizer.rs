//! Normalization of loosely-shaped catalog JSON into [`MovieRecord`].
//!
//! Each canonical field resolves through an ordered list of [`FieldRule`]s. The first
//! rule whose key is present and whose coercion yields a usable value wins. Null,
//! blank, `"N/A"` and wrongly-typed values count as absent.

use serde_json::Value;

use crate::types::MovieRecord;

/// Title used when the source item has no usable title.
pub const UNTITLED: &str = "Untitled";

/// One step of a field's resolution order.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule<T> {
    /// Source key looked up on the item object
    pub key: &'static str,
    /// Converts the raw value, `None` when unusable
    pub coerce: fn(&Value) -> Option<T>,
}

impl<T> FieldRule<T> {
    const fn new(key: &'static str, coerce: fn(&Value) -> Option<T>) -> Self {
        Self { key, coerce }
    }
}

/// `id` sources, then a generated id.
pub const ID_RULES: &[FieldRule<String>] = &[
    FieldRule::new("id", coerce_identifier),
    FieldRule::new("imdbID", coerce_identifier),
];

/// `title` sources, then [`UNTITLED`].
pub const TITLE_RULES: &[FieldRule<String>] = &[
    FieldRule::new("title", coerce_identifier),
    FieldRule::new("Name", coerce_identifier),
];

/// Integer or integer-valued string.
pub const YEAR_RULES: &[FieldRule<u16>] = &[
    FieldRule::new("year", coerce_year),
    FieldRule::new("Year", coerce_year),
];

/// Poster URL sources; OMDb's `"N/A"` counts as absent.
pub const POSTER_RULES: &[FieldRule<String>] = &[
    FieldRule::new("posterUrl", coerce_text),
    FieldRule::new("Poster", coerce_text),
    FieldRule::new("poster", coerce_text),
];

/// `rating` must already be numeric; `imdbRating` is usually a string.
pub const RATING_RULES: &[FieldRule<f64>] = &[
    FieldRule::new("rating", coerce_number),
    FieldRule::new("imdbRating", coerce_numeric_text),
];

/// Array of names or a comma-separated string.
pub const GENRE_RULES: &[FieldRule<Vec<String>>] = &[
    FieldRule::new("genres", coerce_genres),
    FieldRule::new("Genre", coerce_genres),
];

/// Plot summary sources.
pub const OVERVIEW_RULES: &[FieldRule<String>] = &[
    FieldRule::new("overview", coerce_text),
    FieldRule::new("Plot", coerce_text),
    FieldRule::new("description", coerce_text),
];

/// Runtime in whole minutes.
pub const RUNTIME_RULES: &[FieldRule<u32>] = &[FieldRule::new("runtime", coerce_minutes)];

/// Evaluates `rules` in order against `item`.
pub fn resolve<T>(item: &Value, rules: &[FieldRule<T>]) -> Option<T> {
    rules
        .iter()
        .find_map(|rule| item.get(rule.key).and_then(rule.coerce))
}

/// Maps one catalog item to a canonical record. Never fails.
///
/// Non-object input yields a record with a generated id and the placeholder title.
pub fn normalize_item(item: &Value) -> MovieRecord {
    MovieRecord {
        id: resolve(item, ID_RULES).unwrap_or_else(generate_id),
        title: resolve(item, TITLE_RULES).unwrap_or_else(|| UNTITLED.to_string()),
        year: resolve(item, YEAR_RULES),
        poster_url: resolve(item, POSTER_RULES),
        rating: resolve(item, RATING_RULES),
        genres: resolve(item, GENRE_RULES),
        overview: resolve(item, OVERVIEW_RULES),
        runtime: resolve(item, RUNTIME_RULES),
    }
}

/// Random 16 hex character identifier from the thread-local CSPRNG.
pub fn generate_id() -> String {
    let bytes: [u8; 8] = rand::random();
    hex::encode(bytes)
}

fn coerce_text(value: &Value) -> Option<String> {
    let text = value.as_str()?.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("n/a") {
        return None;
    }
    Some(text.to_string())
}

fn coerce_identifier(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        other => coerce_text(other),
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|n| n.is_finite())
}

fn coerce_numeric_text(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        other => coerce_number(other),
    }
}

fn coerce_whole(value: &Value) -> Option<i64> {
    let n = coerce_numeric_text(value)?;
    (n.fract() == 0.0).then_some(n as i64)
}

fn coerce_year(value: &Value) -> Option<u16> {
    coerce_whole(value).and_then(|n| u16::try_from(n).ok())
}

fn coerce_minutes(value: &Value) -> Option<u32> {
    coerce_whole(value).and_then(|n| u32::try_from(n).ok())
}

fn coerce_genres(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(coerce_text)
                .collect(),
        ),
        Value::String(csv) => Some(
            csv.split(',')
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        _ => None,
    }
}
