//! Data types for movie search functionality.

use serde::{Deserialize, Deserializer, Serialize};

/// Canonical movie record every Cinescope component consumes.
///
/// `id` and `title` are always non-empty. Optional fields are present only when
/// the source data supplied a usable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecord {
    /// Stable identifier from the source, or a generated one
    pub id: String,
    /// Display title
    pub title: String,
    /// Release year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    /// Absolute poster URL. An empty source value is held as `None`.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub poster_url: Option<String>,
    /// Score as supplied by the source. Scale is not normalized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Genre names in source order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    /// Plot summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    /// Runtime in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
}

impl MovieRecord {
    /// Creates a record with only the required fields set.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            year: None,
            poster_url: None,
            rating: None,
            genres: None,
            overview: None,
            runtime: None,
        }
    }

    /// Case-insensitive substring match on the title.
    ///
    /// `needle_lower` must already be lowercased.
    pub fn title_contains(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
    }

    /// Genres as a slice, empty when the source supplied none.
    pub fn genre_list(&self) -> &[String] {
        self.genres.as_deref().unwrap_or(&[])
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case_and_skips_absent_fields() {
        let mut record = MovieRecord::new("tt0000001", "Example");
        record.poster_url = Some("https://img.example.com/p.jpg".to_string());

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "tt0000001",
                "title": "Example",
                "posterUrl": "https://img.example.com/p.jpg"
            })
        );
    }

    #[test]
    fn test_blank_poster_url_deserializes_as_absent() {
        for poster in [serde_json::json!(""), serde_json::json!("  "), serde_json::Value::Null] {
            let record: MovieRecord = serde_json::from_value(serde_json::json!({
                "id": "tt0000001",
                "title": "Example",
                "posterUrl": poster
            }))
            .unwrap();
            assert_eq!(record.poster_url, None);
        }
    }

    #[test]
    fn test_title_contains_ignores_case() {
        let record = MovieRecord::new("tt0468569", "The Dark Knight");
        assert!(record.title_contains("dark knight"));
        assert!(record.title_contains(""));
        assert!(!record.title_contains("darkknight"));
    }
}
