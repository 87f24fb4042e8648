//! Curated local catalog used when no remote endpoint is configured or reachable.

use async_trait::async_trait;

use super::MovieSearchProvider;
use crate::errors::MovieSearchError;
use crate::types::MovieRecord;

/// Records returned for an empty query.
pub const DEFAULT_BROWSE_LIMIT: usize = 8;

/// Fixed in-memory catalog with case-insensitive title filtering.
#[derive(Debug, Clone)]
pub struct FallbackCatalog {
    records: Vec<MovieRecord>,
    browse_limit: usize,
}

impl Default for FallbackCatalog {
    fn default() -> Self {
        Self::curated()
    }
}

impl FallbackCatalog {
    /// Catalog backed by the built-in sample data.
    pub fn curated() -> Self {
        Self::with_records(curated_records())
    }

    /// Catalog backed by caller-supplied records, kept in the given order.
    pub fn with_records(records: Vec<MovieRecord>) -> Self {
        Self {
            records,
            browse_limit: DEFAULT_BROWSE_LIMIT,
        }
    }

    /// Overrides how many records an empty query returns.
    pub fn with_browse_limit(mut self, limit: usize) -> Self {
        self.browse_limit = limit;
        self
    }

    /// All records in dataset order.
    pub fn records(&self) -> &[MovieRecord] {
        &self.records
    }

    /// Filters the catalog by title.
    ///
    /// Blank queries return the first records unfiltered; otherwise every record
    /// whose title contains the trimmed query, ignoring case, in dataset order.
    pub fn lookup(&self, query: &str) -> Vec<MovieRecord> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.records.iter().take(self.browse_limit).cloned().collect();
        }

        self.records
            .iter()
            .filter(|record| record.title_contains(&needle))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl MovieSearchProvider for FallbackCatalog {
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieRecord>, MovieSearchError> {
        Ok(self.lookup(query))
    }
}

#[allow(clippy::too_many_arguments)]
fn record(
    id: &str,
    title: &str,
    year: u16,
    poster_url: Option<&str>,
    rating: f64,
    genres: &[&str],
    overview: &str,
    runtime: u32,
) -> MovieRecord {
    MovieRecord {
        id: id.to_string(),
        title: title.to_string(),
        year: Some(year),
        poster_url: poster_url.map(str::to_string),
        rating: Some(rating),
        genres: Some(genres.iter().map(|g| g.to_string()).collect()),
        overview: Some(overview.to_string()),
        runtime: Some(runtime),
    }
}

#[allow(clippy::too_many_lines)]
fn curated_records() -> Vec<MovieRecord> {
    vec![
        record(
            "tt0111161",
            "The Shawshank Redemption",
            1994,
            Some("https://m.media-amazon.com/images/M/MV5BMDFkYTc0MGEt.jpg"),
            9.3,
            &["Drama"],
            "Two imprisoned men bond over a number of years, finding solace and eventual redemption through acts of common decency.",
            142,
        ),
        record(
            "tt0068646",
            "The Godfather",
            1972,
            Some("https://m.media-amazon.com/images/M/MV5BM2MyNjYxNmYt.jpg"),
            9.2,
            &["Crime", "Drama"],
            "An organized crime dynasty's aging patriarch transfers control of his clandestine empire to his reluctant son.",
            175,
        ),
        record(
            "tt0468569",
            "The Dark Knight",
            2008,
            Some("https://m.media-amazon.com/images/M/MV5BMTMxNTMwODM0NF5BMl5BanBnXkFtZTcw.jpg"),
            9.0,
            &["Action", "Crime", "Drama"],
            "When the menace known as the Joker wreaks havoc and chaos on the people of Gotham, Batman must accept one of the greatest psychological and physical tests.",
            152,
        ),
        record(
            "tt0109830",
            "Forrest Gump",
            1994,
            Some("https://m.media-amazon.com/images/M/MV5BMTkzOTQ2NTk1NV5BMl5BanBnXkFtZTcw.jpg"),
            8.8,
            &["Drama", "Romance"],
            "The presidencies of Kennedy and Johnson, the Vietnam War, Watergate and other history unfold through the perspective of an Alabama man.",
            142,
        ),
        record(
            "tt1375666",
            "Inception",
            2010,
            Some("https://m.media-amazon.com/images/M/MV5BMjAxMzY3NjcxNF5BMl5BanBnXkFtZTcwNTI5OTM0Mw@@._V1_SX300.jpg"),
            8.8,
            &["Action", "Adventure", "Sci-Fi"],
            "A thief who steals corporate secrets through dream-sharing technology is given the inverse task of planting an idea into the mind of a C.E.O.",
            148,
        ),
        record(
            "tt0133093",
            "The Matrix",
            1999,
            Some("https://m.media-amazon.com/images/M/MV5BNzQzOTk3OTAtNDQ0Zi00ZTVkLWI0MTEtMDllZjNkYzNjNTc4L2ltYWdlXkEyXkFqcGdeQXVyNjU0OTQ0OTY@._V1_SX300.jpg"),
            8.7,
            &["Action", "Sci-Fi"],
            "A computer hacker learns from mysterious rebels about the true nature of his reality and his role in the war against its controllers.",
            136,
        ),
        record(
            "tt0816692",
            "Interstellar",
            2014,
            Some("https://m.media-amazon.com/images/M/MV5BZjdkOTU3MDktN2IxOS00OGEyLWFmMjktY2FiMmZkNWIyODZiXkEyXkFqcGdeQXVyMTMxODk2OTU@._V1_SX300.jpg"),
            8.7,
            &["Adventure", "Drama", "Sci-Fi"],
            "A team of explorers travel through a wormhole in space in an attempt to ensure humanity's survival.",
            169,
        ),
        record(
            "tt0110912",
            "Pulp Fiction",
            1994,
            None,
            8.9,
            &["Crime", "Drama"],
            "The lives of two mob hitmen, a boxer, a gangster and his wife intertwine in four tales of violence and redemption.",
            154,
        ),
        record(
            "tt0071562",
            "The Godfather Part II",
            1974,
            None,
            9.0,
            &["Crime", "Drama"],
            "The early life and career of Vito Corleone is portrayed, while his son expands and tightens his grip on the family crime syndicate.",
            202,
        ),
        record(
            "tt0245429",
            "Spirited Away",
            2001,
            None,
            8.6,
            &["Animation", "Adventure", "Family"],
            "During her family's move to the suburbs, a sullen girl wanders into a world ruled by gods, witches and spirits.",
            125,
        ),
        record(
            "tt1160419",
            "Dune",
            2021,
            Some("https://m.media-amazon.com/images/M/MV5BN2FjNmEyNWMtYzM0ZS00NjIyLTg5YzYtYThlMGVjNzE1OGViXkEyXkFqcGdeQXVyMTkxNjUyNQ@@._V1_SX300.jpg"),
            8.0,
            &["Action", "Adventure", "Drama"],
            "A noble family becomes embroiled in a war for control over the galaxy's most valuable asset while its heir becomes troubled by visions of a dark future.",
            155,
        ),
        record(
            "tt6751668",
            "Parasite",
            2019,
            None,
            8.5,
            &["Drama", "Thriller"],
            "Greed and class discrimination threaten the newly formed symbiotic relationship between the wealthy Park family and the destitute Kim clan.",
            132,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_empty_query_returns_first_eight_in_order() {
        let catalog = FallbackCatalog::curated();
        let results = catalog.lookup("");

        assert_eq!(results.len(), DEFAULT_BROWSE_LIMIT);
        assert_eq!(results.as_slice(), &catalog.records()[..DEFAULT_BROWSE_LIMIT]);
        assert_eq!(catalog.lookup("   \t"), results);
    }

    #[test]
    fn test_dark_knight_matches_once() {
        let results = FallbackCatalog::curated().lookup("dark knight");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "tt0468569");

        let shouted = FallbackCatalog::curated().lookup("  DARK KNIGHT ");
        assert_eq!(shouted, results);
    }

    #[test]
    fn test_substring_matches_keep_dataset_order() {
        let results = FallbackCatalog::curated().lookup("godfather");
        let ids: Vec<_> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["tt0068646", "tt0071562"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        assert!(FallbackCatalog::curated().lookup("zzz-no-such-film").is_empty());
    }

    #[test]
    fn test_curated_records_are_well_formed() {
        let catalog = FallbackCatalog::curated();
        let mut ids: Vec<_> = catalog.records().iter().map(|r| r.id.clone()).collect();
        ids.sort();
        ids.dedup();

        assert_eq!(ids.len(), catalog.records().len());
        assert!(catalog.records().len() > DEFAULT_BROWSE_LIMIT);
        assert!(catalog.records().iter().all(|r| !r.title.is_empty()));
    }

    #[test]
    fn test_browse_limit_override() {
        let catalog = FallbackCatalog::curated().with_browse_limit(3);
        assert_eq!(catalog.lookup("").len(), 3);
    }

    #[tokio::test]
    async fn test_provider_never_fails() {
        let catalog = FallbackCatalog::curated();
        let results = catalog.search_movies("matrix").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "tt0133093");
    }

    proptest! {
        #[test]
        fn prop_lookup_is_substring_filter(query in "[a-zA-Z ]{1,6}") {
            let catalog = FallbackCatalog::curated();
            let needle = query.trim().to_lowercase();
            prop_assume!(!needle.is_empty());

            let expected: Vec<_> = catalog
                .records()
                .iter()
                .filter(|r| r.title.to_lowercase().contains(&needle))
                .cloned()
                .collect();
            prop_assert_eq!(catalog.lookup(&query), expected);
        }
    }
}
