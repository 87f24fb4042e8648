//! Terminal rendering of search state and movie records.

use std::io::{self, Write};

use cinescope_search::{MovieRecord, SearchSnapshot, SearchState};

pub const EMPTY_STATE: &str = "No movies found. Try a different search.";
pub const ERROR_STATE: &str = "We ran into an issue. Try again in a moment.";
const MAX_CARD_GENRES: usize = 3;

/// One-line summary used in result lists.
pub fn card_line(index: usize, record: &MovieRecord) -> String {
    let mut line = format!("{index:>2}. {}", record.title);
    if let Some(year) = record.year {
        line.push_str(&format!(" ({year})"));
    }
    if let Some(rating) = record.rating {
        line.push_str(&format!("  ★ {rating:.1}"));
    }
    let genres = record.genre_list();
    if !genres.is_empty() {
        let shown: Vec<&str> = genres
            .iter()
            .take(MAX_CARD_GENRES)
            .map(String::as_str)
            .collect();
        line.push_str(&format!("  [{}]", shown.join(", ")));
    }
    line
}

/// Full details block for a single record.
pub fn details(record: &MovieRecord) -> String {
    let mut lines = vec![record.title.clone()];

    let mut meta = record
        .year
        .map_or_else(|| "—".to_string(), |y| y.to_string());
    if let Some(runtime) = record.runtime {
        meta.push_str(&format!(" • {runtime} min"));
    }
    lines.push(meta);

    if !record.genre_list().is_empty() {
        lines.push(record.genre_list().join(" · "));
    }
    if let Some(overview) = &record.overview {
        lines.push(String::new());
        lines.push(overview.clone());
    }
    if let Some(rating) = record.rating {
        lines.push(format!("★ {rating:.1}"));
    }
    if let Some(poster) = &record.poster_url {
        lines.push(format!("Poster: {poster}"));
    }

    lines.join("\n")
}

pub fn write_records(out: &mut impl Write, records: &[MovieRecord]) -> io::Result<()> {
    if records.is_empty() {
        return writeln!(out, "{EMPTY_STATE}");
    }
    for (i, record) in records.iter().enumerate() {
        writeln!(out, "{}", card_line(i + 1, record))?;
    }
    Ok(())
}

/// Renders the whole view for one published snapshot.
pub fn write_snapshot(out: &mut impl Write, snapshot: &SearchSnapshot) -> io::Result<()> {
    if let Some(advisory) = &snapshot.advisory {
        writeln!(out, "! Something went wrong: {advisory} (:dismiss to hide)")?;
    }

    match &snapshot.state {
        SearchState::Idle => writeln!(out, "Type a title to search."),
        SearchState::Loading { query } => writeln!(out, "Searching for '{query}'…"),
        SearchState::Success { query, records } => {
            if query.is_empty() {
                writeln!(out, "Featured movies:")?;
            } else {
                writeln!(out, "Results for '{query}':")?;
            }
            write_records(out, records)
        }
        SearchState::Error { .. } => {
            writeln!(out, "{ERROR_STATE}")?;
            let previous = snapshot.visible_records();
            if previous.is_empty() {
                Ok(())
            } else {
                writeln!(out, "Previous results:")?;
                write_records(out, previous)
            }
        }
    }
}
