//! Lenient decoding of backend JSON fields.
//!
//! The recommendation service serializes documents straight out of its
//! database, so the same logical field arrives in several shapes:
//! - movieId: `"1193"` or `1193`
//! - genres: `"Action|Sci-Fi"` or `["Action", "Sci-Fi"]`
//! - year / counts: integers, floats (`1995.0`) or `null`
//!
//! These helpers are used through `#[serde(deserialize_with = ...)]` on the
//! value types in [`crate::types`].

use serde::de::{Deserializer, Error as DeError};
use serde::ser::Serializer;
use serde::Deserialize;
use serde_json::{Number, Value};

use crate::types::{GenreId, MovieId};

/// Separator used by the backend for genre lists
pub const GENRE_SEPARATOR: char = '|';

/// Genre token the backend uses for movies without genres
const NO_GENRE_TOKEN: &str = "(no genres listed)";

/// Split a pipe-delimited genre string into an ordered list of genre ids.
///
/// Empty tokens and the "(no genres listed)" placeholder are dropped,
/// order is preserved.
///
/// Example: "Animation|Children's|Comedy" -> ["Animation", "Children's", "Comedy"]
pub fn parse_genres(raw: &str) -> Vec<GenreId> {
    raw.split(GENRE_SEPARATOR)
        .map(str::trim)
        .filter(|token| !token.is_empty() && *token != NO_GENRE_TOKEN)
        .map(str::to_string)
        .collect()
}

/// Join genre ids back into the pipe-delimited wire form
pub fn join_genres(genres: &[GenreId]) -> String {
    genres.join(&GENRE_SEPARATOR.to_string())
}

/// Extract a release year from a title like "Toy Story (1995)"
pub fn extract_year_from_title(title: &str) -> Option<u16> {
    // Year sits in the last parenthesised group of the title
    let start = title.rfind('(')?;
    let end = title.rfind(')')?;
    if start < end {
        let year_str = &title[start + 1..end];
        if year_str.len() == 4 {
            if let Ok(year) = year_str.parse::<u16>() {
                return Some(year);
            }
        }
    }
    None
}

fn number_to_id(n: &Number) -> String {
    if let Some(v) = n.as_u64() {
        return v.to_string();
    }
    if let Some(v) = n.as_i64() {
        return v.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

fn number_to_u64(n: &Number) -> Option<u64> {
    n.as_u64().or_else(|| {
        n.as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f.round() as u64)
    })
}

pub(crate) fn movie_id<'de, D>(deserializer: D) -> Result<MovieId, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(number_to_id(&n)),
        other => Err(D::Error::custom(format!("invalid movieId: {other}"))),
    }
}

pub(crate) fn genre_list<'de, D>(deserializer: D) -> Result<Vec<GenreId>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => Ok(parse_genres(&s)),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(D::Error::custom(format!("invalid genre: {other}"))),
            })
            .collect(),
        other => Err(D::Error::custom(format!("invalid genres: {other}"))),
    }
}

pub(crate) fn serialize_genre_list<S>(genres: &[GenreId], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&join_genres(genres))
}

pub(crate) fn optional_year<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(number_to_u64(&n).and_then(|y| u16::try_from(y).ok())),
        Value::String(s) => Ok(s.trim().parse::<u16>().ok()),
        other => Err(D::Error::custom(format!("invalid year: {other}"))),
    }
}

pub(crate) fn optional_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(number_to_u64(&n)),
        other => Err(D::Error::custom(format!("invalid count: {other}"))),
    }
}

pub(crate) fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_count(deserializer)?.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_genres_preserves_order() {
        let genres = parse_genres("Thriller|Mystery|Crime");
        assert_eq!(genres, vec!["Thriller", "Mystery", "Crime"]);
    }

    #[test]
    fn test_parse_genres_drops_placeholders() {
        assert!(parse_genres("").is_empty());
        assert!(parse_genres("(no genres listed)").is_empty());
        assert_eq!(parse_genres("Drama||War"), vec!["Drama", "War"]);
    }

    #[test]
    fn test_join_genres() {
        let genres = vec!["Action".to_string(), "Sci-Fi".to_string()];
        assert_eq!(join_genres(&genres), "Action|Sci-Fi");
    }

    #[test]
    fn test_extract_year_from_title() {
        assert_eq!(extract_year_from_title("Toy Story (1995)"), Some(1995));
        assert_eq!(extract_year_from_title("City of Lost Children, The (Cité des enfants perdus, La) (1995)"), Some(1995));
        assert_eq!(extract_year_from_title("Heat"), None);
        assert_eq!(extract_year_from_title("Se7en (Director's Cut)"), None);
    }

    #[test]
    fn test_number_to_id_drops_float_suffix() {
        let n = Number::from_f64(42.0).unwrap();
        assert_eq!(number_to_id(&n), "42");
        assert_eq!(number_to_id(&Number::from(7u64)), "7");
    }
}
