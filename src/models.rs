use serde::{Deserialize, Serialize};

/// A movie or show the user saved in their collection.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CollectionRecord {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub watched: bool,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub in_theaters: bool,
}

impl CollectionRecord {
    pub fn new(id: i64, title: &str, genre: &str, year: Option<i32>, watched: bool) -> Self {
        Self {
            id,
            title: title.to_string(),
            genre: genre.to_string(),
            year,
            watched,
            rating: None,
            in_theaters: false,
        }
    }

    pub fn year_label(&self) -> String {
        year_label(self.year)
    }
}

pub(crate) fn year_label(year: Option<i32>) -> String {
    year.map(|y| y.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Canonical movie facts, shaped like an OMDb response.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Metadata {
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "Year", default)]
    pub year: Option<String>,
    #[serde(rename = "Director", default)]
    pub director: Option<String>,
    #[serde(rename = "Genre", default)]
    pub genre: Option<String>,
    #[serde(rename = "Runtime", default)]
    pub runtime: Option<String>,
    #[serde(rename = "Plot", default)]
    pub plot: Option<String>,
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: Option<String>,
    #[serde(rename = "Ratings", default)]
    pub ratings: Vec<RatingSource>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RatingSource {
    #[serde(rename = "Source", default)]
    pub source: String,
    #[serde(rename = "Value", default)]
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AnimeResult {
    pub title: String,
    pub year: String,
    pub genre: String,
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ServiceLink {
    pub name: String,
    pub icon: String,
    pub url: String,
    #[serde(default)]
    pub available: bool,
}

/// Where a title can be streamed or ticketed right now.
///
/// Service lists keep the resolver's order, which is also the render order.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct WatchOptions {
    pub streaming: Vec<(String, ServiceLink)>,
    pub ticketing: Vec<(String, ServiceLink)>,
    #[serde(default)]
    pub anime: Option<Vec<(String, ServiceLink)>>,
    #[serde(default)]
    pub in_theaters: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CollectionStats {
    pub total_movies: usize,
    pub watched_count: usize,
    pub completion_rate: f64,
    pub in_theaters_count: usize,
    pub average_rating: f64,
}

pub fn collection_statistics(collection: &[CollectionRecord]) -> CollectionStats {
    let total_movies = collection.len();
    let watched_count = collection.iter().filter(|m| m.watched).count();
    let in_theaters_count = collection.iter().filter(|m| m.in_theaters).count();
    let ratings: Vec<f32> = collection.iter().filter_map(|m| m.rating).collect();
    let average_rating = if ratings.is_empty() {
        0.0
    } else {
        ratings.iter().map(|r| *r as f64).sum::<f64>() / ratings.len() as f64
    };

    CollectionStats {
        total_movies,
        watched_count,
        completion_rate: percent(watched_count, total_movies),
        in_theaters_count,
        average_rating,
    }
}

pub(crate) fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_defaults_missing_flags_to_unwatched() {
        let record: CollectionRecord =
            serde_json::from_str(r#"{"id": 3, "title": "Heat", "genre": "Crime"}"#).unwrap();
        assert!(!record.watched);
        assert!(!record.in_theaters);
        assert_eq!(record.year_label(), "N/A");
    }

    #[test]
    fn metadata_reads_omdb_field_names() {
        let raw = r#"{
            "Title": "Inception",
            "Year": "2010",
            "imdbRating": "8.8",
            "Ratings": [{"Source": "Metacritic", "Value": "74/100"}]
        }"#;
        let meta: Metadata = serde_json::from_str(raw).unwrap();
        assert_eq!(meta.title.as_deref(), Some("Inception"));
        assert_eq!(meta.imdb_rating.as_deref(), Some("8.8"));
        assert_eq!(meta.ratings[0].source, "Metacritic");
        assert!(meta.director.is_none());
    }

    #[test]
    fn statistics_average_only_rated_records() {
        let mut a = CollectionRecord::new(1, "A", "Drama", Some(2001), true);
        a.rating = Some(8.0);
        let mut b = CollectionRecord::new(2, "B", "Drama", Some(2002), false);
        b.rating = Some(6.0);
        b.in_theaters = true;
        let c = CollectionRecord::new(3, "C", "Drama", None, false);

        let stats = collection_statistics(&[a, b, c]);
        assert_eq!(stats.total_movies, 3);
        assert_eq!(stats.watched_count, 1);
        assert_eq!(stats.in_theaters_count, 1);
        assert!((stats.average_rating - 7.0).abs() < f64::EPSILON);
        assert_eq!(format!("{:.1}", stats.completion_rate), "33.3");
    }

    #[test]
    fn statistics_of_empty_collection_are_zero() {
        let stats = collection_statistics(&[]);
        assert_eq!(stats.total_movies, 0);
        assert_eq!(stats.completion_rate, 0.0);
        assert_eq!(stats.average_rating, 0.0);
    }
}
