use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use tracing::debug;

use super::normalize_title_key;
use crate::models::{Metadata, RatingSource};
use crate::providers::MetadataProvider;

/// Metadata lookups served from a bundled table instead of a remote API.
#[derive(Debug, Clone, Default)]
pub struct CatalogMetadata;

impl CatalogMetadata {
    pub fn new() -> Self {
        Self
    }
}

struct Entry {
    title: &'static str,
    year: &'static str,
    director: &'static str,
    genre: &'static str,
    runtime: &'static str,
    plot: &'static str,
    imdb: &'static str,
    rotten_tomatoes: &'static str,
    metacritic: &'static str,
}

static ENTRIES: Lazy<Vec<Entry>> = Lazy::new(|| {
    vec![
        Entry {
            title: "Inception",
            year: "2010",
            director: "Christopher Nolan",
            genre: "Action, Adventure, Sci-Fi",
            runtime: "148 min",
            plot: "A thief who steals corporate secrets through the use of dream-sharing technology is given the inverse task of planting an idea into the mind of a C.E.O.",
            imdb: "8.8",
            rotten_tomatoes: "87%",
            metacritic: "74/100",
        },
        Entry {
            title: "The Dark Knight",
            year: "2008",
            director: "Christopher Nolan",
            genre: "Action, Crime, Drama",
            runtime: "152 min",
            plot: "When the menace known as the Joker wreaks havoc and chaos on the people of Gotham, Batman must accept one of the greatest psychological and physical tests of his ability to fight injustice.",
            imdb: "9.0",
            rotten_tomatoes: "94%",
            metacritic: "84/100",
        },
        Entry {
            title: "Parasite",
            year: "2019",
            director: "Bong Joon Ho",
            genre: "Drama, Thriller",
            runtime: "132 min",
            plot: "Greed and class discrimination threaten the newly formed symbiotic relationship between the wealthy Park family and the destitute Kim clan.",
            imdb: "8.5",
            rotten_tomatoes: "99%",
            metacritic: "96/100",
        },
        Entry {
            title: "Oppenheimer",
            year: "2023",
            director: "Christopher Nolan",
            genre: "Biography, Drama, History",
            runtime: "180 min",
            plot: "The story of American scientist J. Robert Oppenheimer and his role in the development of the atomic bomb.",
            imdb: "8.3",
            rotten_tomatoes: "93%",
            metacritic: "90/100",
        },
        Entry {
            title: "The Godfather",
            year: "1972",
            director: "Francis Ford Coppola",
            genre: "Crime, Drama",
            runtime: "175 min",
            plot: "The aging patriarch of an organized crime dynasty transfers control of his clandestine empire to his reluctant son.",
            imdb: "9.2",
            rotten_tomatoes: "97%",
            metacritic: "100/100",
        },
    ]
});

impl Entry {
    fn to_metadata(&self) -> Metadata {
        Metadata {
            title: Some(self.title.to_string()),
            year: Some(self.year.to_string()),
            director: Some(self.director.to_string()),
            genre: Some(self.genre.to_string()),
            runtime: Some(self.runtime.to_string()),
            plot: Some(self.plot.to_string()),
            imdb_rating: Some(self.imdb.to_string()),
            ratings: vec![
                RatingSource {
                    source: "Internet Movie Database".to_string(),
                    value: format!("{}/10", self.imdb),
                },
                RatingSource {
                    source: "Rotten Tomatoes".to_string(),
                    value: self.rotten_tomatoes.to_string(),
                },
                RatingSource {
                    source: "Metacritic".to_string(),
                    value: self.metacritic.to_string(),
                },
            ],
        }
    }
}

#[async_trait]
impl MetadataProvider for CatalogMetadata {
    async fn search_metadata(&self, title: &str) -> Result<Option<Metadata>> {
        let key = normalize_title_key(title);
        if key.is_empty() {
            return Ok(None);
        }
        let exact = ENTRIES.iter().find(|e| e.title.to_lowercase() == key);
        let entry = exact.or_else(|| {
            ENTRIES
                .iter()
                .find(|e| e.title.to_lowercase().contains(&key))
        });
        debug!(query = %title, found = entry.is_some(), "catalog metadata lookup");
        Ok(entry.map(Entry::to_metadata))
    }

    async fn search_movies(&self, query: &str) -> Result<Vec<Metadata>> {
        let key = normalize_title_key(query);
        if key.is_empty() {
            return Ok(Vec::new());
        }
        let hits: Vec<_> = ENTRIES
            .iter()
            .filter(|e| {
                e.title.to_lowercase().contains(&key) || e.genre.to_lowercase().contains(&key)
            })
            .map(Entry::to_metadata)
            .collect();
        debug!(query = %query, hits = hits.len(), "catalog movie search");
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn exact_title_wins_over_partial() {
        let meta = CatalogMetadata::new()
            .search_metadata("the godfather")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(meta.director.as_deref(), Some("Francis Ford Coppola"));
    }

    #[tokio::test]
    async fn trailing_punctuation_is_ignored() {
        let meta = CatalogMetadata::new()
            .search_metadata("Inception?")
            .await
            .unwrap();
        assert_eq!(meta.unwrap().year.as_deref(), Some("2010"));
    }

    #[tokio::test]
    async fn movie_search_matches_titles_and_genres() {
        let catalog = CatalogMetadata::new();
        let titles = |found: Vec<Metadata>| -> Vec<String> {
            found.into_iter().filter_map(|m| m.title).collect()
        };
        assert_eq!(
            titles(catalog.search_movies("dark knight").await.unwrap()),
            vec!["The Dark Knight"]
        );
        assert_eq!(
            titles(catalog.search_movies("Crime").await.unwrap()),
            vec!["The Dark Knight", "The Godfather"]
        );
        assert!(catalog.search_movies("  ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_title_is_not_found() {
        let meta = CatalogMetadata::new()
            .search_metadata("Zzyzx Road")
            .await
            .unwrap();
        assert!(meta.is_none());
    }
}
