use anyhow::Result;
use async_trait::async_trait;

use crate::models::AnimeResult;
use crate::providers::AnimeProvider;

const CRUNCHYROLL_SEARCH: &str = "https://www.crunchyroll.com/search?q=";

const ANIME: &[(&str, &str, &str)] = &[
    ("Demon Slayer: Kimetsu no Yaiba", "2019", "Action, Fantasy"),
    ("Jujutsu Kaisen", "2020", "Action, Supernatural"),
    ("Attack on Titan", "2013", "Action, Drama"),
    ("Spy x Family", "2022", "Comedy, Action"),
    ("Frieren: Beyond Journey's End", "2023", "Adventure, Fantasy"),
    ("One Piece", "1999", "Adventure, Comedy"),
    ("Chainsaw Man", "2022", "Action, Horror"),
    ("Your Name", "2016", "Romance, Drama"),
];

/// Anime search over a bundled list of popular titles.
#[derive(Debug, Clone, Default)]
pub struct CatalogAnime;

impl CatalogAnime {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AnimeProvider for CatalogAnime {
    async fn search_anime(&self, query: &str) -> Result<Vec<AnimeResult>> {
        let words: Vec<String> = query
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        if words.is_empty() {
            return Ok(Vec::new());
        }

        let hits = ANIME
            .iter()
            .filter(|(title, _, genre)| {
                let haystack = format!("{} {}", title, genre).to_lowercase();
                words.iter().all(|w| haystack.contains(w.as_str()))
            })
            .map(|(title, year, genre)| AnimeResult {
                title: title.to_string(),
                year: year.to_string(),
                genre: genre.to_string(),
                url: format!("{CRUNCHYROLL_SEARCH}{}", urlencoding::encode(title)),
            })
            .collect();
        Ok(hits)
    }
}
