use anyhow::Result;
use async_trait::async_trait;
use chrono::{Datelike, Local};

use super::find_popular;
use crate::models::{ServiceLink, WatchOptions};
use crate::providers::WatchResolver;

// (key, name, icon, search url prefix)
const STREAMING: &[(&str, &str, &str, &str)] = &[
    ("netflix", "Netflix", "🔴", "https://www.netflix.com/search?q="),
    ("prime", "Prime Video", "📦", "https://www.amazon.com/s?i=instant-video&k="),
    ("disney", "Disney+", "🏰", "https://www.disneyplus.com/search?q="),
    ("hulu", "Hulu", "🟢", "https://www.hulu.com/search?q="),
    ("max", "Max", "🟣", "https://play.max.com/search?q="),
    ("youtube", "YouTube", "▶️", "https://www.youtube.com/results?search_query="),
];

const TICKETING: &[(&str, &str, &str, &str)] = &[
    ("fandango", "Fandango", "🎟️", "https://www.fandango.com/search?q="),
    ("amc", "AMC Theatres", "🍿", "https://www.amctheatres.com/search?q="),
    ("regal", "Regal", "🎬", "https://www.regmovies.com/search?query="),
];

const ANIME_SERVICES: &[(&str, &str, &str, &str)] = &[
    ("crunchyroll", "Crunchyroll", "🍥", "https://www.crunchyroll.com/search?q="),
    ("hidive", "HIDIVE", "🌀", "https://www.hidive.com/search?q="),
];

/// Availability derived from the popular-movies table and the release year.
#[derive(Debug, Clone)]
pub struct CatalogResolver {
    current_year: i32,
}

impl Default for CatalogResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogResolver {
    pub fn new() -> Self {
        Self::with_year(Local::now().year())
    }

    pub fn with_year(current_year: i32) -> Self {
        Self { current_year }
    }

    pub fn resolve(&self, title: &str, year: Option<i32>, genre: &str) -> WatchOptions {
        let popular = find_popular(title);
        let service = popular.and_then(|m| m.streaming_service);
        let encoded = urlencoding::encode(title);

        let streaming = STREAMING
            .iter()
            .map(|(key, name, icon, base)| {
                let available = service.is_some_and(|s| s.eq_ignore_ascii_case(name));
                (key.to_string(), link(name, icon, base, &encoded, available))
            })
            .collect();

        let ticketing = TICKETING
            .iter()
            .map(|(key, name, icon, base)| (key.to_string(), link(name, icon, base, &encoded, true)))
            .collect();

        let genre_lower = genre.to_lowercase();
        let anime = if genre_lower.contains("anime") || genre_lower.contains("animation") {
            Some(
                ANIME_SERVICES
                    .iter()
                    .map(|(key, name, icon, base)| {
                        (key.to_string(), link(name, icon, base, &encoded, true))
                    })
                    .collect(),
            )
        } else {
            None
        };

        let in_theaters = match popular {
            Some(m) => m.in_theaters,
            None => year.is_some_and(|y| y >= self.current_year),
        };

        WatchOptions {
            streaming,
            ticketing,
            anime,
            in_theaters,
        }
    }
}

fn link(name: &str, icon: &str, base: &str, encoded_title: &str, available: bool) -> ServiceLink {
    ServiceLink {
        name: name.to_string(),
        icon: icon.to_string(),
        url: format!("{base}{encoded_title}"),
        available,
    }
}

#[async_trait]
impl WatchResolver for CatalogResolver {
    async fn get_watch_options(
        &self,
        title: &str,
        year: Option<i32>,
        genre: &str,
    ) -> Result<WatchOptions> {
        Ok(self.resolve(title, year, genre))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_only_the_listed_service_available() {
        let options = CatalogResolver::with_year(2026).resolve("Barbie", Some(2023), "Comedy");
        let available: Vec<_> = options
            .streaming
            .iter()
            .filter(|(_, s)| s.available)
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(available, vec!["max"]);
        assert!(!options.in_theaters);
        assert!(options.anime.is_none());
        assert_eq!(
            options.ticketing[0].1.url,
            "https://www.fandango.com/search?q=Barbie"
        );
    }

    #[test]
    fn unknown_titles_are_in_theaters_only_in_the_current_year() {
        let resolver = CatalogResolver::with_year(2026);
        assert!(resolver.resolve("Brand New Film", Some(2026), "Drama").in_theaters);
        assert!(!resolver.resolve("Old Film", Some(2019), "Drama").in_theaters);
        assert!(!resolver.resolve("Undated Film", None, "Drama").in_theaters);
    }

    #[test]
    fn animation_gets_anime_services() {
        let options = CatalogResolver::with_year(2026).resolve(
            "Spider-Man: Across the Spider-Verse",
            Some(2023),
            "Animation",
        );
        let anime = options.anime.unwrap();
        assert_eq!(anime[0].1.name, "Crunchyroll");
        assert!(anime[0].1.url.contains("Spider-Man%3A%20Across"));
    }
}
