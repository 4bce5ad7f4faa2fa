use serde::Serialize;
use std::fmt::Write as _;
use tracing::{debug, warn};

use super::Assistant;
use crate::catalog::POPULAR_MOVIES;
use crate::models::{AnimeResult, Metadata};

const MAX_SUGGESTIONS: usize = 3;

/// Movies and anime matching one AI Finder query.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub movies: Vec<Metadata>,
    pub anime: Vec<AnimeResult>,
}

impl SearchResults {
    pub fn total(&self) -> usize {
        self.movies.len() + self.anime.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn render(&self) -> String {
        if self.query.is_empty() {
            return "🔍 Enter a movie title, anime, or genre to search across all platforms.".to_string();
        }
        if self.is_empty() {
            return render_no_results(&self.query);
        }

        let mut out = format!("🎯 **Found {} Results**\n", self.total());

        if !self.movies.is_empty() {
            out.push_str("\n#### 🎬 Movies & Series\n");
            for movie in &self.movies {
                let _ = writeln!(
                    out,
                    "• **{}** ({}) - {}",
                    movie.title.as_deref().unwrap_or("Movie"),
                    movie.year.as_deref().unwrap_or("N/A"),
                    movie.genre.as_deref().unwrap_or("N/A")
                );
                if let Some(imdb) = movie.imdb_rating.as_deref().filter(|r| *r != "N/A") {
                    let _ = writeln!(out, "  ⭐ IMDB {}/10", imdb);
                }
            }
        }

        if !self.anime.is_empty() {
            out.push_str("\n#### 🍥 Anime\n");
            for anime in &self.anime {
                let _ = writeln!(out, "• **{}** ({}) - {}", anime.title, anime.year, anime.genre);
                let _ = writeln!(out, "  [Watch on Crunchyroll]({})", anime.url);
            }
        }
        out
    }
}

fn render_no_results(query: &str) -> String {
    let mut out = format!(
        "🔍 No results found for '{}'. Try a different search term or check our recommendations below.\n\n",
        query
    );
    out.push_str("🔥 **Popular Right Now**\n");
    for movie in POPULAR_MOVIES
        .iter()
        .filter(|m| m.streaming_service.is_some())
        .take(MAX_SUGGESTIONS)
    {
        let _ = writeln!(out, "• **{}** ({}) - {}", movie.title, movie.year, movie.genre);
    }
    out
}

impl Assistant {
    /// Sends one query to the movie and anime providers at once.
    ///
    /// A failing provider contributes no results instead of failing the search.
    pub async fn search(&self, query: &str) -> SearchResults {
        let query = query.trim();
        if query.is_empty() {
            return SearchResults::default();
        }

        let (movies, anime) = tokio::join!(
            self.metadata.search_movies(query),
            self.anime.search_anime(query)
        );
        let movies = movies.unwrap_or_else(|e| {
            warn!("Movie search failed for '{}': {}", query, e);
            Vec::new()
        });
        let anime = anime.unwrap_or_else(|e| {
            warn!("Anime search failed for '{}': {}", query, e);
            Vec::new()
        });
        debug!(query = %query, movies = movies.len(), anime = anime.len(), "finder search");

        SearchResults {
            query: query.to_string(),
            movies,
            anime,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_results_suggest_popular_movies() {
        let results = SearchResults {
            query: "zzz".to_string(),
            ..Default::default()
        };
        let text = results.render();
        assert!(text.starts_with("🔍 No results found for 'zzz'."));
        assert!(text.contains("• **Oppenheimer** (2023) - Drama"));
        assert!(!text.contains("Past Lives"));
        assert_eq!(text.matches("• ").count(), MAX_SUGGESTIONS);
    }

    #[test]
    fn blank_query_asks_for_input() {
        assert!(SearchResults::default().render().starts_with("🔍 Enter a movie title"));
    }

    #[tokio::test]
    async fn offline_search_combines_movies_and_anime() {
        let results = Assistant::offline().search("drama").await;
        assert_eq!(results.movies.len(), 4);
        assert_eq!(results.anime.len(), 2);
        let text = results.render();
        assert!(text.starts_with("🎯 **Found 6 Results**"));
        assert!(text.contains("• **Parasite** (2019) - Drama, Thriller\n  ⭐ IMDB 8.5/10"));
        assert!(text.contains("• **Your Name** (2016) - Romance, Drama"));
    }
}
