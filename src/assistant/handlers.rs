use std::fmt::Write as _;
use tracing::warn;

use super::session::Session;
use super::text::{
    strip_stop_words, ANIME_STOP_WORDS, DETAILS_STOP_WORDS, MAX_TITLE_WORDS,
    STREAMING_STOP_WORDS,
};
use super::Assistant;
use crate::catalog::{PopularMovie, BEST_ALL_TIME, BEST_RECENT, POPULAR_MOVIES};
use crate::models::{collection_statistics, percent, CollectionRecord, Metadata, WatchOptions};

const MAX_TICKETED: usize = 5;
const MAX_ANIME_RESULTS: usize = 3;
const MAX_RECOMMENDATIONS: usize = 6;
const MAX_GENRE_MATCHES: usize = 5;
const MAX_GENRE_POPULAR: usize = 3;
const MAX_UNWATCHED_LISTED: usize = 3;

const FANDANGO_SEARCH: &str = "https://www.fandango.com/search?q=";

pub const FALLBACK_RESPONSES: [&str; 4] = [
    "🎬 That's an interesting question! I can help you search AI Finder for movies, get detailed information, or manage your collection. What would you like to know?",
    "🤔 I'm not sure I understand completely. I'm here to help with movie searches, recommendations, and collection management using movie database data.",
    "🔍 I specialize in movie information from databases and collection management. Try asking me to search for a movie, get details, or recommend something to watch!",
    "🌟 Great question! I can fetch movie details from databases, help you discover new films, or analyze your collection. What movie-related topic can I assist with?",
];

const HELP_TEXT: &str = "🤖 **Movie Assistant with Enhanced Features**

Here's what I can help you with:

🔍 **AI Finder Movie Search & Details**
• \"Search for Inception on AI Finder\"
• \"Get details about The Dark Knight\"
• \"Find information about Parasite\"

🎯 **Streaming & Watching**
• \"Where can I watch Oppenheimer?\"
• \"Is Barbie on Netflix?\"
• \"Get tickets for Dune 2\"

🍥 **Anime Content**
• \"Find anime Demon Slayer\"
• \"Search for Jujutsu Kaisen\"
• \"Watch Attack on Titan on Crunchyroll\"

📊 **Collection Management**
• \"Analyze my movie taste\"
• \"What haven't I watched?\"
• \"My watchlist status\"

🎬 **Recommendations**
• \"Recommend action movies\"
• \"What should I watch tonight?\"
• \"Popular movies on Netflix\"

💡 **Pro Tips**:
• Use AI Finder to discover new movies
• Click \"Watch Now\" for streaming options
• Search for anime in AI Finder

What would you like to explore today?";

impl Assistant {
    pub(super) async fn streaming_response(
        &self,
        utterance: &str,
        collection: &[CollectionRecord],
    ) -> String {
        let movie_title = strip_stop_words(utterance, STREAMING_STOP_WORDS, MAX_TITLE_WORDS);
        if movie_title.is_empty() {
            return "🎬 Tell me which movie you'd like to watch! For example: 'Where can I watch Inception?' or 'Is The Dark Knight on Netflix?'".to_string();
        }

        let needle = movie_title.to_lowercase();
        let Some(movie) = collection
            .iter()
            .find(|m| m.title.to_lowercase().contains(&needle))
        else {
            return format!(
                "🎬 I couldn't find '{}' in your collection. Try searching for it in the AI Finder or add it to your collection first!",
                movie_title
            );
        };

        let options = match self
            .watch
            .get_watch_options(&movie.title, movie.year, &movie.genre)
            .await
        {
            Ok(o) => o,
            Err(e) => {
                warn!("Watch options lookup failed for '{}': {}", movie.title, e);
                WatchOptions::default()
            }
        };
        render_watch_options(movie, &options)
    }

    pub(super) async fn anime_response(&self, utterance: &str) -> String {
        let query = strip_stop_words(utterance, ANIME_STOP_WORDS, usize::MAX);
        if query.is_empty() {
            return "🍥 I can help you find anime! Try asking: 'Find anime Demon Slayer' or 'Search for Jujutsu Kaisen anime'".to_string();
        }

        let results = match self.anime.search_anime(&query).await {
            Ok(r) => r,
            Err(e) => {
                warn!("Anime search failed for '{}': {}", query, e);
                Vec::new()
            }
        };
        if results.is_empty() {
            return format!(
                "🍥 No anime found for '{}'. Try popular anime like 'Demon Slayer', 'Jujutsu Kaisen', or 'Attack on Titan'.",
                query
            );
        }

        let mut out = format!("🍥 **Anime Results for '{}'**\n\n", query);
        for anime in results.iter().take(MAX_ANIME_RESULTS) {
            let _ = writeln!(out, "• **{}** ({}) - {}", anime.title, anime.year, anime.genre);
            let _ = writeln!(out, "  [Watch on Crunchyroll]({})\n", anime.url);
        }
        out.push_str("💡 *Visit the AI Finder for more anime content!*");
        out
    }

    pub(super) async fn details_response(&self, utterance: &str) -> String {
        let movie_title = strip_stop_words(utterance, DETAILS_STOP_WORDS, MAX_TITLE_WORDS);
        if movie_title.is_empty() {
            return "🎬 Please specify which movie you'd like details about! For example: 'Get details about Inception' or 'Tell me about The Dark Knight'".to_string();
        }

        let found = match self.metadata.search_metadata(&movie_title).await {
            Ok(m) => m,
            Err(e) => {
                warn!("Metadata lookup failed for '{}': {}", movie_title, e);
                None
            }
        };
        match found {
            Some(meta) => render_metadata(&meta),
            None => format!(
                "❌ I couldn't find detailed information for '{}'. Try using the AI Finder feature for better results!",
                movie_title
            ),
        }
    }
}

fn render_watch_options(movie: &CollectionRecord, options: &WatchOptions) -> String {
    let mut out = format!("🎬 **{}** ({})\n\n", movie.title, movie.year_label());

    let available: Vec<_> = options
        .streaming
        .iter()
        .map(|(_, s)| s)
        .filter(|s| s.available)
        .collect();
    if available.is_empty() {
        out.push_str("**Streaming:** Not currently available on major platforms\n");
    } else {
        out.push_str("**Available on:**\n");
        for service in available {
            let _ = writeln!(
                out,
                "• {} **{}** - [Watch Now]({})",
                service.icon, service.name, service.url
            );
        }
    }

    if options.in_theaters {
        out.push_str("\n**🎟️ In Theaters Now!**\n");
        out.push_str("Get tickets from:\n");
        for (_, vendor) in &options.ticketing {
            let _ = writeln!(
                out,
                "• {} **{}** - [Buy Tickets]({})",
                vendor.icon, vendor.name, vendor.url
            );
        }
    }

    if let Some(anime) = &options.anime {
        out.push_str("\n**🍥 Anime Streaming:**\n");
        for (_, service) in anime {
            let _ = writeln!(
                out,
                "• {} **{}** - [Watch Anime]({})",
                service.icon, service.name, service.url
            );
        }
    }

    out.push_str("\n💡 *Click the 'Watch Now' button on the movie card for more options!*");
    out
}

fn render_metadata(meta: &Metadata) -> String {
    let na = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_string());

    let mut out = format!(
        "🎬 **{}** ({})\n\n",
        meta.title.as_deref().unwrap_or("Movie"),
        na(&meta.year)
    );
    let _ = writeln!(out, "**Director:** {}", na(&meta.director));
    let _ = writeln!(out, "**Genre:** {}", na(&meta.genre));
    let _ = writeln!(out, "**Runtime:** {}", na(&meta.runtime));

    if let Some(imdb) = meta.imdb_rating.as_deref().filter(|r| *r != "N/A") {
        let _ = writeln!(out, "**IMDB Rating:** {}/10", imdb);
    }
    for rating in &meta.ratings {
        if rating.source.contains("Rotten Tomatoes") {
            let _ = writeln!(out, "**Rotten Tomatoes:** {}", rating.value);
        } else if rating.source.contains("Metacritic") {
            let _ = writeln!(out, "**Metacritic:** {}", rating.value);
        }
    }

    let _ = writeln!(out, "**Plot:** {}\n", na(&meta.plot));
    out.push_str("💡 *Want to add this to your collection? Use the AI Finder feature!*");
    out
}

pub(super) fn ticketing_response(collection: &[CollectionRecord], current_year: i32) -> String {
    let recent: Vec<_> = collection
        .iter()
        .filter(|m| m.year.is_some_and(|y| y >= current_year - 1))
        .collect();
    if recent.is_empty() {
        return format!(
            "🎟️ No recent movies found in your collection that might be in theaters. Recent releases from {}-{} are most likely to be in theaters!",
            current_year - 1,
            current_year
        );
    }

    let mut out = String::from("🎟️ **Movies That Might Be In Theaters**\n\n");
    out.push_str("These recent movies from your collection might be in theaters:\n\n");
    for movie in recent.iter().take(MAX_TICKETED) {
        let _ = writeln!(out, "• **{}** ({})", movie.title, movie.year_label());
        let _ = writeln!(
            out,
            "  [Get Tickets]({}{})\n",
            FANDANGO_SEARCH,
            urlencoding::encode(&movie.title)
        );
    }
    out.push_str("💡 *Click 'Watch Now' on any movie card to check all ticketing options!*");
    out
}

pub(super) fn greeting_response(session: &mut Session, collection: &[CollectionRecord]) -> String {
    let total = collection.len();
    let watched = collection.iter().filter(|m| m.watched).count();

    let greetings = [
        format!("🎬 Welcome back, cinephile! I see you have {total} movies in your collection ({watched} watched). I can help you search for movies, get details, and recommend films!"),
        format!("🌟 Hello there! With {total} movies in your collection ({watched} already watched), we've got quite the film festival ahead! I can search for any movie you're curious about."),
        format!("👋 Hey movie lover! Your collection of {total} films ({watched} watched) is impressive! I can fetch detailed info or help you discover new movies."),
        format!("🎭 Greetings, film enthusiast! {total} movies and counting, {watched} of them watched. I'm here with movie database integration to provide detailed information and recommendations!"),
    ];
    session.choose(&greetings).to_string()
}

pub(super) fn recommendation_response(collection: &[CollectionRecord]) -> String {
    if collection.is_empty() {
        return "🎬 I'd love to recommend some movies! First, let's build your collection. You can also ask me to search for any movie, or try adding a few movies you enjoy!".to_string();
    }

    let mut out = String::from("🎯 **Popular Movies You Might Like**\n\n");
    let picks = POPULAR_MOVIES
        .iter()
        .filter(|m| m.streaming_service.is_some() || m.in_theaters)
        .take(MAX_RECOMMENDATIONS);
    for (i, movie) in picks.enumerate() {
        let _ = writeln!(
            out,
            "{}. **{}** ({}) - {}{}",
            i + 1,
            movie.title,
            movie.year,
            movie.genre,
            availability_tag(movie)
        );
    }
    out.push_str("\n🔍 *Use the AI Finder to search for these movies and add them to your collection!*");
    out
}

fn availability_tag(movie: &PopularMovie) -> String {
    match (movie.streaming_service, movie.in_theaters) {
        (Some(service), _) => format!(" - 📺 {}", service),
        (None, true) => " - 🎟️ In Theaters".to_string(),
        (None, false) => String::new(),
    }
}

pub(super) fn genre_response(genre: &str, collection: &[CollectionRecord]) -> String {
    let mut out = format!("🎭 **{} Movies**\n\n", capitalize(genre));

    let owned: Vec<_> = collection
        .iter()
        .filter(|m| m.genre.to_lowercase().contains(genre))
        .collect();
    if owned.is_empty() {
        let _ = writeln!(out, "You don't have any {} movies in your collection yet.", genre);
    } else {
        out.push_str("**From your collection:**\n");
        for movie in owned.iter().take(MAX_GENRE_MATCHES) {
            let status = if movie.watched { "✅ Watched" } else { "🕒 Unwatched" };
            let _ = writeln!(out, "• **{}** ({}) - {}", movie.title, movie.year_label(), status);
        }
    }

    let popular: Vec<_> = POPULAR_MOVIES
        .iter()
        .filter(|m| m.genre.to_lowercase().contains(genre))
        .take(MAX_GENRE_POPULAR)
        .collect();
    if !popular.is_empty() {
        let _ = writeln!(out, "\n**Popular {} movies:**", genre);
        for movie in popular {
            let _ = writeln!(
                out,
                "• **{}** ({}){}",
                movie.title,
                movie.year,
                availability_tag(movie)
            );
        }
    }

    let _ = write!(out, "\n🔍 *Use the AI Finder to discover more {} movies!*", genre);
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub(super) fn search_response() -> String {
    "🔍 I'd be happy to help you search for movies! Use the AI Finder section to explore the database and find new movies to add to your collection.".to_string()
}

pub(super) fn analysis_response(collection: &[CollectionRecord]) -> String {
    if collection.is_empty() {
        return "📊 I'd love to analyze your movie taste! Start by adding some films to your collection, or use the AI Finder to discover and add new movies!".to_string();
    }

    let stats = collection_statistics(collection);
    let mut out = String::from("🎯 **Your Cinema Profile**\n\n");
    let _ = writeln!(out, "• **Collection Size**: {} films", stats.total_movies);
    let _ = writeln!(
        out,
        "• **Completion Rate**: {}/{} watched ({:.1}%)",
        stats.watched_count, stats.total_movies, stats.completion_rate
    );
    let _ = writeln!(out, "• **In Theaters**: {} movies", stats.in_theaters_count);
    let _ = writeln!(out, "• **Average Rating**: {:.1} ⭐", stats.average_rating);
    out.push_str("\n🌟 **Recommendation**: Explore the AI Finder to discover more movies!");
    out
}

pub(super) fn watch_status_response(collection: &[CollectionRecord]) -> String {
    if collection.is_empty() {
        return "📝 Your collection is empty. Add some movies using the AI Finder feature to start tracking your watch progress!".to_string();
    }

    let (watched, unwatched): (Vec<_>, Vec<_>) = collection.iter().partition(|m| m.watched);

    let mut out = String::from("📊 **Watch Status Overview**\n\n");
    let _ = writeln!(out, "• Watched: {} movies", watched.len());
    let _ = writeln!(out, "• Unwatched: {} movies", unwatched.len());
    let _ = writeln!(
        out,
        "• Completion Rate: {:.1}%\n",
        percent(watched.len(), collection.len())
    );

    if !unwatched.is_empty() {
        out.push_str("🎬 **Top Unwatched Movies**:\n");
        for movie in unwatched.iter().take(MAX_UNWATCHED_LISTED) {
            let _ = writeln!(out, "• {} ({}) - {}", movie.title, movie.year_label(), movie.genre);
        }
    }

    out.push_str("\n🔍 *Find more movies to watch using AI Finder!*");
    out
}

pub(super) fn help_response() -> String {
    HELP_TEXT.to_string()
}

pub(super) fn best_of_response(utterance: &str) -> String {
    let lower = utterance.to_lowercase();
    let (heading, list) = if lower.contains("recent") || lower.contains("new") {
        ("🎬 Best Recent Movies (2020s)", &BEST_RECENT)
    } else {
        ("🏆 All-Time Greatest Movies", &BEST_ALL_TIME)
    };

    let mut out = format!("{}\n\n", heading);
    for (i, movie) in list.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, movie);
    }
    out.push_str("\n🔍 *Search AI Finder for any of these movies to get detailed information!*");
    out
}

pub(super) fn fallback_response(session: &mut Session) -> String {
    session.choose(&FALLBACK_RESPONSES).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::session::FixedPicker;

    fn record(id: i64, title: &str, genre: &str, year: i32, watched: bool) -> CollectionRecord {
        CollectionRecord::new(id, title, genre, Some(year), watched)
    }

    #[test]
    fn ticketing_keeps_last_year_and_later() {
        let collection = vec![
            record(1, "Fresh Release", "Drama", 2026, false),
            record(2, "Old Classic", "Drama", 2021, true),
            record(3, "Last Year Hit", "Comedy", 2025, false),
        ];
        let reply = ticketing_response(&collection, 2026);
        assert!(reply.contains("**Fresh Release** (2026)"));
        assert!(reply.contains("**Last Year Hit** (2025)"));
        assert!(!reply.contains("Old Classic"));
        assert!(reply.contains("https://www.fandango.com/search?q=Fresh%20Release"));
    }

    #[test]
    fn ticketing_lists_at_most_five() {
        let collection: Vec<_> = (0..8)
            .map(|i| record(i, &format!("Film {i}"), "Drama", 2026, false))
            .collect();
        let reply = ticketing_response(&collection, 2026);
        assert_eq!(reply.matches("[Get Tickets]").count(), 5);
        assert!(!reply.contains("Film 5"));
    }

    #[test]
    fn ticketing_without_recent_movies() {
        let collection = vec![CollectionRecord::new(1, "Undated", "Drama", None, false)];
        let reply = ticketing_response(&collection, 2026);
        assert!(reply.starts_with("🎟️ No recent movies found"));
        assert!(reply.contains("2025-2026"));
    }

    #[test]
    fn greeting_interpolates_counts_in_every_template() {
        let collection: Vec<_> = (0..10)
            .map(|i| record(i, &format!("Film {i}"), "Drama", 2020, i < 4))
            .collect();
        for slot in 0..4 {
            let mut session = Session::with_picker(Box::new(FixedPicker(slot)));
            let reply = greeting_response(&mut session, &collection);
            assert!(reply.contains("10"), "slot {slot}: {reply}");
            assert!(
                ["(4 watched)", "(4 already watched)", "4 of them watched"]
                    .iter()
                    .any(|p| reply.contains(p)),
                "slot {slot}: {reply}"
            );
        }
    }

    #[test]
    fn recommendations_need_a_collection() {
        assert!(recommendation_response(&[]).contains("let's build your collection"));
    }

    #[test]
    fn recommendations_skip_unavailable_entries() {
        let collection = vec![record(1, "Anything", "Drama", 2020, false)];
        let reply = recommendation_response(&collection);
        assert!(reply.contains("1. **Oppenheimer** (2023) - Drama - 📺 Prime Video"));
        assert!(!reply.contains("Past Lives"));
        assert!(reply.contains("6. "));
        assert!(!reply.contains("7. "));
    }

    #[test]
    fn genre_lists_collection_and_popular_matches() {
        let collection = vec![
            record(1, "Heat", "Action, Crime", 1995, true),
            record(2, "Amelie", "Romance", 2001, false),
        ];
        let reply = genre_response("action", &collection);
        assert!(reply.starts_with("🎭 **Action Movies**"));
        assert!(reply.contains("• **Heat** (1995) - ✅ Watched"));
        assert!(!reply.contains("Amelie"));
        assert!(reply.contains("**Top Gun: Maverick** (2022) - 📺 Prime Video"));
        assert!(reply.contains("**Gladiator II** (2024) - 🎟️ In Theaters"));
    }

    #[test]
    fn genre_without_collection_matches() {
        let reply = genre_response("horror", &[]);
        assert!(reply.contains("You don't have any horror movies in your collection yet."));
        assert!(reply.contains("Nosferatu"));
    }

    #[test]
    fn analysis_renders_statistics() {
        let mut a = record(1, "A", "Drama", 2020, true);
        a.rating = Some(9.0);
        a.in_theaters = true;
        let mut b = record(2, "B", "Drama", 2021, false);
        b.rating = Some(7.0);
        let reply = analysis_response(&[a, b]);
        assert!(reply.contains("• **Collection Size**: 2 films"));
        assert!(reply.contains("• **Completion Rate**: 1/2 watched (50.0%)"));
        assert!(reply.contains("• **In Theaters**: 1 movies"));
        assert!(reply.contains("• **Average Rating**: 8.0 ⭐"));
        assert!(analysis_response(&[]).starts_with("📊 I'd love to analyze"));
    }

    #[test]
    fn watch_status_splits_collection() {
        let collection = vec![
            record(1, "Seen One", "Drama", 2001, true),
            record(2, "Pending A", "Comedy", 2002, false),
            record(3, "Seen Two", "Drama", 2003, true),
            record(4, "Pending B", "Horror", 2004, false),
            record(5, "Pending C", "Action", 2005, false),
        ];
        let reply = watch_status_response(&collection);
        assert!(reply.contains("Watched: 2"));
        assert!(reply.contains("Unwatched: 3"));
        assert!(reply.contains("40.0%"));
        assert!(reply.contains("• Pending A (2002) - Comedy"));
        assert!(reply.contains("• Pending C (2005) - Action"));
        assert!(!reply.contains("• Seen One"));
    }

    #[test]
    fn watch_status_lists_at_most_three_unwatched() {
        let collection: Vec<_> = (0..6)
            .map(|i| record(i, &format!("Queue {i}"), "Drama", 2010, false))
            .collect();
        let reply = watch_status_response(&collection);
        assert!(reply.contains("Queue 2"));
        assert!(!reply.contains("Queue 3"));
    }

    #[test]
    fn best_of_picks_list_by_keyword() {
        let recent = best_of_response("give me the best recent movies");
        assert!(recent.starts_with("🎬 Best Recent Movies (2020s)"));
        assert!(recent.contains("1. Oppenheimer (2023)"));
        assert!(!recent.contains("The Godfather"));

        let all_time = best_of_response("top films ever");
        assert!(all_time.starts_with("🏆 All-Time Greatest Movies"));
        assert!(all_time.contains("5. Pulp Fiction (1994)"));
    }

    #[test]
    fn fallback_uses_picker_slot() {
        let mut session = Session::with_picker(Box::new(FixedPicker(2)));
        assert_eq!(fallback_response(&mut session), FALLBACK_RESPONSES[2]);
    }

    #[test]
    fn metadata_skips_missing_imdb_and_unknown_sources() {
        let meta = Metadata {
            title: Some("Heat".to_string()),
            imdb_rating: Some("N/A".to_string()),
            ratings: vec![crate::models::RatingSource {
                source: "Letterboxd".to_string(),
                value: "4.2".to_string(),
            }],
            ..Default::default()
        };
        let reply = render_metadata(&meta);
        assert!(reply.starts_with("🎬 **Heat** (N/A)"));
        assert!(!reply.contains("IMDB Rating"));
        assert!(!reply.contains("Letterboxd"));
        assert!(reply.contains("**Director:** N/A"));
    }
}
