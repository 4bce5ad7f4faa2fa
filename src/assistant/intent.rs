/// The fixed set of requests the assistant recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Streaming,
    Ticketing,
    Anime,
    Greeting,
    Recommendation,
    Genre,
    Details,
    Search,
    Analysis,
    WatchStatus,
    Help,
    BestOf,
    Fallback,
}

pub(crate) const GENRE_KEYWORDS: &[&str] = &[
    "action", "comedy", "drama", "sci-fi", "romance", "horror", "thriller",
];

/// Evaluated top to bottom; the first entry with a keyword contained in the
/// lower-cased utterance wins.
pub const INTENT_TABLE: &[(Intent, &[&str])] = &[
    (
        Intent::Streaming,
        &[
            "watch",
            "stream",
            "where to watch",
            "netflix",
            "amazon",
            "hulu",
            "disney",
            "youtube",
        ],
    ),
    (
        Intent::Ticketing,
        &["ticket", "theater", "cinema", "buy ticket"],
    ),
    (Intent::Anime, &["anime", "crunchyroll"]),
    (Intent::Greeting, &["hello", "hi", "hey", "greetings"]),
    (
        Intent::Recommendation,
        &[
            "recommend",
            "suggest",
            "what should i watch",
            "what to watch",
        ],
    ),
    (Intent::Genre, GENRE_KEYWORDS),
    (
        Intent::Details,
        &["details", "info", "about movie", "tell me about"],
    ),
    (Intent::Search, &["search", "find movie", "look for"]),
    (
        Intent::Analysis,
        &["analyze", "stats", "statistics", "my collection", "how many"],
    ),
    (Intent::WatchStatus, &["watched", "unwatched", "watchlist"]),
    (Intent::Help, &["help", "what can you do", "features"]),
    (Intent::BestOf, &["best", "top", "greatest"]),
];

impl Intent {
    pub fn classify(utterance: &str) -> Intent {
        let lower = utterance.to_lowercase();
        INTENT_TABLE
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(intent, _)| *intent)
            .unwrap_or(Intent::Fallback)
    }
}

/// First genre keyword, in table order, found in the utterance.
pub(crate) fn matched_genre(utterance: &str) -> Option<&'static str> {
    let lower = utterance.to_lowercase();
    GENRE_KEYWORDS.iter().copied().find(|g| lower.contains(g))
}
