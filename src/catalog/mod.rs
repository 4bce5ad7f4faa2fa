//! Static tables bundled with the assistant, plus offline implementations of
//! the provider traits built on top of them.
use once_cell::sync::Lazy;

mod anime;
mod metadata;
mod watch;

pub use anime::CatalogAnime;
pub use metadata::CatalogMetadata;
pub use watch::CatalogResolver;

#[derive(Debug, Clone, PartialEq)]
pub struct PopularMovie {
    pub title: &'static str,
    pub year: i32,
    pub genre: &'static str,
    pub streaming_service: Option<&'static str>,
    pub in_theaters: bool,
}

const fn popular(
    title: &'static str,
    year: i32,
    genre: &'static str,
    streaming_service: Option<&'static str>,
    in_theaters: bool,
) -> PopularMovie {
    PopularMovie {
        title,
        year,
        genre,
        streaming_service,
        in_theaters,
    }
}

pub static POPULAR_MOVIES: Lazy<Vec<PopularMovie>> = Lazy::new(|| {
    vec![
        popular("Oppenheimer", 2023, "Drama", Some("Prime Video"), false),
        popular("Past Lives", 2023, "Romance", None, false),
        popular("Barbie", 2023, "Comedy", Some("Max"), false),
        popular("Dune: Part Two", 2024, "Sci-Fi", Some("Max"), false),
        popular(
            "Spider-Man: Across the Spider-Verse",
            2023,
            "Animation",
            Some("Netflix"),
            false,
        ),
        popular("Top Gun: Maverick", 2022, "Action", Some("Prime Video"), false),
        popular("Wicked", 2024, "Musical", None, true),
        popular("Poor Things", 2023, "Comedy", Some("Hulu"), false),
        popular("Gladiator II", 2024, "Action", None, true),
        popular("Nosferatu", 2024, "Horror", None, true),
        popular("Civil War", 2024, "Thriller", Some("Max"), false),
        popular("Inside Out 2", 2024, "Animation", Some("Disney+"), false),
        popular("The Godfather", 1972, "Crime", None, false),
    ]
});

pub const BEST_ALL_TIME: [&str; 5] = [
    "The Godfather (1972) - Crime epic masterpiece",
    "The Shawshank Redemption (1994) - Ultimate story of hope",
    "The Dark Knight (2008) - Superhero cinema perfected",
    "Parasite (2019) - Brilliant social thriller",
    "Pulp Fiction (1994) - Revolutionary storytelling",
];

pub const BEST_RECENT: [&str; 5] = [
    "Oppenheimer (2023) - Historical drama masterpiece",
    "Spider-Man: Across the Spider-Verse (2023) - Animation revolution",
    "Dune (2021) - Epic sci-fi spectacle",
    "Everything Everywhere All At Once (2022) - Multiverse madness",
    "The Batman (2022) - Dark detective thriller",
];

pub fn find_popular(title: &str) -> Option<&'static PopularMovie> {
    let key = normalize_title_key(title);
    POPULAR_MOVIES
        .iter()
        .find(|m| normalize_title_key(m.title) == key)
}

/// Lower-cased title with surrounding punctuation and whitespace removed.
pub(crate) fn normalize_title_key(input: &str) -> String {
    input
        .trim()
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}
