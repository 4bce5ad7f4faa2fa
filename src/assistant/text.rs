pub(crate) const STREAMING_STOP_WORDS: &[&str] = &[
    "watch",
    "stream",
    "where",
    "to",
    "on",
    "netflix",
    "amazon",
    "prime",
    "disney",
    "hulu",
    "hbo",
    "youtube",
    "crunchyroll",
];

pub(crate) const ANIME_STOP_WORDS: &[&str] = &["anime", "watch", "find", "search"];

pub(crate) const DETAILS_STOP_WORDS: &[&str] =
    &["details", "info", "about", "movie", "get", "tell", "me"];

/// Title-bearing words kept from an utterance when extracting a title.
pub(crate) const MAX_TITLE_WORDS: usize = 4;

/// Drops whitespace-separated words whose lower-case form is a stop word and
/// rejoins the rest, keeping at most `max_words` of them.
pub(crate) fn strip_stop_words(utterance: &str, stop_words: &[&str], max_words: usize) -> String {
    utterance
        .split_whitespace()
        .filter(|w| !stop_words.contains(&w.to_lowercase().as_str()))
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_streaming_words_case_insensitively() {
        let title = strip_stop_words("Where to WATCH Dune on Netflix", STREAMING_STOP_WORDS, 4);
        assert_eq!(title, "Dune");
    }

    #[test]
    fn keeps_only_the_first_title_words() {
        let title = strip_stop_words(
            "tell me about The Lord of the Rings",
            DETAILS_STOP_WORDS,
            MAX_TITLE_WORDS,
        );
        assert_eq!(title, "The Lord of the");
    }

    #[test]
    fn punctuation_stays_attached() {
        let title = strip_stop_words("watch Inception?", STREAMING_STOP_WORDS, MAX_TITLE_WORDS);
        assert_eq!(title, "Inception?");
    }

    #[test]
    fn nothing_left_after_stripping() {
        assert!(strip_stop_words("stream on hulu", STREAMING_STOP_WORDS, 4).is_empty());
    }
}
