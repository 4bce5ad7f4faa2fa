use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const MAX_HISTORY_TURNS: usize = 50;

const GENRE_HINTS: &[(&str, &[&str])] = &[
    ("action", &["action", "fight", "adventure", "thriller", "exciting"]),
    ("comedy", &["comedy", "funny", "laugh", "humor", "hilarious"]),
    ("drama", &["drama", "emotional", "serious", "story", "deep"]),
    ("sci-fi", &["sci-fi", "science fiction", "future", "space", "alien"]),
    ("romance", &["romance", "love", "relationship", "romantic", "couple"]),
    ("anime", &["anime", "manga", "japanese animation"]),
];

/// Uniform choice over a fixed list of canned replies.
pub trait Picker: Send {
    /// Returns an index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

pub struct RandomPicker {
    rng: StdRng,
}

impl RandomPicker {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Picker for RandomPicker {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len.max(1))
    }
}

/// Always picks the same slot, clamped to the list length.
#[derive(Debug, Clone, Copy)]
pub struct FixedPicker(pub usize);

impl Picker for FixedPicker {
    fn pick(&mut self, len: usize) -> usize {
        self.0.min(len.saturating_sub(1))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceProfile {
    favorite_genres: Vec<String>,
}

impl PreferenceProfile {
    pub fn favorite_genres(&self) -> &[String] {
        &self.favorite_genres
    }

    /// Adds `genre` unless already present. Returns whether it was new.
    pub fn add_genre(&mut self, genre: &str) -> bool {
        if self.favorite_genres.iter().any(|g| g == genre) {
            return false;
        }
        self.favorite_genres.push(genre.to_string());
        true
    }

    pub fn update_from(&mut self, utterance: &str) {
        let lower = utterance.to_lowercase();
        for (genre, hints) in GENRE_HINTS {
            if hints.iter().any(|h| lower.contains(h)) {
                self.add_genre(genre);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

/// Everything the assistant remembers about one user between utterances.
pub struct Session {
    profile: PreferenceProfile,
    history: VecDeque<ChatTurn>,
    picker: Box<dyn Picker>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_picker(Box::new(RandomPicker::from_entropy()))
    }

    pub fn with_picker(picker: Box<dyn Picker>) -> Self {
        Self {
            profile: PreferenceProfile::default(),
            history: VecDeque::new(),
            picker,
        }
    }

    pub fn profile(&self) -> &PreferenceProfile {
        &self.profile
    }

    pub fn profile_mut(&mut self) -> &mut PreferenceProfile {
        &mut self.profile
    }

    pub fn history(&self) -> impl Iterator<Item = &ChatTurn> {
        self.history.iter()
    }

    pub(crate) fn record(&mut self, utterance: &str, reply: &str) {
        self.push_turn(Role::User, utterance);
        self.push_turn(Role::Assistant, reply);
    }

    fn push_turn(&mut self, role: Role, content: &str) {
        while self.history.len() >= MAX_HISTORY_TURNS {
            self.history.pop_front();
        }
        self.history.push_back(ChatTurn {
            role,
            content: content.to_string(),
        });
    }

    pub(crate) fn choose<'a, S: AsRef<str>>(&mut self, options: &'a [S]) -> &'a str {
        let idx = self.picker.pick(options.len());
        options
            .get(idx)
            .map(<S as AsRef<str>>::as_ref)
            .unwrap_or_default()
    }
}
