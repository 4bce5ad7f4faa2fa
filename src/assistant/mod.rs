//! Rule-based movie assistant: keyword intent routing plus per-intent
//! response formatting.
use chrono::{Datelike, Local};
use std::sync::Arc;
use tracing::debug;

use crate::catalog::{CatalogAnime, CatalogMetadata, CatalogResolver};
use crate::models::CollectionRecord;
use crate::providers::{AnimeProvider, MetadataProvider, WatchResolver};

mod handlers;
mod intent;
mod search;
mod session;
mod text;

pub use handlers::FALLBACK_RESPONSES;
pub use intent::{Intent, INTENT_TABLE};
pub use search::SearchResults;
pub use session::{
    ChatTurn, FixedPicker, Picker, PreferenceProfile, RandomPicker, Role, Session,
    MAX_HISTORY_TURNS,
};

#[derive(Clone)]
pub struct Assistant {
    metadata: Arc<dyn MetadataProvider>,
    anime: Arc<dyn AnimeProvider>,
    watch: Arc<dyn WatchResolver>,
    current_year: Option<i32>,
}

impl Assistant {
    pub fn new(
        metadata: Arc<dyn MetadataProvider>,
        anime: Arc<dyn AnimeProvider>,
        watch: Arc<dyn WatchResolver>,
    ) -> Self {
        Self {
            metadata,
            anime,
            watch,
            current_year: None,
        }
    }

    /// Assistant backed entirely by the bundled catalog.
    pub fn offline() -> Self {
        Self::new(
            Arc::new(CatalogMetadata::new()),
            Arc::new(CatalogAnime::new()),
            Arc::new(CatalogResolver::new()),
        )
    }

    /// Pins the year used to decide what might still be in theaters.
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = Some(year);
        self
    }

    fn current_year(&self) -> i32 {
        self.current_year.unwrap_or_else(|| Local::now().year())
    }

    /// Answers one utterance against the caller's collection snapshot.
    ///
    /// Updates the session's preference profile before routing and appends
    /// both turns to its history afterwards. Never fails: provider errors
    /// are rendered as "not found" replies.
    pub async fn generate_response(
        &self,
        session: &mut Session,
        utterance: &str,
        collection: &[CollectionRecord],
    ) -> String {
        session.profile_mut().update_from(utterance);

        let intent = Intent::classify(utterance);
        debug!(intent = ?intent, records = collection.len(), "classified utterance");

        let reply = match intent {
            Intent::Streaming => self.streaming_response(utterance, collection).await,
            Intent::Ticketing => handlers::ticketing_response(collection, self.current_year()),
            Intent::Anime => self.anime_response(utterance).await,
            Intent::Greeting => handlers::greeting_response(session, collection),
            Intent::Recommendation => handlers::recommendation_response(collection),
            Intent::Genre => match intent::matched_genre(utterance) {
                Some(genre) => handlers::genre_response(genre, collection),
                None => handlers::fallback_response(session),
            },
            Intent::Details => self.details_response(utterance).await,
            Intent::Search => handlers::search_response(),
            Intent::Analysis => handlers::analysis_response(collection),
            Intent::WatchStatus => handlers::watch_status_response(collection),
            Intent::Help => handlers::help_response(),
            Intent::BestOf => handlers::best_of_response(utterance),
            Intent::Fallback => handlers::fallback_response(session),
        };

        session.record(utterance, &reply);
        reply
    }
}
