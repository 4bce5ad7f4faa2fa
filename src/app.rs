use crate::assistant::{Assistant, Picker, RandomPicker, SearchResults, Session};
use crate::config::AppConfig;
use crate::models::CollectionRecord;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{debug, info, warn};

const MAX_BODY_BYTES: usize = 64 * 1024;
const MAX_MESSAGE_CHARS: usize = 2_000;

pub type PickerFactory = Arc<dyn Fn() -> Box<dyn Picker> + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<Assistant>,
    pub sessions: Arc<Mutex<SessionRegistry>>,
    pub api_key: Option<String>,
}

struct SessionEntry {
    session: Arc<Mutex<Session>>,
    last_used: u64,
}

/// Live chat sessions, capped; the least recently used one is evicted first.
pub struct SessionRegistry {
    entries: HashMap<String, SessionEntry>,
    tick: u64,
    max_sessions: usize,
    new_picker: PickerFactory,
}

impl SessionRegistry {
    pub fn new(max_sessions: usize, new_picker: PickerFactory) -> Self {
        Self {
            entries: HashMap::new(),
            tick: 0,
            max_sessions: max_sessions.max(1),
            new_picker,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Returns the session for `id`, starting a fresh one if needed.
    pub fn checkout(&mut self, id: &str) -> Arc<Mutex<Session>> {
        self.tick += 1;
        let tick = self.tick;
        if let Some(entry) = self.entries.get_mut(id) {
            entry.last_used = tick;
            return entry.session.clone();
        }

        if self.entries.len() >= self.max_sessions {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, e)| e.last_used)
                .map(|(k, _)| k.clone());
            if let Some(key) = oldest {
                debug!(session_id = %key, "evicting least recently used session");
                self.entries.remove(&key);
            }
        }

        let session = Arc::new(Mutex::new(Session::with_picker((self.new_picker)())));
        self.entries.insert(
            id.to_string(),
            SessionEntry {
                session: session.clone(),
                last_used: tick,
            },
        );
        info!(session_id = %id, "started chat session");
        session
    }

    pub fn end(&mut self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
    #[serde(default)]
    pub collection: Vec<CollectionRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub session_id: String,
    pub reply: String,
    pub favorite_genres: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchReply {
    pub query: String,
    pub total: usize,
    pub reply: String,
}

pub async fn run_server(config: AppConfig) -> Result<()> {
    let seed = config.seed;
    let new_picker: PickerFactory = Arc::new(move || -> Box<dyn Picker> {
        match seed {
            Some(s) => Box::new(RandomPicker::seeded(s)),
            None => Box::new(RandomPicker::from_entropy()),
        }
    });
    if config.api_key.is_some() {
        info!("Chat endpoint requires CHAT_API_KEY bearer token");
    } else {
        warn!("CHAT_API_KEY not set - chat endpoint is open");
    }

    let state = AppState {
        assistant: Arc::new(Assistant::offline()),
        sessions: Arc::new(Mutex::new(SessionRegistry::new(
            config.max_sessions,
            new_picker,
        ))),
        api_key: config.api_key,
    };

    let app = build_router(state);

    info!("Listening on {}", config.bind);
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(handle_chat))
        .route("/search", get(handle_search))
        .route("/sessions/:id", delete(end_session))
        .route("/health", get(health))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn handle_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ChatReply>, StatusCode> {
    if !is_authorized(&headers, state.api_key.as_deref()) {
        warn!("Rejecting chat request: missing or invalid bearer token");
        return Err(StatusCode::UNAUTHORIZED);
    }

    let request: ChatRequest = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            warn!("Rejecting chat request: invalid JSON body: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    let message = request.message.trim();
    if message.is_empty() || request.session_id.trim().is_empty() {
        warn!("Rejecting chat request: empty message or session id");
        return Err(StatusCode::BAD_REQUEST);
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        warn!("Rejecting chat request: message too long");
        return Err(StatusCode::PAYLOAD_TOO_LARGE);
    }

    let session = state.sessions.lock().await.checkout(&request.session_id);
    let mut session = session.lock().await;
    let reply = state
        .assistant
        .generate_response(&mut session, message, &request.collection)
        .await;
    debug!(
        session_id = %request.session_id,
        records = request.collection.len(),
        "answered chat message"
    );

    Ok(Json(ChatReply {
        session_id: request.session_id,
        reply,
        favorite_genres: session.profile().favorite_genres().to_vec(),
    }))
}

async fn handle_search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchReply>, StatusCode> {
    if !is_authorized(&headers, state.api_key.as_deref()) {
        warn!("Rejecting search request: missing or invalid bearer token");
        return Err(StatusCode::UNAUTHORIZED);
    }

    let query = params.q.trim();
    if query.is_empty() {
        warn!("Rejecting search request: empty query");
        return Err(StatusCode::BAD_REQUEST);
    }
    if query.chars().count() > MAX_MESSAGE_CHARS {
        warn!("Rejecting search request: query too long");
        return Err(StatusCode::PAYLOAD_TOO_LARGE);
    }

    let results: SearchResults = state.assistant.search(query).await;
    info!(query = %query, total = results.total(), "finder search answered");
    Ok(Json(SearchReply {
        query: results.query.clone(),
        total: results.total(),
        reply: results.render(),
    }))
}

async fn end_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> StatusCode {
    if !is_authorized(&headers, state.api_key.as_deref()) {
        warn!("Rejecting session delete: missing or invalid bearer token");
        return StatusCode::UNAUTHORIZED;
    }
    if state.sessions.lock().await.end(&id) {
        info!(session_id = %id, "ended chat session");
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

fn is_authorized(headers: &HeaderMap, api_key: Option<&str>) -> bool {
    let Some(expected) = api_key else {
        return true;
    };
    let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    else {
        return false;
    };
    token.len() == expected.len() && constant_time_eq(token.as_bytes(), expected.as_bytes())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::FixedPicker;

    fn registry(max: usize) -> SessionRegistry {
        SessionRegistry::new(max, Arc::new(|| -> Box<dyn Picker> { Box::new(FixedPicker(0)) }))
    }

    #[test]
    fn checkout_reuses_existing_session() {
        let mut reg = registry(4);
        let a = reg.checkout("alice");
        let again = reg.checkout("alice");
        assert!(Arc::ptr_eq(&a, &again));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn evicts_least_recently_used() {
        let mut reg = registry(2);
        reg.checkout("a");
        reg.checkout("b");
        reg.checkout("a");
        reg.checkout("c");
        assert!(reg.contains("a"));
        assert!(!reg.contains("b"));
        assert!(reg.contains("c"));
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn end_reports_unknown_sessions() {
        let mut reg = registry(2);
        reg.checkout("a");
        assert!(reg.end("a"));
        assert!(!reg.end("a"));
        assert!(reg.is_empty());
    }

    #[test]
    fn bearer_token_must_match() {
        let mut headers = HeaderMap::new();
        assert!(is_authorized(&headers, None));
        assert!(!is_authorized(&headers, Some("secret")));
        headers.insert(header::AUTHORIZATION, "Bearer secret".parse().unwrap());
        assert!(is_authorized(&headers, Some("secret")));
        headers.insert(header::AUTHORIZATION, "Bearer secreT".parse().unwrap());
        assert!(!is_authorized(&headers, Some("secret")));
    }
}
