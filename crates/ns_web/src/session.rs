use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::header::COOKIE;
use axum::http::{HeaderMap, HeaderValue};
use cookie::{Cookie, SameSite};
use ns_session::DashboardState;
use tokio::sync::{Mutex, RwLock};
use tokio::task::AbortHandle;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "ns_session";

/// One browser session: its dashboard state plus the bookkeeping needed to
/// cancel a superseded request.
#[derive(Debug)]
pub struct SessionSlot {
    pub state: DashboardState,
    /// Bumped whenever a fetch starts; a task only commits if the
    /// generation it started with is still current.
    pub generation: u64,
    /// The action currently running for this session, if any.
    pub task: Option<AbortHandle>,
    /// Held by the running action for its whole lifetime, commit included.
    pub gate: Arc<Mutex<()>>,
    last_seen: Instant,
}

impl SessionSlot {
    fn new() -> Self {
        Self {
            state: DashboardState::default(),
            generation: 0,
            task: None,
            gate: Arc::new(Mutex::new(())),
            last_seen: Instant::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_seen.elapsed()
    }
}

pub type SharedSlot = Arc<Mutex<SessionSlot>>;

/// In-memory map of live sessions. Nothing survives a restart.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, SharedSlot>>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Looks up `id`, creating a fresh session when it is missing or unknown.
    /// The returned flag tells whether a new session was created.
    pub async fn open(&self, id: Option<Uuid>) -> (Uuid, SharedSlot, bool) {
        if let Some(id) = id {
            if let Some(slot) = self.sessions.read().await.get(&id) {
                return (id, slot.clone(), false);
            }
        }

        let id = Uuid::new_v4();
        let slot = Arc::new(Mutex::new(SessionSlot::new()));
        self.sessions.write().await.insert(id, slot.clone());
        tracing::debug!("🆕 New dashboard session {}", id);
        (id, slot, true)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drops sessions idle for longer than the ttl, aborting their pending work.
    pub async fn evict_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let mut expired = Vec::new();
        for (id, slot) in sessions.iter() {
            // A locked slot is busy, so it is not idle.
            if let Ok(slot) = slot.try_lock() {
                if slot.idle_for() >= self.ttl {
                    expired.push(*id);
                }
            }
        }
        for id in &expired {
            if let Some(slot) = sessions.remove(id) {
                if let Ok(mut slot) = slot.try_lock() {
                    if let Some(task) = slot.task.take() {
                        task.abort();
                    }
                }
            }
        }
        expired.len()
    }
}

/// Extracts the session id from the request cookies.
pub fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(|cookie| cookie.ok())
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

pub fn session_cookie(id: Uuid) -> Option<HeaderValue> {
    let cookie = Cookie::build(SESSION_COOKIE, id.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish();
    HeaderValue::from_str(&cookie.to_string()).ok()
}
