//! In-memory tutor sessions.
//!
//! A `TutorSession` is the explicit session-scoped state handed to the prompt
//! processor: the transcript plus the last successful answer backing export.
//! `SessionRegistry` maps session ids to sessions for the HTTP layer. Nothing
//! here is persisted; a session is gone once removed, idle too long, evicted
//! at capacity, or when the process exits.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use codebuddy_types::chat::Transcript;
use codebuddy_types::tutor::SUGGESTIONS;

/// State of one tutoring conversation.
#[derive(Debug, Clone, Serialize)]
pub struct TutorSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub transcript: Transcript,
    /// Markdown of the most recent successful assistant turn.
    pub last_answer: Option<String>,
    /// Rendered export of `last_answer`, keyed by the markdown it was made from.
    #[serde(skip)]
    pub export_cache: Option<(String, Arc<Vec<u8>>)>,
}

impl TutorSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::now_v7(),
            created_at: Utc::now(),
            transcript: Transcript::new(),
            last_answer: None,
            export_cache: None,
        }
    }

    /// Suggestions are offered only while nothing has been asked yet.
    pub fn suggestions(&self) -> &'static [&'static str] {
        if self.transcript.is_empty() {
            &SUGGESTIONS
        } else {
            &[]
        }
    }

    /// The cached export, if it was rendered from the current last answer.
    pub fn cached_export(&self) -> Option<Arc<Vec<u8>>> {
        match (&self.export_cache, &self.last_answer) {
            (Some((source, bytes)), Some(answer)) if source == answer => Some(bytes.clone()),
            _ => None,
        }
    }

    /// Export is available once a non-empty answer exists.
    pub fn can_export(&self) -> bool {
        self.last_answer
            .as_deref()
            .is_some_and(|answer| !answer.trim().is_empty())
    }
}

impl Default for TutorSession {
    fn default() -> Self {
        Self::new()
    }
}

/// A session guarded for one operation at a time.
pub type SharedSession = Arc<Mutex<TutorSession>>;

/// Idle time after which a session is dropped.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Live sessions kept before the least recently used is evicted.
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

#[derive(Debug)]
struct SessionSlot {
    session: SharedSession,
    last_seen: Instant,
}

/// Concurrent registry of live sessions.
///
/// Every `get` refreshes a session's last-seen time. `create` first sweeps
/// sessions idle past the timeout, then evicts the least recently used ones
/// until there is room under the cap. An evicted session that is mid-request
/// finishes normally; it just can't be found afterwards.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: DashMap<Uuid, SessionSlot>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::with_limits(DEFAULT_IDLE_TIMEOUT, DEFAULT_MAX_SESSIONS)
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with a custom idle timeout and cap. A cap of 0 is treated as 1.
    pub fn with_limits(idle_timeout: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            idle_timeout,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Create and register a fresh session, returning its id and handle.
    pub fn create(&self) -> (Uuid, SharedSession) {
        let now = Instant::now();
        self.sweep_idle(now);
        self.evict_to(self.max_sessions - 1);

        let session = TutorSession::new();
        let id = session.id;
        let shared = Arc::new(Mutex::new(session));
        self.sessions.insert(
            id,
            SessionSlot {
                session: shared.clone(),
                last_seen: now,
            },
        );
        tracing::debug!(session_id = %id, live = self.sessions.len(), "session created");
        (id, shared)
    }

    /// Look up a session and mark it as recently used.
    pub fn get(&self, id: &Uuid) -> Option<SharedSession> {
        self.sessions.get_mut(id).map(|mut slot| {
            slot.last_seen = Instant::now();
            slot.session.clone()
        })
    }

    /// Drop a session. Returns whether it existed.
    pub fn remove(&self, id: &Uuid) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            tracing::debug!(session_id = %id, "session removed");
        }
        removed
    }

    /// Drop sessions last seen more than the idle timeout before `now`.
    /// Returns how many were dropped.
    pub fn sweep_idle(&self, now: Instant) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, slot| now.saturating_duration_since(slot.last_seen) < self.idle_timeout);
        let expired = before.saturating_sub(self.sessions.len());
        if expired > 0 {
            tracing::info!(expired, "idle sessions expired");
        }
        expired
    }

    /// Evict least recently used sessions until at most `limit` remain.
    fn evict_to(&self, limit: usize) {
        while self.sessions.len() > limit {
            let oldest = self
                .sessions
                .iter()
                .min_by_key(|entry| entry.value().last_seen)
                .map(|entry| *entry.key());
            let Some(id) = oldest else { break };
            self.sessions.remove(&id);
            tracing::info!(session_id = %id, "session evicted at capacity");
        }
    }

    pub fn ids(&self) -> Vec<Uuid> {
        self.sessions.iter().map(|entry| *entry.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
