use chrono::{DateTime, Duration, Utc};
use seatwise_core::{SeatAllocator, SeatLayout};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// One seat-selection screen: an allocator for a single leg plus its seat layout
#[derive(Debug, Clone)]
pub struct SelectionSession {
    pub id: Uuid,
    pub departure_id: Uuid,
    pub allocator: SeatAllocator,
    pub layout: SeatLayout,
    pub created_at: DateTime<Utc>,
    pub last_touched: DateTime<Utc>,
    /// Set while the final mapping is being handed to booking submission
    pub submitting: bool,
}

impl SelectionSession {
    pub fn new(departure_id: Uuid, allocator: SeatAllocator, layout: SeatLayout) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            departure_id,
            allocator,
            layout,
            created_at: now,
            last_touched: now,
            submitting: false,
        }
    }

    pub fn expires_at(&self, ttl: Duration) -> DateTime<Utc> {
        self.last_touched
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        self.expires_at(ttl) <= now
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    NotFound(Uuid),
    /// A completion for this session is in flight
    Submitting(Uuid),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::NotFound(id) => write!(f, "Seat selection not found: {}", id),
            SessionError::Submitting(id) => write!(f, "Seat selection {} is being submitted", id),
        }
    }
}

/// Live selection sessions. Each access holds the write lock for one
/// allocator operation, so operations on a session never interleave.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SelectionSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, session: SelectionSession) {
        self.sessions.write().await.insert(session.id, session);
    }

    /// Run `f` against a session and mark it as recently used.
    /// Sessions being submitted are frozen.
    pub async fn with_session<R>(
        &self,
        id: &Uuid,
        f: impl FnOnce(&mut SelectionSession) -> R,
    ) -> Result<R, SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(id).ok_or(SessionError::NotFound(*id))?;
        if session.submitting {
            return Err(SessionError::Submitting(*id));
        }
        session.last_touched = Utc::now();
        Ok(f(session))
    }

    /// Freeze a session for submission once `f` accepts it.
    /// If `f` fails the session is left as it was.
    pub async fn begin_submission<T, E: From<SessionError>>(
        &self,
        id: &Uuid,
        f: impl FnOnce(&SelectionSession) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(id).ok_or(SessionError::NotFound(*id))?;
        if session.submitting {
            return Err(SessionError::Submitting(*id).into());
        }
        let value = f(session)?;
        session.submitting = true;
        session.last_touched = Utc::now();
        Ok(value)
    }

    /// Consume the session after a successful submission, or unfreeze it
    /// for a retry. A session that has gone in the meantime stays gone.
    pub async fn finish_submission(&self, id: &Uuid, submitted: bool) {
        let mut sessions = self.sessions.write().await;
        if submitted {
            sessions.remove(id);
        } else if let Some(session) = sessions.get_mut(id) {
            session.submitting = false;
            session.last_touched = Utc::now();
        }
    }

    pub async fn remove(&self, id: &Uuid) -> Result<SelectionSession, SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get(id).ok_or(SessionError::NotFound(*id))?;
        if session.submitting {
            return Err(SessionError::Submitting(*id));
        }
        sessions.remove(id).ok_or(SessionError::NotFound(*id))
    }

    /// Drop sessions idle for longer than `ttl`. `begin_submission` touches the
    /// session, so only a hand-off that never finished can be swept mid-submission.
    pub async fn cleanup_expired(&self, ttl: Duration) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let initial_count = sessions.len();

        sessions.retain(|_, session| !session.is_expired(ttl, now));

        initial_count - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
