//! SessionRegistry - dialogue sessions held by the transport
//!
//! The core is stateless between turns; the server keeps each session's
//! latest `DialogueState` here. A turn checks the session out, so a second
//! turn on the same session while one is running gets `SessionBusy`.

use std::collections::HashMap;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use uuid::Uuid;

use crate::dialogue::{DialogueMode, DialogueState};
use crate::error::{FusionError, FusionResult};

/// Ten years; larger timeouts are clamped
const MAX_IDLE_SECS: u64 = 315_360_000;

struct Entry {
    state: DialogueState,
    in_flight: bool,
    last_touched: DateTime<Utc>,
}

/// Which sessions `list` reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionFilter {
    #[default]
    Active,
    Concluded,
    All,
}

impl SessionFilter {
    fn admits(&self, state: &DialogueState) -> bool {
        match self {
            SessionFilter::Active => !state.is_concluded(),
            SessionFilter::Concluded => state.is_concluded(),
            SessionFilter::All => true,
        }
    }
}

impl FromStr for SessionFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(SessionFilter::Active),
            "concluded" | "completed" => Ok(SessionFilter::Concluded),
            "all" => Ok(SessionFilter::All),
            other => Err(anyhow!("Unknown session filter: {}", other)),
        }
    }
}

/// One row of `list`
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub session_id: Uuid,
    pub focus: String,
    pub mode: DialogueMode,
    pub depth: u32,
    pub status: &'static str,
    pub in_flight: bool,
    pub last_touched: DateTime<Utc>,
}

pub struct SessionRegistry {
    sessions: Mutex<HashMap<Uuid, Entry>>,
    idle_timeout: Duration,
}

impl SessionRegistry {
    pub fn new(idle_timeout_secs: u64) -> Self {
        let secs = idle_timeout_secs.min(MAX_IDLE_SECS) as i64;
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout: Duration::seconds(secs),
        }
    }

    /// Register a new session and return its id
    pub fn insert(&self, state: DialogueState) -> Uuid {
        let id = state.session_id;
        self.sessions.lock().insert(
            id,
            Entry {
                state,
                in_flight: false,
                last_touched: Utc::now(),
            },
        );
        id
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop idle sessions, returning how many went. Sessions mid-turn stay.
    pub fn expire_idle(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.lock();
        let before = sessions.len();
        let timeout = self.idle_timeout;
        sessions.retain(|_, e| e.in_flight || now.signed_duration_since(e.last_touched) <= timeout);
        let expired = before - sessions.len();
        if expired > 0 {
            tracing::info!(expired, "expired idle dialogue sessions");
        }
        expired
    }

    /// Live sessions matching `filter`, most recently touched first
    pub fn list(&self, filter: SessionFilter) -> Vec<SessionInfo> {
        self.expire_idle(Utc::now());
        let mut rows: Vec<SessionInfo> = self
            .sessions
            .lock()
            .iter()
            .filter(|(_, e)| filter.admits(&e.state))
            .map(|(id, e)| SessionInfo {
                session_id: *id,
                focus: e.state.focus.title.clone(),
                mode: e.state.mode,
                depth: e.state.depth,
                status: e.state.status.key(),
                in_flight: e.in_flight,
                last_touched: e.last_touched,
            })
            .collect();
        rows.sort_by(|a, b| {
            b.last_touched
                .cmp(&a.last_touched)
                .then_with(|| a.session_id.cmp(&b.session_id))
        });
        rows
    }

    /// Copy of a session's current state without checking it out
    pub fn snapshot(&self, id: &Uuid) -> FusionResult<DialogueState> {
        self.expire_idle(Utc::now());
        self.sessions
            .lock()
            .get(id)
            .map(|e| e.state.clone())
            .ok_or_else(|| unknown_session(id))
    }

    /// Check a session out for one turn
    pub fn begin_turn(&self, id: &Uuid) -> FusionResult<SessionTurn<'_>> {
        self.expire_idle(Utc::now());
        let mut sessions = self.sessions.lock();
        let entry = sessions.get_mut(id).ok_or_else(|| unknown_session(id))?;
        if entry.in_flight {
            return Err(FusionError::SessionBusy(id.to_string()));
        }
        entry.in_flight = true;
        Ok(SessionTurn {
            registry: self,
            id: *id,
            state: entry.state.clone(),
            finished: false,
        })
    }

    fn release(&self, id: &Uuid, new_state: Option<DialogueState>) {
        let mut sessions = self.sessions.lock();
        if let Some(entry) = sessions.get_mut(id) {
            if let Some(state) = new_state {
                entry.state = state;
            }
            entry.in_flight = false;
            entry.last_touched = Utc::now();
        }
    }
}

fn unknown_session(id: &Uuid) -> FusionError {
    FusionError::InvalidState(format!("unknown or expired session: {}", id))
}

/// A checked-out session. Dropping it without `finish` keeps the old state.
pub struct SessionTurn<'a> {
    registry: &'a SessionRegistry,
    id: Uuid,
    state: DialogueState,
    finished: bool,
}

impl SessionTurn<'_> {
    pub fn state(&self) -> &DialogueState {
        &self.state
    }

    /// Store the state produced by the turn and release the session
    pub fn finish(mut self, new_state: DialogueState) {
        self.finished = true;
        self.registry.release(&self.id, Some(new_state));
    }
}

impl Drop for SessionTurn<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.registry.release(&self.id, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::{DialogueMode, FocusConcept};

    fn state() -> DialogueState {
        DialogueState::new(
            FocusConcept {
                id: None,
                title: "Feedback".into(),
                domain: None,
                text: "Feedback".into(),
                facets: vec![],
            },
            DialogueMode::Explore,
        )
    }

    #[test]
    fn test_second_turn_is_busy() {
        let registry = SessionRegistry::new(1800);
        let id = registry.insert(state());

        let turn = registry.begin_turn(&id).unwrap();
        let err = registry.begin_turn(&id).err().unwrap();
        assert!(matches!(err, FusionError::SessionBusy(_)));

        drop(turn);
        assert!(registry.begin_turn(&id).is_ok());
    }

    #[test]
    fn test_finish_stores_new_state() {
        let registry = SessionRegistry::new(1800);
        let id = registry.insert(state());

        let turn = registry.begin_turn(&id).unwrap();
        let mut next = turn.state().clone();
        next.depth = 4;
        turn.finish(next);

        assert_eq!(registry.snapshot(&id).unwrap().depth, 4);
    }

    #[test]
    fn test_unknown_session_is_invalid_state() {
        let registry = SessionRegistry::new(1800);
        let err = registry.begin_turn(&Uuid::new_v4()).err().unwrap();
        assert!(matches!(err, FusionError::InvalidState(_)));
    }

    #[test]
    fn test_idle_sessions_expire() {
        let registry = SessionRegistry::new(60);
        let id = registry.insert(state());

        assert_eq!(registry.expire_idle(Utc::now()), 0);
        assert_eq!(registry.expire_idle(Utc::now() + Duration::minutes(5)), 1);
        assert!(registry.snapshot(&id).is_err());
    }

    #[test]
    fn test_list_filters_by_status() {
        use crate::dialogue::{ConclusionReason, SessionStatus};

        let registry = SessionRegistry::new(1800);
        let open = registry.insert(state());
        let mut ended = state();
        ended.status = SessionStatus::Concluded(ConclusionReason::Ended);
        let closed = registry.insert(ended);

        let active = registry.list(SessionFilter::Active);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].session_id, open);
        assert_eq!(active[0].status, "active");

        let concluded = registry.list("completed".parse().unwrap());
        assert_eq!(concluded.len(), 1);
        assert_eq!(concluded[0].session_id, closed);
        assert_eq!(concluded[0].status, "ended");

        assert_eq!(registry.list(SessionFilter::All).len(), 2);
        assert!("paused".parse::<SessionFilter>().is_err());
    }

    #[test]
    fn test_in_flight_session_survives_expiry() {
        let registry = SessionRegistry::new(60);
        let id = registry.insert(state());
        let _turn = registry.begin_turn(&id).unwrap();
        assert_eq!(registry.expire_idle(Utc::now() + Duration::minutes(5)), 0);
        assert_eq!(registry.len(), 1);
    }
}
