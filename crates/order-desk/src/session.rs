//! # Session Store
//!
//! Opaque bearer tokens with server-side expiry. The store is an explicit value handed to
//! whatever authenticates requests; nothing about sessions lives in module state.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionError {
    #[error("Unknown session")]
    Unknown,

    #[error("Session expired at {0}")]
    Expired(DateTime<Utc>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: Uuid,
    /// Who the session belongs to (an operator login, a kiosk id, ...).
    pub subject: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

pub struct SessionStore {
    ttl: ChronoDuration,
    sessions: Mutex<HashMap<Uuid, Session>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl: ChronoDuration::from_std(ttl).unwrap_or(ChronoDuration::MAX),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<Uuid, Session>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn issue(&self, subject: impl Into<String>) -> Session {
        self.issue_at(subject, Utc::now())
    }

    pub fn issue_at(&self, subject: impl Into<String>, now: DateTime<Utc>) -> Session {
        let session = Session {
            token: Uuid::new_v4(),
            subject: subject.into(),
            issued_at: now,
            expires_at: now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        info!(subject = %session.subject, "Session issued");
        self.sessions().insert(session.token, session.clone());
        session
    }

    /// Accept a live token. Validation never extends the expiry.
    pub fn validate(&self, token: Uuid) -> Result<Session, SessionError> {
        self.validate_at(token, Utc::now())
    }

    pub fn validate_at(&self, token: Uuid, now: DateTime<Utc>) -> Result<Session, SessionError> {
        let sessions = self.sessions();
        let session = sessions.get(&token).ok_or(SessionError::Unknown)?;
        if now >= session.expires_at {
            debug!(subject = %session.subject, "Session expired");
            return Err(SessionError::Expired(session.expires_at));
        }
        Ok(session.clone())
    }

    /// Returns whether the token existed.
    pub fn revoke(&self, token: Uuid) -> bool {
        self.sessions().remove(&token).is_some()
    }

    /// Drop every expired session and return how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    pub fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions();
        let before = sessions.len();
        sessions.retain(|_, session| now < session.expires_at);
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_validate() {
        let store = SessionStore::new(Duration::from_secs(60));
        let now = Utc::now();
        let session = store.issue_at("cashier-1", now);

        let found = store.validate_at(session.token, now).unwrap();
        assert_eq!(found.subject, "cashier-1");
        assert_eq!(found.expires_at, now + ChronoDuration::seconds(60));
    }

    #[test]
    fn test_expired_and_unknown_tokens() {
        let store = SessionStore::new(Duration::from_secs(60));
        let now = Utc::now();
        let session = store.issue_at("kiosk-2", now);

        let later = now + ChronoDuration::seconds(61);
        assert_eq!(
            store.validate_at(session.token, later),
            Err(SessionError::Expired(session.expires_at))
        );
        assert_eq!(store.validate_at(Uuid::new_v4(), now), Err(SessionError::Unknown));
    }

    #[test]
    fn test_revoke_and_purge() {
        let store = SessionStore::new(Duration::from_secs(60));
        let now = Utc::now();
        let a = store.issue_at("a", now);
        let _b = store.issue_at("b", now - ChronoDuration::seconds(120));
        let _c = store.issue_at("c", now - ChronoDuration::seconds(90));

        assert_eq!(store.purge_expired_at(now), 2);
        assert_eq!(store.len(), 1);
        assert!(store.revoke(a.token));
        assert!(!store.revoke(a.token));
        assert!(store.is_empty());
    }
}
