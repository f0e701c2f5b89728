use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

/// Default lifetime of a login verification state.
pub const DEFAULT_STATE_TTL_SECS: i64 = 10 * 60;

#[derive(Debug, Clone)]
struct PendingState {
    issued_at: DateTime<Utc>,
}

/// One-time verification states for the login handshake.
///
/// Each state is accepted at most once and only within its TTL. Expired
/// entries are dropped whenever a state is issued or consumed, so the map
/// cannot grow without bound. [`LoginStateStore::restore`] and
/// [`LoginStateStore::snapshot`] move the pending set in and out of
/// persistent storage.
pub struct LoginStateStore {
    states: DashMap<String, PendingState>,
    ttl: Duration,
}

impl LoginStateStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            states: DashMap::new(),
            ttl,
        }
    }

    /// Rebuilds a store from persisted `(state, issued_at)` pairs.
    pub fn restore(ttl: Duration, pending: impl IntoIterator<Item = (String, DateTime<Utc>)>) -> Self {
        let store = Self::new(ttl);
        for (state, issued_at) in pending {
            store.states.insert(state, PendingState { issued_at });
        }
        store
    }

    /// Pending states, oldest first.
    pub fn snapshot(&self) -> Vec<(String, DateTime<Utc>)> {
        let mut pending: Vec<_> = self
            .states
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().issued_at))
            .collect();
        pending.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        pending
    }

    /// Issues a fresh random state.
    pub fn issue(&self) -> String {
        self.purge_expired();
        let state = Uuid::new_v4().simple().to_string();
        self.states.insert(state.clone(), PendingState { issued_at: Utc::now() });
        state
    }

    /// Returns true exactly once for a live state. The entry is removed
    /// either way.
    pub fn consume(&self, state: &str) -> bool {
        self.purge_expired();
        match self.states.remove(state) {
            Some((_, pending)) => !self.is_expired(&pending, Utc::now()),
            None => false,
        }
    }

    /// Drops every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.states.len();
        self.states.retain(|_, pending| !self.is_expired(pending, now));
        let removed = before.saturating_sub(self.states.len());
        if removed > 0 {
            debug!("Purged {} expired login states", removed);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    fn is_expired(&self, pending: &PendingState, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(pending.issued_at) >= self.ttl
    }
}

impl Default for LoginStateStore {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_STATE_TTL_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_is_single_use() {
        let store = LoginStateStore::default();
        let state = store.issue();

        assert!(store.consume(&state));
        assert!(!store.consume(&state));
        assert!(store.is_empty());
    }

    #[test]
    fn test_unknown_state_rejected() {
        let store = LoginStateStore::default();
        store.issue();
        assert!(!store.consume("not-a-state"));
        assert_eq!(store.len(), 1);
    }

    fn ago(seconds: i64) -> DateTime<Utc> {
        Utc::now() - Duration::seconds(seconds)
    }

    #[test]
    fn test_expired_state_rejected_and_purged() {
        let store = LoginStateStore::restore(
            Duration::seconds(60),
            [("stale".to_string(), ago(61)), ("fresh".to_string(), ago(5))],
        );

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(!store.consume("stale"));
        assert!(store.consume("fresh"));
    }

    #[test]
    fn test_issue_drops_expired_entries() {
        let store = LoginStateStore::restore(
            Duration::seconds(60),
            (0..5).map(|i| (format!("old-{i}"), ago(120))),
        );
        assert_eq!(store.len(), 5);
        store.issue();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_snapshot_round_trips_through_restore() {
        let store = LoginStateStore::default();
        let first = store.issue();
        let second = store.issue();

        let restored = LoginStateStore::restore(Duration::seconds(60), store.snapshot());
        assert_eq!(restored.len(), 2);
        assert!(restored.consume(&second));
        assert_eq!(restored.snapshot().len(), 1);
        assert_eq!(restored.snapshot()[0].0, first);
    }
}
