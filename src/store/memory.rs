use crate::core::session::{SessionState, UserId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex as SyncMutex};
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

#[derive(Default)]
struct SessionSlot {
    state: SessionState,
    expires_at: Option<Instant>,
}

impl SessionSlot {
    fn current(&self) -> SessionState {
        match self.expires_at {
            Some(expiry) if expiry <= Instant::now() => SessionState::Idle,
            _ => self.state,
        }
    }
}

/// In-memory session store with one lock per user.
///
/// The slot map itself is only locked long enough to find or create a slot,
/// so users never wait on each other. Events of the same user are serialized
/// through [`SessionGuard`].
pub struct MemorySessionStore {
    slots: SyncMutex<HashMap<UserId, Arc<Mutex<SessionSlot>>>>,
    ttl: Option<Duration>,
}

impl MemorySessionStore {
    /// Creates a store whose sessions never expire
    pub fn new() -> Self {
        Self::with_ttl(None)
    }

    /// Creates a store where `AwaitingAmount` falls back to `Idle` after `ttl`
    pub fn with_ttl(ttl: Option<Duration>) -> Self {
        Self {
            slots: SyncMutex::new(HashMap::new()),
            ttl,
        }
    }

    fn slot(&self, user: UserId) -> Arc<Mutex<SessionSlot>> {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(slots.entry(user).or_default())
    }

    /// Takes exclusive access to a user's session until the guard is dropped.
    pub async fn lock(&self, user: UserId) -> SessionGuard<'_> {
        let guard = self.slot(user).lock_owned().await;
        SessionGuard {
            store: self,
            user,
            guard,
        }
    }

    pub async fn get(&self, user: UserId) -> SessionState {
        self.lock(user).await.state()
    }

    pub async fn set(&self, user: UserId, state: SessionState) {
        self.lock(user).await.set(state);
    }

    /// Number of users with a non-idle session entry.
    pub fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn release(&self, user: UserId, slot: &Arc<Mutex<SessionSlot>>) {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        // Only the map and the releasing guard hold the slot: nobody is waiting on it.
        if Arc::strong_count(slot) <= 2 {
            slots.remove(&user);
            debug!(user, "Session removed");
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive handle on one user's session.
pub struct SessionGuard<'a> {
    store: &'a MemorySessionStore,
    user: UserId,
    guard: OwnedMutexGuard<SessionSlot>,
}

impl SessionGuard<'_> {
    pub fn state(&self) -> SessionState {
        self.guard.current()
    }

    pub fn set(&mut self, state: SessionState) {
        debug!(user = self.user, ?state, "Session state change");
        self.guard.state = state;
        self.guard.expires_at = match state {
            SessionState::Idle => None,
            SessionState::AwaitingAmount => self.store.ttl.map(|ttl| Instant::now() + ttl),
        };
    }
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        if self.guard.current() == SessionState::Idle {
            let slot = OwnedMutexGuard::mutex(&self.guard);
            self.store.release(self.user, slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test]
    async fn test_unknown_user_is_idle() {
        let store = MemorySessionStore::new();
        assert_eq!(store.get(42).await, SessionState::Idle);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let store = MemorySessionStore::new();

        store.set(1, SessionState::AwaitingAmount).await;
        assert_eq!(store.get(1).await, SessionState::AwaitingAmount);
        assert_eq!(store.get(2).await, SessionState::Idle);
        assert_eq!(store.len(), 1);

        store.set(1, SessionState::Idle).await;
        assert_eq!(store.get(1).await, SessionState::Idle);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_sessions_do_not_expire_by_default() {
        let store = MemorySessionStore::new();

        store.set(1, SessionState::AwaitingAmount).await;
        sleep(Duration::from_millis(20)).await;
        assert_eq!(store.get(1).await, SessionState::AwaitingAmount);
    }

    #[tokio::test]
    async fn test_ttl_expiration() {
        let store = MemorySessionStore::with_ttl(Some(Duration::from_millis(10)));

        store.set(1, SessionState::AwaitingAmount).await;
        assert_eq!(store.get(1).await, SessionState::AwaitingAmount);

        sleep(Duration::from_millis(20)).await;
        assert_eq!(store.get(1).await, SessionState::Idle);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_lock_serializes_same_user() {
        let store = Arc::new(MemorySessionStore::new());

        let mut guard = store.lock(7).await;
        guard.set(SessionState::AwaitingAmount);

        let waiter = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.get(7).await })
        };

        // Another user is not blocked by user 7's guard.
        store.set(8, SessionState::AwaitingAmount).await;
        assert_eq!(store.get(8).await, SessionState::AwaitingAmount);

        sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        guard.set(SessionState::Idle);
        drop(guard);

        assert_eq!(waiter.await.unwrap(), SessionState::Idle);
    }
}
