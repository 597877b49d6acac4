//! Persisted authentication session.

use crate::store::{KeyValueStore, MemoryStore, StoreResult};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Key holding the current bearer token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Key holding the token type returned alongside the token.
pub const TOKEN_TYPE_KEY: &str = "token_type";

/// The current session: a single token slot plus the logout flag.
///
/// There is no token history. Storing a token overwrites the previous one.
/// The token lives in the store; the logout flag lives in memory, shared by
/// clones of this session, so it never outlives the process.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn KeyValueStore>,
    logouts: Arc<AtomicUsize>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("logging_out", &self.is_logging_out())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session over the given store.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            logouts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a session backed by a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Current bearer token, if any.
    pub async fn token(&self) -> StoreResult<Option<String>> {
        Ok(self
            .store
            .get(ACCESS_TOKEN_KEY)
            .await?
            .filter(|t| !t.is_empty()))
    }

    /// Token type stored with the current token.
    pub async fn token_type(&self) -> StoreResult<Option<String>> {
        self.store.get(TOKEN_TYPE_KEY).await
    }

    /// Whether a token is stored.
    pub async fn is_authenticated(&self) -> StoreResult<bool> {
        Ok(self.token().await?.is_some())
    }

    /// Overwrite the current token.
    pub async fn store_token(&self, token: &str, token_type: &str) -> StoreResult<()> {
        self.store.set(ACCESS_TOKEN_KEY, token).await?;
        self.store.set(TOKEN_TYPE_KEY, token_type).await
    }

    /// Remove the token and its type.
    pub async fn clear_token(&self) -> StoreResult<()> {
        self.store.remove(ACCESS_TOKEN_KEY).await?;
        self.store.remove(TOKEN_TYPE_KEY).await
    }

    /// Whether a logout is in flight.
    pub fn is_logging_out(&self) -> bool {
        self.logouts.load(Ordering::SeqCst) > 0
    }

    /// Raise the logout flag until the returned guard is dropped.
    ///
    /// Overlapping logouts each hold a guard; the flag stays up until the
    /// last one finishes.
    pub fn begin_logout(&self) -> LogoutGuard {
        self.logouts.fetch_add(1, Ordering::SeqCst);
        LogoutGuard {
            logouts: self.logouts.clone(),
        }
    }
}

/// Keeps the logout flag raised while alive.
#[must_use = "the logout flag is lowered as soon as the guard is dropped"]
#[derive(Debug)]
pub struct LogoutGuard {
    logouts: Arc<AtomicUsize>,
}

impl Drop for LogoutGuard {
    fn drop(&mut self) {
        self.logouts.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FileStore;

    #[tokio::test]
    async fn test_token_slot_overwrites() {
        let session = Session::in_memory();
        assert!(session.token().await.unwrap().is_none());
        assert!(!session.is_authenticated().await.unwrap());

        session.store_token("first", "bearer").await.unwrap();
        session.store_token("second", "bearer").await.unwrap();

        assert_eq!(session.token().await.unwrap().as_deref(), Some("second"));
        assert_eq!(
            session.token_type().await.unwrap().as_deref(),
            Some("bearer")
        );
    }

    #[tokio::test]
    async fn test_clear_token_removes_type() {
        let session = Session::in_memory();
        session.store_token("abc", "bearer").await.unwrap();
        session.clear_token().await.unwrap();

        assert!(session.token().await.unwrap().is_none());
        assert!(session.token_type().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_token_counts_as_absent() {
        let store = Arc::new(MemoryStore::new());
        store.set(ACCESS_TOKEN_KEY, "").await.unwrap();
        let session = Session::new(store);
        assert!(session.token().await.unwrap().is_none());
    }

    #[test]
    fn test_logout_flag() {
        let session = Session::in_memory();
        assert!(!session.is_logging_out());

        let guard = session.begin_logout();
        assert!(session.is_logging_out());
        assert!(session.clone().is_logging_out());

        drop(guard);
        assert!(!session.is_logging_out());
    }

    #[test]
    fn test_overlapping_logouts_keep_flag_raised() {
        let session = Session::in_memory();
        let first = session.begin_logout();
        let second = session.begin_logout();

        drop(first);
        assert!(session.is_logging_out());

        drop(second);
        assert!(!session.is_logging_out());
    }

    #[tokio::test]
    async fn test_logout_flag_is_not_persisted() {
        let path = std::env::temp_dir()
            .join(format!("pmdesk_session_{}", uuid::Uuid::new_v4().simple()))
            .join("session.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            r#"{ "access_token": "abc", "token_type": "bearer", "logout_in_progress": "true" }"#,
        )
        .unwrap();

        let interrupted = Session::new(Arc::new(FileStore::new(&path)));
        let guard = interrupted.begin_logout();

        let reopened = Session::new(Arc::new(FileStore::new(&path)));
        assert!(!reopened.is_logging_out());
        assert_eq!(reopened.token().await.unwrap().as_deref(), Some("abc"));

        drop(guard);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_sessions_share_store() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let a = Session::new(store.clone());
        let b = Session::new(store);

        a.store_token("shared", "bearer").await.unwrap();
        assert_eq!(b.token().await.unwrap().as_deref(), Some("shared"));
    }
}
