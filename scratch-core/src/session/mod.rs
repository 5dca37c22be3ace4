//! Persisted portal sessions and the per-client session context.
//!
//! Admin and staff sessions live in separate namespaces. Services never read
//! the store directly; they hold a [`SessionContext`] handed to them at
//! construction, which the HTTP client consults at request time.

pub mod memory;
pub mod sqlite;

pub use memory::MemorySessionStore;
pub use sqlite::SqliteSessionStore;

use crate::error::Result;
use crate::routes::Route;
use crate::types::Account;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Portal {
    Admin,
    Staff,
}

impl Portal {
    /// Storage key of the portal's bearer token.
    pub fn storage_key(&self) -> &'static str {
        match self {
            Self::Admin => "admin_token",
            Self::Staff => "staff_token",
        }
    }

    pub fn login_route(&self) -> Route {
        match self {
            Self::Admin => Route::AdminLogin,
            Self::Staff => Route::StaffLogin,
        }
    }
}

impl std::fmt::Display for Portal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Staff => write!(f, "staff"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub account: Option<Account>,
    pub created_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn new(token: impl Into<String>, account: Option<Account>) -> Self {
        Self {
            token: token.into(),
            account,
            created_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, portal: Portal) -> Result<Option<StoredSession>>;

    async fn save(&self, portal: Portal, session: &StoredSession) -> Result<()>;

    async fn clear(&self, portal: Portal) -> Result<()>;
}

/// Session state one API client works with.
pub struct SessionContext {
    portal: Portal,
    store: Arc<dyn SessionStore>,
    expired: AtomicBool,
}

impl SessionContext {
    pub fn new(portal: Portal, store: Arc<dyn SessionStore>) -> Self {
        Self {
            portal,
            store,
            expired: AtomicBool::new(false),
        }
    }

    pub fn portal(&self) -> Portal {
        self.portal
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Bearer token as currently persisted, read fresh for every request.
    pub async fn bearer(&self) -> Result<Option<String>> {
        Ok(self
            .store
            .load(self.portal)
            .await?
            .map(|s| s.token)
            .filter(|t| !t.is_empty()))
    }

    pub async fn current(&self) -> Result<Option<StoredSession>> {
        self.store.load(self.portal).await
    }

    pub async fn establish(&self, session: StoredSession) -> Result<()> {
        self.store.save(self.portal, &session).await?;
        self.expired.store(false, Ordering::SeqCst);
        tracing::info!("Started {} session", self.portal);
        Ok(())
    }

    pub async fn end(&self) -> Result<()> {
        self.store.clear(self.portal).await?;
        tracing::info!("Ended {} session", self.portal);
        Ok(())
    }

    /// Clear the persisted session after the backend rejected it.
    ///
    /// Every rejection clears the store. The latch only keeps the redirect
    /// warning to one line per context until the next login.
    pub async fn expire(&self) -> Result<()> {
        self.store.clear(self.portal).await?;
        if !self.expired.swap(true, Ordering::SeqCst) {
            tracing::warn!(
                "{} session rejected by server, redirecting to {}",
                self.portal,
                self.portal.login_route()
            );
        }
        Ok(())
    }

    pub fn is_expired(&self) -> bool {
        self.expired.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_expire_clears_every_time() {
        let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
        let ctx = SessionContext::new(Portal::Admin, store.clone());
        ctx.establish(StoredSession::new("abc", None)).await.unwrap();
        assert_eq!(ctx.bearer().await.unwrap().as_deref(), Some("abc"));
        assert!(!ctx.is_expired());

        ctx.expire().await.unwrap();
        assert!(ctx.is_expired());
        assert!(ctx.bearer().await.unwrap().is_none());

        // A token saved behind the context's back is still cleared.
        store
            .save(Portal::Admin, &StoredSession::new("stale", None))
            .await
            .unwrap();
        ctx.expire().await.unwrap();
        assert!(ctx.bearer().await.unwrap().is_none());

        // A fresh login re-arms the latch.
        ctx.establish(StoredSession::new("def", None)).await.unwrap();
        assert!(!ctx.is_expired());
    }

    #[tokio::test]
    async fn test_portals_are_separate_namespaces() {
        let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
        let admin = SessionContext::new(Portal::Admin, store.clone());
        let staff = SessionContext::new(Portal::Staff, store);

        admin.establish(StoredSession::new("admin-tok", None)).await.unwrap();
        assert!(staff.bearer().await.unwrap().is_none());

        staff.establish(StoredSession::new("staff-tok", None)).await.unwrap();
        admin.end().await.unwrap();
        assert_eq!(staff.bearer().await.unwrap().as_deref(), Some("staff-tok"));
    }
}
