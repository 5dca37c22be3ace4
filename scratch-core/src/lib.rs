//! Scratch & Win SDK - client library for the Scratch & Win backend
//!
//! This library wraps the remote HTTP API used by players, staff and admins.
//! It validates input locally, keeps portal sessions in an explicit session
//! context and turns every backend failure into one error type. All game
//! rules live on the server.

pub mod config;
pub mod error;
pub mod forms;
pub mod http;
pub mod routes;
pub mod services;
pub mod session;
pub mod types;

pub use config::ClientConfig;
pub use error::{ApiErrorKind, Result, ScratchError};
pub use forms::{Form, FormState, ValidationErrors};
pub use http::ApiClient;
pub use routes::{Access, Route};
pub use services::{AdminService, PlayService, RedeemRequest, StaffService};
pub use session::{
    MemorySessionStore, Portal, SessionContext, SessionStore, SqliteSessionStore, StoredSession,
};
pub use types::{PlayClaimRequest, PlayOutcome, PlayResult, PrizeTier};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_guard_uses_persisted_session() {
        let temp_dir = tempdir().unwrap();
        let store: Arc<dyn SessionStore> = Arc::new(
            SqliteSessionStore::new(&temp_dir.path().join("session.db"))
                .await
                .unwrap(),
        );

        let access = routes::enter(Route::AdminDashboard, &*store)
            .await
            .unwrap();
        assert!(access.is_redirect());

        let session = SessionContext::new(Portal::Admin, store.clone());
        session
            .establish(StoredSession::new("persisted", None))
            .await
            .unwrap();

        let access = routes::enter(Route::AdminDashboard, &*store)
            .await
            .unwrap();
        assert!(matches!(access, Access::Granted(_)));
    }
}
