//! Screens of the client and the session check that guards the protected ones.

use crate::error::Result;
use crate::session::{Portal, SessionStore, StoredSession};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    Home,
    Staff,
    StaffLogin,
    AdminLogin,
    AdminDashboard,
    AdminTokens,
    AdminPrizes,
    AdminPlays,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Staff => "/staff",
            Self::StaffLogin => "/staff/login",
            Self::AdminLogin => "/admin/login",
            Self::AdminDashboard => "/admin/dashboard",
            Self::AdminTokens => "/admin/tokens",
            Self::AdminPrizes => "/admin/prizes",
            Self::AdminPlays => "/admin/plays",
        }
    }

    /// Portal whose session is required to enter this route.
    pub fn protected_by(&self) -> Option<Portal> {
        match self {
            Self::Home | Self::StaffLogin | Self::AdminLogin => None,
            Self::Staff => Some(Portal::Staff),
            Self::AdminDashboard | Self::AdminTokens | Self::AdminPrizes | Self::AdminPlays => {
                Some(Portal::Admin)
            }
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of entering a route.
#[derive(Debug, Clone)]
pub enum Access {
    Open,
    Granted(StoredSession),
    Redirect(Route),
}

impl Access {
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect(_))
    }
}

/// Check the persisted session for `route` before any data is requested.
pub async fn enter(route: Route, store: &dyn SessionStore) -> Result<Access> {
    let Some(portal) = route.protected_by() else {
        return Ok(Access::Open);
    };

    match store.load(portal).await? {
        Some(session) if !session.token.is_empty() => Ok(Access::Granted(session)),
        _ => {
            tracing::debug!("No {} session, redirecting {} to {}", portal, route, portal.login_route());
            Ok(Access::Redirect(portal.login_route()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;

    #[tokio::test]
    async fn test_protected_route_without_session_redirects() {
        let store = MemorySessionStore::new();

        let access = enter(Route::AdminDashboard, &store).await.unwrap();
        assert!(matches!(access, Access::Redirect(Route::AdminLogin)));

        let access = enter(Route::Staff, &store).await.unwrap();
        assert!(matches!(access, Access::Redirect(Route::StaffLogin)));
    }

    #[tokio::test]
    async fn test_public_and_granted_routes() {
        let store = MemorySessionStore::new();
        store
            .save(Portal::Admin, &StoredSession::new("tok-1", None))
            .await
            .unwrap();

        assert!(matches!(enter(Route::Home, &store).await.unwrap(), Access::Open));
        assert!(matches!(
            enter(Route::AdminLogin, &store).await.unwrap(),
            Access::Open
        ));

        match enter(Route::AdminPrizes, &store).await.unwrap() {
            Access::Granted(session) => assert_eq!(session.token, "tok-1"),
            other => panic!("expected granted access, got {:?}", other),
        }

        // Admin sessions do not open the staff portal.
        assert!(enter(Route::Staff, &store).await.unwrap().is_redirect());
    }
}
