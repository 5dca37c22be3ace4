use super::{Portal, SessionStore, StoredSession};
use crate::error::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Process-local store, used when nothing should outlive the command.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<Portal, StoredSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, portal: Portal) -> Result<Option<StoredSession>> {
        Ok(self.sessions.read().get(&portal).cloned())
    }

    async fn save(&self, portal: Portal, session: &StoredSession) -> Result<()> {
        self.sessions.write().insert(portal, session.clone());
        Ok(())
    }

    async fn clear(&self, portal: Portal) -> Result<()> {
        self.sessions.write().remove(&portal);
        Ok(())
    }
}
