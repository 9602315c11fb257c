use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::HoldingsRegistry;

/// One [`HoldingsRegistry`] per caller session, created on first use.
#[derive(Debug, Default)]
pub struct SessionRegistries {
    sessions: RwLock<HashMap<String, Arc<HoldingsRegistry>>>,
}

impl SessionRegistries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry of an existing session. Never creates one.
    pub fn get(&self, session_id: &str) -> Option<Arc<HoldingsRegistry>> {
        self.sessions.read().get(session_id).cloned()
    }

    /// Registry of `session_id`, created if the session is new.
    pub fn registry(&self, session_id: &str) -> Arc<HoldingsRegistry> {
        if let Some(registry) = self.sessions.read().get(session_id) {
            return Arc::clone(registry);
        }
        Arc::clone(
            self.sessions
                .write()
                .entry(session_id.to_string())
                .or_default(),
        )
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sessions_are_isolated() {
        let sessions = SessionRegistries::new();
        sessions
            .registry("alice")
            .ingest("A", b"ISSUER,CUSIP,WEIGHT\nx,X,100\n")
            .unwrap();

        assert_eq!(sessions.registry("alice").len(), 1);
        assert!(sessions.registry("bob").is_empty());
        assert_eq!(sessions.len(), 2);
    }

    #[test]
    fn test_get_does_not_create_sessions() {
        let sessions = SessionRegistries::new();
        assert!(sessions.get("ghost").is_none());
        assert!(sessions.is_empty());

        let created = sessions.registry("s");
        assert!(Arc::ptr_eq(&created, &sessions.get("s").unwrap()));
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn test_same_session_returns_same_registry() {
        let sessions = SessionRegistries::new();
        let first = sessions.registry("s");
        let second = sessions.registry("s");
        assert!(Arc::ptr_eq(&first, &second));
    }
}
