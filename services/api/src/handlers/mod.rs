pub mod decompose;
pub mod health;
pub mod holdings;

use actix_web::HttpRequest;
use std::sync::Arc;

use crate::registry::{HoldingsRegistry, RegistrySnapshot};
use crate::AppState;

pub const SESSION_HEADER: &str = "X-Session-Id";

/// Session named by the `X-Session-Id` header, or the configured default.
pub fn session_id(req: &HttpRequest, state: &AppState) -> String {
    req.headers()
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| state.config.session.default_session.clone())
}

/// Registry for writes; creates the session on first use.
fn session_registry(req: &HttpRequest, state: &AppState) -> (String, Arc<HoldingsRegistry>) {
    let session = session_id(req, state);
    let registry = state.sessions.registry(&session);
    (session, registry)
}

/// Snapshot for reads. An unknown session reads as an empty registry and is
/// not created.
fn session_snapshot(req: &HttpRequest, state: &AppState) -> (String, RegistrySnapshot) {
    let session = session_id(req, state);
    let snapshot = state
        .sessions
        .get(&session)
        .map(|registry| registry.snapshot())
        .unwrap_or_default();
    (session, snapshot)
}
