use crate::config::Config;
use crate::gateway::Gateway;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Wraps the one model client built at startup.
    pub gateway: Gateway,
    pub config: Config,
}
