use crate::config::Config;
use crate::session::SessionRegistry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            sessions: SessionRegistry::new(config.session_idle, config.default_goal),
            config: Arc::new(config),
        }
    }
}
