use std::sync::Arc;

use lectern_core::{Config, Lectern, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    lectern: Arc<Lectern>,
}

impl AppState {
    pub fn new(config: Config, lectern: Lectern) -> Self {
        Self {
            config,
            lectern: Arc::new(lectern),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn lectern(&self) -> &Lectern {
        &self.lectern
    }

    /// Owned handle for work that must outlive the request.
    pub fn shared_lectern(&self) -> Arc<Lectern> {
        Arc::clone(&self.lectern)
    }
}
