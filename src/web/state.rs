use crate::config::AppConfig;
use crate::schema::ValidationOptions;
use tracing::info;

/// Shared application state for the web server
pub struct AppState {
    pub validation: ValidationOptions,
    pub startup_time: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        let validation = config.validation_options();
        info!("Unknown keys policy: {:?}", validation.unknown_keys);

        Self {
            validation,
            startup_time: chrono::Utc::now(),
        }
    }

    pub fn uptime_seconds(&self) -> i64 {
        (chrono::Utc::now() - self.startup_time).num_seconds()
    }
}
