//! In-memory dependency wiring, used by tests and local development.

use crate::{
    config::ServerConfig,
    models::{
        InMemoryScheduleStore, InMemoryTimeLogStore, InMemoryUserStore, ScheduleStore,
        TimeLogStore, UserStore,
    },
    state::AppState,
};
use anyhow::Result;
use shiftboard_credentials::CredentialManager;
use std::sync::Arc;

/// Dependency wiring backed entirely by in-memory stores. Nothing touches
/// disk; each instance starts empty.
pub struct MockServerDependencies {
    state: AppState,
}

impl MockServerDependencies {
    pub async fn new(config: ServerConfig) -> Result<Self> {
        let users: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
        let schedules: Arc<dyn ScheduleStore> = Arc::new(InMemoryScheduleStore::new());
        let time_logs: Arc<dyn TimeLogStore> = Arc::new(InMemoryTimeLogStore::new());

        let credentials = Arc::new(CredentialManager::new(config.kdf));

        let state = AppState {
            config,
            credentials,
            users,
            schedules,
            time_logs,
        };

        Ok(Self { state })
    }

    pub fn into_state(self) -> AppState {
        self.state
    }
}
