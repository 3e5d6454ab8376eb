//! Dependency wiring for the REST server

use crate::{
    config::ServerConfig,
    models::{
        DatabaseScheduleStore, DatabaseTimeLogStore, DatabaseUserStore, ScheduleStore,
        TimeLogStore, UserStore,
    },
    state::AppState,
};
use anyhow::Result;
use shiftboard_credentials::CredentialManager;
use shiftboard_db::Database;
use std::sync::Arc;

/// Default dependency builder: SQLite-backed stores sharing one database
/// handle, and a credential manager configured from the server config.
pub struct DefaultServerDependencies {
    state: AppState,
}

impl DefaultServerDependencies {
    pub async fn new(config: ServerConfig) -> Result<Self> {
        let db = if config.database_path == ":memory:" {
            Arc::new(Database::open_in_memory()?)
        } else {
            Arc::new(Database::open(&config.database_path)?)
        };

        let users: Arc<dyn UserStore> = Arc::new(DatabaseUserStore::new(Arc::clone(&db)));
        let schedules: Arc<dyn ScheduleStore> =
            Arc::new(DatabaseScheduleStore::new(Arc::clone(&db)));
        let time_logs: Arc<dyn TimeLogStore> = Arc::new(DatabaseTimeLogStore::new(Arc::clone(&db)));

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

    /// Consume the dependency builder and return the resulting app state
    pub fn into_state(self) -> AppState {
        self.state
    }
}
