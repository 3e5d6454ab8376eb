//! Server state management

use crate::config::ServerConfig;
use crate::models::{ScheduleStore, TimeLogStore, UserStore};
use shiftboard_credentials::CredentialManager;
use std::sync::Arc;

/// Shared server state.
///
/// Handlers only see the store traits, never a concrete database type; the
/// wiring in `dependencies` decides what backs them.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,

    /// Password credential derivation/verification
    pub credentials: Arc<CredentialManager>,

    /// User accounts and the approved-email registration gate
    pub users: Arc<dyn UserStore>,

    /// Schedules, events and shifts
    pub schedules: Arc<dyn ScheduleStore>,

    /// Clock-in/clock-out records
    pub time_logs: Arc<dyn TimeLogStore>,
}

impl AppState {
    /// Get configuration reference
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
