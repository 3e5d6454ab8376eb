//! Shiftboard REST API server
//!
//! This crate implements the HTTP JSON surface of the venue staff-scheduling
//! backend: approved-email gated registration, login against PBKDF2
//! credentials, schedule/event/shift management, and time tracking. Storage
//! is injected through the store traits in [`models`], so handlers never see
//! a concrete database type.

pub mod config;
pub mod dependencies;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod mock_dependencies;
pub mod models;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::Server;
