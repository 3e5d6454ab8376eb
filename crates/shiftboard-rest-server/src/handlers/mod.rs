//! Request handlers

pub mod approved_emails;
pub mod auth;
pub mod health;
pub mod schedules;
pub mod time_logs;
pub mod users;
