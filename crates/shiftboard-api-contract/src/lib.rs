//! Shiftboard REST API contract types and validation
//!
//! This crate defines the schema types and validation for the staff-scheduling
//! REST API. These types are shared between the server and any client
//! implementations; the server never leaks its storage records through this
//! boundary (in particular, stored credentials never appear here).

pub mod error;
pub mod types;
pub mod validation;

pub use error::*;
pub use types::*;
