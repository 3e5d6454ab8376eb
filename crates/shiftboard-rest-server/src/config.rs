//! Server configuration

use shiftboard_credentials::KdfParams;
use std::net::SocketAddr;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,

    /// Path to SQLite database
    pub database_path: String,

    /// Enable permissive CORS headers for development
    pub enable_cors: bool,

    /// Key-derivation parameters for password credentials.
    ///
    /// The iteration count must stay fixed for the lifetime of the stored
    /// credentials; lowering or raising it invalidates existing logins.
    pub kdf: KdfParams,

    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3001".parse().expect("valid socket address"),
            database_path: ":memory:".to_string(),
            enable_cors: false,
            kdf: KdfParams::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Requests per minute per client
    pub requests_per_minute: u64,

    /// Maximum requests allowed within any one-second burst
    pub burst_size: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: 60,
            burst_size: 10,
        }
    }
}
