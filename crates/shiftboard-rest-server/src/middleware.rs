//! Custom middleware

use crate::config::RateLimitConfig;
use axum::{
    extract::{ConnectInfo, Request},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Sliding-window request counts per client.
#[derive(Clone)]
pub struct RateLimitState {
    requests: Arc<Mutex<HashMap<String, Vec<Instant>>>>,
    config: RateLimitConfig,
}

impl RateLimitState {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            requests: Arc::new(Mutex::new(HashMap::new())),
            config,
        }
    }

    /// Record a request for `key` and report whether it is within the limit.
    pub async fn check_rate_limit(&self, key: &str) -> bool {
        self.check_at(key, Instant::now()).await
    }

    /// A request passes when the client is under both the per-minute budget
    /// and the one-second burst cap.
    async fn check_at(&self, key: &str, now: Instant) -> bool {
        let mut requests = self.requests.lock().await;

        // Drop requests that have left the one-minute window, and with them
        // any client that has gone quiet, so the map does not grow forever
        if let Some(window_start) = now.checked_sub(Duration::from_secs(60)) {
            requests.retain(|_, times| {
                times.retain(|&time| time > window_start);
                !times.is_empty()
            });
        }

        let client_requests = requests.entry(key.to_string()).or_default();
        if client_requests.len() >= self.config.requests_per_minute as usize {
            return false;
        }

        let in_burst = match now.checked_sub(Duration::from_secs(1)) {
            Some(burst_start) => client_requests
                .iter()
                .filter(|&&time| time > burst_start)
                .count(),
            None => client_requests.len(),
        };
        if in_burst >= self.config.burst_size as usize {
            return false;
        }

        client_requests.push(now);
        true
    }
}

/// Per-client rate limiting middleware.
///
/// Clients are keyed by `x-forwarded-for` when a proxy supplies it, falling
/// back to the socket peer address so direct clients do not share one bucket.
pub async fn rate_limit_middleware(
    state: Arc<RateLimitState>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let client_key = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .or_else(|| {
            req.extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|info| info.0.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string());

    if state.check_rate_limit(&client_key).await {
        Ok(next.run(req).await)
    } else {
        Err(StatusCode::TOO_MANY_REQUESTS)
    }
}
