//! Main server implementation

use crate::dependencies::DefaultServerDependencies;
use crate::error::{ServerError, ServerResult};
use crate::handlers;
use crate::middleware::{rate_limit_middleware, RateLimitState};
use crate::state::AppState;
use crate::config::ServerConfig;
use axum::{
    http::HeaderValue,
    middleware::from_fn,
    routing::{delete, get, post},
    Router,
};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;

/// REST API server
pub struct Server {
    config: ServerConfig,
    app: Router,
}

impl Server {
    /// Create a new server instance with the default SQLite-backed wiring
    pub async fn new(config: ServerConfig) -> ServerResult<Self> {
        let state = DefaultServerDependencies::new(config.clone()).await?.into_state();
        Ok(Self::with_state(config, state))
    }

    /// Construct a server from an already-built app state (used for custom dependencies)
    pub fn with_state(config: ServerConfig, state: AppState) -> Self {
        let app = Self::build_app(state, &config);
        Self { config, app }
    }

    /// Build the Axum application with routes and middleware
    fn build_app(state: AppState, config: &ServerConfig) -> Router {
        // Build middleware stack
        let middleware_stack = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer(from_fn({
                let rate_limit_state =
                    std::sync::Arc::new(RateLimitState::new(config.rate_limit.clone()));
                move |req, next| {
                    let state = std::sync::Arc::clone(&rate_limit_state);
                    rate_limit_middleware(state, req, next)
                }
            }))
            .layer({
                if config.enable_cors {
                    CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
                } else {
                    CorsLayer::new()
                        .allow_origin(vec![
                            HeaderValue::from_static("http://localhost:3000"),
                            HeaderValue::from_static("http://127.0.0.1:3000"),
                        ])
                        .allow_methods([
                            axum::http::Method::GET,
                            axum::http::Method::POST,
                            axum::http::Method::DELETE,
                        ])
                        .allow_headers([
                            axum::http::header::AUTHORIZATION,
                            axum::http::header::CONTENT_TYPE,
                        ])
                }
            });

        // API routes
        let api_routes = Router::new()
            // Health and status endpoints
            .route("/healthz", get(handlers::health::health_check))
            .route("/readyz", get(handlers::health::readiness_check))
            .route("/version", get(handlers::health::version))
            // Authentication
            .route("/login", post(handlers::auth::login))
            // User accounts
            .route("/users", get(handlers::users::list_users))
            .route("/users", post(handlers::users::create_user))
            .route("/users/:id", get(handlers::users::get_user))
            .route("/users/:id", delete(handlers::users::delete_user))
            .route(
                "/users/:id/time-logs",
                get(handlers::time_logs::list_user_time_logs),
            )
            // Approved-email registration gate
            .route(
                "/approved-emails",
                get(handlers::approved_emails::list_approved_emails),
            )
            .route(
                "/approved-emails",
                post(handlers::approved_emails::create_approved_email),
            )
            .route(
                "/approved-emails/:id",
                delete(handlers::approved_emails::delete_approved_email),
            )
            // Schedules
            .route("/schedules", get(handlers::schedules::list_schedules))
            .route("/schedules", post(handlers::schedules::create_schedule))
            .route("/schedules/:id", get(handlers::schedules::get_schedule))
            .route(
                "/schedules/:id",
                delete(handlers::schedules::delete_schedule),
            )
            .route(
                "/schedules/:id/events",
                get(handlers::schedules::list_schedule_events),
            )
            .route(
                "/schedules/:id/shifts",
                get(handlers::schedules::list_schedule_shifts),
            )
            // Events and shifts
            .route("/events", post(handlers::schedules::create_event))
            .route("/shifts", post(handlers::schedules::create_shift))
            .route("/shifts/:id", delete(handlers::schedules::delete_shift))
            // Time tracking
            .route("/time-logs", post(handlers::time_logs::clock_in))
            .route(
                "/time-logs/:id/clock-out",
                post(handlers::time_logs::clock_out),
            );

        Router::new()
            .nest("/api/v1", api_routes)
            .with_state(state)
            .layer(middleware_stack)
    }

    /// Run the server
    pub async fn run(self) -> ServerResult<()> {
        let addr = self.config.bind_addr;
        info!("Starting server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(
            listener,
            self.app
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
            .map_err(|err| ServerError::Internal(format!("REST server error: {err}")))?;

        Ok(())
    }

    /// Get the bind address
    pub fn addr(&self) -> SocketAddr {
        self.config.bind_addr
    }
}
