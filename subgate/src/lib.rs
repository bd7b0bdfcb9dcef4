//! # subgate: SMS subscription gateway client & webhook service
//!
//! `subgate` integrates an application with a third-party SMS subscription
//! gateway. It covers both directions of that integration: an outbound HTTP
//! client that performs subscribe/unsubscribe actions against the gateway's
//! API, and an inbound webhook endpoint that terminates the gateway's
//! asynchronous status-change notifications.
//!
//! ## Overview
//!
//! Subscription gateways manage the actual subscription state of end users
//! (identified by an opaque `subscriberId`) and charge them on a schedule.
//! Applications talk to the gateway with static credentials issued at
//! registration time: an application id, a password, and a protocol version.
//! This crate owns those credentials, performs the two gateway actions on
//! behalf of the application, and forwards validated status notifications to
//! application code through the [`notifications::NotificationSink`] trait.
//!
//! The service itself is stateless: no subscription registry is kept, nothing
//! outlives a single request/response or request/callback cycle, and callers
//! are responsible for persisting subscription state if they need it.
//!
//! ### Request Flow
//!
//! Outbound: `POST /api/v1/subscriptions` (and its DELETE counterpart) reach
//! the [`gateway::SubscriptionClient`], which issues exactly one HTTP POST to
//! the gateway per call. Failures come back as typed values (transport
//! failures, gateway rejections, and undecodable bodies are distinct) and
//! map onto 504/502 responses at the HTTP surface.
//!
//! Inbound: the gateway POSTs status changes to `/webhooks/subscription`.
//! When a webhook secret is configured, the raw body's HMAC-SHA256 signature
//! is verified before any parsing. Validated payloads are handed to the
//! configured sink exactly once; whatever happens, the gateway receives one
//! of exactly two fixed acknowledgment envelopes.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use subgate::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Parse CLI arguments and load configuration
//!     let args = subgate::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     // Initialize telemetry (structured logging)
//!     subgate::telemetry::init_telemetry()?;
//!
//!     // Create and start the application
//!     let app = Application::new(config)?;
//!
//!     // Run with graceful shutdown on Ctrl+C
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.

pub mod api;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod notifications;
mod openapi;
pub mod signing;
pub mod telemetry;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post},
};
use bon::Builder;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use config::Config;
use gateway::SubscriptionClient;
use notifications::{LogSink, NotificationSink};
use openapi::ApiDoc;

/// Application state shared across all request handlers.
///
/// Cheap to clone; the gateway client and the notification sink are shared
/// behind `Arc`s and hold no mutable state, so any number of concurrent
/// requests may use them.
#[derive(Clone, Builder)]
pub struct AppState {
    pub config: Config,
    pub gateway: Arc<SubscriptionClient>,
    pub sink: Arc<dyn NotificationSink>,
}

/// Build the application router with all endpoints and middleware.
///
/// - Subscription management routes under `/api/v1`
/// - The gateway notification webhook at `/webhooks/subscription`
/// - Health check at `/healthz` and OpenAPI docs at `/docs`
/// - Tracing middleware over everything
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/subscriptions", post(api::handlers::subscriptions::create_subscription))
        .route(
            "/subscriptions/{subscriber_id}",
            delete(api::handlers::subscriptions::delete_subscription),
        )
        .with_state(state.clone());

    Router::new()
        .route("/healthz", get(|| async { "OK" }))
        // Webhook route (called by the gateway, not part of the client API)
        .route(
            "/webhooks/subscription",
            post(api::handlers::notifications::notification_webhook),
        )
        .with_state(state)
        .nest("/api/v1", api_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// Main application struct that owns the router and server lifecycle.
pub struct Application {
    router: Router,
    config: Config,
}

impl Application {
    /// Create an application that logs incoming notifications.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        Self::with_sink(config, Arc::new(LogSink))
    }

    /// Create an application with a caller-supplied notification sink.
    pub fn with_sink(config: Config, sink: Arc<dyn NotificationSink>) -> anyhow::Result<Self> {
        if config.webhook.secret.is_none() {
            tracing::warn!(
                "No webhook secret configured: inbound notifications will be accepted without signature verification"
            );
        }

        let gateway = SubscriptionClient::from_config(&config.gateway)?;

        let state = AppState::builder()
            .config(config.clone())
            .gateway(Arc::new(gateway))
            .sink(sink)
            .build();

        let router = build_router(state);

        Ok(Self { router, config })
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "Subscription gateway service listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        // Run the server with graceful shutdown
        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Server stopped");

        Ok(())
    }
}
