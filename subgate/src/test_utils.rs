//! Shared helpers for in-crate tests: canned configs, a test server
//! constructor, and notification sinks with observable behavior.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use url::Url;

use crate::{
    AppState, build_router,
    config::Config,
    gateway::SubscriptionClient,
    notifications::{NotificationPayload, NotificationSink},
};

/// Install the rustls crypto provider exactly once for the test process.
///
/// Production installs this in `main`; tests never run `main`, so each test
/// entry point that builds a TLS client must ensure it is installed first.
pub fn install_crypto_provider() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
    });
}

/// Config pointing at `gateway_url`, with optional webhook secret.
pub fn test_config(gateway_url: &str, webhook_secret: Option<String>) -> Config {
    let mut config = Config::default();
    config.gateway.application_id = "APP_000123".to_string();
    config.gateway.password = "hunter2".to_string();
    config.gateway.url = Url::parse(gateway_url).expect("test gateway url should parse");
    config.gateway.timeout = std::time::Duration::from_secs(5);
    config.webhook.secret = webhook_secret;
    config
}

/// Build a [`axum_test::TestServer`] over the full router.
pub fn create_test_server(config: Config, sink: Arc<dyn NotificationSink>) -> axum_test::TestServer {
    install_crypto_provider();
    let gateway = SubscriptionClient::from_config(&config.gateway).expect("test gateway client should build");

    let state = AppState::builder().config(config).gateway(Arc::new(gateway)).sink(sink).build();

    axum_test::TestServer::new(build_router(state)).expect("Failed to create test server")
}

/// Sink that records every delivered notification.
#[derive(Default)]
pub struct RecordingSink {
    received: Mutex<Vec<NotificationPayload>>,
}

impl RecordingSink {
    pub fn received(&self) -> Vec<NotificationPayload> {
        self.received.lock().expect("sink lock poisoned").clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn deliver(&self, notification: NotificationPayload) -> anyhow::Result<()> {
        self.received.lock().expect("sink lock poisoned").push(notification);
        Ok(())
    }
}

/// Sink that rejects every notification.
pub struct FailingSink;

#[async_trait]
impl NotificationSink for FailingSink {
    async fn deliver(&self, _notification: NotificationPayload) -> anyhow::Result<()> {
        anyhow::bail!("sink rejected notification")
    }
}
