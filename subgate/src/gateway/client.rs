//! HTTP client for the subscription gateway.
//!
//! One client instance holds the gateway credentials and a reusable
//! [`reqwest::Client`]; it is cheap to clone and safe to share across
//! concurrent calls. Every action is a single HTTP POST with a JSON body and
//! no retries: calling [`SubscriptionClient::subscribe`] twice for the same
//! subscriber produces two gateway-side subscribe actions.

use axum::http::StatusCode;
use std::time::Duration;

use crate::config::GatewayConfig;
use crate::gateway::types::{Action, GatewayCredentials, SubscriptionRequest, SubscriptionResponse, UnsubscribeAck};

/// Errors from gateway calls.
///
/// Every failure reaches the caller as a value; a gateway hiccup must never
/// take the process down with it.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("gateway credentials missing required field `{field}`")]
    MissingCredential { field: &'static str },

    #[error("subscriber id must not be empty")]
    EmptySubscriberId,

    /// Network-level failure: connection refused, timeout, TLS, or an
    /// unreadable response body.
    #[error("gateway transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The gateway answered with a non-200 status.
    #[error("gateway rejected the request with HTTP {status}")]
    Rejection { status: StatusCode, body: String },

    /// The gateway answered 200 with a body that is not valid response JSON.
    #[error("gateway returned an undecodable body: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },
}

/// Client for the gateway's subscribe/unsubscribe API.
#[derive(Debug, Clone)]
pub struct SubscriptionClient {
    credentials: GatewayCredentials,
    http: reqwest::Client,
}

impl SubscriptionClient {
    /// Create a client from credentials. Fails fast on absent required
    /// fields; performs no network activity.
    pub fn new(credentials: GatewayCredentials, timeout: Duration) -> Result<Self, GatewayError> {
        for (field, value) in [
            ("application_id", &credentials.application_id),
            ("password", &credentials.password),
            ("version", &credentials.version),
        ] {
            if value.trim().is_empty() {
                return Err(GatewayError::MissingCredential { field });
            }
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { credentials, http })
    }

    /// Create a client from the application's gateway configuration.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        Self::new(GatewayCredentials::from(config), config.timeout)
    }

    /// The credentials this client was constructed with (password redacted in Debug).
    pub fn credentials(&self) -> &GatewayCredentials {
        &self.credentials
    }

    /// Subscribe `subscriber_id` with the gateway.
    ///
    /// On HTTP 200 returns the full decoded response body, passthrough fields
    /// included. Note the asymmetry with [`Self::unsubscribe`], which narrows
    /// to the status pair; the gateway SDK contract differs between the two
    /// actions and both shapes are preserved here.
    pub async fn subscribe(&self, subscriber_id: &str) -> Result<SubscriptionResponse, GatewayError> {
        self.perform(Action::Subscribe, subscriber_id).await
    }

    /// Unsubscribe `subscriber_id` from the gateway.
    ///
    /// On HTTP 200 returns only the gateway status pair.
    pub async fn unsubscribe(&self, subscriber_id: &str) -> Result<UnsubscribeAck, GatewayError> {
        let response = self.perform(Action::Unsubscribe, subscriber_id).await?;
        Ok(UnsubscribeAck {
            status_code: response.status_code,
            status_detail: response.status_detail,
        })
    }

    /// Send one action to the gateway and decode the response.
    async fn perform(&self, action: Action, subscriber_id: &str) -> Result<SubscriptionResponse, GatewayError> {
        if subscriber_id.trim().is_empty() {
            return Err(GatewayError::EmptySubscriberId);
        }

        let request = SubscriptionRequest {
            application_id: &self.credentials.application_id,
            password: &self.credentials.password,
            version: &self.credentials.version,
            action,
            subscriber_id,
        };

        tracing::debug!(%action, subscriber = subscriber_id, "Sending gateway request");

        let response = self.http.post(self.credentials.url.clone()).json(&request).send().await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%action, subscriber = subscriber_id, status = status.as_u16(), "Gateway rejected request");
            return Err(GatewayError::Rejection {
                status: StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY),
                body,
            });
        }

        let body = response.text().await?;
        let decoded: SubscriptionResponse =
            serde_json::from_str(&body).map_err(|source| GatewayError::Decode { source, body })?;

        tracing::debug!(
            %action,
            subscriber = subscriber_id,
            status_code = %decoded.status_code,
            "Gateway request completed"
        );

        Ok(decoded)
    }
}
