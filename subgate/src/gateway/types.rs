//! Wire types for the gateway's subscription API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use url::Url;
use utoipa::ToSchema;

/// Gateway status code reported for a successful operation.
pub const STATUS_SUCCESS: &str = "S1000";

/// Static credentials for the subscription gateway.
///
/// Immutable for the lifetime of a [`SubscriptionClient`](super::SubscriptionClient);
/// safe to share across concurrent calls.
#[derive(Clone)]
pub struct GatewayCredentials {
    /// Application identifier issued by the gateway operator
    pub application_id: String,
    /// Shared secret for the application
    pub password: String,
    /// Protocol version string sent with every request
    pub version: String,
    /// Outbound endpoint for subscription actions
    pub url: Url,
    /// Callback path registered with the gateway operator. Kept alongside the
    /// credentials for registration records; not used at request time.
    pub webhook_path: String,
}

// The password must never reach logs or error chains.
impl fmt::Debug for GatewayCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayCredentials")
            .field("application_id", &self.application_id)
            .field("password", &"<redacted>")
            .field("version", &self.version)
            .field("url", &self.url.as_str())
            .field("webhook_path", &self.webhook_path)
            .finish()
    }
}

impl From<&crate::config::GatewayConfig> for GatewayCredentials {
    fn from(config: &crate::config::GatewayConfig) -> Self {
        Self {
            application_id: config.application_id.clone(),
            password: config.password.clone(),
            version: config.version.clone(),
            url: config.url.clone(),
            webhook_path: config.webhook_path.clone(),
        }
    }
}

/// Gateway action, exactly two values. Serialized on the wire as the strings
/// `"1"` (subscribe) and `"0"` (unsubscribe); there is no status-query action
/// in this API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "1")]
    Subscribe,
    #[serde(rename = "0")]
    Unsubscribe,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Subscribe => write!(f, "subscribe"),
            Action::Unsubscribe => write!(f, "unsubscribe"),
        }
    }
}

/// Request body for a subscription action. Built per call and discarded after
/// the send; never logged (it carries the application password).
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubscriptionRequest<'a> {
    pub application_id: &'a str,
    pub password: &'a str,
    pub version: &'a str,
    pub action: Action,
    pub subscriber_id: &'a str,
}

/// Decoded gateway response to a subscription action.
///
/// `status_code`/`status_detail` are always present; the remaining typed
/// fields are returned by most gateway deployments, and anything else the
/// gateway includes is preserved verbatim in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
    /// Gateway-defined status token (e.g. "S1000")
    pub status_code: String,
    /// Human-readable status description
    pub status_detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Subscription state after the action (e.g. "REGISTERED", "UNREGISTERED")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_status: Option<String>,
    /// Call-specific passthrough fields, returned to the caller unchanged
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

impl SubscriptionResponse {
    /// Whether the gateway reported the operation as successful.
    pub fn is_success(&self) -> bool {
        self.status_code == STATUS_SUCCESS
    }
}

/// The two scalar fields delivered for an unsubscribe action.
///
/// Unsubscribe deliberately narrows the gateway response to the status pair
/// while subscribe hands back the full decoded body. The gateway contract
/// only guarantees these two fields for unsubscribe.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnsubscribeAck {
    pub status_code: String,
    pub status_detail: String,
}
