//! Application-side handling of gateway status notifications.
//!
//! The gateway reports asynchronous subscription state changes by POSTing to
//! the registered webhook. After validation, the extracted payload is handed
//! to a [`NotificationSink`] exactly once per inbound call. Sinks are
//! stateless from the handler's point of view: nothing is retained between
//! invocations and concurrent notifications for the same subscriber may
//! arrive in any order.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The four caller-relevant fields of a gateway status notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    /// Application the notification belongs to
    pub application_id: String,
    /// Charging/notification frequency reported by the gateway
    pub frequency: String,
    /// New subscription status (e.g. "REGISTERED", "UNREGISTERED")
    pub status: String,
    /// Subscriber the status change applies to
    pub subscriber_id: String,
}

impl NotificationPayload {
    /// First expected field that is empty, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.application_id.is_empty() {
            return Some("applicationId");
        }
        if self.frequency.is_empty() {
            return Some("frequency");
        }
        if self.status.is_empty() {
            return Some("status");
        }
        if self.subscriber_id.is_empty() {
            return Some("subscriberId");
        }
        None
    }
}

/// Application callback invoked for each validated notification.
///
/// An `Err` return tells the gateway the notification was not accepted (it
/// receives the fixed error envelope with HTTP 500); any `Ok` return is
/// acknowledged as success regardless of what the sink did with the data.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, notification: NotificationPayload) -> anyhow::Result<()>;
}

/// Default sink: records the notification in the service logs.
///
/// Deployments embed their own sink to persist subscription state; this crate
/// keeps no subscription registry of its own.
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn deliver(&self, notification: NotificationPayload) -> anyhow::Result<()> {
        tracing::info!(
            application = %notification.application_id,
            subscriber = %notification.subscriber_id,
            status = %notification.status,
            frequency = %notification.frequency,
            "Subscription status notification"
        );
        Ok(())
    }
}
