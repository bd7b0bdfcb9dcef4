//! API models for subscription management endpoints.

use serde::Deserialize;
use utoipa::ToSchema;

/// Request to subscribe a subscriber with the gateway.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionCreate {
    /// Opaque subscriber identifier (e.g. a masked phone number)
    pub subscriber_id: String,
}
