//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{
    api::models::{notifications::AckEnvelope, subscriptions::SubscriptionCreate},
    gateway::{SubscriptionResponse, UnsubscribeAck},
    notifications::NotificationPayload,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "subgate",
        description = "HTTP client and webhook service for an SMS subscription gateway"
    ),
    paths(
        crate::api::handlers::subscriptions::create_subscription,
        crate::api::handlers::subscriptions::delete_subscription,
        crate::api::handlers::notifications::notification_webhook,
    ),
    components(schemas(
        SubscriptionCreate,
        SubscriptionResponse,
        UnsubscribeAck,
        NotificationPayload,
        AckEnvelope,
    )),
    tags(
        (name = "subscriptions", description = "Outbound gateway subscribe/unsubscribe actions"),
        (name = "webhooks", description = "Inbound gateway status notifications"),
    )
)]
pub struct ApiDoc;
