//! HTTP handlers for subscription management endpoints.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::{
    AppState,
    api::models::subscriptions::SubscriptionCreate,
    errors::Result,
    gateway::{SubscriptionResponse, UnsubscribeAck},
};

/// Subscribe a subscriber with the gateway.
#[utoipa::path(
    post,
    path = "/api/v1/subscriptions",
    tag = "subscriptions",
    summary = "Subscribe a subscriber",
    description = "Sends a subscribe action to the gateway and returns the full gateway response body.",
    request_body = SubscriptionCreate,
    responses(
        (status = 200, description = "Gateway response", body = SubscriptionResponse),
        (status = 400, description = "Empty subscriber id"),
        (status = 502, description = "Gateway rejected the request"),
        (status = 504, description = "Gateway unreachable"),
    )
)]
#[instrument(skip_all)]
pub async fn create_subscription(
    State(state): State<AppState>,
    Json(request): Json<SubscriptionCreate>,
) -> Result<Json<SubscriptionResponse>> {
    let response = state.gateway.subscribe(&request.subscriber_id).await?;

    if !response.is_success() {
        tracing::warn!(
            subscriber = %request.subscriber_id,
            status_code = %response.status_code,
            "Gateway reported non-success status for subscribe"
        );
    }

    Ok(Json(response))
}

/// Unsubscribe a subscriber from the gateway.
#[utoipa::path(
    delete,
    path = "/api/v1/subscriptions/{subscriber_id}",
    tag = "subscriptions",
    summary = "Unsubscribe a subscriber",
    description = "Sends an unsubscribe action to the gateway and returns the gateway status pair.",
    params(
        ("subscriber_id" = String, Path, description = "Opaque subscriber identifier"),
    ),
    responses(
        (status = 200, description = "Gateway status pair", body = UnsubscribeAck),
        (status = 400, description = "Empty subscriber id"),
        (status = 502, description = "Gateway rejected the request"),
        (status = 504, description = "Gateway unreachable"),
    )
)]
#[instrument(skip_all)]
pub async fn delete_subscription(
    State(state): State<AppState>,
    Path(subscriber_id): Path<String>,
) -> Result<Json<UnsubscribeAck>> {
    let ack = state.gateway.unsubscribe(&subscriber_id).await?;
    Ok(Json(ack))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::test_utils::{RecordingSink, create_test_server, test_config};

    #[tokio::test]
    async fn create_subscription_returns_full_gateway_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"action": "1", "subscriberId": "tel:94771234567"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "statusCode": "S1000",
                "statusDetail": "SUCCESS",
                "subscriptionStatus": "REGISTERED"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let server = create_test_server(test_config(&mock_server.uri(), None), Arc::new(RecordingSink::default()));

        let response = server
            .post("/api/v1/subscriptions")
            .json(&json!({"subscriberId": "tel:94771234567"}))
            .await;

        assert_eq!(response.status_code(), 200);
        let body: serde_json::Value = response.json();
        assert_eq!(body["statusCode"], "S1000");
        assert_eq!(body["subscriptionStatus"], "REGISTERED");
    }

    #[tokio::test]
    async fn delete_subscription_returns_status_pair_only() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"action": "0", "subscriberId": "tel:94771234567"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "statusCode": "S1000",
                "statusDetail": "SUCCESS",
                "subscriptionStatus": "UNREGISTERED"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let server = create_test_server(test_config(&mock_server.uri(), None), Arc::new(RecordingSink::default()));

        let response = server.delete("/api/v1/subscriptions/tel:94771234567").await;

        assert_eq!(response.status_code(), 200);
        let body: serde_json::Value = response.json();
        assert_eq!(body, json!({"statusCode": "S1000", "statusDetail": "SUCCESS"}));
    }

    #[tokio::test]
    async fn gateway_rejection_maps_to_bad_gateway() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&mock_server)
            .await;

        let server = create_test_server(test_config(&mock_server.uri(), None), Arc::new(RecordingSink::default()));

        let response = server
            .post("/api/v1/subscriptions")
            .json(&json!({"subscriberId": "tel:94771234567"}))
            .await;

        assert_eq!(response.status_code(), 502);
        let body: serde_json::Value = response.json();
        assert_eq!(body["gatewayStatus"], 503);
        assert_eq!(body["gatewayBody"], "maintenance");
    }

    #[tokio::test]
    async fn unreachable_gateway_maps_to_gateway_timeout() {
        // Nothing is listening on this port
        let server = create_test_server(test_config("http://127.0.0.1:1", None), Arc::new(RecordingSink::default()));

        let response = server
            .post("/api/v1/subscriptions")
            .json(&json!({"subscriberId": "tel:94771234567"}))
            .await;

        assert_eq!(response.status_code(), 504);
    }

    #[tokio::test]
    async fn empty_subscriber_id_maps_to_bad_request() {
        let server = create_test_server(test_config("http://127.0.0.1:1", None), Arc::new(RecordingSink::default()));

        let response = server.post("/api/v1/subscriptions").json(&json!({"subscriberId": ""})).await;

        assert_eq!(response.status_code(), 400);
    }
}
