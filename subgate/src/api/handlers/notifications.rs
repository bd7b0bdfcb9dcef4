//! HTTP handler for the gateway's inbound status-change webhook.

use axum::{
    Json,
    body::Body,
    extract::{FromRequest, State},
    http::{HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tracing::instrument;

use crate::{AppState, api::models::notifications::AckEnvelope, notifications::NotificationPayload, signing};

/// Extractor that terminates an inbound gateway notification.
///
/// Verifies the HMAC signature (when a webhook secret is configured) against
/// the raw body before any parsing, then decodes and validates the payload.
/// Every rejection answers the gateway with the fixed error envelope; the
/// application sink is never invoked for a rejected notification.
pub struct InboundNotification(pub NotificationPayload);

impl FromRequest<AppState> for InboundNotification
where
    String: FromRequest<AppState>,
{
    type Rejection = Response;

    async fn from_request(req: Request<Body>, state: &AppState) -> Result<Self, Self::Rejection> {
        // Grab the signature headers before the body is consumed
        let headers = req.headers().clone();

        let body = String::from_request(req, state)
            .await
            .map_err(|_| reject(StatusCode::BAD_REQUEST, "unreadable request body"))?;

        if let Some(secret) = &state.config.webhook.secret {
            verify_notification(&headers, &body, secret, state.config.webhook.tolerance.as_secs())
                .map_err(|reason| reject(StatusCode::UNAUTHORIZED, &reason))?;
        }

        let payload: NotificationPayload = serde_json::from_str(&body)
            .map_err(|e| reject(StatusCode::BAD_REQUEST, &format!("malformed notification: {e}")))?;

        if let Some(field) = payload.missing_field() {
            return Err(reject(
                StatusCode::BAD_REQUEST,
                &format!("malformed notification: empty field {field}"),
            ));
        }

        Ok(Self(payload))
    }
}

/// Check the Standard Webhooks headers against the shared secret.
fn verify_notification(headers: &HeaderMap, body: &str, secret: &str, tolerance_secs: u64) -> Result<(), String> {
    let header_str = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| format!("missing {name} header"))
    };

    let msg_id = header_str("webhook-id")?;
    let timestamp: i64 = header_str("webhook-timestamp")?
        .parse()
        .map_err(|_| "invalid webhook-timestamp header".to_string())?;
    let signature = header_str("webhook-signature")?;

    let age = (Utc::now().timestamp() - timestamp).unsigned_abs();
    if age > tolerance_secs {
        return Err(format!("timestamp outside tolerance window ({age}s old)"));
    }

    if !signing::verify_signature(msg_id, timestamp, body, signature, secret) {
        return Err("signature mismatch".to_string());
    }

    Ok(())
}

fn reject(status: StatusCode, reason: &str) -> Response {
    tracing::warn!(%reason, "Rejecting gateway notification");
    (status, Json(AckEnvelope::error())).into_response()
}

/// Inbound webhook for subscription status changes.
///
/// The sink runs synchronously on the call that delivered the notification;
/// its outcome alone selects which of the two fixed envelopes the gateway
/// gets back.
#[utoipa::path(
    post,
    path = "/webhooks/subscription",
    tag = "webhooks",
    summary = "Receive a gateway status notification",
    description = "Terminates the gateway's status-change callback. Always answers with one of two fixed envelopes.",
    request_body = NotificationPayload,
    responses(
        (status = 200, description = "Notification accepted", body = AckEnvelope),
        (status = 400, description = "Malformed notification", body = AckEnvelope),
        (status = 401, description = "Missing or invalid signature", body = AckEnvelope),
        (status = 500, description = "Application callback failed", body = AckEnvelope),
    )
)]
#[instrument(skip_all)]
pub async fn notification_webhook(
    State(state): State<AppState>,
    InboundNotification(notification): InboundNotification,
) -> Response {
    match state.sink.deliver(notification).await {
        Ok(()) => (StatusCode::OK, Json(AckEnvelope::success())).into_response(),
        Err(error) => {
            tracing::error!("Notification sink failed: {:#}", error);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(AckEnvelope::error())).into_response()
        }
    }
}
