//! API models for the inbound notification webhook.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Fixed acknowledgment envelope returned to the gateway.
///
/// The gateway only ever sees one of exactly two bodies: the success envelope
/// with HTTP 200 or the error envelope with a 4xx/5xx status. The specific
/// failure cause stays in the service logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AckEnvelope {
    pub status_code: String,
    pub status_detail: String,
}

impl AckEnvelope {
    pub fn success() -> Self {
        Self {
            status_code: "S1000".to_string(),
            status_detail: "Success".to_string(),
        }
    }

    pub fn error() -> Self {
        Self {
            status_code: "E1000".to_string(),
            status_detail: "Error".to_string(),
        }
    }
}
