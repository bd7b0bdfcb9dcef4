//! API layer for HTTP request handling and data models.
//!
//! This module contains the HTTP surface, organized into:
//!
//! - **[`handlers`]**: Axum route handlers for all endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! - **Subscriptions** (`/api/v1/subscriptions*`): trigger gateway subscribe/unsubscribe actions
//! - **Webhooks** (`/webhooks/subscription`): inbound status notifications from the gateway
//!
//! All endpoints are documented with OpenAPI annotations using `utoipa`;
//! documentation is served at `/docs` when the server is running.

pub mod handlers;
pub mod models;
