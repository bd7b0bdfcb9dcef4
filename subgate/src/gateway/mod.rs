//! Outbound subscription gateway integration.
//!
//! - [`types`]: wire types for the gateway's subscription API
//! - [`client`]: HTTP client performing subscribe/unsubscribe actions

pub mod client;
pub mod types;

pub use client::{GatewayError, SubscriptionClient};
pub use types::{Action, GatewayCredentials, SubscriptionResponse, UnsubscribeAck};
