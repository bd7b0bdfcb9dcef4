//! Request/response models for the HTTP surface.

pub mod notifications;
pub mod subscriptions;
