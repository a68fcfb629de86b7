//! Collaborators the client calls out to: session, navigation,
//! notifications and analytics. Each is a trait so callers can plug in
//! their own; the defaults log through `tracing`.

pub mod auth;
pub mod event_tracker;
pub mod navigate;
pub mod notification;
