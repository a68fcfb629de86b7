//! Lepton workspace client
//!
//! Authenticated access to a workspace API: deployments, replica readiness,
//! log tails, metrics and replica shells, with one interceptor chain handling
//! auth and error reporting for every call.

pub mod app;
pub mod authn;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod models;
pub mod observe;
pub mod services;
pub mod storage;
pub mod task;
pub mod utils;
pub mod workers;
