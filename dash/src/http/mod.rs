pub mod app_interceptor;
pub mod client;
pub mod deployments;
pub mod fine_tune;
pub mod inference;
pub mod interceptor;
pub mod photons;
pub mod replicas;
pub mod request;
pub mod secrets;
pub mod storage;
pub mod transport;
