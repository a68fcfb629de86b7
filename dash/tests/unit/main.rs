//! Integration tests

mod mocks;
mod test_aggregator;
mod test_app;
mod test_interceptor;
mod test_timeouts;
