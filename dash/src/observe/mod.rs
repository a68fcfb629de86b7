pub mod aggregator;
pub mod decode;
pub mod log_stream;
pub mod metrics;
pub mod rows;
pub mod shell;
