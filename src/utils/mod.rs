//! Internal utility helpers

pub mod metrics;

pub use metrics::{Metrics, MetricsSnapshot};
