//! # Utility Modules
//!
//! Supporting utilities for logging, metrics, and task scheduling.
//!
//! ## Components
//! - **Logging**: tracing-subscriber setup from [`LoggingConfig`](crate::config::LoggingConfig)
//! - **Metrics**: Thread-safe counters for encode/decode and dispatch traffic
//! - **Scheduler**: Delayed and repeating tasks on tokio

pub mod logging;
pub mod metrics;
pub mod scheduler;

pub use metrics::{global_metrics, Metrics, MetricsSnapshot};
pub use scheduler::{ScheduledTask, Scheduler, TokioScheduler};
