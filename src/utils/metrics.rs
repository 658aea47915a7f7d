//! Observability and Metrics
//!
//! Counters for registry and dispatcher traffic.
//!
//! Uses atomic counters for thread-safe metrics collection; encode and decode
//! run concurrently from worker threads once registration is finished.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// Global metrics collector for packet operations
#[derive(Debug)]
pub struct Metrics {
    /// Packet types registered
    pub registrations: AtomicU64,
    /// Frames successfully encoded
    pub frames_encoded: AtomicU64,
    /// Frames successfully decoded
    pub frames_decoded: AtomicU64,
    /// Total bytes of encoded frames
    pub bytes_encoded: AtomicU64,
    /// Total bytes of decoded frames
    pub bytes_decoded: AtomicU64,
    /// Failed encodes (any cause)
    pub encode_errors: AtomicU64,
    /// Failed decodes (any cause)
    pub decode_errors: AtomicU64,
    /// Decodes that hit an unregistered identifier
    pub unknown_ids: AtomicU64,
    /// Packets handed to a handler
    pub packets_dispatched: AtomicU64,
    /// Dispatches that found no handler or whose handler failed
    pub dispatch_errors: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            registrations: AtomicU64::new(0),
            frames_encoded: AtomicU64::new(0),
            frames_decoded: AtomicU64::new(0),
            bytes_encoded: AtomicU64::new(0),
            bytes_decoded: AtomicU64::new(0),
            encode_errors: AtomicU64::new(0),
            decode_errors: AtomicU64::new(0),
            unknown_ids: AtomicU64::new(0),
            packets_dispatched: AtomicU64::new(0),
            dispatch_errors: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a packet type registration
    pub fn registration(&self) {
        self.registrations.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an encoded frame
    pub fn frame_encoded(&self, byte_count: u64) {
        self.frames_encoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_encoded.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record a decoded frame
    pub fn frame_decoded(&self, byte_count: u64) {
        self.frames_decoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_decoded.fetch_add(byte_count, Ordering::Relaxed);
    }

    pub fn encode_error(&self) {
        self.encode_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn decode_error(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a frame with an unknown identifier (also counts as a decode error)
    pub fn unknown_id(&self) {
        self.unknown_ids.fetch_add(1, Ordering::Relaxed);
        self.decode_error();
    }

    pub fn packet_dispatched(&self) {
        self.packets_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dispatch_error(&self) {
        self.dispatch_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            registrations: self.registrations.load(Ordering::Relaxed),
            frames_encoded: self.frames_encoded.load(Ordering::Relaxed),
            frames_decoded: self.frames_decoded.load(Ordering::Relaxed),
            bytes_encoded: self.bytes_encoded.load(Ordering::Relaxed),
            bytes_decoded: self.bytes_decoded.load(Ordering::Relaxed),
            encode_errors: self.encode_errors.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
            unknown_ids: self.unknown_ids.load(Ordering::Relaxed),
            packets_dispatched: self.packets_dispatched.load(Ordering::Relaxed),
            dispatch_errors: self.dispatch_errors.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            registrations = snapshot.registrations,
            frames_encoded = snapshot.frames_encoded,
            frames_decoded = snapshot.frames_decoded,
            bytes_encoded = snapshot.bytes_encoded,
            bytes_decoded = snapshot.bytes_decoded,
            encode_errors = snapshot.encode_errors,
            decode_errors = snapshot.decode_errors,
            unknown_ids = snapshot.unknown_ids,
            packets_dispatched = snapshot.packets_dispatched,
            dispatch_errors = snapshot.dispatch_errors,
            uptime_seconds = snapshot.uptime_seconds,
            "Packet metrics snapshot"
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub registrations: u64,
    pub frames_encoded: u64,
    pub frames_decoded: u64,
    pub bytes_encoded: u64,
    pub bytes_decoded: u64,
    pub encode_errors: u64,
    pub decode_errors: u64,
    pub unknown_ids: u64,
    pub packets_dispatched: u64,
    pub dispatch_errors: u64,
    pub uptime_seconds: u64,
}

static METRICS: once_cell::sync::Lazy<Metrics> = once_cell::sync::Lazy::new(Metrics::new);

/// Get the global metrics instance
pub fn global_metrics() -> &'static Metrics {
    &METRICS
}

/// Timer for measuring operation duration
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    /// Start timing an operation
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        debug!(
            operation = self.operation,
            duration_us = duration.as_micros() as u64,
            "Operation completed"
        );
    }
}
