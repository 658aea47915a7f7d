//! # Transport Adapters
//!
//! Glue between the packet registry and byte streams. The registry itself
//! handles exactly one frame at a time; the adapters here split continuous
//! streams into frames.
//!
//! ## Components
//! - **Framed**: `tokio_util` encoder/decoder over a shared registry

pub mod framed;
