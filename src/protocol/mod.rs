//! # Packet Protocol
//!
//! Identifier bindings and packet routing.
//!
//! ## Components
//! - **Registry**: packet type ↔ identifier bindings and frame encode/decode
//! - **Dispatcher**: handler lookup for decoded packets, immediate or scheduled

pub mod dispatcher;
pub mod registry;
