//! Retrieval module - cross-domain bridge discovery
//!
//! Public interface:
//! - `BridgeFinder` for hybrid (semantic + structural) partner search
//! - `RetrievalConfig` for weights and the over-fetch knob
//! - `Bridge` for ranked results

mod bridge;

pub use bridge::{Bridge, BridgeFinder, RetrievalConfig};
