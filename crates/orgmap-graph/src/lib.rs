//! # Orgmap Graph
//!
//! Native graph adapter over Neo4j: connection client, read-only query
//! guard, native-record normalization, and the adapter implementing the
//! structural source contract.

pub mod adapter;
pub mod client;
pub mod guard;
pub mod normalize;

pub use adapter::NativeGraphAdapter;
pub use client::{GraphClient, GraphConfig};
pub use guard::ensure_read_only;
