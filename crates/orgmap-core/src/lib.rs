//! # Orgmap Core
//!
//! Data model and aggregation engine for the organizational ontology graph.
//!
//! Defines the node/edge model and response envelope shared by every
//! adapter, the source traits adapters implement, the fan-out/fan-in
//! aggregator with its deterministic fallback dataset, and the in-memory
//! exploration surface: graph session, neighbor expansion, and search.

pub mod aggregate;
pub mod error;
pub mod expand;
pub mod fallback;
pub mod model;
pub mod search;
pub mod session;
pub mod source;
pub mod typemap;

pub use aggregate::Aggregator;
pub use error::SourceError;
pub use model::{Edge, GraphMeta, GraphPayload, Node, NodeType, ResponseMode, edge_id};
pub use session::{GraphSession, GraphSnapshot};
pub use source::{FetchRequest, GraphSource, SemanticRequest, SemanticSource};
