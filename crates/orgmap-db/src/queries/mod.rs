//! Per-entity read queries.
//!
//! One module per entity kind; each exposes a row struct and a list
//! function taking the optional org scope and a per-kind limit. All
//! queries are read-only.

pub mod agents;
pub mod assoc;
pub mod departments;
pub mod functions;
pub mod jobs;
pub mod personas;
pub mod roles;
pub mod value;
pub mod workflows;
