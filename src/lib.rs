//! Samyama graph structure core
//!
//! Two value-level building blocks for graph traversal engines:
//!
//! - **Detached elements** ([`graph::DetachedVertex`], [`graph::DetachedEdge`]):
//!   immutable snapshots of graph elements that stay comparable with the live
//!   element they came from and with snapshots made by any other
//!   implementation.
//! - **Bulk sets** ([`process::BulkSet`]): multisets that store each distinct
//!   value once with an occurrence count, so traversal output with massive
//!   duplication costs memory proportional to the distinct values only.
//!
//! Around them sit the element capability traits ([`graph::element`]), a small
//! in-memory graph ([`graph::GraphStore`]) that produces live elements, and a
//! line-oriented element input format ([`io::ElementInputFormat`]).
//!
//! ## Example Usage
//!
//! ```rust
//! use samyama_structure::graph::{DetachedVertex, Element, GraphStore, PropertyRead};
//! use samyama_structure::process::BulkSet;
//!
//! let mut store = GraphStore::new();
//! let marko = store.add_vertex("person").unwrap();
//! store.set_vertex_property(&marko, "name", "marko").unwrap();
//!
//! let live = store.vertex(&marko).unwrap();
//! let detached = DetachedVertex::detach(&live);
//! assert!(detached == live);
//! assert_eq!(detached.property("name").value().and_then(|v| v.as_string()), Some("marko"));
//!
//! let mut results = BulkSet::new();
//! results.add_bulk(detached.clone(), 1_000_000);
//! results.add(detached);
//! assert_eq!(results.size(), 1_000_001);
//! assert_eq!(results.unique_size(), 1);
//! ```
//!
//! Nothing in this crate locks or keeps global state. Share values across
//! threads the way you would share any other plain value.

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod graph;
pub mod io;
pub mod process;

// Re-export main types for convenience
pub use config::{GraphConfig, GraphFeatures, IdFeatures, InputConfig};
pub use error::{ErrorCategory, StructureError, StructureResult};
pub use graph::{
    DetachedEdge, DetachedElement, DetachedVertex, Direction, EdgeAdjacency, Element, ElementId,
    ElementKind, GraphMember, GraphStore, Label, Mutable, Property, PropertyMap, PropertyRead,
    PropertyValue,
};
pub use io::ElementInputFormat;
pub use process::BulkSet;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.1.0");
    }
}
