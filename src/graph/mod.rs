//! Graph structure: element capabilities, live elements and detached snapshots
//!
//! This module implements the property graph element model with:
//! - Narrow capability traits every element type composes
//! - One identity rule shared by live and detached elements
//! - An in-memory graph store producing live elements
//! - Immutable detached snapshots of vertices and edges

pub mod detached;
pub mod edge;
pub mod element;
pub mod property;
pub mod store;
pub mod types;
pub mod vertex;

// Re-export main types
pub use detached::{DetachedEdge, DetachedElement, DetachedVertex};
pub use edge::Edge;
pub use element::{are_equal, hash_identity, EdgeAdjacency, Element, ElementIdentity, GraphMember, Mutable, PropertyRead};
pub use property::{key_exists, Property, PropertyMap, PropertyValue};
pub use store::{EdgeView, ElementMut, GraphStore, VertexView};
pub use types::{Direction, ElementId, ElementKind, IdKind, Label, DEFAULT_EDGE_LABEL};
pub use vertex::Vertex;
