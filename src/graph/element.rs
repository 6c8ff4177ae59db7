//! Element capability traits and the shared identity rule
//!
//! Each capability is its own trait so that a consumer can ask for exactly what
//! it needs:
//! - [`Element`]: identity and label
//! - [`PropertyRead`]: single property reads and filtered property iteration
//! - [`Mutable`]: property writes and removal
//! - [`EdgeAdjacency`]: endpoints of an edge
//! - [`GraphMember`]: access to the owning graph
//!
//! Equality between elements never looks at the concrete type. Every element
//! type routes `PartialEq` and `Hash` through [`are_equal`] and
//! [`hash_identity`], so a live vertex, its detached snapshot and a snapshot
//! produced by some other implementation all compare equal when they share a
//! kind and an id.

use super::property::{Property, PropertyValue};
use super::store::GraphStore;
use super::types::{Direction, ElementId, ElementKind, Label};
use crate::error::StructureResult;
use std::hash::{Hash, Hasher};

/// The `(kind, id)` projection that element equality is defined over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementIdentity<'a> {
    pub kind: ElementKind,
    pub id: &'a ElementId,
}

/// Identity and label of a graph element
pub trait Element {
    /// Stable identity, never changes while the element exists
    fn id(&self) -> &ElementId;

    /// Label, immutable after construction
    fn label(&self) -> &Label;

    fn kind(&self) -> ElementKind;

    fn identity(&self) -> ElementIdentity<'_> {
        ElementIdentity {
            kind: self.kind(),
            id: self.id(),
        }
    }
}

/// Read access to element properties
pub trait PropertyRead {
    /// First value stored under `key`, or [`Property::empty`]
    fn property(&self, key: &str) -> Property;

    /// Every key/value pair whose key is in `keys`; an empty `keys` yields all.
    /// Order is stable across calls on the same element.
    fn properties<'a>(&'a self, keys: &'a [&'a str]) -> Box<dyn Iterator<Item = Property> + 'a>;
}

/// Write access to an element
pub trait Mutable {
    /// Replace every value of `key` with `value`
    fn set_property(&mut self, key: &str, value: PropertyValue) -> StructureResult<Property>;

    /// Delete the element from its graph
    fn remove(&mut self) -> StructureResult<()>;
}

/// Directed adjacency of an edge
pub trait EdgeAdjacency: Element {
    type Vertex: Element;

    fn out_vertex(&self) -> &Self::Vertex;

    fn in_vertex(&self) -> &Self::Vertex;

    /// Endpoints selected by `direction`; `Both` is always out then in
    fn vertices(&self, direction: Direction) -> Vec<&Self::Vertex> {
        match direction {
            Direction::Out => vec![self.out_vertex()],
            Direction::In => vec![self.in_vertex()],
            Direction::Both => vec![self.out_vertex(), self.in_vertex()],
        }
    }
}

/// Access to the graph an element lives in
pub trait GraphMember {
    fn graph(&self) -> StructureResult<&GraphStore>;
}

/// Two elements are equal iff they have the same kind and the same id
pub fn are_equal(a: ElementIdentity<'_>, b: ElementIdentity<'_>) -> bool {
    a.kind == b.kind && a.id == b.id
}

/// Element hashes depend on the id alone
pub fn hash_identity<H: Hasher>(id: &ElementId, state: &mut H) {
    id.hash(state);
}

/// Implements `PartialEq<T: Element>`, `Eq` and `Hash` through the shared
/// identity functions.
macro_rules! impl_element_identity {
    ($ty:ident $(<$lt:lifetime>)?) => {
        impl<$($lt,)? T: $crate::graph::element::Element + ?Sized> PartialEq<T> for $ty$(<$lt>)? {
            fn eq(&self, other: &T) -> bool {
                $crate::graph::element::are_equal(
                    $crate::graph::element::Element::identity(self),
                    other.identity(),
                )
            }
        }

        impl$(<$lt>)? Eq for $ty$(<$lt>)? {}

        impl$(<$lt>)? std::hash::Hash for $ty$(<$lt>)? {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                $crate::graph::element::hash_identity(
                    $crate::graph::element::Element::id(self),
                    state,
                );
            }
        }
    };
}

pub(crate) use impl_element_identity;
