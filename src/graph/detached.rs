//! Detached elements: immutable, graph-independent element snapshots
//!
//! A detached element copies the id, label and properties of an element at one
//! instant and keeps no reference to the graph it came from. It can be
//! compared against live elements, shipped across a serialization boundary,
//! or stored in a [`BulkSet`](crate::process::BulkSet).
//!
//! Detached elements are read-only. Property writes and removal fail with
//! [`StructureError::ReadOnly`] and [`GraphMember::graph`] always fails with
//! [`StructureError::NotAttached`]. Reattaching a snapshot to a live graph is
//! a lookup by id and lives outside this module.

use super::element::{impl_element_identity, EdgeAdjacency, Element, GraphMember, Mutable, PropertyRead};
use super::property::{filtered_properties, first_property, Property, PropertyMap, PropertyValue};
use super::store::GraphStore;
use super::types::{ElementId, ElementKind, Label};
use crate::error::{StructureError, StructureResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Copy every property of `element` into a fresh map, preserving key order and
/// value order within a key.
fn snapshot_properties<E: PropertyRead + ?Sized>(element: &E) -> PropertyMap {
    let mut properties = PropertyMap::new();
    for property in element.properties(&[]) {
        if let Property::Present { key, value } = property {
            properties.entry(key).or_default().push(value);
        }
    }
    properties
}

/// Snapshot of a vertex
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetachedVertex {
    id: ElementId,
    label: Label,
    #[serde(default, skip_serializing_if = "PropertyMap::is_empty")]
    properties: PropertyMap,
}

impl DetachedVertex {
    /// A bare vertex reference without properties
    ///
    /// `label` must be non-empty; build it with [`Label::try_new`] when that is
    /// not already known.
    pub fn new(id: impl Into<ElementId>, label: impl Into<Label>) -> Self {
        DetachedVertex {
            id: id.into(),
            label: label.into(),
            properties: PropertyMap::new(),
        }
    }

    pub fn with_properties(id: impl Into<ElementId>, label: impl Into<Label>, properties: PropertyMap) -> Self {
        DetachedVertex {
            id: id.into(),
            label: label.into(),
            properties,
        }
    }

    /// Snapshot any vertex-like element
    pub fn detach<E: Element + PropertyRead + ?Sized>(vertex: &E) -> Self {
        DetachedVertex {
            id: vertex.id().clone(),
            label: vertex.label().clone(),
            properties: snapshot_properties(vertex),
        }
    }

    pub fn property_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.properties.keys().map(String::as_str)
    }
}

impl fmt::Display for DetachedVertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v[{}]", self.id)
    }
}

impl Element for DetachedVertex {
    fn id(&self) -> &ElementId {
        &self.id
    }

    fn label(&self) -> &Label {
        &self.label
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Vertex
    }
}

impl PropertyRead for DetachedVertex {
    fn property(&self, key: &str) -> Property {
        first_property(&self.properties, key)
    }

    fn properties<'a>(&'a self, keys: &'a [&'a str]) -> Box<dyn Iterator<Item = Property> + 'a> {
        Box::new(filtered_properties(&self.properties, keys))
    }
}

impl Mutable for DetachedVertex {
    fn set_property(&mut self, _key: &str, _value: PropertyValue) -> StructureResult<Property> {
        Err(StructureError::ReadOnly(self.to_string()))
    }

    fn remove(&mut self) -> StructureResult<()> {
        Err(StructureError::ReadOnly(self.to_string()))
    }
}

impl GraphMember for DetachedVertex {
    fn graph(&self) -> StructureResult<&GraphStore> {
        Err(StructureError::NotAttached)
    }
}

impl_element_identity!(DetachedVertex);

/// Snapshot of an edge
///
/// Endpoints are detached as bare (id, label) vertices; their properties are
/// not part of the edge snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetachedEdge {
    id: ElementId,
    #[serde(default)]
    label: Label,
    out_vertex: DetachedVertex,
    in_vertex: DetachedVertex,
    #[serde(default, skip_serializing_if = "PropertyMap::is_empty")]
    properties: PropertyMap,
}

impl DetachedEdge {
    /// An edge snapshot without properties; `label` must be non-empty
    pub fn new(
        id: impl Into<ElementId>,
        label: impl Into<Label>,
        out_vertex: DetachedVertex,
        in_vertex: DetachedVertex,
    ) -> Self {
        DetachedEdge {
            id: id.into(),
            label: label.into(),
            out_vertex,
            in_vertex,
            properties: PropertyMap::new(),
        }
    }

    pub fn with_properties(
        id: impl Into<ElementId>,
        label: impl Into<Label>,
        out_vertex: DetachedVertex,
        in_vertex: DetachedVertex,
        properties: PropertyMap,
    ) -> Self {
        DetachedEdge {
            properties,
            ..Self::new(id, label, out_vertex, in_vertex)
        }
    }

    /// Snapshot any edge-like element
    pub fn detach<E: EdgeAdjacency + PropertyRead + ?Sized>(edge: &E) -> Self {
        let out_vertex = edge.out_vertex();
        let in_vertex = edge.in_vertex();
        DetachedEdge {
            id: edge.id().clone(),
            label: edge.label().clone(),
            out_vertex: DetachedVertex::new(out_vertex.id().clone(), out_vertex.label().clone()),
            in_vertex: DetachedVertex::new(in_vertex.id().clone(), in_vertex.label().clone()),
            properties: snapshot_properties(edge),
        }
    }

    pub fn property_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.properties.keys().map(String::as_str)
    }
}

impl fmt::Display for DetachedEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "e[{}][{}-{}->{}]",
            self.id, self.out_vertex.id, self.label, self.in_vertex.id
        )
    }
}

impl Element for DetachedEdge {
    fn id(&self) -> &ElementId {
        &self.id
    }

    fn label(&self) -> &Label {
        &self.label
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Edge
    }
}

impl PropertyRead for DetachedEdge {
    fn property(&self, key: &str) -> Property {
        first_property(&self.properties, key)
    }

    fn properties<'a>(&'a self, keys: &'a [&'a str]) -> Box<dyn Iterator<Item = Property> + 'a> {
        Box::new(filtered_properties(&self.properties, keys))
    }
}

impl EdgeAdjacency for DetachedEdge {
    type Vertex = DetachedVertex;

    fn out_vertex(&self) -> &DetachedVertex {
        &self.out_vertex
    }

    fn in_vertex(&self) -> &DetachedVertex {
        &self.in_vertex
    }
}

impl Mutable for DetachedEdge {
    fn set_property(&mut self, _key: &str, _value: PropertyValue) -> StructureResult<Property> {
        Err(StructureError::ReadOnly(self.to_string()))
    }

    fn remove(&mut self) -> StructureResult<()> {
        Err(StructureError::ReadOnly(self.to_string()))
    }
}

impl GraphMember for DetachedEdge {
    fn graph(&self) -> StructureResult<&GraphStore> {
        Err(StructureError::NotAttached)
    }
}

impl_element_identity!(DetachedEdge);

/// A detached vertex or edge
///
/// This is the unit element payloads are read into. On the wire it is tagged
/// by a `type` field: `{"type": "vertex", ...}` or `{"type": "edge", ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DetachedElement {
    Vertex(DetachedVertex),
    Edge(DetachedEdge),
}

impl DetachedElement {
    pub fn as_vertex(&self) -> Option<&DetachedVertex> {
        match self {
            DetachedElement::Vertex(v) => Some(v),
            DetachedElement::Edge(_) => None,
        }
    }

    pub fn as_edge(&self) -> Option<&DetachedEdge> {
        match self {
            DetachedElement::Edge(e) => Some(e),
            DetachedElement::Vertex(_) => None,
        }
    }

    fn inner(&self) -> (&dyn Element, &dyn PropertyRead) {
        match self {
            DetachedElement::Vertex(v) => (v, v),
            DetachedElement::Edge(e) => (e, e),
        }
    }
}

impl From<DetachedVertex> for DetachedElement {
    fn from(vertex: DetachedVertex) -> Self {
        DetachedElement::Vertex(vertex)
    }
}

impl From<DetachedEdge> for DetachedElement {
    fn from(edge: DetachedEdge) -> Self {
        DetachedElement::Edge(edge)
    }
}

impl fmt::Display for DetachedElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetachedElement::Vertex(v) => fmt::Display::fmt(v, f),
            DetachedElement::Edge(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl Element for DetachedElement {
    fn id(&self) -> &ElementId {
        self.inner().0.id()
    }

    fn label(&self) -> &Label {
        self.inner().0.label()
    }

    fn kind(&self) -> ElementKind {
        self.inner().0.kind()
    }
}

impl PropertyRead for DetachedElement {
    fn property(&self, key: &str) -> Property {
        self.inner().1.property(key)
    }

    fn properties<'a>(&'a self, keys: &'a [&'a str]) -> Box<dyn Iterator<Item = Property> + 'a> {
        self.inner().1.properties(keys)
    }
}

impl Mutable for DetachedElement {
    fn set_property(&mut self, key: &str, value: PropertyValue) -> StructureResult<Property> {
        match self {
            DetachedElement::Vertex(v) => v.set_property(key, value),
            DetachedElement::Edge(e) => e.set_property(key, value),
        }
    }

    fn remove(&mut self) -> StructureResult<()> {
        match self {
            DetachedElement::Vertex(v) => v.remove(),
            DetachedElement::Edge(e) => e.remove(),
        }
    }
}

impl GraphMember for DetachedElement {
    fn graph(&self) -> StructureResult<&GraphStore> {
        Err(StructureError::NotAttached)
    }
}

impl_element_identity!(DetachedElement);
