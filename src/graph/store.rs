//! In-memory graph storage
//!
//! The store is the live element producer of this crate: its views implement
//! the element capability traits and are what gets detached.

use super::edge::Edge;
use super::element::{impl_element_identity, EdgeAdjacency, Element, GraphMember, Mutable, PropertyRead};
use super::property::{Property, PropertyMap, PropertyValue};
use super::types::{Direction, ElementId, ElementKind, Label};
use super::vertex::Vertex;
use crate::config::GraphConfig;
use crate::error::{StructureError, StructureResult};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// In-memory graph storage
///
/// - vertices / edges: id -> record, kept in insertion order
/// - outgoing / incoming: vertex id -> edge ids (adjacency lists)
/// - label_index: label -> vertex ids
#[derive(Debug)]
pub struct GraphStore {
    config: GraphConfig,

    vertices: IndexMap<ElementId, Vertex>,

    edges: IndexMap<ElementId, Edge>,

    outgoing: HashMap<ElementId, Vec<ElementId>>,

    incoming: HashMap<ElementId, Vec<ElementId>>,

    label_index: HashMap<Label, IndexSet<ElementId>>,

    /// Next generated id, shared by vertices and edges
    next_id: i64,
}

impl GraphStore {
    /// Create a new empty graph store with default features
    pub fn new() -> Self {
        Self::from_valid_config(GraphConfig::default())
    }

    /// Create a new empty graph store with explicit features
    pub fn with_config(config: GraphConfig) -> StructureResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: GraphConfig) -> Self {
        GraphStore {
            config,
            vertices: IndexMap::new(),
            edges: IndexMap::new(),
            outgoing: HashMap::new(),
            incoming: HashMap::new(),
            label_index: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Create a vertex with a generated id
    pub fn add_vertex(&mut self, label: impl Into<Label>) -> StructureResult<ElementId> {
        self.add_vertex_with_properties(label, PropertyMap::new())
    }

    /// Create a vertex with a generated id and initial properties
    pub fn add_vertex_with_properties(
        &mut self,
        label: impl Into<Label>,
        properties: PropertyMap,
    ) -> StructureResult<ElementId> {
        let id = self.generate_id();
        self.insert_vertex(id, label.into(), properties)
    }

    /// Create a vertex with a caller-supplied id
    pub fn add_vertex_with_id(&mut self, id: ElementId, label: impl Into<Label>) -> StructureResult<ElementId> {
        self.config.features.vertex_ids.check(ElementKind::Vertex, &id)?;
        self.insert_vertex(id, label.into(), PropertyMap::new())
    }

    fn insert_vertex(&mut self, id: ElementId, label: Label, properties: PropertyMap) -> StructureResult<ElementId> {
        if label.is_empty() {
            return Err(StructureError::EmptyLabel);
        }
        if self.vertices.contains_key(&id) {
            return Err(StructureError::ElementAlreadyExists(ElementKind::Vertex, id));
        }

        self.label_index.entry(label.clone()).or_default().insert(id.clone());
        self.vertices
            .insert(id.clone(), Vertex::new_with_properties(id.clone(), label, properties));
        debug!("Created vertex {}", id);
        Ok(id)
    }

    /// Create an edge with a generated id
    pub fn add_edge(
        &mut self,
        out_vertex: &ElementId,
        in_vertex: &ElementId,
        label: impl Into<Label>,
    ) -> StructureResult<ElementId> {
        let id = self.generate_id();
        self.insert_edge(id, out_vertex, in_vertex, label.into())
    }

    /// Create an edge with a caller-supplied id
    pub fn add_edge_with_id(
        &mut self,
        id: ElementId,
        out_vertex: &ElementId,
        in_vertex: &ElementId,
        label: impl Into<Label>,
    ) -> StructureResult<ElementId> {
        self.config.features.edge_ids.check(ElementKind::Edge, &id)?;
        self.insert_edge(id, out_vertex, in_vertex, label.into())
    }

    fn insert_edge(
        &mut self,
        id: ElementId,
        out_vertex: &ElementId,
        in_vertex: &ElementId,
        label: Label,
    ) -> StructureResult<ElementId> {
        if label.is_empty() {
            return Err(StructureError::EmptyLabel);
        }
        if self.edges.contains_key(&id) {
            return Err(StructureError::ElementAlreadyExists(ElementKind::Edge, id));
        }
        for endpoint in [out_vertex, in_vertex] {
            if !self.vertices.contains_key(endpoint) {
                return Err(StructureError::ElementNotFound(ElementKind::Vertex, endpoint.clone()));
            }
        }

        self.outgoing.entry(out_vertex.clone()).or_default().push(id.clone());
        self.incoming.entry(in_vertex.clone()).or_default().push(id.clone());
        self.edges.insert(
            id.clone(),
            Edge::new(id.clone(), out_vertex.clone(), in_vertex.clone(), label),
        );
        debug!("Created edge {} from {} to {}", id, out_vertex, in_vertex);
        Ok(id)
    }

    fn generate_id(&mut self) -> ElementId {
        loop {
            let id = ElementId::Integer(self.next_id);
            self.next_id += 1;
            if !self.vertices.contains_key(&id) && !self.edges.contains_key(&id) {
                return id;
            }
        }
    }

    /// Get a read-only view of a vertex
    pub fn vertex(&self, id: &ElementId) -> Option<VertexView<'_>> {
        self.vertices.get(id).map(|vertex| VertexView { store: self, vertex })
    }

    /// Get a read-only view of an edge together with its endpoints
    pub fn edge(&self, id: &ElementId) -> Option<EdgeView<'_>> {
        let edge = self.edges.get(id)?;
        let out_vertex = self.vertex(&edge.out_vertex)?;
        let in_vertex = self.vertex(&edge.in_vertex)?;
        Some(EdgeView {
            store: self,
            edge,
            out_vertex,
            in_vertex,
        })
    }

    /// All vertices in creation order
    pub fn vertices(&self) -> impl Iterator<Item = VertexView<'_>> + '_ {
        self.vertices.values().map(move |vertex| VertexView { store: self, vertex })
    }

    /// All edges in creation order
    pub fn edges(&self) -> impl Iterator<Item = EdgeView<'_>> + '_ {
        self.edges.keys().filter_map(move |id| self.edge(id))
    }

    /// Vertices carrying `label`, in creation order
    pub fn vertices_by_label(&self, label: &Label) -> Vec<VertexView<'_>> {
        self.label_index
            .get(label)
            .map(|ids| ids.iter().filter_map(|id| self.vertex(id)).collect())
            .unwrap_or_default()
    }

    /// Edges incident to a vertex; `Both` lists outgoing edges before incoming ones
    pub fn edges_of(&self, vertex: &ElementId, direction: Direction) -> Vec<EdgeView<'_>> {
        let outgoing = self.outgoing.get(vertex).into_iter().flatten();
        let incoming = self.incoming.get(vertex).into_iter().flatten();
        let ids: Vec<&ElementId> = match direction {
            Direction::Out => outgoing.collect(),
            Direction::In => incoming.collect(),
            Direction::Both => outgoing.chain(incoming).collect(),
        };
        ids.into_iter().filter_map(|id| self.edge(id)).collect()
    }

    /// Replace all values of a vertex property
    pub fn set_vertex_property(
        &mut self,
        id: &ElementId,
        key: &str,
        value: impl Into<PropertyValue>,
    ) -> StructureResult<Property> {
        self.set_property(ElementKind::Vertex, id, key, value.into())
    }

    /// Replace all values of an edge property
    pub fn set_edge_property(
        &mut self,
        id: &ElementId,
        key: &str,
        value: impl Into<PropertyValue>,
    ) -> StructureResult<Property> {
        self.set_property(ElementKind::Edge, id, key, value.into())
    }

    /// Add one more value to a vertex multi-property
    pub fn append_vertex_property(
        &mut self,
        id: &ElementId,
        key: &str,
        value: impl Into<PropertyValue>,
    ) -> StructureResult<()> {
        let vertex = self
            .vertices
            .get_mut(id)
            .ok_or_else(|| StructureError::ElementNotFound(ElementKind::Vertex, id.clone()))?;
        vertex.append_property(key, value);
        Ok(())
    }

    fn set_property(
        &mut self,
        kind: ElementKind,
        id: &ElementId,
        key: &str,
        value: PropertyValue,
    ) -> StructureResult<Property> {
        match kind {
            ElementKind::Vertex => self.vertices.get_mut(id).map(|v| v.set_property(key, value.clone())),
            ElementKind::Edge => self.edges.get_mut(id).map(|e| e.set_property(key, value.clone())),
        }
        .ok_or_else(|| StructureError::ElementNotFound(kind, id.clone()))?;

        Ok(Property::new(key, value))
    }

    /// Get a mutable handle to a vertex
    pub fn vertex_mut(&mut self, id: &ElementId) -> Option<ElementMut<'_>> {
        if !self.vertices.contains_key(id) {
            return None;
        }
        Some(ElementMut {
            store: self,
            kind: ElementKind::Vertex,
            id: id.clone(),
            removed: false,
        })
    }

    /// Get a mutable handle to an edge
    pub fn edge_mut(&mut self, id: &ElementId) -> Option<ElementMut<'_>> {
        if !self.edges.contains_key(id) {
            return None;
        }
        Some(ElementMut {
            store: self,
            kind: ElementKind::Edge,
            id: id.clone(),
            removed: false,
        })
    }

    /// Remove a vertex and every edge incident to it
    pub fn remove_vertex(&mut self, id: &ElementId) -> StructureResult<Vertex> {
        if !self.config.features.supports_vertex_removal {
            return Err(StructureError::VertexRemovalNotSupported);
        }
        let vertex = self
            .vertices
            .shift_remove(id)
            .ok_or_else(|| StructureError::ElementNotFound(ElementKind::Vertex, id.clone()))?;

        let mut incident: Vec<ElementId> = self.outgoing.remove(id).unwrap_or_default();
        incident.extend(self.incoming.remove(id).unwrap_or_default());
        for edge_id in incident {
            // Self-loops show up in both lists
            if let Some(edge) = self.edges.shift_remove(&edge_id) {
                self.unlink_edge(&edge);
            }
        }

        if let Some(ids) = self.label_index.get_mut(&vertex.label) {
            ids.shift_remove(id);
            if ids.is_empty() {
                self.label_index.remove(&vertex.label);
            }
        }

        debug!("Removed vertex {}", id);
        Ok(vertex)
    }

    /// Remove a single edge
    pub fn remove_edge(&mut self, id: &ElementId) -> StructureResult<Edge> {
        if !self.config.features.supports_edge_removal {
            return Err(StructureError::EdgeRemovalNotSupported);
        }
        let edge = self
            .edges
            .shift_remove(id)
            .ok_or_else(|| StructureError::ElementNotFound(ElementKind::Edge, id.clone()))?;
        self.unlink_edge(&edge);
        debug!("Removed edge {}", id);
        Ok(edge)
    }

    fn unlink_edge(&mut self, edge: &Edge) {
        if let Some(ids) = self.outgoing.get_mut(edge.out_vertex_id()) {
            ids.retain(|e| e != &edge.id);
        }
        if let Some(ids) = self.incoming.get_mut(edge.in_vertex_id()) {
            ids.retain(|e| e != &edge.id);
        }
    }

    /// Get total number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get total number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of a live vertex
#[derive(Clone, Copy)]
pub struct VertexView<'g> {
    store: &'g GraphStore,
    vertex: &'g Vertex,
}

impl<'g> VertexView<'g> {
    pub fn record(&self) -> &'g Vertex {
        self.vertex
    }

    /// Incident edges, see [`GraphStore::edges_of`]
    pub fn edges(&self, direction: Direction) -> Vec<EdgeView<'g>> {
        self.store.edges_of(&self.vertex.id, direction)
    }
}

impl fmt::Debug for VertexView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VertexView")
            .field("id", &self.vertex.id)
            .field("label", &self.vertex.label)
            .finish()
    }
}

impl Element for VertexView<'_> {
    fn id(&self) -> &ElementId {
        &self.vertex.id
    }

    fn label(&self) -> &Label {
        &self.vertex.label
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Vertex
    }
}

impl PropertyRead for VertexView<'_> {
    fn property(&self, key: &str) -> Property {
        self.vertex.property(key)
    }

    fn properties<'a>(&'a self, keys: &'a [&'a str]) -> Box<dyn Iterator<Item = Property> + 'a> {
        self.vertex.properties(keys)
    }
}

impl GraphMember for VertexView<'_> {
    fn graph(&self) -> StructureResult<&GraphStore> {
        Ok(self.store)
    }
}

impl_element_identity!(VertexView<'g>);

/// Read-only view of a live edge and its two endpoints
#[derive(Clone, Copy)]
pub struct EdgeView<'g> {
    store: &'g GraphStore,
    edge: &'g Edge,
    out_vertex: VertexView<'g>,
    in_vertex: VertexView<'g>,
}

impl<'g> EdgeView<'g> {
    pub fn record(&self) -> &'g Edge {
        self.edge
    }
}

impl fmt::Debug for EdgeView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdgeView")
            .field("id", &self.edge.id)
            .field("label", &self.edge.label)
            .field("out", &self.edge.out_vertex)
            .field("in", &self.edge.in_vertex)
            .finish()
    }
}

impl Element for EdgeView<'_> {
    fn id(&self) -> &ElementId {
        &self.edge.id
    }

    fn label(&self) -> &Label {
        &self.edge.label
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Edge
    }
}

impl PropertyRead for EdgeView<'_> {
    fn property(&self, key: &str) -> Property {
        self.edge.property(key)
    }

    fn properties<'a>(&'a self, keys: &'a [&'a str]) -> Box<dyn Iterator<Item = Property> + 'a> {
        self.edge.properties(keys)
    }
}

impl<'g> EdgeAdjacency for EdgeView<'g> {
    type Vertex = VertexView<'g>;

    fn out_vertex(&self) -> &VertexView<'g> {
        &self.out_vertex
    }

    fn in_vertex(&self) -> &VertexView<'g> {
        &self.in_vertex
    }
}

impl GraphMember for EdgeView<'_> {
    fn graph(&self) -> StructureResult<&GraphStore> {
        Ok(self.store)
    }
}

impl_element_identity!(EdgeView<'g>);

/// Mutable handle to a live element
///
/// After a successful [`Mutable::remove`] the handle is spent and every further
/// call reports the element as not found.
pub struct ElementMut<'g> {
    store: &'g mut GraphStore,
    kind: ElementKind,
    id: ElementId,
    removed: bool,
}

impl ElementMut<'_> {
    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    fn ensure_live(&self) -> StructureResult<()> {
        if self.removed {
            return Err(StructureError::ElementNotFound(self.kind, self.id.clone()));
        }
        Ok(())
    }
}

impl Mutable for ElementMut<'_> {
    fn set_property(&mut self, key: &str, value: PropertyValue) -> StructureResult<Property> {
        self.ensure_live()?;
        self.store.set_property(self.kind, &self.id, key, value)
    }

    fn remove(&mut self) -> StructureResult<()> {
        self.ensure_live()?;
        match self.kind {
            ElementKind::Vertex => self.store.remove_vertex(&self.id).map(|_| ()),
            ElementKind::Edge => self.store.remove_edge(&self.id).map(|_| ()),
        }?;
        self.removed = true;
        Ok(())
    }
}
