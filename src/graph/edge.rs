//! Edge record for the in-memory graph

use super::element::{impl_element_identity, Element, PropertyRead};
use super::property::{filtered_properties, first_property, Property, PropertyMap, PropertyValue};
use super::types::{ElementId, ElementKind, Label};

/// A directed edge in the property graph
///
/// ```text
/// out_vertex ---label---> in_vertex
/// ```
#[derive(Debug, Clone)]
pub struct Edge {
    /// Unique identifier for this edge
    pub(crate) id: ElementId,

    /// Relationship label (e.g., "knows", "created")
    pub(crate) label: Label,

    /// Tail vertex (edge goes FROM this vertex)
    pub(crate) out_vertex: ElementId,

    /// Head vertex (edge goes TO this vertex)
    pub(crate) in_vertex: ElementId,

    /// Properties associated with this edge
    pub(crate) properties: PropertyMap,
}

impl Edge {
    /// Create a new directed edge
    pub fn new(id: ElementId, out_vertex: ElementId, in_vertex: ElementId, label: impl Into<Label>) -> Self {
        Edge {
            id,
            label: label.into(),
            out_vertex,
            in_vertex,
            properties: PropertyMap::new(),
        }
    }

    pub fn out_vertex_id(&self) -> &ElementId {
        &self.out_vertex
    }

    pub fn in_vertex_id(&self) -> &ElementId {
        &self.in_vertex
    }

    /// Replace all values of a property, returning the previous ones
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Vec<PropertyValue> {
        self.properties
            .insert(key.into(), vec![value.into()])
            .unwrap_or_default()
    }
}

impl Element for Edge {
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

impl PropertyRead for Edge {
    fn property(&self, key: &str) -> Property {
        first_property(&self.properties, key)
    }

    fn properties<'a>(&'a self, keys: &'a [&'a str]) -> Box<dyn Iterator<Item = Property> + 'a> {
        Box::new(filtered_properties(&self.properties, keys))
    }
}

impl_element_identity!(Edge);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::vertex::Vertex;

    fn knows() -> Edge {
        Edge::new(ElementId::Integer(7), ElementId::Integer(1), ElementId::Integer(2), "knows")
    }

    #[test]
    fn test_edge_endpoints() {
        let edge = knows();
        assert_eq!(edge.out_vertex_id(), &ElementId::Integer(1));
        assert_eq!(edge.in_vertex_id(), &ElementId::Integer(2));
        assert_eq!(edge.label().as_str(), "knows");
    }

    #[test]
    fn test_edge_properties() {
        let mut edge = knows();
        let previous = edge.set_property("weight", 0.5);
        assert!(previous.is_empty());
        assert_eq!(edge.property("weight"), Property::new("weight", 0.5));
        assert_eq!(edge.property("since"), Property::empty());
    }

    #[test]
    fn test_edge_never_equals_vertex_with_same_id() {
        let edge = knows();
        let vertex = Vertex::new(ElementId::Integer(7), "person");
        assert!(edge != vertex);
    }
}
