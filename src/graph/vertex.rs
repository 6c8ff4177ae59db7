//! Vertex record for the in-memory graph

use super::element::{impl_element_identity, Element, PropertyRead};
use super::property::{filtered_properties, first_property, Property, PropertyMap, PropertyValue};
use super::types::{ElementId, ElementKind, Label};

/// A vertex in the property graph
///
/// Vertices have:
/// - A unique ID
/// - A single label
/// - Properties, each key holding one or more values
#[derive(Debug, Clone)]
pub struct Vertex {
    /// Unique identifier for this vertex
    pub(crate) id: ElementId,

    /// Label fixed at creation
    pub(crate) label: Label,

    /// Properties associated with this vertex
    pub(crate) properties: PropertyMap,
}

impl Vertex {
    /// Create a new vertex without properties
    pub fn new(id: ElementId, label: impl Into<Label>) -> Self {
        Vertex {
            id,
            label: label.into(),
            properties: PropertyMap::new(),
        }
    }

    /// Create a new vertex with properties
    pub fn new_with_properties(id: ElementId, label: impl Into<Label>, properties: PropertyMap) -> Self {
        Vertex {
            id,
            label: label.into(),
            properties,
        }
    }

    /// Replace all values of a property, returning the previous ones
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Vec<PropertyValue> {
        self.properties
            .insert(key.into(), vec![value.into()])
            .unwrap_or_default()
    }

    /// Add one more value to a (possibly multi-valued) property
    pub fn append_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.entry(key.into()).or_default().push(value.into());
    }
}

impl Element for Vertex {
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

impl PropertyRead for Vertex {
    fn property(&self, key: &str) -> Property {
        first_property(&self.properties, key)
    }

    fn properties<'a>(&'a self, keys: &'a [&'a str]) -> Box<dyn Iterator<Item = Property> + 'a> {
        Box::new(filtered_properties(&self.properties, keys))
    }
}

impl_element_identity!(Vertex);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_vertex() {
        let vertex = Vertex::new(ElementId::Integer(1), "person");
        assert_eq!(vertex.id(), &ElementId::Integer(1));
        assert_eq!(vertex.label().as_str(), "person");
        assert_eq!(vertex.kind(), ElementKind::Vertex);
        assert_eq!(vertex.properties(&[]).count(), 0);
    }

    #[test]
    fn test_vertex_properties() {
        let mut vertex = Vertex::new(ElementId::Integer(1), "person");

        vertex.set_property("name", "marko");
        vertex.set_property("age", 29i64);
        assert_eq!(vertex.property("name"), Property::new("name", "marko"));
        assert_eq!(vertex.property("age"), Property::new("age", 29i64));

        let previous = vertex.set_property("age", 30i64);
        assert_eq!(previous, vec![PropertyValue::Integer(29)]);
        assert_eq!(vertex.property("age"), Property::new("age", 30i64));
        assert_eq!(vertex.properties(&[]).count(), 2);
    }

    #[test]
    fn test_multi_properties_keep_insertion_order() {
        let mut vertex = Vertex::new(ElementId::Integer(1), "person");
        vertex.append_property("location", "san diego");
        vertex.append_property("location", "santa cruz");

        assert_eq!(vertex.property("location"), Property::new("location", "san diego"));
        let all: Vec<Property> = vertex.properties(&["location"]).collect();
        assert_eq!(
            all,
            vec![
                Property::new("location", "san diego"),
                Property::new("location", "santa cruz"),
            ]
        );
    }

    #[test]
    fn test_missing_property_is_empty() {
        let vertex = Vertex::new(ElementId::Integer(1), "person");
        assert_eq!(vertex.property("name"), Property::empty());
        assert_eq!(vertex.properties(&["name"]).count(), 0);
    }

    #[test]
    fn test_vertex_equality() {
        let v1 = Vertex::new(ElementId::Integer(7), "person");
        let v2 = Vertex::new(ElementId::Integer(7), "software");
        let v3 = Vertex::new(ElementId::Integer(8), "person");

        assert_eq!(v1, v2); // Same ID
        assert_ne!(v1, v3); // Different ID
    }
}
