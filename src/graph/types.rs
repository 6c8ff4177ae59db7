//! Core type definitions for graph elements

use crate::error::{StructureError, StructureResult};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

/// The default label to use for an edge.
///
/// Edge creation always requires a label, so this only shows up when an edge
/// payload arrives without one.
pub const DEFAULT_EDGE_LABEL: &str = "edge";

/// Opaque, stable identifier of a graph element
///
/// On the wire an `Integer` is a JSON number, a `String` is a JSON string and
/// a `Uuid` is a `{"uuid": "..."}` object. A JSON string always reads back as
/// a `String`, whatever it looks like, so every id survives a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "WireId", into = "WireId")]
pub enum ElementId {
    Integer(i64),
    Uuid(Uuid),
    String(String),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum WireId {
    Integer(i64),
    Uuid { uuid: Uuid },
    String(String),
}

impl From<WireId> for ElementId {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Integer(i) => ElementId::Integer(i),
            WireId::Uuid { uuid } => ElementId::Uuid(uuid),
            WireId::String(s) => ElementId::String(s),
        }
    }
}

impl From<ElementId> for WireId {
    fn from(id: ElementId) -> Self {
        match id {
            ElementId::Integer(i) => WireId::Integer(i),
            ElementId::Uuid(uuid) => WireId::Uuid { uuid },
            ElementId::String(s) => WireId::String(s),
        }
    }
}

impl ElementId {
    /// The kind of identifier held
    pub fn kind(&self) -> IdKind {
        match self {
            ElementId::Integer(_) => IdKind::Integer,
            ElementId::Uuid(_) => IdKind::Uuid,
            ElementId::String(_) => IdKind::String,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ElementId::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementId::Integer(i) => write!(f, "{}", i),
            ElementId::Uuid(u) => write!(f, "{}", u),
            ElementId::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for ElementId {
    fn from(id: i64) -> Self {
        ElementId::Integer(id)
    }
}

impl From<i32> for ElementId {
    fn from(id: i32) -> Self {
        ElementId::Integer(id as i64)
    }
}

impl From<Uuid> for ElementId {
    fn from(id: Uuid) -> Self {
        ElementId::Uuid(id)
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        ElementId::String(id)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        ElementId::String(id.to_string())
    }
}

/// The kind of value an [`ElementId`] carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdKind {
    Integer,
    Uuid,
    String,
}

/// Element label (e.g., "person", "knows")
///
/// Labels are never empty. Deserialization rejects `""`; in code use
/// [`Label::try_new`] when the text is not known to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    /// Wrap `label` without checking it; the caller guarantees it is non-empty
    pub fn new(label: impl Into<String>) -> Self {
        Label(label.into())
    }

    pub fn try_new(label: impl Into<String>) -> StructureResult<Self> {
        let label = label.into();
        if label.is_empty() {
            return Err(StructureError::EmptyLabel);
        }
        Ok(Label(label))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Label {
    fn default() -> Self {
        Label::new(DEFAULT_EDGE_LABEL)
    }
}

impl<'de> Deserialize<'de> for Label {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Label::try_new(label).map_err(de::Error::custom)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label(s)
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label(s.to_string())
    }
}

/// Structural kind of a graph element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Vertex,
    Edge,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Vertex => write!(f, "Vertex"),
            ElementKind::Edge => write!(f, "Edge"),
        }
    }
}

/// Qualifies adjacency queries on an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// The tail (source) endpoint
    Out,
    /// The head (target) endpoint
    In,
    /// Out then in
    Both,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_id() {
        let id = ElementId::from(42i64);
        assert_eq!(id.as_integer(), Some(42));
        assert_eq!(id.kind(), IdKind::Integer);
        assert_eq!(format!("{}", id), "42");

        let named: ElementId = "marko".into();
        assert_eq!(named.kind(), IdKind::String);
        assert_eq!(named.as_integer(), None);
    }

    #[test]
    fn test_element_id_json() {
        let id: ElementId = serde_json::from_str("7").unwrap();
        assert_eq!(id, ElementId::Integer(7));

        let id: ElementId = serde_json::from_str("\"marko\"").unwrap();
        assert_eq!(id, ElementId::String("marko".to_string()));

        let uuid = Uuid::new_v4();
        let id: ElementId = serde_json::from_str(&format!(r#"{{"uuid":"{}"}}"#, uuid)).unwrap();
        assert_eq!(id, ElementId::Uuid(uuid));
        assert_eq!(serde_json::to_string(&id).unwrap(), format!(r#"{{"uuid":"{}"}}"#, uuid));
    }

    #[test]
    fn test_uuid_shaped_string_stays_a_string() {
        for text in [
            "550e8400-e29b-41d4-a716-446655440000",
            "550e8400e29b41d4a716446655440000",
        ] {
            let id = ElementId::from(text);
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", text));

            let back: ElementId = serde_json::from_str(&json).unwrap();
            assert_eq!(back, id);
            assert_eq!(back.kind(), IdKind::String);
        }
    }

    #[test]
    fn test_label() {
        let label = Label::new("person");
        assert_eq!(label.as_str(), "person");
        assert_eq!(format!("{}", label), "person");
        assert!(!label.is_empty());

        assert_eq!(Label::default().as_str(), DEFAULT_EDGE_LABEL);
    }

    #[test]
    fn test_empty_label_rejected() {
        assert!(matches!(Label::try_new(""), Err(StructureError::EmptyLabel)));
        assert_eq!(Label::try_new("knows").unwrap().as_str(), "knows");

        assert!(serde_json::from_str::<Label>("\"\"").is_err());
        let label: Label = serde_json::from_str("\"person\"").unwrap();
        assert_eq!(label.as_str(), "person");
        assert_eq!(serde_json::to_string(&label).unwrap(), "\"person\"");
    }
}
