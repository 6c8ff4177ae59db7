//! Property values and multi-valued property maps
//!
//! A property key maps to an ordered list of values. Most keys hold one value;
//! multi-properties keep every value in insertion order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Property value type supporting multiple data types
///
/// Serialized untagged so that element payloads read as plain JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<PropertyValue>),
    Map(HashMap<String, PropertyValue>),
}

impl PropertyValue {
    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    /// Get string value if this is a string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get integer value if this is an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get float value if this is a float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get boolean value if this is a boolean
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<PropertyValue>> {
        match self {
            PropertyValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Get type name as string
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::String(_) => "String",
            PropertyValue::Integer(_) => "Integer",
            PropertyValue::Float(_) => "Float",
            PropertyValue::Boolean(_) => "Boolean",
            PropertyValue::Array(_) => "Array",
            PropertyValue::Map(_) => "Map",
            PropertyValue::Null => "Null",
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(s) => write!(f, "\"{}\"", s),
            PropertyValue::Integer(i) => write!(f, "{}", i),
            PropertyValue::Float(fl) => write!(f, "{}", fl),
            PropertyValue::Boolean(b) => write!(f, "{}", b),
            PropertyValue::Array(arr) => {
                write!(f, "[")?;
                for (i, val) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", val)?;
                }
                write!(f, "]")
            }
            PropertyValue::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, val)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, val)?;
                }
                write!(f, "}}")
            }
            PropertyValue::Null => write!(f, "null"),
        }
    }
}

// Convenience conversions
impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Integer(i)
    }
}

impl From<i32> for PropertyValue {
    fn from(i: i32) -> Self {
        PropertyValue::Integer(i as i64)
    }
}

impl From<f64> for PropertyValue {
    fn from(f: f64) -> Self {
        PropertyValue::Float(f)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Boolean(b)
    }
}

impl From<Vec<PropertyValue>> for PropertyValue {
    fn from(arr: Vec<PropertyValue>) -> Self {
        PropertyValue::Array(arr)
    }
}

/// A single key/value pair read off an element, or the empty sentinel
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    Present { key: String, value: PropertyValue },
    Empty,
}

impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        Property::Present {
            key: key.into(),
            value: value.into(),
        }
    }

    /// The sentinel returned for absent keys
    pub fn empty() -> Self {
        Property::Empty
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Property::Present { .. })
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            Property::Present { key, .. } => Some(key),
            Property::Empty => None,
        }
    }

    pub fn value(&self) -> Option<&PropertyValue> {
        match self {
            Property::Present { value, .. } => Some(value),
            Property::Empty => None,
        }
    }

    pub fn into_value(self) -> Option<PropertyValue> {
        match self {
            Property::Present { value, .. } => Some(value),
            Property::Empty => None,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Property::Present { key, value } => write!(f, "p[{}->{}]", key, value),
            Property::Empty => write!(f, "p[empty]"),
        }
    }
}

/// Property map for storing element properties, key order is insertion order
pub type PropertyMap = IndexMap<String, Vec<PropertyValue>>;

/// Does `key` pass a property key filter? An empty filter matches every key.
pub fn key_exists(key: &str, keys: &[&str]) -> bool {
    keys.is_empty() || keys.contains(&key)
}

/// First value stored under `key`, or [`Property::empty`]
pub(crate) fn first_property(properties: &PropertyMap, key: &str) -> Property {
    match properties.get(key).and_then(|values| values.first()) {
        Some(value) => Property::new(key, value.clone()),
        None => Property::empty(),
    }
}

/// Flatten `key -> [values]` into key/value pairs, keeping only filtered keys
pub(crate) fn filtered_properties<'a>(
    properties: &'a PropertyMap,
    keys: &'a [&'a str],
) -> impl Iterator<Item = Property> + 'a {
    properties
        .iter()
        .filter(move |(key, _)| key_exists(key, keys))
        .flat_map(|(key, values)| values.iter().map(move |value| Property::new(key.as_str(), value.clone())))
}
