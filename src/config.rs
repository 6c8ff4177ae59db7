//! Configuration for the in-memory graph and the element input format
//!
//! Both configs are plain values handed to constructors. They can be built in
//! code or loaded from YAML.

use crate::error::{StructureError, StructureResult};
use crate::graph::types::{ElementId, ElementKind, IdKind};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Identifier policy for one element kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdFeatures {
    /// Whether callers may choose the id of a new element
    pub user_supplied: bool,
    /// Id kinds accepted when `user_supplied` is on
    pub accepted_kinds: Vec<IdKind>,
}

impl Default for IdFeatures {
    fn default() -> Self {
        Self {
            user_supplied: true,
            accepted_kinds: vec![IdKind::Integer, IdKind::Uuid, IdKind::String],
        }
    }
}

impl IdFeatures {
    /// Ids are always assigned by the graph
    pub fn generated_only() -> Self {
        Self {
            user_supplied: false,
            accepted_kinds: Vec::new(),
        }
    }

    /// Check a caller-supplied id for an element of `kind`
    pub fn check(&self, kind: ElementKind, id: &ElementId) -> StructureResult<()> {
        if !self.user_supplied {
            return Err(StructureError::UserSuppliedIdsNotSupported(kind));
        }
        if !self.accepted_kinds.contains(&id.kind()) {
            return Err(StructureError::UserSuppliedIdsOfThisTypeNotSupported(kind));
        }
        Ok(())
    }
}

/// Capabilities a graph declares
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphFeatures {
    pub vertex_ids: IdFeatures,
    pub edge_ids: IdFeatures,
    pub supports_vertex_removal: bool,
    pub supports_edge_removal: bool,
}

impl Default for GraphFeatures {
    fn default() -> Self {
        Self {
            vertex_ids: IdFeatures::default(),
            edge_ids: IdFeatures::default(),
            supports_vertex_removal: true,
            supports_edge_removal: true,
        }
    }
}

impl GraphFeatures {
    pub fn ids(&self, kind: ElementKind) -> &IdFeatures {
        match kind {
            ElementKind::Vertex => &self.vertex_ids,
            ElementKind::Edge => &self.edge_ids,
        }
    }
}

/// In-memory graph configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub features: GraphFeatures,
}

impl GraphConfig {
    pub fn from_yaml_str(yaml: &str) -> StructureResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> StructureResult<Self> {
        let config: Self = load_yaml(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> StructureResult<()> {
        for kind in [ElementKind::Vertex, ElementKind::Edge] {
            let ids = self.features.ids(kind);
            if ids.user_supplied && ids.accepted_kinds.is_empty() {
                return Err(StructureError::InvalidConfig(format!(
                    "{} ids are user supplied but no id kind is accepted",
                    kind
                )));
            }
        }
        Ok(())
    }
}

/// Element input format configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Target size in bytes of one split of an uncompressed file
    pub split_size: u64,
    /// Lines longer than this are skipped
    pub max_record_bytes: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            split_size: 32 * 1024 * 1024,
            max_record_bytes: 1024 * 1024,
        }
    }
}

impl InputConfig {
    pub fn from_yaml_str(yaml: &str) -> StructureResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> StructureResult<Self> {
        let config: Self = load_yaml(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> StructureResult<()> {
        if self.split_size == 0 {
            return Err(StructureError::InvalidConfig("split_size must be positive".to_string()));
        }
        if self.max_record_bytes == 0 {
            return Err(StructureError::InvalidConfig(
                "max_record_bytes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn load_yaml<T: DeserializeOwned>(path: &Path) -> StructureResult<T> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&text)?)
}
