//! Error types for graph structure operations
//!
//! Every failure here is a contract violation raised at the call site. None of
//! them are transient, so nothing in this crate retries.

use crate::graph::types::{ElementId, ElementKind};
use thiserror::Error;

/// Broad classification of a [`StructureError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Read-only violation or an operation a value can never perform
    UnsupportedOperation,
    /// Caller passed an argument outside the accepted domain
    InvalidArgument,
    /// The backing implementation declares the feature unsupported
    Capability,
    /// The operation is not valid in the element's current state
    IllegalState,
    /// Reading element input failed
    Input,
}

/// Errors that can occur while working with graph elements and bulk sets
#[derive(Error, Debug)]
pub enum StructureError {
    #[error("Detached elements are readonly: {0}")]
    ReadOnly(String),

    #[error("The detached element is no longer attached to a graph")]
    NotAttached,

    #[error("Bulk must be a non-negative integer, got {0}")]
    InvalidBulk(i64),

    #[error("Adding a bulk of {0} overflows the bulk set size")]
    BulkOverflow(u64),

    #[error("{0} does not support user supplied identifiers")]
    UserSuppliedIdsNotSupported(ElementKind),

    #[error("{0} does not support user supplied identifiers of this type")]
    UserSuppliedIdsOfThisTypeNotSupported(ElementKind),

    #[error("Edge removal are not supported")]
    EdgeRemovalNotSupported,

    #[error("Vertex removal are not supported")]
    VertexRemovalNotSupported,

    #[error("{0} {1} not found")]
    ElementNotFound(ElementKind, ElementId),

    #[error("{0} {1} already exists")]
    ElementAlreadyExists(ElementKind, ElementId),

    #[error("Label can not be empty")]
    EmptyLabel,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Malformed record at byte {offset}: {reason}")]
    MalformedRecord { offset: u64, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
}

impl StructureError {
    /// Classify this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            StructureError::ReadOnly(_) | StructureError::NotAttached => {
                ErrorCategory::UnsupportedOperation
            }
            StructureError::InvalidBulk(_)
            | StructureError::BulkOverflow(_)
            | StructureError::EmptyLabel
            | StructureError::InvalidConfig(_)
            | StructureError::ConfigParse(_) => ErrorCategory::InvalidArgument,
            StructureError::UserSuppliedIdsNotSupported(_)
            | StructureError::UserSuppliedIdsOfThisTypeNotSupported(_) => {
                ErrorCategory::Capability
            }
            StructureError::EdgeRemovalNotSupported
            | StructureError::VertexRemovalNotSupported
            | StructureError::ElementNotFound(..)
            | StructureError::ElementAlreadyExists(..) => ErrorCategory::IllegalState,
            StructureError::MalformedRecord { .. } | StructureError::Io(_) => {
                ErrorCategory::Input
            }
        }
    }

    /// True for read-only and detached-graph violations
    pub fn is_unsupported_operation(&self) -> bool {
        self.category() == ErrorCategory::UnsupportedOperation
    }
}

pub type StructureResult<T> = Result<T, StructureError>;
