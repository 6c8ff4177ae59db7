//! Traversal result containers

pub mod bulk_set;

pub use bulk_set::BulkSet;
