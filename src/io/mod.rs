//! Element input adapters

pub mod input;

pub use input::{Codec, ElementInputFormat, InputSplit, RecordReader};
