//! Data model: the parsed tree and the flattened table

mod table;
mod tree;

pub use table::{Row, Table};
pub use tree::{Document, Node};
