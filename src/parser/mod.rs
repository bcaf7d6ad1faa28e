//! Parser layer for the exporter's intermediate XML

mod xml;

use std::path::Path;

use crate::error::Result;
use crate::model::Document;

pub use self::xml::XmlReader;

/// Parse an intermediate XML file into a tree document
pub fn read_document(path: &Path) -> Result<Document> {
    XmlReader::new().read_file(path)
}
