//! XML reader producing a [`Document`]

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{ConvertError, Result};
use crate::model::{Document, Node};

/// Reader for the exporter's XML output
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlReader;

impl XmlReader {
    pub fn new() -> Self {
        Self
    }

    /// Read and parse an XML file
    pub fn read_file(&self, path: &Path) -> Result<Document> {
        let content = std::fs::read_to_string(path).map_err(|e| ConvertError::io(path, e))?;
        self.parse_str(&content)
    }

    /// Parse XML text into a tree
    pub fn parse_str(&self, xml: &str) -> Result<Document> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().expand_empty_elements = true;

        let mut stack: Vec<Node> = Vec::new();
        let mut root: Option<Node> = None;

        loop {
            let event = reader.read_event().map_err(|e| {
                ConvertError::xml(format!("{} at byte {}", e, reader.error_position()))
            })?;

            match event {
                Event::Start(e) => {
                    if root.is_some() && stack.is_empty() {
                        return Err(ConvertError::xml("multiple root elements"));
                    }
                    stack.push(start_node(&e)?);
                }
                Event::Text(e) => {
                    let text = e
                        .unescape()
                        .map_err(|e| ConvertError::xml(e.to_string()))?;
                    append_text(&mut stack, &text)?;
                }
                Event::CData(e) => {
                    let bytes = e.into_inner();
                    let text = std::str::from_utf8(&bytes)
                        .map_err(|e| ConvertError::xml(format!("invalid UTF-8 in CDATA: {}", e)))?;
                    append_text(&mut stack, text)?;
                }
                Event::End(_) => {
                    let mut node = stack
                        .pop()
                        .ok_or_else(|| ConvertError::xml("unexpected closing tag"))?;
                    drop_indentation(&mut node);
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => root = Some(node),
                    }
                }
                Event::Eof => break,
                // Declarations, comments, processing instructions, doctype
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(ConvertError::xml(format!("unclosed element <{}>", open.name)));
        }

        root.map(Document::new)
            .ok_or_else(|| ConvertError::xml("document has no root element"))
    }
}

fn start_node(e: &BytesStart<'_>) -> Result<Node> {
    let mut node = Node::new(String::from_utf8_lossy(e.name().as_ref()));
    for attr in e.attributes() {
        let attr = attr.map_err(|e| ConvertError::xml(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| ConvertError::xml(e.to_string()))?
            .into_owned();
        node.attributes.insert(key, value);
    }
    Ok(node)
}

/// Whitespace between child elements is layout, not a value. Leaf text is kept as written.
fn drop_indentation(node: &mut Node) {
    if !node.is_leaf() && node.text.as_deref().is_some_and(|t| t.trim().is_empty()) {
        node.text = None;
    }
}

fn append_text(stack: &mut [Node], text: &str) -> Result<()> {
    let Some(node) = stack.last_mut() else {
        // Whitespace around the root is ignored; anything else is junk
        if text.trim().is_empty() {
            return Ok(());
        }
        return Err(ConvertError::xml("text outside the root element"));
    };
    if text.is_empty() {
        return Ok(());
    }
    match node.text.as_mut() {
        Some(existing) => existing.push_str(text),
        None => node.text = Some(text.to_string()),
    }
    Ok(())
}
