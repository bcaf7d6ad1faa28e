//! Row-major flattening: one record element per row

use crate::error::{Result, StructureError};
use crate::model::{Document, Node, Row, Table};

/// Flatten the records found at `path` below the root.
///
/// `path` is a slash-separated list of element names relative to the root
/// (`Table/Row`). Without a path the root's children are the records.
pub fn flatten_records(doc: &Document, path: Option<&str>) -> Result<Table> {
    let mut table = Table::new();
    for (record_path, record) in select_records(doc, path) {
        table.push_row(flatten_record(record, &record_path)?);
    }
    Ok(table)
}

fn select_records<'a>(doc: &'a Document, path: Option<&str>) -> Vec<(String, &'a Node)> {
    let mut level = vec![(doc.root_path(), &doc.root)];

    let segments: Vec<&str> = match path {
        Some(p) => p.split('/').filter(|s| !s.is_empty()).collect(),
        None => Vec::new(),
    };
    if segments.is_empty() {
        return children_of(&level, None);
    }

    for segment in segments {
        level = children_of(&level, Some(segment));
    }
    level
}

fn children_of<'a>(level: &[(String, &'a Node)], name: Option<&str>) -> Vec<(String, &'a Node)> {
    level
        .iter()
        .flat_map(|(path, node)| {
            let node: &'a Node = *node;
            node.children
                .iter()
                .enumerate()
                .filter(move |(_, child)| name.map_or(true, |n| child.name == n))
                .map(move |(i, child)| (format!("{}/{}[{}]", path, child.name, i + 1), child))
        })
        .collect()
}

/// Attributes first, then scalar children; later names overwrite earlier ones.
///
/// A child carrying attributes or elements of its own is a nested record.
fn flatten_record(record: &Node, path: &str) -> Result<Row> {
    let mut row = Row::new();

    for (name, value) in &record.attributes {
        row.insert(name.as_str(), value.as_str());
    }

    for (i, field) in record.children.iter().enumerate() {
        if !field.is_scalar() {
            return Err(StructureError::NestedField {
                path: format!("{}/{}[{}]", path, field.name, i + 1),
            }
            .into());
        }
        row.insert(field.name.as_str(), field.text_or_empty());
    }

    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;

    fn rider(fields: &[(&str, &str)]) -> Node {
        fields
            .iter()
            .fold(Node::new("rider"), |node, (k, v)| node.with_child(Node::leaf(*k, *v)))
    }

    #[test]
    fn test_two_riders_example() {
        let doc = Document::new(
            Node::new("riders")
                .with_child(rider(&[("name", "Rider A"), ("team", "Team X")]))
                .with_child(rider(&[("name", "Rider B"), ("points", "120")])),
        );

        let table = flatten_records(&doc, None).unwrap();

        assert_eq!(table.columns().collect::<Vec<_>>(), vec!["name", "team", "points"]);
        let records: Vec<_> = table.records().collect();
        assert_eq!(
            records,
            vec![vec!["Rider A", "Team X", ""], vec!["Rider B", "", "120"]]
        );
    }

    #[test]
    fn test_row_count_matches_record_count() {
        let mut root = Node::new("riders");
        for i in 0..7 {
            let id = i.to_string();
            root = root.with_child(rider(&[("id", id.as_str())]));
        }
        let table = flatten_records(&Document::new(root), None).unwrap();
        assert_eq!(table.row_count(), 7);
    }

    #[test]
    fn test_attributes_become_columns() {
        let doc = Document::new(
            Node::new("teams").with_child(
                Node::new("team")
                    .with_attribute("id", "4")
                    .with_child(Node::leaf("name", "Team X")),
            ),
        );

        let table = flatten_records(&doc, None).unwrap();
        assert_eq!(table.columns().collect::<Vec<_>>(), vec!["id", "name"]);
        assert_eq!(table.rows()[0].get("id"), Some("4"));
    }

    #[test]
    fn test_duplicate_field_last_value_wins() {
        let doc = Document::new(
            Node::new("riders").with_child(
                Node::new("rider")
                    .with_attribute("name", "from attribute")
                    .with_child(Node::leaf("name", "first"))
                    .with_child(Node::leaf("name", "second")),
            ),
        );

        let table = flatten_records(&doc, None).unwrap();
        assert_eq!(table.column_count(), 1);
        assert_eq!(table.rows()[0].get("name"), Some("second"));
    }

    #[test]
    fn test_empty_document_gives_empty_table() {
        let doc = Document::new(Node::new("riders"));
        let table = flatten_records(&doc, None).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_record_path_selects_nested_records() {
        let doc = Document::new(
            Node::new("export")
                .with_child(Node::new("meta").with_child(Node::leaf("version", "3")))
                .with_child(
                    Node::new("Table")
                        .with_child(Node::new("Row").with_child(Node::leaf("a", "1")))
                        .with_child(Node::new("Row").with_child(Node::leaf("a", "2"))),
                ),
        );

        let table = flatten_records(&doc, Some("Table/Row")).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows()[1].get("a"), Some("2"));

        let missing = flatten_records(&doc, Some("Table/Nothing")).unwrap();
        assert!(missing.is_empty());
    }

    #[test]
    fn test_nested_record_is_structure_error() {
        let doc = Document::new(
            Node::new("riders")
                .with_child(rider(&[("name", "Rider A")]))
                .with_child(
                    Node::new("rider")
                        .with_child(Node::leaf("name", "Rider B"))
                        .with_child(rider(&[("name", "Inner")])),
                ),
        );

        let err = flatten_records(&doc, None).unwrap_err();
        match err {
            ConvertError::Structure(e) => {
                assert_eq!(e.path(), Some("/riders/rider[2]/rider[2]"));
            }
            other => panic!("expected structure error, got {other:?}"),
        }
    }

    #[test]
    fn test_attribute_only_field_is_structure_error() {
        let doc = Document::new(
            Node::new("riders").with_child(
                Node::new("rider")
                    .with_child(Node::leaf("name", "A"))
                    .with_child(
                        Node::new("team")
                            .with_attribute("id", "1")
                            .with_attribute("name", "X"),
                    ),
            ),
        );

        let err = flatten_records(&doc, None).unwrap_err();
        match err {
            ConvertError::Structure(e) => {
                assert_eq!(e.path(), Some("/riders/rider[1]/team[2]"));
            }
            other => panic!("expected structure error, got {other:?}"),
        }
    }

    #[test]
    fn test_attribute_only_field_from_xml_is_rejected() {
        let doc = crate::parser::XmlReader::new()
            .parse_str(r#"<riders><rider><name>A</name><team id="1" name="X"/></rider></riders>"#)
            .unwrap();
        assert!(flatten_records(&doc, None).is_err());
    }

    #[test]
    fn test_field_whitespace_survives_parsing() {
        let doc = crate::parser::XmlReader::new()
            .parse_str("<riders>\n  <rider><name>  Rider A </name></rider>\n</riders>")
            .unwrap();
        let table = flatten_records(&doc, None).unwrap();
        assert_eq!(table.rows()[0].get("name"), Some("  Rider A "));
    }

    #[test]
    fn test_flatten_is_deterministic() {
        let doc = Document::new(
            Node::new("riders")
                .with_child(rider(&[("b", "1"), ("a", "2")]))
                .with_child(rider(&[("c", "3")])),
        );
        assert_eq!(
            flatten_records(&doc, None).unwrap(),
            flatten_records(&doc, None).unwrap()
        );
    }
}
