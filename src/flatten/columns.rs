//! Column-major flattening of the exporter's `Table/Column/Cell` layout
//!
//! The exporter writes each database table as
//!
//! ```text
//! <Table TableName="DYN_team" NumRows="2">
//!   <Column ColumnName="IDteam"><Cell>1</Cell><Cell>2</Cell></Column>
//!   <Column ColumnName="gene_sz_name"><Cell>Team X</Cell><Cell/></Column>
//! </Table>
//! ```
//!
//! Row `i` of the output is built from the `i`-th `Cell` of every column.

use crate::error::{Result, StructureError};
use crate::model::{Document, Node, Row, Table};

const TABLE: &str = "Table";
const COLUMN: &str = "Column";
const CELL: &str = "Cell";
const TABLE_NAME: &str = "TableName";
const NUM_ROWS: &str = "NumRows";
const COLUMN_NAME: &str = "ColumnName";

/// Flatten one table of the export.
///
/// With a name, the table whose `TableName` matches is used and a missing
/// table is an error. Without one, the first table with a positive `NumRows`
/// is used; when there is none the result is an empty table.
pub fn flatten_columns(doc: &Document, table_name: Option<&str>) -> Result<Table> {
    let tables = doc.root.descendants_named(TABLE, &doc.root_path());

    let selected = match table_name {
        Some(name) => {
            let found = tables
                .iter()
                .find(|(_, t)| t.attribute(TABLE_NAME) == Some(name));
            match found {
                Some(t) => Some(t),
                None => {
                    return Err(StructureError::TableNotFound {
                        name: name.to_string(),
                    }
                    .into())
                }
            }
        }
        None => first_table_with_data(&tables)?,
    };

    match selected {
        Some((path, node)) => table_from_columns(node, path),
        None => Ok(Table::new()),
    }
}

/// Names of all tables in the export, in document order
pub fn table_names(doc: &Document) -> Vec<String> {
    doc.root
        .descendants_named(TABLE, &doc.root_path())
        .into_iter()
        .filter_map(|(_, t)| t.attribute(TABLE_NAME).map(str::to_string))
        .collect()
}

fn first_table_with_data<'t, 'a>(
    tables: &'t [(String, &'a Node)],
) -> Result<Option<&'t (String, &'a Node)>> {
    for entry in tables {
        let (path, table) = entry;
        let Some(raw) = table.attribute(NUM_ROWS).filter(|v| !v.trim().is_empty()) else {
            continue;
        };
        let rows: i64 = raw
            .trim()
            .parse()
            .map_err(|_| StructureError::InvalidRowCount {
                path: path.clone(),
                value: raw.to_string(),
            })?;
        if rows > 0 {
            return Ok(Some(entry));
        }
    }
    Ok(None)
}

fn table_from_columns(table_node: &Node, path: &str) -> Result<Table> {
    let mut columns: Vec<(&str, Vec<&str>)> = Vec::new();

    for (i, column) in table_node.children.iter().enumerate() {
        if column.name != COLUMN {
            continue;
        }
        let Some(name) = column.attribute(COLUMN_NAME) else {
            continue;
        };
        let column_path = format!("{}/{}[{}]", path, COLUMN, i + 1);

        let mut cells = Vec::new();
        for (j, cell) in column.children.iter().enumerate() {
            if cell.name != CELL {
                continue;
            }
            if !cell.is_leaf() {
                return Err(StructureError::NestedField {
                    path: format!("{}/{}[{}]", column_path, CELL, j + 1),
                }
                .into());
            }
            cells.push(cell.text_or_empty());
        }
        columns.push((name, cells));
    }

    let mut table = Table::new();
    for (name, _) in &columns {
        table.declare_column(*name);
    }

    let row_count = columns.iter().map(|(_, cells)| cells.len()).max().unwrap_or(0);
    for i in 0..row_count {
        let mut row = Row::new();
        for (name, cells) in &columns {
            if let Some(value) = cells.get(i) {
                row.insert(*name, *value);
            }
        }
        table.push_row(row);
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;

    fn column(name: &str, cells: &[&str]) -> Node {
        cells.iter().fold(
            Node::new(COLUMN).with_attribute(COLUMN_NAME, name),
            |col, value| {
                let cell = if value.is_empty() {
                    Node::new(CELL)
                } else {
                    Node::leaf(CELL, *value)
                };
                col.with_child(cell)
            },
        )
    }

    fn table(name: &str, rows: usize, columns: Vec<Node>) -> Node {
        columns.into_iter().fold(
            Node::new(TABLE)
                .with_attribute(TABLE_NAME, name)
                .with_attribute(NUM_ROWS, rows.to_string()),
            Node::with_child,
        )
    }

    fn export(tables: Vec<Node>) -> Document {
        Document::new(tables.into_iter().fold(Node::new("Database"), Node::with_child))
    }

    #[test]
    fn test_transposes_columns_into_rows() {
        let doc = export(vec![table(
            "DYN_team",
            2,
            vec![
                column("IDteam", &["1", "2"]),
                column("gene_sz_name", &["Team X", "Team Y"]),
            ],
        )]);

        let t = flatten_columns(&doc, None).unwrap();
        assert_eq!(t.columns().collect::<Vec<_>>(), vec!["IDteam", "gene_sz_name"]);
        let records: Vec<_> = t.records().collect();
        assert_eq!(records, vec![vec!["1", "Team X"], vec!["2", "Team Y"]]);
    }

    #[test]
    fn test_ragged_columns_pad_with_empty() {
        let doc = export(vec![table(
            "DYN_cyclist",
            3,
            vec![column("a", &["1", "2", "3"]), column("b", &["x"])],
        )]);

        let t = flatten_columns(&doc, None).unwrap();
        assert_eq!(t.row_count(), 3);
        let records: Vec<_> = t.records().collect();
        assert_eq!(records[2], vec!["3", ""]);
        assert_eq!(t.rows()[2].get("b"), None);
    }

    #[test]
    fn test_empty_cell_is_empty_value() {
        let doc = export(vec![table("t", 1, vec![column("a", &[""])])]);
        let t = flatten_columns(&doc, None).unwrap();
        assert_eq!(t.rows()[0].get("a"), Some(""));
    }

    #[test]
    fn test_skips_tables_without_rows() {
        let doc = export(vec![
            table("STA_empty", 0, vec![column("x", &[])]),
            table("DYN_team", 1, vec![column("IDteam", &["7"])]),
        ]);

        let t = flatten_columns(&doc, None).unwrap();
        assert_eq!(t.columns().collect::<Vec<_>>(), vec!["IDteam"]);
    }

    #[test]
    fn test_no_table_with_data_gives_empty_table() {
        let doc = export(vec![table("STA_empty", 0, vec![])]);
        assert!(flatten_columns(&doc, None).unwrap().is_empty());
    }

    #[test]
    fn test_select_by_name() {
        let doc = export(vec![
            table("DYN_team", 1, vec![column("IDteam", &["7"])]),
            table("DYN_cyclist", 1, vec![column("IDcyclist", &["42"])]),
        ]);

        let t = flatten_columns(&doc, Some("DYN_cyclist")).unwrap();
        assert_eq!(t.rows()[0].get("IDcyclist"), Some("42"));
        assert_eq!(table_names(&doc), vec!["DYN_team", "DYN_cyclist"]);
    }

    #[test]
    fn test_missing_named_table_is_error() {
        let doc = export(vec![table("DYN_team", 1, vec![])]);
        let err = flatten_columns(&doc, Some("DYN_race")).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Structure(StructureError::TableNotFound { .. })
        ));
    }

    #[test]
    fn test_invalid_row_count_is_error() {
        let doc = Document::new(
            Node::new("Database").with_child(Node::new(TABLE).with_attribute(NUM_ROWS, "many")),
        );
        let err = flatten_columns(&doc, None).unwrap_err();
        assert!(err.to_string().contains("many"));
    }

    #[test]
    fn test_blank_row_count_is_skipped() {
        let doc = Document::new(
            Node::new("Database")
                .with_child(Node::new(TABLE).with_attribute(NUM_ROWS, ""))
                .with_child(Node::new(TABLE).with_attribute(NUM_ROWS, "  "))
                .with_child(table("DYN_team", 1, vec![column("IDteam", &["7"])])),
        );
        let t = flatten_columns(&doc, None).unwrap();
        assert_eq!(t.rows()[0].get("IDteam"), Some("7"));
    }

    #[test]
    fn test_padded_cell_keeps_whitespace() {
        let doc = crate::parser::XmlReader::new()
            .parse_str(
                "<Database>\n  <Table TableName=\"t\" NumRows=\"1\">\n    <Column ColumnName=\"a\"><Cell> x  </Cell></Column>\n  </Table>\n</Database>",
            )
            .unwrap();
        let t = flatten_columns(&doc, None).unwrap();
        assert_eq!(t.rows()[0].get("a"), Some(" x  "));
    }

    #[test]
    fn test_nested_cell_is_error() {
        let doc = export(vec![table(
            "t",
            1,
            vec![Node::new(COLUMN)
                .with_attribute(COLUMN_NAME, "a")
                .with_child(Node::new(CELL).with_child(Node::leaf("v", "1")))],
        )]);

        match flatten_columns(&doc, None).unwrap_err() {
            ConvertError::Structure(e) => {
                assert_eq!(e.path(), Some("/Database/Table[1]/Column[1]/Cell[1]"));
            }
            other => panic!("expected structure error, got {other:?}"),
        }
    }

    #[test]
    fn test_unnamed_columns_are_ignored() {
        let doc = export(vec![table(
            "t",
            1,
            vec![Node::new(COLUMN).with_child(Node::leaf(CELL, "x")), column("a", &["1"])],
        )]);
        let t = flatten_columns(&doc, None).unwrap();
        assert_eq!(t.columns().collect::<Vec<_>>(), vec!["a"]);
    }
}
