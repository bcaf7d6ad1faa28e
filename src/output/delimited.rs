//! Delimited text output (CSV, TSV)

use std::io::Write;

use crate::error::Result;
use crate::model::Table;

use super::TableWriter;

/// Writes one header line followed by one line per row.
///
/// Rows lacking a column get an empty value in its position. Values holding
/// the delimiter, quotes or line breaks are quoted.
pub struct DelimitedWriter {
    delimiter: u8,
}

impl DelimitedWriter {
    pub fn csv() -> Self {
        Self { delimiter: b',' }
    }

    pub fn tsv() -> Self {
        Self { delimiter: b'\t' }
    }
}

impl Default for DelimitedWriter {
    fn default() -> Self {
        Self::csv()
    }
}

impl TableWriter for DelimitedWriter {
    fn write(&self, table: &Table, writer: &mut dyn Write) -> Result<()> {
        // An empty table has no header to write
        if table.column_count() == 0 {
            return Ok(());
        }

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);

        csv_writer.write_record(table.columns())?;
        for record in table.records() {
            csv_writer.write_record(&record)?;
        }
        csv_writer.flush().map_err(csv::Error::from)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Row;

    fn render(writer: &DelimitedWriter, table: &Table) -> String {
        let mut out = Vec::new();
        writer.write(table, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_missing_columns_are_empty() {
        let mut table = Table::new();
        table.push_row(Row::from_iter([("name", "Rider A"), ("team", "Team X")]));
        table.push_row(Row::from_iter([("name", "Rider B"), ("points", "120")]));

        assert_eq!(
            render(&DelimitedWriter::csv(), &table),
            "name,team,points\nRider A,Team X,\nRider B,,120\n"
        );
    }

    #[test]
    fn test_values_are_quoted() {
        let mut table = Table::new();
        table.push_row(Row::from_iter([
            ("name", "Smith, John"),
            ("note", "line\nbreak"),
            ("quote", "say \"hi\""),
        ]));

        assert_eq!(
            render(&DelimitedWriter::csv(), &table),
            "name,note,quote\n\"Smith, John\",\"line\nbreak\",\"say \"\"hi\"\"\"\n"
        );
    }

    #[test]
    fn test_tsv_delimiter() {
        let mut table = Table::new();
        table.push_row(Row::from_iter([("a", "1"), ("b", "x,y")]));

        assert_eq!(render(&DelimitedWriter::tsv(), &table), "a\tb\n1\tx,y\n");
    }

    #[test]
    fn test_empty_table_writes_nothing() {
        assert_eq!(render(&DelimitedWriter::csv(), &Table::new()), "");
    }

    #[test]
    fn test_header_only_table() {
        let mut table = Table::new();
        table.declare_column("IDteam");
        assert_eq!(render(&DelimitedWriter::csv(), &table), "IDteam\n");
    }
}
