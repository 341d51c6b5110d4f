//! CSV sink adapter.
//!
//! Renders the finished table with standard CSV quoting; absent cells
//! and empty strings both serialize as empty fields.

use crate::domain::convert::OutputTable;
use crate::domain::error::ConvertError;
use crate::ports::sink_port::SinkPort;
use std::path::Path;

pub struct CsvSinkAdapter;

impl SinkPort for CsvSinkAdapter {
    fn write(&self, table: &OutputTable, path: &Path) -> Result<(), ConvertError> {
        let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
        for row in &table.rows {
            writer
                .write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))
                .map_err(csv_error)?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn csv_error(e: csv::Error) -> ConvertError {
    ConvertError::Io(std::io::Error::other(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn table(rows: Vec<Vec<Option<&str>>>) -> OutputTable {
        OutputTable {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|c| c.map(str::to_string)).collect())
                .collect(),
        }
    }

    #[test]
    fn writes_rows_as_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        let t = table(vec![
            vec![Some("Date"), Some("Symbol")],
            vec![Some("2018-11-16T16:20:00-0500"), Some("IAG")],
        ]);
        CsvSinkAdapter.write(&t, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "Date,Symbol\n2018-11-16T16:20:00-0500,IAG\n"
        );
    }

    #[test]
    fn absent_cells_render_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        let t = table(vec![vec![Some("a"), None, Some(""), Some("b")]]);
        CsvSinkAdapter.write(&t, &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a,,,b\n");
    }

    #[test]
    fn fields_with_delimiters_are_quoted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        let t = table(vec![vec![
            Some("Sold 9 IAG, deep ITM"),
            Some("he said \"sell\""),
        ]]);
        CsvSinkAdapter.write(&t, &path).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "\"Sold 9 IAG, deep ITM\",\"he said \"\"sell\"\"\"\n"
        );
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        fs::write(&path, "stale content\nmore stale\n").unwrap();

        let t = table(vec![vec![Some("fresh")]]);
        CsvSinkAdapter.write(&t, &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh\n");
    }

    #[test]
    fn unwritable_path_is_io_error() {
        let t = table(vec![vec![Some("x")]]);
        let result = CsvSinkAdapter.write(&t, Path::new("/nonexistent/dir/out.csv"));
        assert!(matches!(result, Err(ConvertError::Io(_))));
    }
}
