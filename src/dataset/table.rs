// RawTable - CSV table as found on disk, before schema reconciliation

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::DatasetError;

/// Table with trimmed header names and optional string cells
///
/// Empty or whitespace-only cells are `None`. Rows shorter than the header
/// (spreadsheet editors often drop trailing empty cells) are padded.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    origin: String,
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn from_parts(
        origin: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Vec<Option<String>>>,
    ) -> Self {
        Self {
            origin: origin.into(),
            columns,
            rows,
        }
    }

    /// Read a CSV file
    ///
    /// # Errors
    /// * `DatasetError::ResourceBusy` / `DatasetError::Io` - File cannot be opened
    /// * `DatasetError::Parse` - Contents are not a CSV table
    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        let file = File::open(path).map_err(|err| DatasetError::from_io(path, &err))?;
        Self::from_reader(file, &path.display().to_string())
    }

    /// Read CSV data from any reader; `origin` names the source in errors
    pub fn from_reader<R: Read>(reader: R, origin: &str) -> Result<Self, DatasetError> {
        let parse_error = |reason: String| DatasetError::Parse {
            path: origin.to_string(),
            reason,
        };

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let columns: Vec<String> = csv_reader
            .headers()
            .map_err(|err| parse_error(err.to_string()))?
            .iter()
            .map(|name| name.trim().trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for (idx, record) in csv_reader.records().enumerate() {
            let record = record.map_err(|err| parse_error(err.to_string()))?;
            if record.len() > columns.len() {
                return Err(parse_error(format!(
                    "row {} has {} cells but the header has {} columns",
                    idx + 1,
                    record.len(),
                    columns.len()
                )));
            }
            let mut row: Vec<Option<String>> = record
                .iter()
                .map(|cell| {
                    let cell = cell.trim();
                    (!cell.is_empty()).then(|| cell.to_string())
                })
                .collect();
            row.resize(columns.len(), None);
            rows.push(row);
        }

        Ok(Self {
            origin: origin.to_string(),
            columns,
            rows,
        })
    }

    /// Source name used in error messages
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    /// First column whose trimmed name equals `name`
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col == name)
    }

    /// Cell at (`row`, `column`), `None` when empty or out of range
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column)?.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_names_are_trimmed() {
        let table = RawTable::from_reader(" s1 ,label\t,\u{feff}r\n1,2,3\n".as_bytes(), "t")
            .unwrap();
        assert_eq!(table.columns(), &["s1", "label", "r"]);
        assert_eq!(table.column_index("label"), Some(1));
    }

    #[test]
    fn test_empty_cells_are_none_and_short_rows_padded() {
        let table = RawTable::from_reader("a,b,c\n1, ,\n4\n".as_bytes(), "t").unwrap();
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.cell(0, 0), Some("1"));
        assert_eq!(table.cell(0, 1), None);
        assert_eq!(table.cell(1, 0), Some("4"));
        assert_eq!(table.cell(1, 2), None);
    }

    #[test]
    fn test_long_row_is_parse_error() {
        let err = RawTable::from_reader("a,b\n1,2,3\n".as_bytes(), "t").unwrap_err();
        assert!(matches!(err, DatasetError::Parse { .. }), "{:?}", err);
    }

    #[test]
    fn test_binary_content_is_parse_error() {
        let bytes: &[u8] = &[0x50, 0x4b, 0x03, 0x04, 0xff, 0xfe, 0x00, 0x81, b'\n', 0xc3];
        let result = RawTable::from_reader(bytes, "sensor_samples.xlsx");
        assert!(
            matches!(result, Err(DatasetError::Parse { .. })),
            "expected Parse error, got {:?}",
            result
        );
    }

    #[test]
    fn test_empty_input_has_no_columns() {
        let table = RawTable::from_reader("".as_bytes(), "t").unwrap();
        assert!(table.columns().is_empty());
        assert!(table.rows().is_empty());
    }
}
