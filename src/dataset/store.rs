// Dataset store - fixed-schema table with whole-file load and save
//
// Rows are identified only by insertion order. Each accepted capture is
// appended in memory and the whole table is then written back; a failed
// save leaves the in-memory rows intact so the next save includes them.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::analysis::features::{BaselineVector, FeatureSet, SampleVector};
use crate::dataset::schema::{self, column_index, ALL_COLS, COLUMN_COUNT, LABEL_COL};
use crate::dataset::table::RawTable;
use crate::error::DatasetError;

/// One table cell; `None` is an empty (missing) value
pub type Cell = Option<f64>;

/// One persisted row in [`ALL_COLS`] order
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRow {
    cells: [Cell; COLUMN_COUNT],
}

impl DatasetRow {
    pub fn from_cells(cells: [Cell; COLUMN_COUNT]) -> Self {
        Self { cells }
    }

    /// Build a fully populated row from one labeled capture
    ///
    /// # Arguments
    /// * `sample` - All 11 raw sample channels
    /// * `label` - Validated operator label
    /// * `baseline` - Baseline active at capture time
    /// * `features` - Features derived from `sample` and `baseline`
    pub fn from_capture(
        sample: &SampleVector,
        label: i32,
        baseline: &BaselineVector,
        features: &FeatureSet,
    ) -> Self {
        let mut values = Vec::with_capacity(COLUMN_COUNT);
        values.extend_from_slice(sample.values());
        values.push(f64::from(label));
        values.extend_from_slice(baseline.values());
        for i in 0..features.p.len() {
            values.push(features.p[i]);
            values.push(features.dp[i]);
        }
        values.push(features.r);

        let mut cells = [None; COLUMN_COUNT];
        for (cell, value) in cells.iter_mut().zip(values) {
            *cell = Some(value);
        }
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell; COLUMN_COUNT] {
        &self.cells
    }

    /// Value of the named column, `None` if empty or not a schema column
    pub fn get(&self, column: &str) -> Cell {
        column_index(column).and_then(|idx| self.cells[idx])
    }

    /// Label as an integer, when present and integral
    pub fn label(&self) -> Option<i64> {
        self.get(LABEL_COL)
            .filter(|v| v.fract() == 0.0)
            .map(|v| v as i64)
    }

    /// True when every column is populated
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }
}

/// Ordered rows under the fixed schema
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    rows: Vec<DatasetRow>,
}

impl Dataset {
    /// Empty table with the fixed schema
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[DatasetRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append one row at the end; in memory only
    ///
    /// # Returns
    /// New row count
    pub fn append(&mut self, row: DatasetRow) -> usize {
        self.rows.push(row);
        self.rows.len()
    }

    /// Number of rows with every column populated
    pub fn complete_rows(&self) -> usize {
        self.rows.iter().filter(|row| row.is_complete()).count()
    }

    /// Row count per integer label (rows without a usable label are skipped)
    pub fn label_counts(&self) -> BTreeMap<i64, usize> {
        let mut counts = BTreeMap::new();
        for label in self.rows.iter().filter_map(DatasetRow::label) {
            *counts.entry(label).or_insert(0) += 1;
        }
        counts
    }

    /// Serialize the whole table to CSV
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(ALL_COLS)?;
        for row in &self.rows {
            csv_writer.write_record(row.cells.iter().map(|cell| match cell {
                Some(value) => value.to_string(),
                None => String::new(),
            }))?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Replace the file at `path` with this table
    ///
    /// The table is written to a temporary file next to `path` and then
    /// moved over it, so the destination is either the old or the new table.
    ///
    /// # Errors
    /// * `DatasetError::ResourceBusy` - Destination held open/locked by another process
    /// * `DatasetError::Io` - Any other write failure
    pub fn save(&self, path: &Path) -> Result<(), DatasetError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(|err| DatasetError::from_io(path, &err))?;
        self.write_csv(tmp.as_file_mut()).map_err(|err| match err.into_kind() {
            csv::ErrorKind::Io(io_err) => DatasetError::from_io(path, &io_err),
            other => DatasetError::Io {
                path: path.display().to_string(),
                reason: format!("{:?}", other),
            },
        })?;
        tmp.as_file()
            .sync_all()
            .map_err(|err| DatasetError::from_io(path, &err))?;
        tmp.persist(path)
            .map_err(|err| DatasetError::from_io(path, &err.error))?;

        log::info!("[Dataset] Saved {} rows to {}", self.rows.len(), path.display());
        Ok(())
    }
}

/// Load the dataset at `path`, or start an empty one if no file exists
///
/// # Errors
/// * `DatasetError::Parse` - Existing file is not a CSV table, or has non-numeric cells
/// * `DatasetError::ResourceBusy` / `DatasetError::Io` - Existing file cannot be read
pub fn load_or_create(path: &Path) -> Result<Dataset, DatasetError> {
    if !path.exists() {
        log::info!("[Dataset] Created new dataset: {}", path.display());
        return Ok(Dataset::new());
    }

    let raw = RawTable::from_path(path)?;
    let dataset = schema::reconcile(&raw)?;
    log::info!(
        "[Dataset] Loaded existing: {} (rows={})",
        path.display(),
        dataset.len()
    );
    Ok(dataset)
}
