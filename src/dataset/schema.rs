// Schema - fixed dataset column layout and reconciliation
//
// Column order: s1..s11, label, b1..b5, p1, dp1, ..., p5, dp5, r
//
// External spreadsheet editors may reorder, drop or add columns. A loaded
// table is reconciled onto the fixed layout: names are trimmed, missing
// columns are added empty, unknown columns are dropped.

use crate::dataset::store::{Cell, Dataset, DatasetRow};
use crate::dataset::table::RawTable;
use crate::error::DatasetError;

/// Raw sample columns s1..s11
pub const S_COLS: [&str; 11] = [
    "s1", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11",
];

/// Operator label column
pub const LABEL_COL: &str = "label";

/// Baseline columns b1..b5
pub const B_COLS: [&str; 5] = ["b1", "b2", "b3", "b4", "b5"];

/// Interleaved distribution columns as stored on disk
pub const PD_COLS: [&str; 10] = [
    "p1", "dp1", "p2", "dp2", "p3", "dp3", "p4", "dp4", "p5", "dp5",
];

/// Log energy ratio column
pub const R_COL: &str = "r";

/// Total number of persisted columns
pub const COLUMN_COUNT: usize = S_COLS.len() + 1 + B_COLS.len() + PD_COLS.len() + 1;

/// Every persisted column, in file order
pub const ALL_COLS: [&str; COLUMN_COUNT] = [
    "s1", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "label", "b1", "b2",
    "b3", "b4", "b5", "p1", "dp1", "p2", "dp2", "p3", "dp3", "p4", "dp4", "p5", "dp5", "r",
];

/// Classifier feature order used by the exported table
pub const FEATURE_ORDER: [&str; 11] = [
    "dp1", "dp2", "dp3", "dp4", "dp5", "p1", "p2", "p3", "p4", "p5", "r",
];

/// Position of `name` in [`ALL_COLS`]
pub fn column_index(name: &str) -> Option<usize> {
    ALL_COLS.iter().position(|col| *col == name)
}

/// Reconcile a loaded table onto the fixed schema
///
/// Column names in `raw` are already trimmed. Values of the fixed columns
/// are carried over unchanged; the row count and order never change.
///
/// # Errors
/// * `DatasetError::Parse` - The header shares no column with the schema, or a
///   fixed-column cell holds text that is not a number
pub fn reconcile(raw: &RawTable) -> Result<Dataset, DatasetError> {
    let source_index: Vec<Option<usize>> =
        ALL_COLS.iter().map(|col| raw.column_index(col)).collect();

    if !raw.columns().is_empty() && source_index.iter().all(Option::is_none) {
        return Err(DatasetError::Parse {
            path: raw.origin().to_string(),
            reason: format!(
                "no dataset columns found in header {:?}; refusing to treat it as a dataset",
                raw.columns()
            ),
        });
    }

    let missing: Vec<&str> = ALL_COLS
        .iter()
        .zip(&source_index)
        .filter(|(_, idx)| idx.is_none())
        .map(|(col, _)| *col)
        .collect();
    if !missing.is_empty() && !raw.columns().is_empty() {
        log::warn!("[Dataset] Added missing columns as empty: {:?}", missing);
    }

    let extras: Vec<&String> = raw
        .columns()
        .iter()
        .filter(|col| column_index(col).is_none())
        .collect();
    if !extras.is_empty() {
        log::warn!("[Dataset] Dropped unknown columns: {:?}", extras);
    }

    let mut dataset = Dataset::new();
    for (row_idx, raw_row) in raw.rows().iter().enumerate() {
        let mut cells: [Cell; COLUMN_COUNT] = [None; COLUMN_COUNT];
        for (col_idx, source) in source_index.iter().enumerate() {
            let Some(source) = source else { continue };
            let Some(text) = raw_row.get(*source).and_then(|c| c.as_deref()) else {
                continue;
            };
            cells[col_idx] = parse_cell(text).ok_or_else(|| DatasetError::Parse {
                path: raw.origin().to_string(),
                reason: format!(
                    "row {} column '{}': '{}' is not a number",
                    row_idx + 1,
                    ALL_COLS[col_idx],
                    text
                ),
            })?;
        }
        dataset.append(DatasetRow::from_cells(cells));
    }
    Ok(dataset)
}

/// Parse one non-empty cell; `NaN` reads as a missing value
///
/// Returns `None` for text that is not a finite number (or NaN).
fn parse_cell(text: &str) -> Option<Cell> {
    let value: f64 = text.trim().parse().ok()?;
    if value.is_nan() {
        Some(None)
    } else if value.is_finite() {
        Some(Some(value))
    } else {
        None
    }
}
