// Training row filter - selects complete training rows for export

use crate::dataset::schema::{FEATURE_ORDER, LABEL_COL};
use crate::dataset::RawTable;
use crate::error::DatasetError;

/// Number of classifier features per row
pub const N_FEATURES: usize = FEATURE_ORDER.len();

/// Feature rows in [`FEATURE_ORDER`] with their integer labels
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingMatrix {
    pub features: Vec<[f64; N_FEATURES]>,
    pub labels: Vec<i32>,
}

impl TrainingMatrix {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Row selection rules for an export run
#[derive(Debug, Clone)]
pub struct TrainingRowFilter {
    row_type_column: Option<String>,
    train_value: String,
}

impl TrainingRowFilter {
    /// # Arguments
    /// * `row_type_column` - Column flagging training rows; a no-op when the table lacks it
    /// * `train_value` - Flag value selecting a row (trimmed, case-insensitive)
    pub fn new(row_type_column: Option<String>, train_value: &str) -> Self {
        Self {
            row_type_column,
            train_value: train_value.trim().to_lowercase(),
        }
    }

    /// Build the training matrix from a loaded table
    ///
    /// Rows with any required value missing are dropped; row order is kept.
    ///
    /// # Errors
    /// * `DatasetError::Schema` - A feature or label column is absent from the table
    /// * `DatasetError::Parse` - A required cell holds a non-number or a non-integer label
    pub fn select(&self, table: &RawTable) -> Result<TrainingMatrix, DatasetError> {
        let mut feature_idx = [0usize; N_FEATURES];
        for (slot, name) in feature_idx.iter_mut().zip(FEATURE_ORDER) {
            *slot = required_column(table, name)?;
        }
        let label_idx = required_column(table, LABEL_COL)?;

        let row_type_idx = self
            .row_type_column
            .as_deref()
            .and_then(|name| table.column_index(name));

        let mut matrix = TrainingMatrix::default();
        let mut skipped_type = 0usize;
        let mut skipped_incomplete = 0usize;

        'rows: for row in 0..table.rows().len() {
            if let Some(idx) = row_type_idx {
                let flag = table.cell(row, idx).unwrap_or("").to_lowercase();
                if flag != self.train_value {
                    skipped_type += 1;
                    continue;
                }
            }

            let mut features = [0.0; N_FEATURES];
            let columns = feature_idx.iter().zip(FEATURE_ORDER);
            for (slot, (&idx, name)) in features.iter_mut().zip(columns) {
                match numeric_cell(table, row, idx, name)? {
                    Some(value) => *slot = value,
                    None => {
                        skipped_incomplete += 1;
                        continue 'rows;
                    }
                }
            }

            let Some(label) = numeric_cell(table, row, label_idx, LABEL_COL)? else {
                skipped_incomplete += 1;
                continue;
            };
            if label.fract() != 0.0 || label < f64::from(i32::MIN) || label > f64::from(i32::MAX) {
                return Err(cell_error(table, row, LABEL_COL, &label.to_string()));
            }

            matrix.features.push(features);
            matrix.labels.push(label as i32);
        }

        log::info!(
            "[Export] Selected {} training rows ({} not flagged for training, {} incomplete)",
            matrix.len(),
            skipped_type,
            skipped_incomplete
        );
        Ok(matrix)
    }
}

fn required_column(table: &RawTable, name: &str) -> Result<usize, DatasetError> {
    table.column_index(name).ok_or_else(|| DatasetError::Schema {
        column: name.to_string(),
    })
}

/// Parse a required cell; empty and NaN cells are missing values
fn numeric_cell(
    table: &RawTable,
    row: usize,
    column: usize,
    name: &str,
) -> Result<Option<f64>, DatasetError> {
    let Some(text) = table.cell(row, column) else {
        return Ok(None);
    };
    match text.parse::<f64>() {
        Ok(value) if value.is_nan() => Ok(None),
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(cell_error(table, row, name, text)),
    }
}

fn cell_error(table: &RawTable, row: usize, column: &str, text: &str) -> DatasetError {
    DatasetError::Parse {
        path: table.origin().to_string(),
        reason: format!(
            "row {} column '{}': '{}' is not a usable value",
            row + 1,
            column,
            text
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "dp1,dp2,dp3,dp4,dp5,p1,p2,p3,p4,p5,r,label";

    fn table(csv: &str) -> RawTable {
        RawTable::from_reader(csv.as_bytes(), "test.csv").unwrap()
    }

    fn default_filter() -> TrainingRowFilter {
        TrainingRowFilter::new(Some("row_type".to_string()), "train")
    }

    #[test]
    fn test_selects_complete_rows_in_order() {
        let csv = format!(
            "{HEADER}\n\
             1,2,3,4,5,6,7,8,9,10,11,1\n\
             1,2,3,4,5,6,7,8,9,10,,2\n\
             -1,-2,-3,-4,-5,-6,-7,-8,-9,-10,-11,3\n\
             1,2,3,4,5,6,7,8,9,10,11,\n"
        );
        let matrix = default_filter().select(&table(&csv)).unwrap();
        assert_eq!(matrix.labels, vec![1, 3]);
        assert_eq!(matrix.features[0][0], 1.0);
        assert_eq!(matrix.features[0][10], 11.0);
        assert_eq!(matrix.features[1][4], -5.0);
    }

    #[test]
    fn test_feature_order_follows_names_not_file_position() {
        // File keeps the interleaved on-disk layout
        let csv = "label,p1,dp1,p2,dp2,p3,dp3,p4,dp4,p5,dp5,r\n\
                   4,0.1,-0.1,0.2,-0.2,0.3,-0.3,0.4,-0.4,0.5,-0.5,0.9\n";
        let matrix = default_filter().select(&table(csv)).unwrap();
        assert_eq!(
            matrix.features[0],
            [-0.1, -0.2, -0.3, -0.4, -0.5, 0.1, 0.2, 0.3, 0.4, 0.5, 0.9]
        );
        assert_eq!(matrix.labels, vec![4]);
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let csv = "dp1,dp2,dp3,dp4,dp5,p1,p2,p3,p4,p5,label\n1,2,3,4,5,6,7,8,9,10,1\n";
        let err = default_filter().select(&table(csv)).unwrap_err();
        assert_eq!(
            err,
            DatasetError::Schema {
                column: "r".to_string()
            }
        );
    }

    #[test]
    fn test_missing_label_column_is_schema_error() {
        let csv = "dp1,dp2,dp3,dp4,dp5,p1,p2,p3,p4,p5,r\n";
        match default_filter().select(&table(csv)) {
            Err(DatasetError::Schema { column }) => assert_eq!(column, "label"),
            other => panic!("Expected Schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_row_type_column_restricts_rows() {
        let csv = format!(
            "{HEADER},row_type\n\
             1,2,3,4,5,6,7,8,9,10,11,1, Train \n\
             1,2,3,4,5,6,7,8,9,10,11,2,test\n\
             1,2,3,4,5,6,7,8,9,10,11,3,\n\
             1,2,3,4,5,6,7,8,9,10,11,4,TRAIN\n"
        );
        let matrix = default_filter().select(&table(&csv)).unwrap();
        assert_eq!(matrix.labels, vec![1, 4]);
    }

    #[test]
    fn test_absent_row_type_column_is_pass_through() {
        let csv = format!("{HEADER}\n1,2,3,4,5,6,7,8,9,10,11,1\n1,2,3,4,5,6,7,8,9,10,11,2\n");
        let matrix = default_filter().select(&table(&csv)).unwrap();
        assert_eq!(matrix.len(), 2);

        let no_type = TrainingRowFilter::new(None, "train");
        assert_eq!(no_type.select(&table(&csv)).unwrap(), matrix);
    }

    #[test]
    fn test_output_never_exceeds_input_rows() {
        let csv = format!(
            "{HEADER}\n\
             ,,,,,,,,,,,\n\
             1,2,3,4,5,6,7,8,9,10,11,1\n\
             NaN,2,3,4,5,6,7,8,9,10,11,1\n"
        );
        let table = table(&csv);
        let matrix = default_filter().select(&table).unwrap();
        assert!(matrix.len() <= table.rows().len());
        assert_eq!(matrix.len(), 1);
    }

    #[test]
    fn test_fractional_label_is_parse_error() {
        let csv = format!("{HEADER}\n1,2,3,4,5,6,7,8,9,10,11,2.5\n");
        let err = default_filter().select(&table(&csv)).unwrap_err();
        assert!(matches!(err, DatasetError::Parse { .. }), "{:?}", err);
    }
}
