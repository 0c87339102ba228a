// Export module - frozen training table for the on-device classifier
//
// Pipeline:
// 1. Load the dataset file as a raw table (extra columns such as a row-type
//    flag survive here, unlike the acquisition load)
// 2. TrainingRowFilter: keep complete training rows as a TrainingMatrix
// 3. Scaler: fit per-feature mean/std and z-score the matrix
// 4. render_table: emit the static lookup table
//
// Everything is recomputed on every run; only the artifact is persisted.

pub mod codegen;
pub mod filter;
pub mod scaler;

pub use codegen::render_table;
pub use filter::{TrainingMatrix, TrainingRowFilter, N_FEATURES};
pub use scaler::Scaler;

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::config::ExportConfig;
use crate::dataset::schema::FEATURE_ORDER;
use crate::dataset::RawTable;
use crate::error::DatasetError;

/// What an export run produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportReport {
    pub output_path: PathBuf,
    pub samples: usize,
    pub features: usize,
    pub feature_order: Vec<String>,
    /// Rows in the file that did not make it into the table
    pub rows_excluded: usize,
    pub scaler: Scaler,
}

/// Run one export from `dataset_path` to `config.output_path`
///
/// # Errors
/// * `DatasetError::Schema` - Required column absent; nothing is written
/// * `DatasetError::Parse` - Dataset unreadable or holds unusable values
/// * `DatasetError::EmptyTrainingSet` - No complete training rows
/// * `DatasetError::ResourceBusy` / `DatasetError::Io` - Artifact could not be written
pub fn run_export(dataset_path: &Path, config: &ExportConfig) -> Result<ExportReport, DatasetError> {
    let table = RawTable::from_path(dataset_path)?;
    let filter = TrainingRowFilter::new(config.row_type_column.clone(), &config.train_value);
    let matrix = filter.select(&table)?;

    let scaler = Scaler::fit(&matrix)?;
    let scaled = scaler.transform_all(&matrix.features);
    let text = render_table(&scaled, &matrix.labels, &scaler, config.include_guard)?;

    write_artifact(&config.output_path, &text)?;

    let report = ExportReport {
        output_path: config.output_path.clone(),
        samples: matrix.len(),
        features: N_FEATURES,
        feature_order: FEATURE_ORDER.iter().map(|c| c.to_string()).collect(),
        rows_excluded: table.rows().len() - matrix.len(),
        scaler,
    };
    log::info!(
        "[Export] Wrote {} (samples={}, features={})",
        report.output_path.display(),
        report.samples,
        report.features
    );
    log::info!("[Export] Feature order used: {:?}", report.feature_order);
    Ok(report)
}

/// Replace `path` with `text` in one step
fn write_artifact(path: &Path, text: &str) -> Result<(), DatasetError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|err| DatasetError::from_io(path, &err))?;
    tmp.write_all(text.as_bytes())
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|err| DatasetError::from_io(path, &err))?;
    tmp.persist(path)
        .map_err(|err| DatasetError::from_io(path, &err.error))?;
    Ok(())
}
