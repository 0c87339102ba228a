//! Integration tests for the export pipeline
//!
//! Covers the path from a persisted dataset to the generated lookup table:
//! - Rows captured by an acquisition session export in capture order
//! - Incomplete rows and rows not flagged for training are excluded
//! - Structural schema defects abort the export and name the column

use std::fs;
use std::io::Cursor;

use posture_trainer::acquisition::{AcquisitionSession, OperatorConsole, SessionNotice};
use posture_trainer::config::ExportConfig;
use posture_trainer::dataset::Dataset;
use posture_trainer::error::{AcquisitionError, DatasetError};
use posture_trainer::export::{run_export, N_FEATURES};
use posture_trainer::protocol::FrameReader;

struct FixedLabels(Vec<&'static str>);

impl OperatorConsole for FixedLabels {
    fn show_instructions(&mut self, _label_min: i32, _label_max: i32) {}

    fn prompt_label(
        &mut self,
        _label_min: i32,
        _label_max: i32,
    ) -> Result<Option<String>, AcquisitionError> {
        if self.0.is_empty() {
            Ok(None)
        } else {
            Ok(Some(self.0.remove(0).to_string()))
        }
    }

    fn notify(&mut self, _notice: &SessionNotice) {}
}

fn export_config(dir: &std::path::Path) -> ExportConfig {
    ExportConfig {
        output_path: dir.join("dataset.h"),
        ..ExportConfig::default()
    }
}

/// Extract the numbers between the braces of a `NAME[...] = { ... };` block
fn block_values(text: &str, name: &str) -> Vec<String> {
    let start = text.find(name).unwrap_or_else(|| panic!("{} missing", name));
    let body_start = start + text[start..].find('{').unwrap() + 1;
    let body_end = body_start + text[body_start..].find("};").unwrap();
    text[body_start..body_end]
        .split(|c: char| c == ',' || c == '{' || c == '}' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Test capture -> save -> export keeps row order and label order
#[test]
fn test_acquired_rows_export_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let dataset_path = dir.path().join("sensor_samples.csv");

    let stream = "BASELINE_SAVED\nBASE_RAW_CSV=10,10,10,10,10\n\
                  SAMPLE_RAW_CSV=20,10,10,10,10,0,0,0,0,0,0\nEND_SAMPLE\n\
                  SAMPLE_RAW_CSV=10,20,10,10,10,0,0,0,0,0,0\nEND_SAMPLE\n\
                  SAMPLE_RAW_CSV=10,10,10,10,40,0,0,0,0,0,0\nEND_SAMPLE\n";
    let mut session = AcquisitionSession::new(Dataset::new(), &dataset_path, 1, 6);
    session
        .run(
            &mut FrameReader::new(Cursor::new(stream.as_bytes().to_vec())),
            &mut FixedLabels(vec!["5", "1", "3"]),
        )
        .unwrap();

    let report = run_export(&dataset_path, &export_config(dir.path())).unwrap();
    assert_eq!(report.samples, 3);
    assert_eq!(report.features, N_FEATURES);
    assert_eq!(
        report.feature_order,
        vec!["dp1", "dp2", "dp3", "dp4", "dp5", "p1", "p2", "p3", "p4", "p5", "r"]
    );

    let text = fs::read_to_string(dir.path().join("dataset.h")).unwrap();
    assert_eq!(block_values(&text, "TRAIN_LABELS"), vec!["5", "1", "3"]);

    let samples = block_values(&text, "TRAIN_SAMPLES");
    assert_eq!(samples.len(), 3 * N_FEATURES);
    assert!(samples.iter().all(|v| v.ends_with('f')));
    // dp1 is largest for the first capture
    let dp1: Vec<f64> = (0..3)
        .map(|i| samples[i * N_FEATURES].trim_end_matches('f').parse().unwrap())
        .collect();
    assert!(dp1[0] > dp1[1] && dp1[0] > dp1[2], "{:?}", dp1);

    assert_eq!(block_values(&text, "FEATURE_MEAN").len(), N_FEATURES);
    assert_eq!(block_values(&text, "FEATURE_STD").len(), N_FEATURES);
    assert!(text.contains("#define N_SAMPLES 3\n"));
}

/// Test row-type filtering and incomplete-row exclusion on a hand-edited file
#[test]
fn test_excludes_flagged_and_incomplete_rows() {
    let dir = tempfile::tempdir().unwrap();
    let dataset_path = dir.path().join("sensor_samples.csv");
    fs::write(
        &dataset_path,
        "row_type,label,p1,dp1,p2,dp2,p3,dp3,p4,dp4,p5,dp5,r\n\
         train,1,0.2,0.0,0.2,0.0,0.2,0.0,0.2,0.0,0.2,0.0,0.0\n\
         test,2,0.3,0.1,0.2,0.0,0.2,0.0,0.2,0.0,0.1,-0.1,0.1\n\
         train,3,0.3,0.1,0.2,0.0,0.2,0.0,0.2,0.0,0.1,-0.1,\n\
         train,4,0.4,0.2,0.2,0.0,0.2,0.0,0.1,-0.1,0.1,-0.1,0.4\n",
    )
    .unwrap();

    let report = run_export(&dataset_path, &export_config(dir.path())).unwrap();
    assert_eq!(report.samples, 2);
    assert_eq!(report.rows_excluded, 2);

    let text = fs::read_to_string(dir.path().join("dataset.h")).unwrap();
    assert_eq!(block_values(&text, "TRAIN_LABELS"), vec!["1", "4"]);
    // dp2, dp3 and p2, p3 are constant across the kept rows
    let std = block_values(&text, "FEATURE_STD");
    assert_eq!(std[1], "1.000000f");
    assert_eq!(std[2], "1.000000f");
    assert_eq!(std[6], "1.000000f");
}

/// Test that a structurally missing column aborts with its name
#[test]
fn test_schema_defect_names_column() {
    let dir = tempfile::tempdir().unwrap();
    let dataset_path = dir.path().join("sensor_samples.csv");
    fs::write(
        &dataset_path,
        "label,p1,dp1,p2,dp2,p3,dp3,p4,dp4,p5,dp5\n1,0,0,0,0,0,0,0,0,0,0\n",
    )
    .unwrap();

    let err = run_export(&dataset_path, &export_config(dir.path())).unwrap_err();
    assert_eq!(
        err,
        DatasetError::Schema {
            column: "r".to_string()
        }
    );
    assert!(!dir.path().join("dataset.h").exists());
}
