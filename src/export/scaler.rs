// Scaler - per-feature z-score normalization
//
// mean and population std (divisor n) are computed per column. A column
// whose std is exactly zero gets std = 1.0, so scaling it only subtracts
// the mean instead of dividing by zero.

use serde::Serialize;

use crate::error::DatasetError;
use crate::export::filter::{TrainingMatrix, N_FEATURES};

/// Per-feature normalization parameters shipped with the exported table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scaler {
    pub mean: [f64; N_FEATURES],
    pub std: [f64; N_FEATURES],
}

impl Scaler {
    /// Fit mean and population std over every row of the matrix
    ///
    /// The mean is accumulated as an offset from the first row so that a
    /// constant column reproduces its value exactly and gets std 0 -> 1.0.
    ///
    /// # Errors
    /// * `DatasetError::EmptyTrainingSet` - Matrix has no rows
    pub fn fit(matrix: &TrainingMatrix) -> Result<Self, DatasetError> {
        let Some(first) = matrix.features.first() else {
            return Err(DatasetError::EmptyTrainingSet);
        };
        let n = matrix.features.len() as f64;

        let mut mean = [0.0; N_FEATURES];
        for col in 0..N_FEATURES {
            let offset: f64 = matrix
                .features
                .iter()
                .map(|row| row[col] - first[col])
                .sum();
            mean[col] = first[col] + offset / n;
        }

        let mut std = [0.0; N_FEATURES];
        for col in 0..N_FEATURES {
            let variance: f64 = matrix
                .features
                .iter()
                .map(|row| {
                    let d = row[col] - mean[col];
                    d * d
                })
                .sum::<f64>()
                / n;
            std[col] = variance.sqrt();
            if std[col] == 0.0 {
                std[col] = 1.0;
            }
        }

        Ok(Self { mean, std })
    }

    /// Z-score one feature row
    pub fn transform(&self, row: &[f64; N_FEATURES]) -> [f64; N_FEATURES] {
        let mut out = [0.0; N_FEATURES];
        for col in 0..N_FEATURES {
            out[col] = (row[col] - self.mean[col]) / self.std[col];
        }
        out
    }

    /// Z-score every row, keeping row order
    pub fn transform_all(&self, rows: &[[f64; N_FEATURES]]) -> Vec<[f64; N_FEATURES]> {
        rows.iter().map(|row| self.transform(row)).collect()
    }
}
