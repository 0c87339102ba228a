// Table code generator - static lookup table for the on-device classifier
//
// Layout (C-style initializers):
//   include guard
//   #define N_SAMPLES / N_FEATURES
//   const float FEATURE_MEAN[N_FEATURES]
//   const float FEATURE_STD[N_FEATURES]
//   const float TRAIN_SAMPLES[N_SAMPLES][N_FEATURES]
//   const int   TRAIN_LABELS[N_SAMPLES]
// Every float literal has 6 fractional digits and an `f` suffix.

use std::fmt::Write;

use crate::config::IncludeGuard;
use crate::dataset::schema::FEATURE_ORDER;
use crate::error::DatasetError;
use crate::export::filter::N_FEATURES;
use crate::export::scaler::Scaler;

/// Macro name used by the `#ifndef` include guard
pub const GUARD_MACRO: &str = "POSTURE_DATASET_H";

/// Format one float literal
fn float_literal(value: f64) -> String {
    format!("{:.6}f", value)
}

fn float_list(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| float_literal(*v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render the lookup table
///
/// Rows and labels are emitted in the given order; nothing is shuffled or
/// deduplicated.
///
/// # Arguments
/// * `scaled` - Z-scored feature rows
/// * `labels` - One label per row
/// * `scaler` - Parameters the device applies before distance computation
/// * `guard` - Include guard flavour
///
/// # Errors
/// * `DatasetError::NonFiniteValue` - A sample, mean or std value would not be a valid literal
/// * `DatasetError::Io` - The table text could not be formatted
pub fn render_table(
    scaled: &[[f64; N_FEATURES]],
    labels: &[i32],
    scaler: &Scaler,
    guard: IncludeGuard,
) -> Result<String, DatasetError> {
    check_finite("FEATURE_MEAN", None, &scaler.mean)?;
    check_finite("FEATURE_STD", None, &scaler.std)?;
    for (row_idx, row) in scaled.iter().enumerate() {
        check_finite("TRAIN_SAMPLES", Some(row_idx), row)?;
    }

    let n_samples = scaled.len();
    let mut out = String::new();
    write_table(&mut out, scaled, labels, scaler, guard, n_samples).map_err(|err| {
        DatasetError::Io {
            path: GUARD_MACRO.to_string(),
            reason: format!("rendering the lookup table failed: {}", err),
        }
    })?;
    Ok(out)
}

fn check_finite(
    array: &str,
    row: Option<usize>,
    values: &[f64; N_FEATURES],
) -> Result<(), DatasetError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(col) => Err(DatasetError::NonFiniteValue {
            array: array.to_string(),
            row,
            column: FEATURE_ORDER[col].to_string(),
        }),
        None => Ok(()),
    }
}

fn write_table(
    out: &mut String,
    scaled: &[[f64; N_FEATURES]],
    labels: &[i32],
    scaler: &Scaler,
    guard: IncludeGuard,
    n_samples: usize,
) -> std::fmt::Result {
    match guard {
        IncludeGuard::PragmaOnce => writeln!(out, "#pragma once\n")?,
        IncludeGuard::Ifndef => {
            writeln!(out, "#ifndef {}", GUARD_MACRO)?;
            writeln!(out, "#define {}\n", GUARD_MACRO)?;
        }
    }

    writeln!(out, "#define N_SAMPLES {}", n_samples)?;
    writeln!(out, "#define N_FEATURES {}\n", N_FEATURES)?;

    writeln!(out, "const float FEATURE_MEAN[N_FEATURES] = {{")?;
    writeln!(out, "  {}", float_list(&scaler.mean))?;
    writeln!(out, "}};\n")?;

    writeln!(out, "const float FEATURE_STD[N_FEATURES] = {{")?;
    writeln!(out, "  {}", float_list(&scaler.std))?;
    writeln!(out, "}};\n")?;

    writeln!(out, "const float TRAIN_SAMPLES[N_SAMPLES][N_FEATURES] = {{")?;
    for (i, row) in scaled.iter().enumerate() {
        let sep = if i + 1 == n_samples { "" } else { "," };
        writeln!(out, "  {{{}}}{}", float_list(row), sep)?;
    }
    writeln!(out, "}};\n")?;

    let label_list = labels
        .iter()
        .map(|label| label.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    writeln!(out, "const int TRAIN_LABELS[N_SAMPLES] = {{")?;
    writeln!(out, "  {}", label_list)?;
    writeln!(out, "}};")?;

    if guard == IncludeGuard::Ifndef {
        writeln!(out, "\n#endif // {}", GUARD_MACRO)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_scaler() -> Scaler {
        Scaler {
            mean: [0.0; N_FEATURES],
            std: [1.0; N_FEATURES],
        }
    }

    #[test]
    fn test_float_literal_format() {
        assert_eq!(float_literal(0.1318), "0.131800f");
        assert_eq!(float_literal(-1.5), "-1.500000f");
        assert_eq!(float_literal(2.0), "2.000000f");
        assert_eq!(float_literal(1.0e-9), "0.000000f");
    }

    #[test]
    fn test_layout_order() {
        let rows = [[0.5; N_FEATURES], [-0.5; N_FEATURES]];
        let text = render_table(&rows, &[2, 5], &unit_scaler(), IncludeGuard::PragmaOnce).unwrap();

        let markers = [
            "#pragma once",
            "#define N_SAMPLES 2",
            "#define N_FEATURES 11",
            "const float FEATURE_MEAN[N_FEATURES] = {",
            "const float FEATURE_STD[N_FEATURES] = {",
            "const float TRAIN_SAMPLES[N_SAMPLES][N_FEATURES] = {",
            "const int TRAIN_LABELS[N_SAMPLES] = {",
        ];
        let mut last = 0;
        for marker in markers {
            let pos = text.find(marker).unwrap_or_else(|| panic!("{} missing", marker));
            assert!(pos >= last, "{} out of order", marker);
            last = pos;
        }
        assert!(text.contains("  2, 5\n};\n"));
    }

    #[test]
    fn test_sample_rows_keep_order_and_trailing_commas() {
        let rows = [[1.0; N_FEATURES], [2.0; N_FEATURES], [3.0; N_FEATURES]];
        let text = render_table(&rows, &[1, 1, 1], &unit_scaler(), IncludeGuard::PragmaOnce)
            .unwrap();

        let sample_lines: Vec<&str> = text
            .lines()
            .skip_while(|line| !line.starts_with("const float TRAIN_SAMPLES"))
            .skip(1)
            .take(3)
            .collect();
        assert_eq!(sample_lines.len(), 3);
        assert!(sample_lines[0].starts_with("  {1.000000f, "));
        assert!(sample_lines[0].ends_with("1.000000f},"));
        assert!(sample_lines[1].starts_with("  {2.000000f, "));
        assert!(sample_lines[2].ends_with("3.000000f}"));
        assert_eq!(sample_lines[2].matches('f').count(), N_FEATURES);
    }

    #[test]
    fn test_exact_small_table() {
        let mut scaler = unit_scaler();
        scaler.mean[0] = 0.25;
        let rows = [[0.0; N_FEATURES]];
        let text = render_table(&rows, &[3], &scaler, IncludeGuard::PragmaOnce).unwrap();
        let zeros = vec!["0.000000f"; N_FEATURES].join(", ");
        let ones = vec!["1.000000f"; N_FEATURES].join(", ");
        let mut means = vec!["0.000000f"; N_FEATURES];
        means[0] = "0.250000f";
        let expected = format!(
            "#pragma once\n\n\
             #define N_SAMPLES 1\n\
             #define N_FEATURES 11\n\n\
             const float FEATURE_MEAN[N_FEATURES] = {{\n  {}\n}};\n\n\
             const float FEATURE_STD[N_FEATURES] = {{\n  {}\n}};\n\n\
             const float TRAIN_SAMPLES[N_SAMPLES][N_FEATURES] = {{\n  {{{}}}\n}};\n\n\
             const int TRAIN_LABELS[N_SAMPLES] = {{\n  3\n}};\n",
            means.join(", "),
            ones,
            zeros
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_ifndef_guard() {
        let rows = [[0.0; N_FEATURES]];
        let text = render_table(&rows, &[1], &unit_scaler(), IncludeGuard::Ifndef).unwrap();
        assert!(text.starts_with("#ifndef POSTURE_DATASET_H\n#define POSTURE_DATASET_H\n\n"));
        assert!(text.ends_with("};\n\n#endif // POSTURE_DATASET_H\n"));
        assert!(!text.contains("#pragma once"));
    }

    #[test]
    fn test_non_finite_value_is_rejected() {
        let mut row = [0.0; N_FEATURES];
        row[10] = f64::NAN;
        let err = render_table(&[row], &[1], &unit_scaler(), IncludeGuard::PragmaOnce)
            .unwrap_err();
        assert_eq!(
            err,
            DatasetError::NonFiniteValue {
                array: "TRAIN_SAMPLES".to_string(),
                row: Some(0),
                column: "r".to_string()
            }
        );
    }

    #[test]
    fn test_non_finite_scaler_values_are_rejected() {
        let rows = [[0.0; N_FEATURES]];

        let mut scaler = unit_scaler();
        scaler.mean[0] = f64::INFINITY;
        let err = render_table(&rows, &[1], &scaler, IncludeGuard::PragmaOnce).unwrap_err();
        assert_eq!(
            err,
            DatasetError::NonFiniteValue {
                array: "FEATURE_MEAN".to_string(),
                row: None,
                column: "dp1".to_string()
            }
        );

        let mut scaler = unit_scaler();
        scaler.std[5] = f64::NEG_INFINITY;
        let err = render_table(&rows, &[1], &scaler, IncludeGuard::PragmaOnce).unwrap_err();
        assert_eq!(
            err,
            DatasetError::NonFiniteValue {
                array: "FEATURE_STD".to_string(),
                row: None,
                column: "p1".to_string()
            }
        );
    }
}
