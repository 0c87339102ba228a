// OperatorConsole - label prompt and operator feedback seam
//
// The session never touches stdin/stdout directly; the CLI supplies a
// TerminalConsole and tests supply scripted consoles.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::analysis::features::BaselineVector;
use crate::error::{AcquisitionError, DatasetError, ErrorCode};

/// Operator-facing outcome of one session step
#[derive(Debug, Clone, PartialEq)]
pub enum SessionNotice {
    /// A new baseline replaced the active one
    BaselineStored(BaselineVector),
    /// A completed sample was dropped (no baseline, invalid label)
    SampleDiscarded(AcquisitionError),
    /// A row was appended and the dataset saved
    RowSaved { total_rows: usize, path: PathBuf },
    /// Save failed; the rows stay in memory for the next save
    SaveFailed(DatasetError),
}

/// Interactive operator channel used by the acquisition session
pub trait OperatorConsole {
    /// Show how to drive a capture session
    fn show_instructions(&mut self, label_min: i32, label_max: i32);

    /// Ask for the label of the sample just captured
    ///
    /// # Returns
    /// * `Ok(Some(String))` - Raw operator input, not yet validated
    /// * `Ok(None)` - Operator input closed; the session ends
    fn prompt_label(&mut self, label_min: i32, label_max: i32)
        -> Result<Option<String>, AcquisitionError>;

    /// Report a session step to the operator
    fn notify(&mut self, notice: &SessionNotice);
}

/// Line-based console over any reader/writer pair (stdin/stdout in the CLI)
pub struct TerminalConsole<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn write_line(&mut self, text: &str) {
        if let Err(err) = writeln!(self.output, "{}", text) {
            log::warn!("[Acquisition] Failed to write to console: {}", err);
        }
    }
}

impl<R: BufRead, W: Write> OperatorConsole for TerminalConsole<R, W> {
    fn show_instructions(&mut self, label_min: i32, label_max: i32) {
        self.write_line("\n=== TRAINING LOGGER ===");
        self.write_line("1) Flip OFF->ON once in NORMAL posture to CAPTURE baseline.");
        self.write_line("   The device prints BASELINE_SAVED + BASE_RAW_CSV=...");
        self.write_line("2) Then each OFF->ON creates one sample (SAMPLE_RAW_CSV + END_SAMPLE).");
        self.write_line(&format!(
            "3) You will be asked for a label {}..{} for each sample.\n",
            label_min, label_max
        ));
    }

    fn prompt_label(
        &mut self,
        label_min: i32,
        label_max: i32,
    ) -> Result<Option<String>, AcquisitionError> {
        let console_error = |err: std::io::Error| AcquisitionError::Console {
            reason: err.to_string(),
        };

        write!(self.output, "Enter label ({}-{}): ", label_min, label_max)
            .and_then(|_| self.output.flush())
            .map_err(console_error)?;

        let mut line = String::new();
        let n = self.input.read_line(&mut line).map_err(console_error)?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn notify(&mut self, notice: &SessionNotice) {
        let text = match notice {
            SessionNotice::BaselineStored(_) => {
                "[OK] Baseline stored (b1..b5). Now start collecting samples.\n".to_string()
            }
            SessionNotice::SampleDiscarded(err) => format!("[!] {}\n", err.message()),
            SessionNotice::RowSaved { total_rows, path } => format!(
                "[+] Row added. Total rows={} (saved to {})\n",
                total_rows,
                path.display()
            ),
            SessionNotice::SaveFailed(err) => format!(
                "[ERROR] {}\n        The row is kept in memory and will be written by the next successful save.",
                err.message()
            ),
        };
        self.write_line(&text);
    }
}
