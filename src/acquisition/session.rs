// AcquisitionSession - drives one labeled capture session
//
// The session owns the active baseline and the in-memory dataset. Each
// labeled sample is appended and saved before the next capture is read.
// Device noise, samples without a baseline and invalid labels are handled
// locally; only stream or console failures end the session early.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::acquisition::console::{OperatorConsole, SessionNotice};
use crate::acquisition::label::parse_label;
use crate::analysis::features::{BaselineVector, FeatureSet, SampleVector};
use crate::dataset::{Dataset, DatasetRow};
use crate::error::{log_acquisition_error, log_dataset_error, AcquisitionError};
use crate::protocol::{FrameEvent, FrameReader};

/// Counters reported when a session ends
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub baselines_captured: usize,
    pub samples_captured: usize,
    pub rows_appended: usize,
    pub discarded_without_baseline: usize,
    pub discarded_invalid_label: usize,
    pub failed_saves: usize,
    /// Rows still only in memory when the session ended
    pub unsaved_rows: bool,
    pub total_rows: usize,
}

/// Whether the session should keep reading captures
enum Flow {
    Continue,
    Stop,
}

/// One acquisition run over a device stream
pub struct AcquisitionSession {
    dataset: Dataset,
    dataset_path: PathBuf,
    baseline: Option<BaselineVector>,
    label_min: i32,
    label_max: i32,
    /// Set when an append has not been persisted yet
    dirty: bool,
    summary: SessionSummary,
}

impl AcquisitionSession {
    /// Create a session over an already loaded dataset
    ///
    /// # Arguments
    /// * `dataset` - Table loaded with `load_or_create`
    /// * `dataset_path` - File every save overwrites
    /// * `label_min` / `label_max` - Inclusive accepted label range
    pub fn new(dataset: Dataset, dataset_path: &Path, label_min: i32, label_max: i32) -> Self {
        Self {
            dataset,
            dataset_path: dataset_path.to_path_buf(),
            baseline: None,
            label_min,
            label_max,
            dirty: false,
            summary: SessionSummary::default(),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn baseline(&self) -> Option<&BaselineVector> {
        self.baseline.as_ref()
    }

    pub fn summary(&self) -> &SessionSummary {
        &self.summary
    }

    /// Consume device events until the stream or the operator input ends
    ///
    /// Rows left unsaved by an earlier failed save get one more save
    /// attempt before returning.
    ///
    /// # Errors
    /// * `AcquisitionError::StreamRead` - Device stream failed
    /// * `AcquisitionError::Console` - Operator console failed
    pub fn run<R: BufRead, C: OperatorConsole>(
        &mut self,
        reader: &mut FrameReader<R>,
        console: &mut C,
    ) -> Result<SessionSummary, AcquisitionError> {
        tracing::info!(
            "[Acquisition] Session started with {} existing rows",
            self.dataset.len()
        );

        let outcome = self.event_loop(reader, console);

        if self.dirty {
            tracing::info!("[Acquisition] Retrying save of pending rows before exit");
            self.persist(console);
        }

        self.summary.unsaved_rows = self.dirty;
        self.summary.total_rows = self.dataset.len();
        tracing::info!(
            "[Acquisition] Session ended after {} lines: {:?}",
            reader.lines_read(),
            self.summary
        );

        outcome.map(|_| self.summary.clone())
    }

    fn event_loop<R: BufRead, C: OperatorConsole>(
        &mut self,
        reader: &mut FrameReader<R>,
        console: &mut C,
    ) -> Result<(), AcquisitionError> {
        loop {
            let event = reader.next_event().map_err(|err| {
                let err = AcquisitionError::StreamRead {
                    reason: err.to_string(),
                };
                log_acquisition_error(&err, "AcquisitionSession::run");
                err
            })?;
            let Some(event) = event else {
                return Ok(());
            };
            if let Flow::Stop = self.handle_event(event, console)? {
                return Ok(());
            }
        }
    }

    /// Apply one capture event
    fn handle_event<C: OperatorConsole>(
        &mut self,
        event: FrameEvent,
        console: &mut C,
    ) -> Result<Flow, AcquisitionError> {
        match event {
            FrameEvent::BaselineCaptured(baseline) => {
                tracing::info!("[Acquisition] Baseline captured: {:?}", baseline.values());
                self.baseline = Some(baseline);
                self.summary.baselines_captured += 1;
                console.notify(&SessionNotice::BaselineStored(baseline));
                Ok(Flow::Continue)
            }
            FrameEvent::SampleCaptured(sample) => {
                self.summary.samples_captured += 1;
                self.handle_sample(sample, console)
            }
        }
    }

    fn handle_sample<C: OperatorConsole>(
        &mut self,
        sample: SampleVector,
        console: &mut C,
    ) -> Result<Flow, AcquisitionError> {
        let Some(baseline) = self.baseline else {
            tracing::warn!("[Acquisition] Sample discarded: no baseline captured yet");
            self.summary.discarded_without_baseline += 1;
            console.notify(&SessionNotice::SampleDiscarded(
                AcquisitionError::MissingBaseline,
            ));
            return Ok(Flow::Continue);
        };

        let Some(input) = console.prompt_label(self.label_min, self.label_max)? else {
            tracing::warn!("[Acquisition] Operator input closed; last sample discarded");
            return Ok(Flow::Stop);
        };

        let label = match parse_label(&input, self.label_min, self.label_max) {
            Ok(label) => label,
            Err(err) => {
                tracing::warn!("[Acquisition] {}", err);
                self.summary.discarded_invalid_label += 1;
                console.notify(&SessionNotice::SampleDiscarded(err));
                return Ok(Flow::Continue);
            }
        };

        let features = FeatureSet::from_sample(&sample, &baseline);
        let total = self
            .dataset
            .append(DatasetRow::from_capture(&sample, label, &baseline, &features));
        self.summary.rows_appended += 1;
        self.dirty = true;
        tracing::debug!(
            "[Acquisition] Row {} appended: label={} r={:.4}",
            total,
            label,
            features.r
        );

        self.persist(console);
        Ok(Flow::Continue)
    }

    /// Save the whole dataset; on failure keep the rows and report verbatim
    fn persist<C: OperatorConsole>(&mut self, console: &mut C) {
        match self.dataset.save(&self.dataset_path) {
            Ok(()) => {
                self.dirty = false;
                console.notify(&SessionNotice::RowSaved {
                    total_rows: self.dataset.len(),
                    path: self.dataset_path.clone(),
                });
            }
            Err(err) => {
                log_dataset_error(&err, "AcquisitionSession::persist");
                self.summary.failed_saves += 1;
                console.notify(&SessionNotice::SaveFailed(err));
            }
        }
    }
}
