//! Workflow collaborators
//!
//! Each [`AppMode`] dispatches to one [`Workflow`]. The training and
//! experimentation logic lives behind this trait; this crate ships the
//! hand-off used until a mode's collaborator is plugged in and the explicit
//! no-op used for deactivated modes.

use gsurv_data::{DatasetSummary, ParsedDataset};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::mode::{AppMode, Phase};

/// How a dispatched workflow ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    /// The workflow ran
    Completed,
    /// The workflow is deactivated and did nothing
    Unavailable,
}

/// Output of one workflow run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowReport {
    /// Mode the workflow ran under
    pub mode: AppMode,
    /// Outcome
    pub status: WorkflowStatus,
    /// Messages for the page
    pub messages: Vec<String>,
    /// Phases completed during this run
    pub completed_phases: Vec<Phase>,
    /// Shape of the dataset the workflow received
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<DatasetSummary>,
}

impl WorkflowReport {
    /// Report for a run that completed
    #[must_use]
    pub fn completed(mode: AppMode) -> Self {
        Self {
            mode,
            status: WorkflowStatus::Completed,
            messages: Vec::new(),
            completed_phases: Vec::new(),
            dataset: None,
        }
    }

    /// Report for a deactivated workflow
    #[must_use]
    pub fn unavailable(mode: AppMode, reason: impl Into<String>) -> Self {
        Self {
            mode,
            status: WorkflowStatus::Unavailable,
            messages: vec![reason.into()],
            completed_phases: Vec::new(),
            dataset: None,
        }
    }

    /// Add a message
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }

    /// Mark a phase as completed by this run
    #[must_use]
    pub fn with_completed(mut self, phase: Phase) -> Self {
        self.completed_phases.push(phase);
        self
    }

    /// Attach the dataset shape
    #[must_use]
    pub fn with_dataset(mut self, summary: DatasetSummary) -> Self {
        self.dataset = Some(summary);
        self
    }
}

/// A mode-specific workflow
#[cfg_attr(test, mockall::automock)]
pub trait Workflow: Send + Sync {
    /// Run against the loaded dataset
    fn run(&self, dataset: &ParsedDataset, verbose: bool) -> Result<WorkflowReport>;
}

/// Acknowledges the dataset it was handed, for modes whose collaborator is
/// not linked into this build
#[derive(Debug, Clone, Copy)]
pub struct DatasetHandoff {
    mode: AppMode,
}

impl DatasetHandoff {
    /// Hand-off for `mode`
    #[must_use]
    pub fn new(mode: AppMode) -> Self {
        Self { mode }
    }
}

impl Workflow for DatasetHandoff {
    fn run(&self, dataset: &ParsedDataset, verbose: bool) -> Result<WorkflowReport> {
        let summary = dataset.summary();
        if verbose {
            for sheet in &summary.sheets {
                debug!(mode = %self.mode, sheet = %sheet, "Dataset sheet");
            }
        }

        let mut report = WorkflowReport::completed(self.mode).with_message(format!(
            "{} mode received {} sheet(s)",
            self.mode,
            summary.sheets.len()
        ));
        for sheet in &summary.sheets {
            report = report.with_message(sheet.to_string());
        }
        Ok(report.with_dataset(summary))
    }
}

/// Explicit no-op for a deactivated mode
#[derive(Debug, Clone)]
pub struct UnavailableWorkflow {
    mode: AppMode,
    reason: String,
}

impl UnavailableWorkflow {
    /// Deactivate `mode` with a reason shown to the user
    #[must_use]
    pub fn new(mode: AppMode, reason: impl Into<String>) -> Self {
        Self {
            mode,
            reason: reason.into(),
        }
    }
}

impl Workflow for UnavailableWorkflow {
    fn run(&self, _dataset: &ParsedDataset, _verbose: bool) -> Result<WorkflowReport> {
        Ok(WorkflowReport::unavailable(self.mode, self.reason.clone()))
    }
}

/// One workflow per mode
#[derive(Clone)]
pub struct WorkflowSet {
    interactive: Arc<dyn Workflow>,
    experiment: Arc<dyn Workflow>,
    data_summary: Arc<dyn Workflow>,
    develop: Arc<dyn Workflow>,
}

impl WorkflowSet {
    /// Replace the Interactive workflow
    #[must_use]
    pub fn with_interactive(mut self, workflow: Arc<dyn Workflow>) -> Self {
        self.interactive = workflow;
        self
    }

    /// Replace the Experiment workflow
    #[must_use]
    pub fn with_experiment(mut self, workflow: Arc<dyn Workflow>) -> Self {
        self.experiment = workflow;
        self
    }

    /// Replace the Data Summary workflow
    #[must_use]
    pub fn with_data_summary(mut self, workflow: Arc<dyn Workflow>) -> Self {
        self.data_summary = workflow;
        self
    }

    /// Replace the Develop workflow
    #[must_use]
    pub fn with_develop(mut self, workflow: Arc<dyn Workflow>) -> Self {
        self.develop = workflow;
        self
    }

    /// Workflow dispatched for `mode`
    #[must_use]
    pub fn for_mode(&self, mode: AppMode) -> &dyn Workflow {
        match mode {
            AppMode::Interactive => self.interactive.as_ref(),
            AppMode::Experiment => self.experiment.as_ref(),
            AppMode::DataSummary => self.data_summary.as_ref(),
            AppMode::Develop => self.develop.as_ref(),
        }
    }
}

impl Default for WorkflowSet {
    fn default() -> Self {
        Self {
            interactive: Arc::new(DatasetHandoff::new(AppMode::Interactive)),
            experiment: Arc::new(DatasetHandoff::new(AppMode::Experiment)),
            data_summary: Arc::new(UnavailableWorkflow::new(
                AppMode::DataSummary,
                "Data Summary is currently deactivated while the profiling backend is unavailable",
            )),
            develop: Arc::new(DatasetHandoff::new(AppMode::Develop)),
        }
    }
}
