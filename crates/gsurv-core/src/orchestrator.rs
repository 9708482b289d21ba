//! Orchestrator
//!
//! One call to [`Orchestrator::invoke`] is one top-to-bottom run of the
//! application for a single user interaction:
//!
//! 1. resolve the input source (developer path, else the upload widget)
//! 2. load the dataset
//! 3. without a dataset, offer the template and stop
//! 4. initialize session state, show the mode selector, apply a selection
//! 5. dispatch exactly one workflow for the current mode

use chrono::{DateTime, Utc};
use gsurv_data::{DataSource, DatasetLoader, LoadOutcome, UploadedFile};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::mode::{AppMode, Phase};
use crate::session::SessionState;
use crate::surface::{ModeSelector, Surface, TemplateOffer};
use crate::workflow::{WorkflowSet, WorkflowStatus};

const UPLOAD_SUCCESS: &str = "File Uploaded Successfully";

/// Process-wide settings fixed at startup
#[derive(Debug, Clone, Default)]
pub struct RunSettings {
    /// Developer mode (offers Develop, enables the local path bypass)
    pub dev_mode: bool,
    /// Local workbook used instead of the upload widget in developer mode
    pub local_data_path: Option<PathBuf>,
    /// Detailed session-transition logging
    pub verbose: bool,
}

impl RunSettings {
    /// Reject inconsistent startup configurations.
    ///
    /// A local data path requires developer mode, and in developer mode the
    /// path must exist.
    pub fn validate(&self) -> Result<()> {
        match (&self.local_data_path, self.dev_mode) {
            (Some(_), false) => Err(Error::configuration(
                "please use --develop option to specify path",
            )),
            (Some(path), true) if !path.is_file() => Err(Error::configuration(format!(
                "data path {} does not exist",
                path.display()
            ))),
            _ => Ok(()),
        }
    }
}

/// Everything kept for one session between invocations
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Session identifier
    pub id: Uuid,
    state: SessionState,
    /// Current value of the upload widget
    upload: Option<UploadedFile>,
    invocations: u64,
    last_accessed_at: DateTime<Utc>,
}

impl SessionContext {
    /// Create a fresh session
    #[must_use]
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            state: SessionState::new(),
            upload: None,
            invocations: 0,
            last_accessed_at: now,
        }
    }

    /// Session state
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// File held by the upload widget
    #[must_use]
    pub fn upload(&self) -> Option<&UploadedFile> {
        self.upload.as_ref()
    }

    /// Number of completed invocations
    #[must_use]
    pub fn invocations(&self) -> u64 {
        self.invocations
    }

    /// When the session was last invoked
    #[must_use]
    pub fn last_accessed_at(&self) -> DateTime<Utc> {
        self.last_accessed_at
    }

    /// Update last accessed timestamp
    pub fn touch(&mut self) {
        self.last_accessed_at = Utc::now();
    }

    /// Check if session is expired (not accessed for given duration)
    #[must_use]
    pub fn is_expired(&self, max_idle_secs: i64) -> bool {
        let idle_duration = Utc::now() - self.last_accessed_at;
        idle_duration.num_seconds() > max_idle_secs
    }

    #[cfg(test)]
    pub(crate) fn set_last_accessed_at(&mut self, at: DateTime<Utc>) {
        self.last_accessed_at = at;
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// The user event that triggered an invocation
#[derive(Debug, Clone)]
pub enum Interaction {
    /// Re-run with no new input
    Rerun,
    /// A file was put into the upload widget
    Upload(UploadedFile),
    /// The upload widget was cleared
    ClearUpload,
    /// The mode selector changed
    SelectMode(AppMode),
    /// The user completed a phase of the current workflow
    CompletePhase(Phase),
}

/// What an invocation ended with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InvocationOutcome {
    /// No input yet; template offered
    AwaitingData,
    /// Input could not be loaded; error shown, template offered
    LoadFailed,
    /// A workflow ran
    Dispatched {
        /// Mode dispatched
        mode: AppMode,
        /// Whether this invocation cleared progress
        reset: bool,
    },
    /// The selected mode's workflow is deactivated
    Unavailable {
        /// Mode selected
        mode: AppMode,
    },
}

/// Result of one invocation
#[derive(Debug, Clone, Serialize)]
pub struct Invocation {
    /// How it ended
    pub outcome: InvocationOutcome,
    /// What it rendered
    pub surface: Surface,
}

/// Wires loader, session state and workflows together
pub struct Orchestrator {
    loader: Arc<DatasetLoader>,
    workflows: WorkflowSet,
    settings: RunSettings,
    template: TemplateOffer,
}

impl Orchestrator {
    /// Create an orchestrator. Fails if `settings` are inconsistent.
    pub fn new(
        loader: Arc<DatasetLoader>,
        workflows: WorkflowSet,
        settings: RunSettings,
    ) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            loader,
            workflows,
            settings,
            template: TemplateOffer::default(),
        })
    }

    /// Configure the template download offer
    #[must_use]
    pub fn with_template(mut self, template: TemplateOffer) -> Self {
        self.template = template;
        self
    }

    /// Startup settings
    #[must_use]
    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// The dataset loader
    #[must_use]
    pub fn loader(&self) -> &DatasetLoader {
        &self.loader
    }

    /// Run one invocation for `session`.
    ///
    /// Load failures are rendered, not returned. Errors are reserved for
    /// requests the page could not have produced (a mode the selector does
    /// not offer) and for workflow collaborator failures.
    pub fn invoke(&self, session: &mut SessionContext, interaction: Interaction) -> Result<Invocation> {
        let verbose = self.settings.verbose;

        if let Interaction::SelectMode(mode) = interaction {
            if !mode.is_offered(self.settings.dev_mode) {
                return Err(Error::ModeNotOffered(mode));
            }
        }

        session.touch();
        session.invocations += 1;
        debug!(session_id = %session.id, invocation = session.invocations, ?interaction, "Invocation started");

        match &interaction {
            Interaction::Upload(file) => session.upload = Some(file.clone()),
            Interaction::ClearUpload => session.upload = None,
            _ => {}
        }

        let mut surface = Surface::new();
        let source = self.input_source(session);

        let dataset = match self.loader.load(source.as_ref()) {
            LoadOutcome::Loaded { dataset, .. } => {
                surface.sidebar_success(UPLOAD_SUCCESS);
                dataset
            }
            outcome => {
                let failed = matches!(outcome, LoadOutcome::Failed { .. });
                if let LoadOutcome::Failed { message } = outcome {
                    surface.error(message);
                }
                if matches!(
                    interaction,
                    Interaction::SelectMode(_) | Interaction::CompletePhase(_)
                ) {
                    warn!(session_id = %session.id, "Ignoring workflow event without a dataset");
                    surface.info("Load a dataset before choosing a mode.");
                }
                surface.template = Some(self.template.clone());
                surface.session = session.state.clone();
                let outcome = if failed {
                    InvocationOutcome::LoadFailed
                } else {
                    InvocationOutcome::AwaitingData
                };
                return Ok(Invocation { outcome, surface });
            }
        };

        session.state.initialize_if_absent();

        let mut reset = false;
        match interaction {
            Interaction::SelectMode(mode) => reset = session.state.select_mode(mode, verbose),
            Interaction::CompletePhase(phase) => session.state.record_progress(phase),
            _ => {}
        }

        let mode = session.state.app_mode().unwrap_or_default();
        surface.mode_selector = Some(ModeSelector {
            label: "Select mode".to_string(),
            options: AppMode::options(self.settings.dev_mode),
            selected: mode,
        });

        let report = self.workflows.for_mode(mode).run(&dataset, verbose)?;
        for phase in &report.completed_phases {
            session.state.record_progress(*phase);
        }

        let outcome = match report.status {
            WorkflowStatus::Completed => InvocationOutcome::Dispatched { mode, reset },
            WorkflowStatus::Unavailable => {
                for message in &report.messages {
                    surface.info(message.clone());
                }
                InvocationOutcome::Unavailable { mode }
            }
        };

        if verbose {
            info!(session_id = %session.id, mode = %mode, reset, ?outcome, "Invocation finished");
        }

        surface.workflow = Some(report);
        surface.session = session.state.clone();
        Ok(Invocation { outcome, surface })
    }

    fn input_source(&self, session: &SessionContext) -> Option<DataSource> {
        match (&self.settings.local_data_path, self.settings.dev_mode) {
            (Some(path), true) => Some(DataSource::LocalPath(path.clone())),
            _ => session.upload.clone().map(DataSource::Upload),
        }
    }
}
