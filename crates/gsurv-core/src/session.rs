//! Session State Store
//!
//! [`SessionState`] is the record that survives between invocations of one
//! session. Each field is individually present or absent so that
//! initialization only fills what is missing.
//!
//! The fields are private; the methods on this type are the only writers of
//! `prev_app_mode` and the progress flags:
//! - [`SessionState::initialize_if_absent`]
//! - [`SessionState::apply_reset`]
//! - [`SessionState::select_mode`]
//! - [`SessionState::record_progress`]

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::mode::{AppMode, Phase};

/// Mode Reset Policy: progress must be cleared when the mode changed.
#[must_use]
pub fn should_reset(prev: AppMode, current: AppMode) -> bool {
    prev != current
}

/// Cross-invocation state of one session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    app_mode: Option<AppMode>,
    prev_app_mode: Option<AppMode>,
    continue_state: Option<bool>,
    train_state: Option<bool>,
    save_state: Option<bool>,
}

impl SessionState {
    /// Create an empty (uninitialized) state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether every field is present
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.app_mode.is_some()
            && self.prev_app_mode.is_some()
            && Phase::ALL.iter().all(|p| self.progress_field(*p).is_some())
    }

    /// Currently selected mode
    #[must_use]
    pub fn app_mode(&self) -> Option<AppMode> {
        self.app_mode
    }

    /// Mode as of the previous invocation
    #[must_use]
    pub fn prev_app_mode(&self) -> Option<AppMode> {
        self.prev_app_mode
    }

    /// Raw progress flag, `None` when absent
    #[must_use]
    pub fn progress_field(&self, phase: Phase) -> Option<bool> {
        match phase {
            Phase::Continue => self.continue_state,
            Phase::Train => self.train_state,
            Phase::Save => self.save_state,
        }
    }

    /// Whether a phase is complete (absent counts as not complete)
    #[must_use]
    pub fn is_complete(&self, phase: Phase) -> bool {
        self.progress_field(phase).unwrap_or(false)
    }

    fn progress_slot(&mut self, phase: Phase) -> &mut Option<bool> {
        match phase {
            Phase::Continue => &mut self.continue_state,
            Phase::Train => &mut self.train_state,
            Phase::Save => &mut self.save_state,
        }
    }

    /// Fill absent fields with their defaults, leaving present ones alone.
    ///
    /// Progress flags default to `false`, both mode fields to the first mode.
    pub fn initialize_if_absent(&mut self) {
        for phase in Phase::ALL {
            self.progress_slot(phase).get_or_insert(false);
        }
        self.app_mode.get_or_insert_with(AppMode::default);
        self.prev_app_mode.get_or_insert_with(AppMode::default);
    }

    /// Apply the reset policy: clear progress if the mode changed since the
    /// previous invocation, then record the current mode as previous.
    ///
    /// Returns whether progress was cleared. Does nothing before the mode is
    /// initialized.
    pub fn apply_reset(&mut self, verbose: bool) -> bool {
        let Some(current) = self.app_mode else {
            return false;
        };

        if verbose {
            info!(
                "session status | current mode: {} | previous mode: {}",
                current,
                self.prev_app_mode
                    .map_or_else(|| "unset".to_string(), |m| m.to_string())
            );
        }

        let reset = self
            .prev_app_mode
            .map_or(true, |prev| should_reset(prev, current));
        if reset {
            for phase in Phase::ALL {
                *self.progress_slot(phase) = Some(false);
            }
        }
        self.prev_app_mode = Some(current);
        reset
    }

    /// Handle a mode-selector change.
    ///
    /// The previous value is captured, the new selection written, and the
    /// reset policy applied before anything is dispatched under the new
    /// mode. Returns whether progress was cleared.
    pub fn select_mode(&mut self, mode: AppMode, verbose: bool) -> bool {
        self.initialize_if_absent();
        let previous = self.app_mode;
        self.app_mode = Some(mode);
        let reset = self.apply_reset(verbose);
        debug!(?previous, selected = %mode, reset, "Mode selected");
        reset
    }

    /// Mark a phase of the current mode as complete
    pub fn record_progress(&mut self, phase: Phase) {
        *self.progress_slot(phase) = Some(true);
        debug!(phase = %phase, "Progress recorded");
    }
}
