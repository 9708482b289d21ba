//! GSurv Core - Session Orchestration
//!
//! This crate provides the application-mode orchestrator for GSurvWeb:
//! - Mode: the workflow modes and progress phases
//! - Session: per-session state with its reset policy
//! - Workflow: the collaborator seam each mode dispatches to
//! - Surface: the page model an invocation renders into
//! - Orchestrator: one top-to-bottom invocation per user interaction
//! - Registry: per-session contexts for a multi-session server
//! - Error: error types for orchestration
//!
//! ## Usage
//!
//! ```ignore
//! use gsurv_core::{Interaction, Orchestrator, RunSettings, SessionContext, WorkflowSet};
//! use gsurv_data::DatasetLoader;
//! use std::sync::Arc;
//!
//! let orchestrator = Orchestrator::new(
//!     Arc::new(DatasetLoader::xlsx()),
//!     WorkflowSet::default(),
//!     RunSettings::default(),
//! )?;
//! let mut session = SessionContext::new();
//! let invocation = orchestrator.invoke(&mut session, Interaction::Rerun)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod mode;
pub mod orchestrator;
pub mod registry;
pub mod session;
pub mod surface;
pub mod workflow;

pub use error::{Error, Result};
pub use mode::{AppMode, Phase};
pub use orchestrator::{
    Interaction, Invocation, InvocationOutcome, Orchestrator, RunSettings, SessionContext,
};
pub use registry::{SessionRegistry, SharedSession};
pub use session::{should_reset, SessionState};
pub use surface::{ModeSelector, Notice, NoticeLevel, Placement, Surface, TemplateOffer};
pub use workflow::{
    DatasetHandoff, UnavailableWorkflow, Workflow, WorkflowReport, WorkflowSet, WorkflowStatus,
};
