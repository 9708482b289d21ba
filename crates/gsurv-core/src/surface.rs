//! Page model rendered by an invocation
//!
//! The orchestrator writes titles, notices, the template offer, the mode
//! selector and the workflow output into a [`Surface`]; the HTTP layer
//! returns it as JSON. Nothing here carries state between invocations.

use serde::Serialize;

use crate::mode::AppMode;
use crate::session::SessionState;
use crate::workflow::WorkflowReport;

const TITLE: &str = "GSurvWeb: Graft survival prediction";
const BANNER: &str = "The output is not clinically validated. Beta version v0.1.x";
const INTRODUCTION: &str = "This is an open source interactive web application for transplant \
graft survival prediction that helps you run basic machine learning algorithms on your dataset.";
const SIDEBAR_TITLE: &str = "Start Options";
const SIDEBAR_TEXT: &str =
    "To begin using the app, load your dataset using the file upload option below.";

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    /// Operation succeeded
    Success,
    /// Informational
    Info,
    /// Something the user should fix
    Error,
}

/// Where a notice is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Main content area
    Main,
    /// Sidebar
    Sidebar,
}

/// A user-visible message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Placement
    pub placement: Placement,
    /// Text
    pub message: String,
}

/// Download affordance for the example template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateOffer {
    /// Section heading
    pub title: String,
    /// Guidance text
    pub description: String,
    /// Suggested file name
    pub file_name: String,
    /// Download location
    pub url: String,
}

impl TemplateOffer {
    /// Offer for a template served at `url`
    #[must_use]
    pub fn new(file_name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: "Example Template".to_string(),
            description: "Use the provided template as a guide to formatting your data."
                .to_string(),
            file_name: file_name.into(),
            url: url.into(),
        }
    }
}

impl Default for TemplateOffer {
    fn default() -> Self {
        Self::new("example_data_template.xlsx", "/api/v1/template")
    }
}

/// Mode selector widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeSelector {
    /// Widget label
    pub label: String,
    /// Offered modes in order
    pub options: Vec<AppMode>,
    /// Current selection
    pub selected: AppMode,
}

/// Everything one invocation renders
#[derive(Debug, Clone, Serialize)]
pub struct Surface {
    /// Page title
    pub title: String,
    /// Disclaimer banner
    pub banner: String,
    /// Introduction text
    pub introduction: String,
    /// Sidebar heading
    pub sidebar_title: String,
    /// Sidebar guidance
    pub sidebar_text: String,
    /// Notices in emission order
    pub notices: Vec<Notice>,
    /// Template download, shown while no dataset is loaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<TemplateOffer>,
    /// Mode selector, shown once a dataset is loaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode_selector: Option<ModeSelector>,
    /// Output of the dispatched workflow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow: Option<WorkflowReport>,
    /// Session state at the end of the invocation
    pub session: SessionState,
}

impl Surface {
    /// Empty page with the standard headings
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: TITLE.to_string(),
            banner: BANNER.to_string(),
            introduction: INTRODUCTION.to_string(),
            sidebar_title: SIDEBAR_TITLE.to_string(),
            sidebar_text: SIDEBAR_TEXT.to_string(),
            notices: Vec::new(),
            template: None,
            mode_selector: None,
            workflow: None,
            session: SessionState::default(),
        }
    }

    fn push(&mut self, level: NoticeLevel, placement: Placement, message: impl Into<String>) {
        self.notices.push(Notice {
            level,
            placement,
            message: message.into(),
        });
    }

    /// Success notice in the sidebar
    pub fn sidebar_success(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, Placement::Sidebar, message);
    }

    /// Error notice in the main area
    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, Placement::Main, message);
    }

    /// Informational notice in the main area
    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, Placement::Main, message);
    }

    /// Notices of one level
    pub fn notices_at(&self, level: NoticeLevel) -> impl Iterator<Item = &Notice> {
        self.notices.iter().filter(move |n| n.level == level)
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_surface_has_headings_only() {
        let surface = Surface::new();
        assert_eq!(surface.title, TITLE);
        assert!(surface.notices.is_empty());
        assert!(surface.template.is_none());
        assert!(surface.mode_selector.is_none());
    }

    #[test]
    fn test_notices() {
        let mut surface = Surface::new();
        surface.sidebar_success("File Uploaded Successfully");
        surface.error("bad file");
        surface.info("later");

        assert_eq!(surface.notices.len(), 3);
        let errors: Vec<_> = surface.notices_at(NoticeLevel::Error).collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].placement, Placement::Main);
        assert_eq!(surface.notices[0].placement, Placement::Sidebar);
    }

    #[test]
    fn test_serialization_skips_absent_widgets() {
        let mut surface = Surface::new();
        surface.template = Some(TemplateOffer::default());

        let json = serde_json::to_value(&surface).unwrap();
        assert_eq!(json["template"]["file_name"], "example_data_template.xlsx");
        assert!(json.get("mode_selector").is_none());
        assert!(json.get("workflow").is_none());
        assert!(json["session"]["app_mode"].is_null());
    }
}
