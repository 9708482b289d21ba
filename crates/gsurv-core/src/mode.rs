//! Workflow modes and progress phases

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Mutually exclusive application modes offered by the mode selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppMode {
    /// Single-run interactive training
    #[default]
    Interactive,
    /// Multi-run experimentation
    Experiment,
    /// Dataset summary
    #[serde(rename = "Data Summary", alias = "DataSummary")]
    DataSummary,
    /// Beta features, only offered in developer mode
    Develop,
}

impl AppMode {
    /// Every mode in selector order
    pub const ALL: [AppMode; 4] = [
        AppMode::Interactive,
        AppMode::Experiment,
        AppMode::DataSummary,
        AppMode::Develop,
    ];

    /// Label shown in the selector
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Interactive => "Interactive",
            Self::Experiment => "Experiment",
            Self::DataSummary => "Data Summary",
            Self::Develop => "Develop",
        }
    }

    /// Whether the selector offers this mode
    #[must_use]
    pub fn is_offered(self, dev_mode: bool) -> bool {
        dev_mode || self != Self::Develop
    }

    /// Modes offered by the selector, in order
    #[must_use]
    pub fn options(dev_mode: bool) -> Vec<AppMode> {
        Self::ALL
            .into_iter()
            .filter(|mode| mode.is_offered(dev_mode))
            .collect()
    }
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AppMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "interactive" => Ok(Self::Interactive),
            "experiment" => Ok(Self::Experiment),
            "datasummary" => Ok(Self::DataSummary),
            "develop" => Ok(Self::Develop),
            _ => Err(Error::UnknownMode(s.to_string())),
        }
    }
}

/// Workflow phases tracked by the progress flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Data preparation confirmed (`continue_state`)
    Continue,
    /// Model trained (`train_state`)
    Train,
    /// Results saved (`save_state`)
    Save,
}

impl Phase {
    /// Every phase
    pub const ALL: [Phase; 3] = [Phase::Continue, Phase::Train, Phase::Save];

    /// Name of the session field backing this phase
    #[must_use]
    pub fn field(self) -> &'static str {
        match self {
            Self::Continue => "continue_state",
            Self::Train => "train_state",
            Self::Save => "save_state",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_hide_develop() {
        assert_eq!(
            AppMode::options(false),
            vec![
                AppMode::Interactive,
                AppMode::Experiment,
                AppMode::DataSummary
            ]
        );
        assert_eq!(AppMode::options(true), AppMode::ALL.to_vec());
    }

    #[test]
    fn test_default_is_first_mode() {
        assert_eq!(AppMode::default(), AppMode::ALL[0]);
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!("Data Summary".parse::<AppMode>().unwrap(), AppMode::DataSummary);
        assert_eq!("data_summary".parse::<AppMode>().unwrap(), AppMode::DataSummary);
        assert_eq!("EXPERIMENT".parse::<AppMode>().unwrap(), AppMode::Experiment);
        assert!("training".parse::<AppMode>().is_err());
    }

    #[test]
    fn test_mode_serde_uses_labels() {
        let json = serde_json::to_string(&AppMode::DataSummary).unwrap();
        assert_eq!(json, "\"Data Summary\"");

        let mode: AppMode = serde_json::from_str("\"DataSummary\"").unwrap();
        assert_eq!(mode, AppMode::DataSummary);
    }

    #[test]
    fn test_phase_fields() {
        let fields: Vec<_> = Phase::ALL.iter().map(|p| p.field()).collect();
        assert_eq!(fields, vec!["continue_state", "train_state", "save_state"]);

        let phase: Phase = serde_json::from_str("\"train\"").unwrap();
        assert_eq!(phase, Phase::Train);
    }
}
