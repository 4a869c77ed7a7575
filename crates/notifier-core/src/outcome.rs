//! Description of a finished build.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NotifierError;

/// Result of a finished build, using the labels CI servers report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildResult {
    Success,
    Unstable,
    Failure,
    NotBuilt,
    Aborted,
}

impl BuildResult {
    /// All known results, in order of increasing severity.
    pub const ALL: [BuildResult; 5] = [
        BuildResult::Success,
        BuildResult::Unstable,
        BuildResult::Failure,
        BuildResult::NotBuilt,
        BuildResult::Aborted,
    ];

    /// The upper-case label, e.g. `SUCCESS`.
    pub fn label(&self) -> &'static str {
        match self {
            BuildResult::Success => "SUCCESS",
            BuildResult::Unstable => "UNSTABLE",
            BuildResult::Failure => "FAILURE",
            BuildResult::NotBuilt => "NOT_BUILT",
            BuildResult::Aborted => "ABORTED",
        }
    }

    /// Whether this result counts as a successful build.
    pub fn is_success(&self) -> bool {
        matches!(self, BuildResult::Success)
    }
}

impl fmt::Display for BuildResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BuildResult {
    type Err = NotifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        BuildResult::ALL
            .into_iter()
            .find(|r| r.label() == normalized)
            .ok_or_else(|| NotifierError::InvalidBuildResult(s.to_string()))
    }
}

/// A finished build as reported by the CI server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    /// Full display name of the build, e.g. `my-project #42`.
    pub display_name: String,
    /// Result of the build.
    pub result: BuildResult,
}

impl BuildOutcome {
    pub fn new(display_name: impl Into<String>, result: BuildResult) -> Self {
        Self {
            display_name: display_name.into(),
            result,
        }
    }

    /// Label describing the result, as shown in the message.
    pub fn result_label(&self) -> String {
        self.result.to_string()
    }

    pub fn is_success(&self) -> bool {
        self.result.is_success()
    }
}
