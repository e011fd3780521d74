use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The two ways a dashboard action can fail. Transport errors, non-success
/// statuses, API error bodies and malformed payloads all collapse into one of
/// these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    BatchFetch,
    SingleFetch,
}

impl FailureKind {
    pub fn user_message(self) -> &'static str {
        match self {
            FailureKind::BatchFetch => "Failed to load users. Please try again.",
            FailureKind::SingleFetch => "Failed to generate a new profile. Please try again.",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl DashboardFailure {
    pub fn new(kind: FailureKind) -> Self {
        Self {
            kind,
            message: kind.user_message().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort option '{0}' (expected none, nameAsc, nameDesc or country)")]
pub struct ParseSortOptionError(pub String);
