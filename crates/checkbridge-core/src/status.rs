//! Normalized status records and the raw source entries they come from.

use serde::{Deserialize, Serialize};

use crate::obs;

/// Normalized tri-state for one check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Status {
    Success,
    Failure,
    InProgress,
}

impl Status {
    /// Human-readable label, also used as the message of check-run rows.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Success => "Success",
            Status::Failure => "Failure",
            Status::InProgress => "InProgress",
        }
    }

    /// Whether a run can stop polling once this is the overall status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Success | Status::Failure)
    }

    /// Map a legacy commit-status `state`.
    ///
    /// Anything other than `success` or `failure` (including `pending`,
    /// `error` and values the provider may add later) counts as in progress.
    pub fn from_legacy_state(state: &str) -> Self {
        match state {
            "success" => Status::Success,
            "failure" => Status::Failure,
            "pending" => Status::InProgress,
            other => {
                obs::emit_status_unrecognized("legacy_state", other);
                Status::InProgress
            }
        }
    }

    /// Map a check-run `status` and `conclusion`.
    ///
    /// The conclusion only matters once the run is `completed`.
    pub fn from_check_run(status: &str, conclusion: &str) -> Self {
        if status != "completed" {
            if !KNOWN_CHECK_RUN_STATUSES.contains(&status) {
                obs::emit_status_unrecognized("check_run_status", status);
            }
            return Status::InProgress;
        }
        if conclusion == "success" {
            return Status::Success;
        }
        if !KNOWN_CONCLUSIONS.contains(&conclusion) {
            obs::emit_status_unrecognized("check_run_conclusion", conclusion);
        }
        Status::Failure
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

const KNOWN_CHECK_RUN_STATUSES: &[&str] = &["queued", "in_progress", "waiting", "requested", "pending"];

const KNOWN_CONCLUSIONS: &[&str] = &[
    "failure",
    "neutral",
    "cancelled",
    "skipped",
    "timed_out",
    "action_required",
    "stale",
    "startup_failure",
];

/// One entry of the legacy commit status API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyStatus {
    pub state: String,
    pub context: String,
    pub description: String,
    pub avatar_url: String,
    pub target_url: String,
}

/// One entry of the check-run API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRunEntry {
    pub status: String,
    /// Empty while the run has not concluded.
    pub conclusion: String,
    pub name: String,
    pub html_url: String,
    pub owner_avatar_url: String,
}

/// A check's state, independent of which API reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub name: String,
    pub message: String,
    pub avatar_url: String,
    /// Empty when the check has nothing to link to.
    pub target_url: String,
    pub status: Status,
}

impl StatusRecord {
    pub fn from_legacy(entry: &LegacyStatus) -> Self {
        Self {
            name: entry.context.clone(),
            message: entry.description.clone(),
            avatar_url: entry.avatar_url.clone(),
            target_url: entry.target_url.clone(),
            status: Status::from_legacy_state(&entry.state),
        }
    }

    pub fn from_check_run(entry: &CheckRunEntry) -> Self {
        let status = Status::from_check_run(&entry.status, &entry.conclusion);
        Self {
            name: entry.name.clone(),
            message: status.label().to_string(),
            avatar_url: entry.owner_avatar_url.clone(),
            target_url: entry.html_url.clone(),
            status,
        }
    }

    pub fn has_link(&self) -> bool {
        !self.target_url.is_empty()
    }
}
