//! GitHub REST and webhook wire types.
//!
//! Only the fields checkbridge reads are modelled. Nullable or missing
//! strings decode as `None` and are flattened to empty strings when
//! converted into core types.

use checkbridge_core::{CheckRunEntry, LegacyStatus};
use serde::Deserialize;

/// `GET /repos/{owner}/{repo}/commits/{ref}/status`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CombinedStatus {
    pub state: String,
    pub total_count: u64,
    pub statuses: Vec<RepoStatus>,
}

/// Latest status for one context.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RepoStatus {
    pub state: String,
    pub context: String,
    pub description: Option<String>,
    pub avatar_url: Option<String>,
    pub target_url: Option<String>,
}

impl From<RepoStatus> for LegacyStatus {
    fn from(status: RepoStatus) -> Self {
        LegacyStatus {
            state: status.state,
            context: status.context,
            description: status.description.unwrap_or_default(),
            avatar_url: status.avatar_url.unwrap_or_default(),
            target_url: status.target_url.unwrap_or_default(),
        }
    }
}

/// `GET /repos/{owner}/{repo}/commits/{ref}/check-runs`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CheckRunList {
    pub total_count: u64,
    pub check_runs: Vec<CheckRun>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CheckRun {
    pub name: String,
    pub status: String,
    /// `null` until the run completes.
    pub conclusion: Option<String>,
    pub html_url: Option<String>,
    pub app: Option<CheckRunApp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CheckRunApp {
    pub name: Option<String>,
    pub owner: Option<Account>,
}

impl From<CheckRun> for CheckRunEntry {
    fn from(run: CheckRun) -> Self {
        let owner_avatar_url = run
            .app
            .and_then(|app| app.owner)
            .and_then(|owner| owner.avatar_url)
            .unwrap_or_default();
        CheckRunEntry {
            status: run.status,
            conclusion: run.conclusion.unwrap_or_default(),
            name: run.name,
            html_url: run.html_url.unwrap_or_default(),
            owner_avatar_url,
        }
    }
}

/// User or organization account.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Account {
    pub login: String,
    pub avatar_url: Option<String>,
    pub html_url: Option<String>,
}

/// Payload of a `pull_request` workflow event.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PullRequestEvent {
    pub action: String,
    pub pull_request: Option<PullRequest>,
    pub repository: Option<Repository>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    pub user: Account,
    pub head: GitRef,
    pub labels: Vec<Label>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GitRef {
    pub sha: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Repository {
    pub name: String,
    pub owner: Account,
}
