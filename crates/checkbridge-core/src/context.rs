//! Pull-request snapshot taken once at startup, and the chat thread key derived from it.

use serde::{Deserialize, Serialize};

/// The pull-request event action that triggered the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PullRequestAction {
    Opened,
    Reopened,
    Synchronize,
    /// Any other action; the run does nothing for it.
    Other(String),
}

impl PullRequestAction {
    pub fn parse(action: &str) -> Self {
        match action {
            "opened" => PullRequestAction::Opened,
            "reopened" => PullRequestAction::Reopened,
            "synchronize" => PullRequestAction::Synchronize,
            other => PullRequestAction::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PullRequestAction::Opened => "opened",
            PullRequestAction::Reopened => "reopened",
            PullRequestAction::Synchronize => "synchronize",
            PullRequestAction::Other(other) => other,
        }
    }

    /// Title of the first card of a run, or `None` when the action is not watched.
    pub fn opening_title(&self) -> Option<&'static str> {
        match self {
            PullRequestAction::Opened => Some("New pull request is opened"),
            PullRequestAction::Reopened => Some("Pull request re-opened"),
            PullRequestAction::Synchronize => Some("Pull request updated"),
            PullRequestAction::Other(_) => None,
        }
    }
}

/// Pull-request author as shown on the card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub login: String,
    pub avatar_url: String,
    pub profile_url: String,
}

/// Immutable snapshot of the triggering pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestContext {
    pub action: PullRequestAction,
    pub title: String,
    pub html_url: String,
    pub number: u64,
    pub author: Author,
    /// Head commit SHA whose checks are watched.
    pub head_sha: String,
    pub repo_owner: String,
    pub repo_name: String,
    /// Label names present when the event fired.
    pub labels: Vec<String>,
}

impl PullRequestContext {
    pub fn thread_key(&self) -> ThreadKey {
        ThreadKey::for_pull_request(&self.repo_owner, &self.repo_name, self.number)
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// Stable chat thread identifier for one pull request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadKey(String);

impl ThreadKey {
    /// `owner/repo-number`
    pub fn for_pull_request(owner: &str, repo: &str, number: u64) -> Self {
        ThreadKey(format!("{owner}/{repo}-{number}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ThreadKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
