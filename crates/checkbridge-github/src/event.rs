//! Pull-request event payload loading.
//!
//! GitHub Actions writes the triggering event as JSON to the file named by
//! `GITHUB_EVENT_PATH`. Anything wrong with that file is a configuration
//! error: the run cannot start without it.

use std::path::Path;

use checkbridge_core::{Author, NotifierError, NotifierResult, PullRequestAction, PullRequestContext};
use tracing::debug;

use crate::types::PullRequestEvent;

/// Read and parse the event payload at `path`.
pub fn load_event(path: &Path) -> NotifierResult<PullRequestContext> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        NotifierError::Config(format!("Cannot read event payload {}: {}", path.display(), e))
    })?;
    debug!(path = %path.display(), bytes = raw.len(), "Loaded event payload");
    parse_event(&raw)
}

/// Build a `PullRequestContext` from a raw `pull_request` event payload.
pub fn parse_event(raw: &str) -> NotifierResult<PullRequestContext> {
    let event: PullRequestEvent = serde_json::from_str(raw)
        .map_err(|e| NotifierError::Config(format!("Invalid event payload: {}", e)))?;

    let pr = event.pull_request.ok_or_else(|| {
        NotifierError::Config("Event payload has no pull_request object".to_string())
    })?;
    let repo = event.repository.ok_or_else(|| {
        NotifierError::Config("Event payload has no repository object".to_string())
    })?;
    if pr.head.sha.is_empty() {
        return Err(NotifierError::Config(
            "Event payload has no pull_request.head.sha".to_string(),
        ));
    }

    Ok(PullRequestContext {
        action: PullRequestAction::parse(&event.action),
        title: pr.title,
        html_url: pr.html_url,
        number: pr.number,
        author: Author {
            login: pr.user.login,
            avatar_url: pr.user.avatar_url.unwrap_or_default(),
            profile_url: pr.user.html_url.unwrap_or_default(),
        },
        head_sha: pr.head.sha,
        repo_owner: repo.owner.login,
        repo_name: repo.name,
        labels: pr.labels.into_iter().map(|label| label.name).collect(),
    })
}
