//! `StatusSource` over the GitHub API for one repository.

use async_trait::async_trait;
use checkbridge_core::{CheckRunEntry, LegacyStatus, NotifierResult, StatusSource};

use crate::client::GitHubClient;

/// GitHub client bound to `{owner}/{repo}`.
#[derive(Debug, Clone)]
pub struct RepoStatusSource {
    client: GitHubClient,
    owner: String,
    repo: String,
}

impl RepoStatusSource {
    pub fn new(client: GitHubClient, owner: &str, repo: &str) -> Self {
        Self {
            client,
            owner: owner.to_string(),
            repo: repo.to_string(),
        }
    }
}

#[async_trait]
impl StatusSource for RepoStatusSource {
    async fn legacy_statuses(&self, commit_ref: &str) -> NotifierResult<Vec<LegacyStatus>> {
        let statuses = self
            .client
            .combined_status(&self.owner, &self.repo, commit_ref)
            .await?;
        Ok(statuses.into_iter().map(LegacyStatus::from).collect())
    }

    async fn check_runs(&self, commit_ref: &str) -> NotifierResult<Vec<CheckRunEntry>> {
        let runs = self
            .client
            .check_runs(&self.owner, &self.repo, commit_ref)
            .await?;
        Ok(runs.into_iter().map(CheckRunEntry::from).collect())
    }
}
