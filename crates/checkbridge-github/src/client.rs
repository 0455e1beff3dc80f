//! GitHub REST client
//!
//! Reads the two status sources of a commit: the combined legacy commit
//! status and the check runs.

use checkbridge_core::{NotifierError, NotifierResult};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::types::{CheckRun, CheckRunList, CombinedStatus, RepoStatus};

const SERVICE: &str = "github";
const PER_PAGE: &str = "100";

/// GitHub API configuration
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// API base URL, e.g. `https://api.github.com`
    pub api_url: String,
    /// Token sent as `Authorization: token <t>`
    pub token: Option<String>,
    pub user_agent: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        GitHubConfig {
            api_url: "https://api.github.com".to_string(),
            token: None,
            user_agent: format!("checkbridge/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl GitHubConfig {
    /// Create config for a specific API endpoint
    pub fn new(api_url: &str) -> Self {
        GitHubConfig {
            api_url: api_url.trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    /// Set authentication token
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }
}

/// Map a reqwest failure onto the notifier error taxonomy.
fn http_error(err: reqwest::Error) -> NotifierError {
    if err.is_decode() {
        NotifierError::Decode(err.to_string())
    } else {
        NotifierError::Network(err.to_string())
    }
}

/// GitHub client for status and check-run reads
#[derive(Debug, Clone)]
pub struct GitHubClient {
    config: GitHubConfig,
    http_client: reqwest::Client,
}

impl GitHubClient {
    /// Create a new GitHub client
    pub fn new(config: GitHubConfig) -> NotifierResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| NotifierError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(GitHubClient {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &GitHubConfig {
        &self.config
    }

    /// Latest legacy status per context for `git_ref`.
    pub async fn combined_status(
        &self,
        owner: &str,
        repo: &str,
        git_ref: &str,
    ) -> NotifierResult<Vec<RepoStatus>> {
        let path = format!("repos/{}/{}/commits/{}/status", owner, repo, git_ref);
        let combined: CombinedStatus = self.get_json(&path).await?;

        if combined.total_count as usize > combined.statuses.len() {
            warn!(
                total = combined.total_count,
                returned = combined.statuses.len(),
                "Combined status truncated to first page"
            );
        }
        debug!(state = %combined.state, count = combined.statuses.len(), "Fetched combined status");
        Ok(combined.statuses)
    }

    /// Check runs reported for `git_ref`.
    pub async fn check_runs(
        &self,
        owner: &str,
        repo: &str,
        git_ref: &str,
    ) -> NotifierResult<Vec<CheckRun>> {
        let path = format!("repos/{}/{}/commits/{}/check-runs", owner, repo, git_ref);
        let list: CheckRunList = self.get_json(&path).await?;

        if list.total_count as usize > list.check_runs.len() {
            warn!(
                total = list.total_count,
                returned = list.check_runs.len(),
                "Check runs truncated to first page"
            );
        }
        debug!(count = list.check_runs.len(), "Fetched check runs");
        Ok(list.check_runs)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> NotifierResult<T> {
        let url = format!("{}/{}", self.config.api_url, path);

        let mut request = self
            .http_client
            .get(&url)
            .header(ACCEPT, "application/vnd.github+json")
            .query(&[("per_page", PER_PAGE)]);
        if let Some(token) = &self.config.token {
            request = request.header(AUTHORIZATION, format!("token {}", token));
        }

        let response = request.send().await.map_err(http_error)?;
        let status = response.status();
        let body = response.text().await.map_err(http_error)?;

        if !status.is_success() {
            return Err(NotifierError::Transport {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}
