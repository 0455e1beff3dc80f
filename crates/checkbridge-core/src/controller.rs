//! Poll loop: fetch, aggregate, decide, render, send, sleep.
//!
//! A run moves through `Start -> AwaitingAggregate -> ... -> Done`. The start
//! step sends the opening card; each poll cycle rebuilds `Checks` from
//! scratch and either waits, sends an interim card, or sends the final card
//! and stops. Any error from the source or the sink ends the run; the loop
//! only repeats because checks are still running.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, Instrument};

use crate::aggregate::{normalize, Checks};
use crate::context::{PullRequestContext, ThreadKey};
use crate::error::NotifierResult;
use crate::obs;
use crate::render::render_message;
use crate::status::Status;
use crate::traits::{ChatSink, StatusSource};

/// When to post cards while checks are still running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterimPolicy {
    /// Only the opening and final cards.
    Never,
    /// One card when running checks first show up, again only if the
    /// overall status changes.
    #[default]
    OnStatusChange,
}

/// Controller settings, fixed for the whole run.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Name of this tool's own check run, excluded from aggregation.
    pub self_check_name: String,

    /// Pull requests carrying this label are not watched at all.
    pub skip_label: Option<String>,

    /// Sleep between poll cycles.
    pub poll_interval: Duration,

    pub interim: InterimPolicy,
}

impl ControllerConfig {
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15);

    pub fn new(self_check_name: impl Into<String>) -> Self {
        Self {
            self_check_name: self_check_name.into(),
            skip_label: None,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            interim: InterimPolicy::default(),
        }
    }

    pub fn with_skip_label(mut self, label: impl Into<String>) -> Self {
        self.skip_label = Some(label.into());
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_interim(mut self, policy: InterimPolicy) -> Self {
        self.interim = policy;
        self
    }
}

/// Why a run ended before sending anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The pull request carries the configured skip label.
    Label(String),
    /// The event action is not one of opened/reopened/synchronize.
    UnsupportedAction(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Label(label) => write!(f, "pull request has skip label '{}'", label),
            SkipReason::UnsupportedAction(action) => {
                write!(f, "pull request action '{}' is not watched", action)
            }
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Skipped(SkipReason),
    Finished {
        /// Terminal overall status (`Success` or `Failure`).
        status: Status,
        polls: u64,
        messages_sent: u64,
    },
}

/// What one poll cycle should do with its aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollDecision {
    /// Nothing reported yet; sleep and retry.
    NoData,
    /// Still running and nothing new to say; sleep and retry.
    Wait,
    /// Send an interim card, then keep polling.
    Interim(Status),
    /// Send the final card and stop.
    Final(Status),
}

impl PollDecision {
    /// `last_interim` is the overall status of the last interim card sent.
    pub fn decide(
        overall: Option<Status>,
        last_interim: Option<Status>,
        policy: InterimPolicy,
    ) -> Self {
        match overall {
            None => PollDecision::NoData,
            Some(status) if status.is_terminal() => PollDecision::Final(status),
            Some(status) => match policy {
                InterimPolicy::Never => PollDecision::Wait,
                InterimPolicy::OnStatusChange if last_interim == Some(status) => PollDecision::Wait,
                InterimPolicy::OnStatusChange => PollDecision::Interim(status),
            },
        }
    }
}

/// Card title for an aggregate.
pub fn checks_title(status: Status) -> &'static str {
    match status {
        Status::Failure => "Some checks were not successful",
        Status::Success => "All checks have passed",
        Status::InProgress => "Checks are running",
    }
}

/// Drives one run for one pull request.
pub struct PollingController {
    source: Arc<dyn StatusSource>,
    sink: Arc<dyn ChatSink>,
    config: ControllerConfig,
}

impl PollingController {
    pub fn new(
        source: Arc<dyn StatusSource>,
        sink: Arc<dyn ChatSink>,
        config: ControllerConfig,
    ) -> Self {
        Self {
            source,
            sink,
            config,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Run until the checks settle or an error ends the run.
    ///
    /// There is no upper bound on poll cycles; wrap the call in a timeout
    /// to cap wall-clock time.
    pub async fn run(&self, ctx: &PullRequestContext) -> NotifierResult<RunOutcome> {
        let opening_title = match self.admit(ctx) {
            Ok(title) => title,
            Err(reason) => {
                obs::emit_run_skipped(&reason);
                return Ok(RunOutcome::Skipped(reason));
            }
        };

        let thread_key = ctx.thread_key();
        let span = obs::run_span(thread_key.as_str());
        self.watch(ctx, &thread_key, opening_title)
            .instrument(span)
            .await
    }

    fn admit(&self, ctx: &PullRequestContext) -> Result<&'static str, SkipReason> {
        if let Some(label) = self.config.skip_label.as_deref() {
            if ctx.has_label(label) {
                return Err(SkipReason::Label(label.to_string()));
            }
        }
        ctx.action
            .opening_title()
            .ok_or_else(|| SkipReason::UnsupportedAction(ctx.action.as_str().to_string()))
    }

    async fn watch(
        &self,
        ctx: &PullRequestContext,
        thread_key: &ThreadKey,
        opening_title: &str,
    ) -> NotifierResult<RunOutcome> {
        obs::emit_run_started(thread_key.as_str(), ctx.action.as_str(), &ctx.head_sha);

        self.deliver(ctx, thread_key, opening_title, Status::InProgress, None)
            .await?;
        let mut messages_sent = 1u64;
        let mut polls = 0u64;
        let mut last_interim = None;

        loop {
            tokio::time::sleep(self.config.poll_interval).await;
            polls += 1;

            let checks = self.poll_once(&ctx.head_sha).await?;
            let overall = checks.overall_status();
            if let Some(status) = overall {
                obs::emit_poll_completed(polls, status.label(), checks.len());
            }

            match PollDecision::decide(overall, last_interim, self.config.interim) {
                PollDecision::NoData => obs::emit_poll_no_data(polls),
                PollDecision::Wait => {}
                PollDecision::Interim(status) => {
                    self.deliver(ctx, thread_key, checks_title(status), status, Some(&checks))
                        .await?;
                    messages_sent += 1;
                    last_interim = Some(status);
                }
                PollDecision::Final(status) => {
                    self.deliver(ctx, thread_key, checks_title(status), status, Some(&checks))
                        .await?;
                    messages_sent += 1;
                    obs::emit_run_finished(thread_key.as_str(), status.label(), polls, messages_sent);
                    return Ok(RunOutcome::Finished {
                        status,
                        polls,
                        messages_sent,
                    });
                }
            }
        }
    }

    /// Fetch both sources for `commit_ref` and aggregate them.
    ///
    /// Both fetches run concurrently and must both succeed before anything
    /// is normalized.
    pub async fn poll_once(&self, commit_ref: &str) -> NotifierResult<Checks> {
        let (legacy, check_runs) = futures::try_join!(
            self.source.legacy_statuses(commit_ref),
            self.source.check_runs(commit_ref),
        )?;
        Ok(normalize(&legacy, &check_runs, &self.config.self_check_name))
    }

    async fn deliver(
        &self,
        ctx: &PullRequestContext,
        thread_key: &ThreadKey,
        title: &str,
        status: Status,
        checks: Option<&Checks>,
    ) -> NotifierResult<()> {
        let message = render_message(ctx, title, status, checks);
        let ack = self.sink.send(thread_key, &message).await?;
        if !ack.name.is_empty() {
            info!(message_name = %ack.name, "Chat service accepted message");
        }
        obs::emit_notification_sent(thread_key.as_str(), title);
        Ok(())
    }
}
