//! checkbridge - post CI check progress of a pull request into team chat
//!
//! Runs as a step of a `pull_request` workflow. Sends an opening card for the
//! pull request, polls the head commit's statuses and check runs, and posts
//! the outcome into the same chat thread once every check has settled.
//!
//! Every setting comes from a flag or its environment variable; see
//! `checkbridge --help`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use checkbridge_chat::{WebhookClient, WebhookConfig};
use checkbridge_core::telemetry::init_tracing;
use checkbridge_core::{
    ControllerConfig, InterimPolicy, PollingController, PullRequestContext, RunOutcome,
};
use checkbridge_github::{load_event, GitHubClient, GitHubConfig, RepoStatusSource};
use clap::{Parser, ValueEnum};
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(name = "checkbridge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Notify a chat thread about the CI checks of a pull request", long_about = None)]
struct Cli {
    /// GitHub token used to read statuses and check runs
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: String,

    /// Path of the pull_request event payload
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: PathBuf,

    /// Name of this tool's own check run, excluded from the aggregate
    #[arg(long, env = "SELF_ACTION_NAME")]
    self_check_name: String,

    /// Chat incoming-webhook URL
    #[arg(long, env = "CHAT_WEBHOOK_URL", hide_env_values = true)]
    webhook_url: String,

    /// Pull requests carrying this label are ignored
    #[arg(long, env = "SKIP_NOTIFY_LABEL")]
    skip_label: Option<String>,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    github_api_url: String,

    /// Seconds between poll cycles
    #[arg(
        long,
        env = "POLL_INTERVAL_SECS",
        default_value_t = 15,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    poll_interval_secs: u64,

    /// When to post cards while checks are still running
    #[arg(long, env = "INTERIM_NOTIFICATIONS", value_enum, default_value_t = InterimArg::OnChange)]
    interim: InterimArg,

    /// Give up after this many seconds (0 waits forever)
    #[arg(long, env = "NOTIFY_TIMEOUT_SECS", default_value_t = 0)]
    timeout_secs: u64,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InterimArg {
    /// Only the opening and final cards
    Never,
    /// A card when running checks appear or the overall status changes
    OnChange,
}

impl From<InterimArg> for InterimPolicy {
    fn from(arg: InterimArg) -> Self {
        match arg {
            InterimArg::Never => InterimPolicy::Never,
            InterimArg::OnChange => InterimPolicy::OnStatusChange,
        }
    }
}

impl Cli {
    fn controller_config(&self) -> ControllerConfig {
        let mut config = ControllerConfig::new(self.self_check_name.as_str())
            .with_poll_interval(Duration::from_secs(self.poll_interval_secs))
            .with_interim(self.interim.into());
        if let Some(label) = self.skip_label.as_deref().filter(|l| !l.is_empty()) {
            config = config.with_skip_label(label);
        }
        config
    }

    fn github_config(&self) -> GitHubConfig {
        GitHubConfig::new(&self.github_api_url).with_token(&self.github_token)
    }

    fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

fn build_controller(cli: &Cli, ctx: &PullRequestContext) -> Result<PollingController> {
    let github = GitHubClient::new(cli.github_config()).context("Failed to set up GitHub client")?;
    let source = RepoStatusSource::new(github, &ctx.repo_owner, &ctx.repo_name);
    let sink = WebhookClient::new(WebhookConfig::new(&cli.webhook_url))
        .context("Failed to set up chat webhook client")?;

    Ok(PollingController::new(
        Arc::new(source),
        Arc::new(sink),
        cli.controller_config(),
    ))
}

async fn run_with_timeout(
    controller: &PollingController,
    ctx: &PullRequestContext,
    timeout: Option<Duration>,
) -> Result<RunOutcome> {
    let run = controller.run(ctx);
    let outcome = match timeout {
        Some(limit) => tokio::time::timeout(limit, run).await.map_err(|_| {
            anyhow::anyhow!("Checks did not settle within {} seconds", limit.as_secs())
        })?,
        None => run.await,
    };
    outcome.context("Notification run failed")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_tracing(cli.json, level);

    let ctx = load_event(&cli.event_path).context("Failed to load pull request event")?;
    info!(
        pull_request = ctx.number,
        repo = %format!("{}/{}", ctx.repo_owner, ctx.repo_name),
        action = %ctx.action.as_str(),
        "Loaded pull request event"
    );

    let controller = build_controller(&cli, &ctx)?;
    match run_with_timeout(&controller, &ctx, cli.timeout()).await? {
        RunOutcome::Skipped(reason) => info!(%reason, "Nothing to notify"),
        RunOutcome::Finished {
            status,
            polls,
            messages_sent,
        } => info!(%status, polls, messages_sent, "Checks settled"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkbridge_core::fakes::{RecordingChatSink, ScriptedStatusSource};
    use checkbridge_core::{Author, CheckRunEntry, PullRequestAction};

    const REQUIRED: &[&str] = &[
        "checkbridge",
        "--github-token",
        "t0k",
        "--event-path",
        "/tmp/event.json",
        "--self-check-name",
        "notifier",
        "--webhook-url",
        "https://chat.example/hook?key=k",
    ];

    fn parse(extra: &[&str]) -> Cli {
        let args: Vec<&str> = REQUIRED.iter().chain(extra.iter()).copied().collect();
        Cli::try_parse_from(args).expect("parse failed")
    }

    fn context() -> PullRequestContext {
        PullRequestContext {
            action: PullRequestAction::Opened,
            title: "Add retry budget".to_string(),
            html_url: "https://github.com/acme/widgets/pull/7".to_string(),
            number: 7,
            author: Author::default(),
            head_sha: "deadbeef".to_string(),
            repo_owner: "acme".to_string(),
            repo_name: "widgets".to_string(),
            labels: vec![],
        }
    }

    #[test]
    fn test_cli_flags_map_to_controller_config() {
        let cli = parse(&[
            "--skip-label",
            "no-notify",
            "--poll-interval-secs",
            "5",
            "--interim",
            "never",
        ]);
        let config = cli.controller_config();
        assert_eq!(config.self_check_name, "notifier");
        assert_eq!(config.skip_label.as_deref(), Some("no-notify"));
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.interim, InterimPolicy::Never);
    }

    #[test]
    fn test_empty_skip_label_is_ignored() {
        let cli = parse(&["--skip-label", ""]);
        assert!(cli.controller_config().skip_label.is_none());
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let args: Vec<&str> = REQUIRED
            .iter()
            .copied()
            .chain(["--poll-interval-secs", "0"])
            .collect();
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_timeout_zero_means_unbounded() {
        assert_eq!(parse(&["--timeout-secs", "0"]).timeout(), None);
        assert_eq!(
            parse(&["--timeout-secs", "90"]).timeout(),
            Some(Duration::from_secs(90))
        );
    }

    #[test]
    fn test_github_config_carries_token_and_url() {
        let cli = parse(&["--github-api-url", "https://ghe.example/api/v3/"]);
        let config = cli.github_config();
        assert_eq!(config.api_url, "https://ghe.example/api/v3");
        assert_eq!(config.token.as_deref(), Some("t0k"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_stops_unsettled_run() {
        let source = Arc::new(ScriptedStatusSource::new().then(
            vec![],
            vec![CheckRunEntry {
                name: "build".to_string(),
                status: "in_progress".to_string(),
                ..Default::default()
            }],
        ));
        let sink = Arc::new(RecordingChatSink::new());
        let controller = PollingController::new(
            source,
            sink.clone(),
            ControllerConfig::new("notifier").with_poll_interval(Duration::from_secs(10)),
        );

        let err = run_with_timeout(&controller, &context(), Some(Duration::from_secs(60)))
            .await
            .expect_err("run should time out");

        assert!(err.to_string().contains("did not settle"));
        assert_eq!(
            sink.titles(),
            vec!["New pull request is opened", "Checks are running"]
        );
    }
}
