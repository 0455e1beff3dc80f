//! Integration tests for the poll loop against the in-memory fakes.

use std::sync::Arc;
use std::time::Duration;

use checkbridge_core::fakes::{RecordingChatSink, ScriptedStatusSource};
use checkbridge_core::{
    Author, CheckRunEntry, ControllerConfig, InterimPolicy, LegacyStatus, NotifierError,
    PollingController, PullRequestAction, PullRequestContext, RunOutcome, SkipReason, Status,
};

const INTERVAL: Duration = Duration::from_secs(10);

fn context(action: &str) -> PullRequestContext {
    PullRequestContext {
        action: PullRequestAction::parse(action),
        title: "Add retry budget".to_string(),
        html_url: "https://github.com/acme/widgets/pull/7".to_string(),
        number: 7,
        author: Author {
            login: "octocat".to_string(),
            avatar_url: "https://avatars.example/octocat.png".to_string(),
            profile_url: "https://github.com/octocat".to_string(),
        },
        head_sha: "deadbeef".to_string(),
        repo_owner: "acme".to_string(),
        repo_name: "widgets".to_string(),
        labels: vec!["backend".to_string()],
    }
}

fn run(name: &str, status: &str, conclusion: &str) -> CheckRunEntry {
    CheckRunEntry {
        status: status.to_string(),
        conclusion: conclusion.to_string(),
        name: name.to_string(),
        html_url: format!("https://github.com/acme/widgets/runs/{name}"),
        owner_avatar_url: String::new(),
    }
}

fn lint(state: &str) -> LegacyStatus {
    LegacyStatus {
        state: state.to_string(),
        context: "ci/lint".to_string(),
        description: "Lint".to_string(),
        avatar_url: String::new(),
        target_url: String::new(),
    }
}

fn controller(
    source: Arc<ScriptedStatusSource>,
    sink: Arc<RecordingChatSink>,
    interim: InterimPolicy,
) -> PollingController {
    let config = ControllerConfig::new("notifier")
        .with_skip_label("skip-notify")
        .with_poll_interval(INTERVAL)
        .with_interim(interim);
    PollingController::new(source, sink, config)
}

/// Test: no data, then running, then passing
#[tokio::test(start_paused = true)]
async fn test_run_until_success_with_interim_card() {
    let source = Arc::new(
        ScriptedStatusSource::new()
            .then(vec![], vec![])
            .then(vec![lint("pending")], vec![run("build", "in_progress", "")])
            .then(vec![lint("success")], vec![run("build", "completed", "success")]),
    );
    let sink = Arc::new(RecordingChatSink::new());
    let controller = controller(source.clone(), sink.clone(), InterimPolicy::OnStatusChange);

    let started = tokio::time::Instant::now();
    let outcome = controller.run(&context("opened")).await.expect("run failed");

    assert_eq!(
        outcome,
        RunOutcome::Finished {
            status: Status::Success,
            polls: 3,
            messages_sent: 3,
        }
    );
    assert_eq!(
        sink.titles(),
        vec![
            "New pull request is opened",
            "Checks are running",
            "All checks have passed",
        ]
    );
    assert_eq!(source.polls(), 3);
    assert_eq!(started.elapsed(), INTERVAL * 3);
}

/// Test: every card lands in the same thread
#[tokio::test(start_paused = true)]
async fn test_all_messages_share_thread_key() {
    let source = Arc::new(
        ScriptedStatusSource::new()
            .then(vec![], vec![run("build", "queued", "")])
            .then(vec![], vec![run("build", "completed", "failure")]),
    );
    let sink = Arc::new(RecordingChatSink::new());
    controller(source, sink.clone(), InterimPolicy::OnStatusChange)
        .run(&context("synchronize"))
        .await
        .expect("run failed");

    let sent = sink.sent();
    assert_eq!(sent.len(), 3);
    assert!(sent.iter().all(|(key, _)| key.as_str() == "acme/widgets-7"));
}

/// Test: unchanged running cycles are not re-announced
#[tokio::test(start_paused = true)]
async fn test_interim_card_is_debounced() {
    let source = Arc::new(
        ScriptedStatusSource::new()
            .then(vec![], vec![run("build", "in_progress", "")])
            .then(vec![], vec![run("build", "in_progress", "")])
            .then(vec![lint("pending")], vec![run("build", "in_progress", "")])
            .then(vec![lint("failure")], vec![run("build", "in_progress", "")]),
    );
    let sink = Arc::new(RecordingChatSink::new());
    let outcome = controller(source, sink.clone(), InterimPolicy::OnStatusChange)
        .run(&context("reopened"))
        .await
        .expect("run failed");

    assert_eq!(
        outcome,
        RunOutcome::Finished {
            status: Status::Failure,
            polls: 4,
            messages_sent: 3,
        }
    );
    assert_eq!(
        sink.titles(),
        vec![
            "Pull request re-opened",
            "Checks are running",
            "Some checks were not successful",
        ]
    );
}

/// Test: with interim cards disabled only the opening and final cards are sent
#[tokio::test(start_paused = true)]
async fn test_never_policy_sends_opening_and_final_only() {
    let source = Arc::new(
        ScriptedStatusSource::new()
            .then(vec![], vec![run("build", "in_progress", "")])
            .then(vec![], vec![run("build", "completed", "cancelled")]),
    );
    let sink = Arc::new(RecordingChatSink::new());
    controller(source, sink.clone(), InterimPolicy::Never)
        .run(&context("opened"))
        .await
        .expect("run failed");

    assert_eq!(
        sink.titles(),
        vec!["New pull request is opened", "Some checks were not successful"]
    );
}

/// Test: the final card lists the aggregated checks
#[tokio::test(start_paused = true)]
async fn test_final_card_contains_checks_section() {
    let source = Arc::new(ScriptedStatusSource::new().then(
        vec![lint("success")],
        vec![
            run("notifier", "in_progress", ""),
            run("build", "completed", "success"),
        ],
    ));
    let sink = Arc::new(RecordingChatSink::new());
    controller(source, sink.clone(), InterimPolicy::Never)
        .run(&context("opened"))
        .await
        .expect("run failed");

    let sent = sink.sent();
    let (_, opening) = &sent[0];
    assert_eq!(opening.cards[0].sections.len(), 2);

    let (_, last) = sent.last().expect("final card");
    let section = &last.cards[0].sections[2];
    assert_eq!(section.header, "Checks");
    let labels: Vec<_> = section
        .widgets
        .iter()
        .map(|w| w.key_value.as_ref().unwrap().top_label.as_str())
        .collect();
    assert_eq!(labels, vec!["ci/lint", "build"]);
}

/// Test: only our own check run reported, so nothing is sent until real data arrives
#[tokio::test(start_paused = true)]
async fn test_self_check_only_cycles_are_skipped() {
    let source = Arc::new(
        ScriptedStatusSource::new()
            .then(vec![], vec![run("notifier", "completed", "success")])
            .then(vec![], vec![run("notifier", "completed", "success")])
            .then(
                vec![],
                vec![
                    run("notifier", "in_progress", ""),
                    run("build", "completed", "success"),
                ],
            ),
    );
    let sink = Arc::new(RecordingChatSink::new());
    let outcome = controller(source, sink.clone(), InterimPolicy::OnStatusChange)
        .run(&context("opened"))
        .await
        .expect("run failed");

    assert_eq!(
        outcome,
        RunOutcome::Finished {
            status: Status::Success,
            polls: 3,
            messages_sent: 2,
        }
    );
}

/// Test: skip label stops the run before any traffic
#[tokio::test(start_paused = true)]
async fn test_skip_label_prevents_run() {
    let source = Arc::new(ScriptedStatusSource::new());
    let sink = Arc::new(RecordingChatSink::new());
    let mut ctx = context("opened");
    ctx.labels.push("skip-notify".to_string());

    let outcome = controller(source.clone(), sink.clone(), InterimPolicy::OnStatusChange)
        .run(&ctx)
        .await
        .expect("run failed");

    assert_eq!(
        outcome,
        RunOutcome::Skipped(SkipReason::Label("skip-notify".to_string()))
    );
    assert!(sink.sent().is_empty());
    assert_eq!(source.polls(), 0);
}

/// Test: actions outside opened/reopened/synchronize are a silent no-op
#[tokio::test(start_paused = true)]
async fn test_unsupported_action_is_noop() {
    let source = Arc::new(ScriptedStatusSource::new());
    let sink = Arc::new(RecordingChatSink::new());

    let outcome = controller(source.clone(), sink.clone(), InterimPolicy::OnStatusChange)
        .run(&context("closed"))
        .await
        .expect("run failed");

    assert_eq!(
        outcome,
        RunOutcome::Skipped(SkipReason::UnsupportedAction("closed".to_string()))
    );
    assert!(sink.sent().is_empty());
    assert_eq!(source.polls(), 0);
}

/// Test: a source failure ends the run instead of being retried
#[tokio::test(start_paused = true)]
async fn test_source_failure_is_fatal() {
    let source = Arc::new(
        ScriptedStatusSource::new()
            .then(vec![], vec![run("build", "in_progress", "")])
            .then_fail("upstream unavailable")
            .then(vec![], vec![run("build", "completed", "success")]),
    );
    let sink = Arc::new(RecordingChatSink::new());

    let err = controller(source.clone(), sink.clone(), InterimPolicy::Never)
        .run(&context("opened"))
        .await
        .expect_err("run should fail");

    assert!(err.is_transport());
    assert!(err.to_string().contains("upstream unavailable"));
    assert_eq!(source.polls(), 2);
    assert_eq!(sink.titles(), vec!["New pull request is opened"]);
}

/// Test: a chat failure on the opening card aborts before polling
#[tokio::test(start_paused = true)]
async fn test_sink_failure_is_fatal() {
    let source = Arc::new(ScriptedStatusSource::new());
    let sink = Arc::new(RecordingChatSink::failing_after(0));

    let err = controller(source.clone(), sink, InterimPolicy::OnStatusChange)
        .run(&context("opened"))
        .await
        .expect_err("run should fail");

    assert!(matches!(err, NotifierError::Transport { status: 500, .. }));
    assert_eq!(source.polls(), 0);
}

/// Test: one-off poll returns a freshly built aggregate
#[tokio::test]
async fn test_poll_once_rebuilds_checks() {
    let source = Arc::new(
        ScriptedStatusSource::new()
            .then(vec![lint("pending")], vec![run("build", "in_progress", "")])
            .then(vec![lint("success")], vec![]),
    );
    let sink = Arc::new(RecordingChatSink::new());
    let controller = controller(source, sink, InterimPolicy::Never);

    let first = controller.poll_once("deadbeef").await.expect("poll failed");
    assert_eq!(first.len(), 2);
    assert_eq!(first.overall_status(), Some(Status::InProgress));

    let second = controller.poll_once("deadbeef").await.expect("poll failed");
    assert_eq!(second.len(), 1);
    assert_eq!(second.overall_status(), Some(Status::Success));
}
