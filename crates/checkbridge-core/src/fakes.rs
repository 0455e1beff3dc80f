//! In-memory fakes for the source and sink traits (testing only)
//!
//! `ScriptedStatusSource` replays scripted poll cycles and
//! `RecordingChatSink` records every message it is handed.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::card::Message;
use crate::context::ThreadKey;
use crate::error::{NotifierError, NotifierResult};
use crate::status::{CheckRunEntry, LegacyStatus};
use crate::traits::{ChatSink, StatusSource};

// ---------------------------------------------------------------------------
// ScriptedStatusSource
// ---------------------------------------------------------------------------

type Step<T> = Result<Vec<T>, String>;

#[derive(Debug)]
struct Script<T> {
    steps: VecDeque<Step<T>>,
    last: Step<T>,
    calls: usize,
}

impl<T> Default for Script<T> {
    fn default() -> Self {
        Self {
            steps: VecDeque::new(),
            last: Ok(Vec::new()),
            calls: 0,
        }
    }
}

impl<T: Clone> Script<T> {
    /// Next scripted step; the final step repeats once the script runs out.
    fn advance(&mut self) -> Step<T> {
        self.calls += 1;
        if let Some(step) = self.steps.pop_front() {
            self.last = step;
        }
        self.last.clone()
    }
}

fn scripted_failure(body: String) -> NotifierError {
    NotifierError::Transport {
        service: "scripted source",
        status: 503,
        body,
    }
}

/// Status source that answers each poll cycle from a script.
#[derive(Debug, Default)]
pub struct ScriptedStatusSource {
    legacy: Mutex<Script<LegacyStatus>>,
    check_runs: Mutex<Script<CheckRunEntry>>,
}

impl ScriptedStatusSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one poll cycle answering with `legacy` and `check_runs`.
    pub fn then(self, legacy: Vec<LegacyStatus>, check_runs: Vec<CheckRunEntry>) -> Self {
        self.legacy.lock().unwrap().steps.push_back(Ok(legacy));
        self.check_runs.lock().unwrap().steps.push_back(Ok(check_runs));
        self
    }

    /// Append one poll cycle whose check-run fetch fails.
    pub fn then_fail(self, body: &str) -> Self {
        self.legacy.lock().unwrap().steps.push_back(Ok(Vec::new()));
        self.check_runs
            .lock()
            .unwrap()
            .steps
            .push_back(Err(body.to_string()));
        self
    }

    /// Number of check-run fetches served, one per poll cycle.
    pub fn polls(&self) -> usize {
        self.check_runs.lock().unwrap().calls
    }
}

#[async_trait]
impl StatusSource for ScriptedStatusSource {
    async fn legacy_statuses(&self, _commit_ref: &str) -> NotifierResult<Vec<LegacyStatus>> {
        self.legacy.lock().unwrap().advance().map_err(scripted_failure)
    }

    async fn check_runs(&self, _commit_ref: &str) -> NotifierResult<Vec<CheckRunEntry>> {
        self.check_runs.lock().unwrap().advance().map_err(scripted_failure)
    }
}

// ---------------------------------------------------------------------------
// RecordingChatSink
// ---------------------------------------------------------------------------

/// Chat sink that keeps every delivered message in memory.
#[derive(Debug, Default)]
pub struct RecordingChatSink {
    sent: Mutex<Vec<(ThreadKey, Message)>>,
    fail_after: Option<usize>,
}

impl RecordingChatSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `count` messages, then fail every later send.
    pub fn failing_after(count: usize) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_after: Some(count),
        }
    }

    pub fn sent(&self) -> Vec<(ThreadKey, Message)> {
        self.sent.lock().unwrap().clone()
    }

    /// Header titles of the delivered cards, in send order.
    pub fn titles(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter_map(|(_, message)| message.cards.first())
            .filter_map(|card| card.header.as_ref())
            .map(|header| header.title.clone())
            .collect()
    }
}

#[async_trait]
impl ChatSink for RecordingChatSink {
    async fn send(&self, thread_key: &ThreadKey, message: &Message) -> NotifierResult<Message> {
        let mut sent = self.sent.lock().unwrap();
        if self.fail_after.is_some_and(|limit| sent.len() >= limit) {
            return Err(NotifierError::Transport {
                service: "recording sink",
                status: 500,
                body: "sink unavailable".to_string(),
            });
        }
        sent.push((thread_key.clone(), message.clone()));

        let mut ack = message.clone();
        ack.name = format!("messages/{}", sent.len());
        Ok(ack)
    }
}
