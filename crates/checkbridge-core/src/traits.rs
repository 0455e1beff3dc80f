//! Seams to the outside world
//!
//! - `StatusSource`: reads legacy commit statuses and check runs for a commit
//! - `ChatSink`: delivers a rendered message into a chat thread
//!
//! Both are async and backend-agnostic. In-memory fakes live in the
//! `fakes` module.

use async_trait::async_trait;

use crate::card::Message;
use crate::context::ThreadKey;
use crate::error::NotifierResult;
use crate::status::{CheckRunEntry, LegacyStatus};

/// CI-status provider bound to one repository.
///
/// Non-2xx answers and malformed bodies surface as errors; callers treat
/// them as fatal.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Legacy commit statuses for `commit_ref`.
    async fn legacy_statuses(&self, commit_ref: &str) -> NotifierResult<Vec<LegacyStatus>>;

    /// Check runs for `commit_ref`.
    async fn check_runs(&self, commit_ref: &str) -> NotifierResult<Vec<CheckRunEntry>>;
}

/// Chat delivery endpoint.
#[async_trait]
pub trait ChatSink: Send + Sync {
    /// Post `message` into the thread identified by `thread_key`.
    ///
    /// Returns the message as acknowledged by the chat service.
    async fn send(&self, thread_key: &ThreadKey, message: &Message) -> NotifierResult<Message>;
}
