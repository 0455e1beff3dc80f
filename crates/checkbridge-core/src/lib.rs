//! checkbridge-core: CI status aggregation and chat notification engine
//!
//! Watches the combined checks of one pull-request head commit and posts
//! chat cards into a single conversation thread until the checks settle.
//!
//! ## Layers
//!
//! - `status` / `aggregate`: normalize legacy commit statuses and check runs
//!   into one tri-state taxonomy and compute the overall status
//! - `card` / `render`: chat card model and deterministic card rendering
//! - `controller`: the bounded poll loop driving fetch, aggregate, render, send
//! - `traits`: the seams to the CI-status source and the chat sink
//! - `fakes`: in-memory implementations of those seams for tests

pub mod aggregate;
pub mod card;
pub mod context;
pub mod controller;
pub mod error;
pub mod fakes;
pub mod obs;
pub mod render;
pub mod status;
pub mod telemetry;
pub mod traits;

pub use aggregate::{normalize, Checks};
pub use card::Message;
pub use context::{Author, PullRequestAction, PullRequestContext, ThreadKey};
pub use controller::{
    ControllerConfig, InterimPolicy, PollDecision, PollingController, RunOutcome, SkipReason,
};
pub use error::{NotifierError, NotifierResult};
pub use render::render_message;
pub use status::{CheckRunEntry, LegacyStatus, Status, StatusRecord};
pub use traits::{ChatSink, StatusSource};
