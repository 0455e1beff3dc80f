//! checkbridge-github: GitHub as the CI-status source
//!
//! - `client`: REST client for combined commit statuses and check runs
//! - `source`: `StatusSource` implementation bound to one repository
//! - `event`: loader for the pull-request event payload written by Actions
//! - `types`: API wire types

pub mod client;
pub mod event;
pub mod source;
pub mod types;

pub use client::{GitHubClient, GitHubConfig};
pub use event::{load_event, parse_event};
pub use source::RepoStatusSource;
