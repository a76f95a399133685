pub mod client;
pub mod error;
pub mod issues;

pub use client::{IssueOperation, IssuesClient, RepoRef};
pub use error::GitHubError;
pub use issues::{Issue, IssuePayload, IssueState};
