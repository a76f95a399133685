//! Request builder and response interpreter for the three issue endpoints.

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::error::{GitHubError, Result};
use super::issues::{Issue, IssuePayload};
use crate::auth::Credentials;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const ACCEPT_GITHUB_V3: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = "ghissues-cli";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `owner/repo` pair naming a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// The issue endpoints this client speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueOperation {
    List,
    Create,
    Update { number: u64 },
}

impl IssueOperation {
    pub fn method(&self) -> Method {
        match self {
            IssueOperation::List => Method::GET,
            IssueOperation::Create => Method::POST,
            IssueOperation::Update { .. } => Method::PATCH,
        }
    }

    pub fn path(&self, repo: &RepoRef) -> String {
        match self {
            IssueOperation::List | IssueOperation::Create => {
                format!("/repos/{}/{}/issues", repo.owner, repo.name)
            }
            IssueOperation::Update { number } => {
                format!("/repos/{}/{}/issues/{number}", repo.owner, repo.name)
            }
        }
    }

    /// The only status treated as success for this operation.
    pub fn expected_status(&self) -> StatusCode {
        match self {
            IssueOperation::List | IssueOperation::Update { .. } => StatusCode::OK,
            IssueOperation::Create => StatusCode::CREATED,
        }
    }
}

/// Thin client over `reqwest` for listing, creating and updating issues.
#[derive(Debug, Clone)]
pub struct IssuesClient {
    http: reqwest::Client,
    api_base: String,
}

impl IssuesClient {
    pub fn new(api_base: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Ok(Self { http, api_base })
    }

    #[cfg(test)]
    fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Builds the request for `operation` without sending it.
    ///
    /// Credentials are attached as basic auth when given; the payload, when
    /// given, is sent as the JSON body as-is.
    pub fn request(
        &self,
        repo: &RepoRef,
        operation: IssueOperation,
        credentials: Option<&Credentials>,
        payload: Option<&IssuePayload>,
    ) -> RequestBuilder {
        let url = format!("{}{}", self.api_base, operation.path(repo));
        let mut builder = self
            .http
            .request(operation.method(), url)
            .header(ACCEPT, ACCEPT_GITHUB_V3);
        if let Some(credentials) = credentials {
            builder = builder.basic_auth(credentials.user(), Some(credentials.password()));
        }
        if let Some(payload) = payload {
            builder = builder.json(payload);
        }
        builder
    }

    #[instrument(skip_all, fields(repo = %repo))]
    pub async fn list_issues(&self, repo: &RepoRef) -> Result<Vec<Issue>> {
        let operation = IssueOperation::List;
        let response = self.request(repo, operation, None, None).send().await?;
        interpret_response(response, operation.expected_status()).await
    }

    #[instrument(skip_all, fields(repo = %repo))]
    pub async fn create_issue(
        &self,
        repo: &RepoRef,
        credentials: &Credentials,
        payload: &IssuePayload,
    ) -> Result<Issue> {
        let operation = IssueOperation::Create;
        let response = self
            .request(repo, operation, Some(credentials), Some(payload))
            .send()
            .await?;
        interpret_response(response, operation.expected_status()).await
    }

    #[instrument(skip_all, fields(repo = %repo))]
    pub async fn update_issue(
        &self,
        repo: &RepoRef,
        credentials: &Credentials,
        number: u64,
        payload: &IssuePayload,
    ) -> Result<Issue> {
        let operation = IssueOperation::Update { number };
        let response = self
            .request(repo, operation, Some(credentials), Some(payload))
            .send()
            .await?;
        interpret_response(response, operation.expected_status()).await
    }
}

/// Checks the status against `expected` and decodes the body on a match.
///
/// A mismatching status short-circuits with [`GitHubError::Http`] before the
/// body is read.
pub async fn interpret_response<T: DeserializeOwned>(
    response: Response,
    expected: StatusCode,
) -> Result<T> {
    let status = response.status();
    debug!(%status, url = %response.url(), "received response");
    if status != expected {
        debug!(%status, %expected, "unexpected status");
        return Err(GitHubError::Http(status));
    }
    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}
