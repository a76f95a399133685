use secrecy::SecretString;
use thiserror::Error;

use crate::auth::Credentials;
use crate::cli::parser::GlobalArgs;
use crate::editor::DEFAULT_EDITOR;
use crate::github::{IssuePayload, RepoRef};
use crate::github::client::DEFAULT_API_BASE;

const EDITOR: &str = "EDITOR";
const API_URL: &str = "GHISSUES_API_URL";

/// Validation failures detected before any network call.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{}", format_missing(.0))]
    MissingArguments(Vec<&'static str>),

    #[error("Add a positive '-issue-number' argument")]
    MissingIssueNumber,

    #[error("Issue content is empty")]
    EmptyPayload,

    #[error("Issue content is not a JSON object: {0}")]
    InvalidPayload(String),
}

fn format_missing(names: &[&'static str]) -> String {
    names
        .iter()
        .map(|name| format!("The program requires an argument -{name}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Snapshot of the environment variables this tool reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvVars {
    /// Editor command used to compose issue content.
    pub editor: Option<String>,
    /// Overrides the GitHub API base url.
    pub api_url: Option<String>,
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

impl EnvVars {
    pub fn load() -> Self {
        Self {
            editor: non_empty_var(EDITOR),
            api_url: non_empty_var(API_URL),
        }
    }

    pub fn editor(&self) -> &str {
        self.editor.as_deref().unwrap_or(DEFAULT_EDITOR)
    }

    pub fn api_base(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_BASE)
    }
}

/// Validated request context shared by every operation of one invocation.
#[derive(Debug)]
pub struct Config {
    pub api_base: String,
    pub repo: RepoRef,
    pub credentials: Credentials,
}

impl Config {
    /// Builds the context from parsed global flags.
    ///
    /// Every missing or empty flag is reported at once, in the order
    /// user, password, owner, repo.
    pub fn from_globals(globals: &GlobalArgs, env: &EnvVars) -> Result<Self, ConfigError> {
        let mut missing = Vec::new();
        let mut require = |name: &'static str, value: &Option<String>| match value.as_deref() {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => {
                missing.push(name);
                String::new()
            }
        };
        let user = require("user", &globals.user);
        let password = require("password", &globals.password);
        let owner = require("owner", &globals.owner);
        let repo = require("repo", &globals.repo);
        if !missing.is_empty() {
            return Err(ConfigError::MissingArguments(missing));
        }

        Ok(Self {
            api_base: env.api_base().to_string(),
            repo: RepoRef::new(owner, repo),
            credentials: Credentials::new(user, SecretString::from(password)),
        })
    }
}

/// An issue number is valid when present and non-zero.
pub fn validate_issue_number(number: Option<u64>) -> Result<u64, ConfigError> {
    match number {
        Some(number) if number > 0 => Ok(number),
        _ => Err(ConfigError::MissingIssueNumber),
    }
}

/// Parses user-supplied issue content into the request payload.
///
/// Whitespace-only content is rejected as empty; anything that is not a JSON
/// object is rejected as invalid. Field values are not interpreted.
pub fn parse_payload(content: &str) -> Result<IssuePayload, ConfigError> {
    if content.trim().is_empty() {
        return Err(ConfigError::EmptyPayload);
    }

    match serde_json::from_str(content) {
        Ok(serde_json::Value::Object(payload)) => Ok(payload),
        Ok(_) => Err(ConfigError::InvalidPayload(
            "expected an object like {\"title\": \"...\"}".to_string(),
        )),
        Err(e) => Err(ConfigError::InvalidPayload(e.to_string())),
    }
}
