use std::process::ExitCode;

use anyhow::Context;
use tracing::debug;

use crate::cli::parser::{self, Command};
use crate::config::{self, Config, EnvVars};
use crate::editor;
use crate::github::{IssuePayload, IssuesClient};
use crate::output;

const MISSING_SUBCOMMAND: &str =
    "expected 'repo-issues', 'create-issue' or 'update-issue' subcommands";

/// How an invocation ended, mapped to the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command ran, or its failure was reported to the user.
    Completed,
    /// No subcommand was given.
    MissingSubcommand,
    /// The arguments could not be parsed.
    UsageError,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Completed => ExitCode::SUCCESS,
            Outcome::MissingSubcommand => ExitCode::from(1),
            Outcome::UsageError => ExitCode::from(2),
        }
    }
}

/// Parses `args`, validates them and runs the requested command.
///
/// Everything shown to the user goes to stdout and is copied to
/// `stdout_additional` when given. Operation failures are printed as
/// `ERROR: ...` and still return `Ok`; only a failure to write output is an
/// `Err`.
pub async fn run(
    args: Vec<String>,
    mut stdout_additional: Option<&mut dyn std::io::Write>,
    env: &EnvVars,
) -> anyhow::Result<Outcome> {
    let invocation = match parser::parse_args(&args) {
        Ok(invocation) => invocation,
        Err(err) => {
            output::println(err.to_string().trim_end(), &mut stdout_additional)?;
            return Ok(if err.use_stderr() {
                Outcome::UsageError
            } else {
                Outcome::Completed
            });
        }
    };
    debug!(command = ?invocation.command, "parsed invocation");

    let config = match Config::from_globals(&invocation.globals, env) {
        Ok(config) => config,
        Err(err) => {
            output::println(&err.to_string(), &mut stdout_additional)?;
            return Ok(Outcome::Completed);
        }
    };

    let result = match invocation.command {
        Command::Missing => {
            output::println(MISSING_SUBCOMMAND, &mut stdout_additional)?;
            return Ok(Outcome::MissingSubcommand);
        }
        Command::Unsupported(token) => {
            output::println(
                &format!("Command {token} is not implemented"),
                &mut stdout_additional,
            )?;
            return Ok(Outcome::Completed);
        }
        Command::RepoIssues => repo_issues(&config).await,
        Command::CreateIssue { issue_props } => create_issue(&config, issue_props, env).await,
        Command::UpdateIssue {
            issue_number,
            issue_props,
        } => update_issue(&config, issue_number, issue_props, env).await,
    };

    match result {
        Ok(rendered) => output::println(&rendered, &mut stdout_additional)?,
        Err(err) => output::println(&format!("ERROR: {err:#}"), &mut stdout_additional)?,
    }
    Ok(Outcome::Completed)
}

async fn repo_issues(config: &Config) -> anyhow::Result<String> {
    let client = IssuesClient::new(&config.api_base)?;
    let issues = client.list_issues(&config.repo).await?;
    Ok(output::render_listing(&issues).context("Can not prettify the issues")?)
}

async fn create_issue(
    config: &Config,
    issue_props: Option<String>,
    env: &EnvVars,
) -> anyhow::Result<String> {
    let payload = issue_payload(issue_props, env).await?;
    let client = IssuesClient::new(&config.api_base)?;
    let issue = client
        .create_issue(&config.repo, &config.credentials, &payload)
        .await?;
    Ok(output::render_issue("Created issue:", &issue)
        .context("Can not prettify the created issue")?)
}

async fn update_issue(
    config: &Config,
    issue_number: Option<u64>,
    issue_props: Option<String>,
    env: &EnvVars,
) -> anyhow::Result<String> {
    let number = config::validate_issue_number(issue_number)?;
    let payload = issue_payload(issue_props, env).await?;
    let client = IssuesClient::new(&config.api_base)?;
    let issue = client
        .update_issue(&config.repo, &config.credentials, number, &payload)
        .await?;
    Ok(output::render_issue("Updated issue:", &issue)
        .context("Can not prettify the updated issue")?)
}

/// Takes the literal `--issue-props` JSON when given, otherwise asks the
/// editor for it.
async fn issue_payload(
    issue_props: Option<String>,
    env: &EnvVars,
) -> anyhow::Result<IssuePayload> {
    let content = match issue_props {
        Some(content) => content,
        None => {
            let editor = env.editor().to_string();
            tokio::task::spawn_blocking(move || editor::acquire_content(&editor))
                .await
                .context("Editor task failed")??
        }
    };
    Ok(config::parse_payload(&content)?)
}
