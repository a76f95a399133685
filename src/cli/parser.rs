use clap::{Args, Parser, Subcommand};

/// Long flags that also accept the single-dash spelling (`-user alice`).
/// All of them take a value.
const VALUE_FLAGS: &[&str] = &[
    "user",
    "password",
    "owner",
    "repo",
    "issue-number",
    "issue-props",
];

#[derive(Parser)]
#[command(
    name = "ghissues",
    version,
    about = "List, create and update GitHub issues"
)]
struct Cli {
    #[command(flatten)]
    globals: GlobalArgs,

    #[command(subcommand)]
    command: Option<Subcommands>,
}

/// Flags required by every subcommand.
#[derive(Args, Clone, Default, PartialEq)]
pub struct GlobalArgs {
    /// GitHub user name
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// GitHub password or personal access token
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub password: Option<String>,

    /// Owner of the repository
    #[arg(long, global = true)]
    pub owner: Option<String>,

    /// Repository name
    #[arg(long, global = true)]
    pub repo: Option<String>,
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .finish()
    }
}

#[derive(Subcommand)]
enum Subcommands {
    /// List the repository's issues
    RepoIssues,

    /// Create an issue from JSON, composed in $EDITOR unless given inline
    CreateIssue {
        /// Issue properties as literal JSON, e.g. '{"title":"..."}'
        #[arg(long)]
        issue_props: Option<String>,
    },

    /// Update an issue from JSON, composed in $EDITOR unless given inline
    UpdateIssue {
        /// Number of the issue to update
        #[arg(long)]
        issue_number: Option<u64>,

        /// Issue properties as literal JSON, e.g. '{"state":"closed"}'
        #[arg(long)]
        issue_props: Option<String>,
    },

    #[command(external_subcommand)]
    Other(Vec<String>),
}

/// Enum representing CLI commands
#[derive(Debug, PartialEq)]
pub enum Command {
    RepoIssues,
    CreateIssue {
        issue_props: Option<String>,
    },
    UpdateIssue {
        issue_number: Option<u64>,
        issue_props: Option<String>,
    },
    /// A subcommand token this tool does not implement.
    Unsupported(String),
    /// No subcommand was given.
    Missing,
}

/// Global flags plus the routed command of one invocation.
#[derive(Debug, PartialEq)]
pub struct Invocation {
    pub globals: GlobalArgs,
    pub command: Command,
}

/// Parse command line arguments (including program name).
///
/// Help, version and malformed flags come back as a `clap::Error`; the
/// caller decides how to print it.
pub fn parse_args(args: &[String]) -> Result<Invocation, clap::Error> {
    let cli = Cli::try_parse_from(normalize_single_dash_flags(args))?;
    let command = match cli.command {
        None => Command::Missing,
        Some(Subcommands::RepoIssues) => Command::RepoIssues,
        Some(Subcommands::CreateIssue { issue_props }) => Command::CreateIssue { issue_props },
        Some(Subcommands::UpdateIssue {
            issue_number,
            issue_props,
        }) => Command::UpdateIssue {
            issue_number,
            issue_props,
        },
        Some(Subcommands::Other(tokens)) => {
            Command::Unsupported(tokens.into_iter().next().unwrap_or_default())
        }
    };
    Ok(Invocation {
        globals: cli.globals,
        command,
    })
}

/// Rewrites `-user` / `-issue-number=3` style flags to their `--` form.
///
/// Tokens in value position are left alone, so a password that happens to
/// look like a flag is passed through untouched.
fn normalize_single_dash_flags(args: &[String]) -> Vec<String> {
    let mut normalized = Vec::with_capacity(args.len());
    let mut value_expected = false;

    for (index, arg) in args.iter().enumerate() {
        if index == 0 || value_expected {
            value_expected = false;
            normalized.push(arg.clone());
            continue;
        }

        let flag = arg
            .strip_prefix("--")
            .or_else(|| arg.strip_prefix('-'))
            .map(|rest| rest.split_once('=').map_or((rest, false), |(name, _)| (name, true)));

        match flag {
            Some((name, has_inline_value)) if VALUE_FLAGS.contains(&name) => {
                value_expected = !has_inline_value;
                if arg.starts_with("--") {
                    normalized.push(arg.clone());
                } else {
                    normalized.push(format!("-{arg}"));
                }
            }
            _ => normalized.push(arg.clone()),
        }
    }

    normalized
}
