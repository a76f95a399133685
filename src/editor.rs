//! Compose issue content in an external editor.
//!
//! A scoped temporary file is handed to the user's editor; once the editor
//! exits its contents become the issue payload. The file is removed when the
//! [`tempfile::TempPath`] guard drops, so cleanup happens on every return path.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use thiserror::Error;
use tracing::{debug, info};

/// Editor used when `EDITOR` is unset.
pub const DEFAULT_EDITOR: &str = "vim";

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Can not create a temporary file")]
    CreateTempFile(#[source] io::Error),

    #[error("Can not parse editor command {0:?}")]
    InvalidCommand(String),

    #[error("Editor executable {0:?} not found")]
    NotFound(String),

    #[error("Can not launch editor {program}")]
    Launch {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Text editor exited with {0}")]
    ExitStatus(ExitStatus),

    #[error("Can not read the file {path}")]
    ReadTempFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, EditorError>;

/// A resolved editor program plus any arguments from `EDITOR`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl EditorCommand {
    /// Splits `command` with shell quoting rules and resolves the program
    /// on `PATH`.
    pub fn resolve(command: &str) -> Result<Self> {
        let words = shlex::split(command)
            .filter(|words| !words.is_empty())
            .ok_or_else(|| EditorError::InvalidCommand(command.to_string()))?;
        let (program, args) = words
            .split_first()
            .ok_or_else(|| EditorError::InvalidCommand(command.to_string()))?;
        let program =
            find_executable(program).ok_or_else(|| EditorError::NotFound(program.clone()))?;
        Ok(Self {
            program,
            args: args.to_vec(),
        })
    }

    #[cfg(all(test, unix))]
    fn program(&self) -> &Path {
        &self.program
    }

    /// Runs the editor on `file` with inherited stdio and blocks until it exits.
    pub fn edit(&self, file: &Path) -> Result<()> {
        debug!(program = %self.program.display(), file = %file.display(), "launching editor");
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(file)
            .status()
            .map_err(|source| EditorError::Launch {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(EditorError::ExitStatus(status));
        }
        Ok(())
    }
}

/// Opens an empty temporary file in `editor` and returns what the user saved.
pub fn acquire_content(editor: &str) -> Result<String> {
    acquire_content_in(&std::env::temp_dir(), editor)
}

fn acquire_content_in(dir: &Path, editor: &str) -> Result<String> {
    let file = tempfile::Builder::new()
        .prefix("ghissues-")
        .suffix(".json")
        .tempfile_in(dir)
        .map_err(EditorError::CreateTempFile)?;
    // Closes our handle so the editor is the only writer; the path guard
    // still deletes the file on drop.
    let path = file.into_temp_path();

    let editor = EditorCommand::resolve(editor)?;
    editor.edit(&path)?;

    let content = std::fs::read_to_string(&path).map_err(|source| EditorError::ReadTempFile {
        path: path.to_path_buf(),
        source,
    })?;
    info!(bytes = content.len(), "read issue content from editor");
    Ok(content)
}

/// Looks `program` up the way a shell would: paths are taken as-is, bare
/// names are searched on `PATH`.
fn find_executable(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .flat_map(|dir| executable_names(program).map(move |name| dir.join(name)))
        .find(|path| is_executable(path))
}

#[cfg(windows)]
fn executable_names(program: &str) -> impl Iterator<Item = String> {
    [program.to_string(), format!("{program}.exe")].into_iter()
}

#[cfg(not(windows))]
fn executable_names(program: &str) -> impl Iterator<Item = String> {
    std::iter::once(program.to_string())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
