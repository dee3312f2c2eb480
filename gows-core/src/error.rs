//! Error types for gows

use thiserror::Error;

/// Result type alias for gows operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for gows operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No classification pattern matched the reference
    #[error("invalid repository reference '{0}': expected owner/name, git@github.com:owner/name.git, https://github.com/owner/name or a dotted package path such as golang.org/x/tools, optionally followed by @branch")]
    InvalidReference(String),

    /// Clone or package download failed
    #[error("fetch failed: `{command}` {reason}")]
    FetchFailure {
        command: String,
        reason: String,
        code: Option<i32>,
    },

    /// `git worktree add` failed or the clone is not usable as a repository
    #[error("worktree setup failed: {reason}")]
    WorktreeFailure { reason: String, code: Option<i32> },

    /// The launched command could not start or exited non-zero
    #[error("launch failed: `{command}` {reason}")]
    LaunchFailure {
        command: String,
        reason: String,
        code: Option<i32>,
    },
}

impl Error {
    /// Process exit code to report for this error
    ///
    /// Subprocess failures hand back the child's own code when it is a usable
    /// non-zero value; everything else exits with 1.
    pub fn exit_code(&self) -> u8 {
        let code = match self {
            Error::FetchFailure { code, .. }
            | Error::WorktreeFailure { code, .. }
            | Error::LaunchFailure { code, .. } => *code,
            _ => None,
        };

        code.and_then(|c| u8::try_from(c).ok())
            .filter(|c| *c != 0)
            .unwrap_or(1)
    }
}
