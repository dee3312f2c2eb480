//! Branch worktree creation

use std::path::Path;

use super::repo::{BranchLocation, GitRepo};
use crate::config::Config;
use crate::paths::WorkspacePaths;
use crate::process::{Invocation, ProcessRunner, StdoutMode};
use crate::{Error, Result};

/// What the worktree manager did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorktreeOutcome {
    /// Branch worktree already existed
    AlreadyPresent,
    /// `git worktree add` created it
    Created,
}

/// Ensures a branch worktree exists next to the primary clone
pub struct WorktreeManager<'a> {
    config: &'a Config,
    runner: &'a dyn ProcessRunner,
    stdout: StdoutMode,
}

impl<'a> WorktreeManager<'a> {
    pub fn new(config: &'a Config, runner: &'a dyn ProcessRunner) -> Self {
        Self {
            config,
            runner,
            stdout: StdoutMode::Inherit,
        }
    }

    pub fn with_stdout(mut self, stdout: StdoutMode) -> Self {
        self.stdout = stdout;
        self
    }

    /// Create the worktree for `branch` unless its checkout already exists
    pub async fn ensure(
        &self,
        paths: &WorkspacePaths,
        branch: &str,
    ) -> Result<WorktreeOutcome> {
        if paths.branch_clone.exists() {
            tracing::debug!(path = %paths.branch_clone.display(), "Worktree present, skipping");
            return Ok(WorktreeOutcome::AlreadyPresent);
        }

        let repo = GitRepo::open(&paths.clone).map_err(|e| Error::WorktreeFailure {
            reason: e.to_string(),
            code: None,
        })?;

        if let Some(parent) = paths.branch_clone.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::WorktreeFailure {
                reason: format!("could not create {}: {}", parent.display(), e),
                code: None,
            })?;
        }

        let location = repo.locate_branch(branch);
        tracing::debug!(
            branch,
            ?location,
            clone_branch = ?repo.current_branch().ok().flatten(),
            "Resolved branch"
        );

        let invocation = self.plan(&paths.clone, &paths.branch_clone, branch, &location);
        let outcome = self.runner.run(&invocation).await.map_err(|e| Error::WorktreeFailure {
            reason: format!("`{}` could not be started: {}", invocation, e),
            code: None,
        })?;

        if !outcome.success() {
            return Err(Error::WorktreeFailure {
                reason: format!("`{}` {}", invocation, outcome.describe()),
                code: outcome.code,
            });
        }

        Ok(WorktreeOutcome::Created)
    }

    /// Build the `git worktree add` invocation for where the branch lives
    ///
    /// - local branch: `git worktree add -- <path> <branch>`
    /// - remote only: `git worktree add --track -b <branch> -- <path> <remote>/<branch>`
    /// - unknown: the local form, so git reports the missing branch itself
    pub fn plan(
        &self,
        clone: &Path,
        target: &Path,
        branch: &str,
        location: &BranchLocation,
    ) -> Invocation {
        let base = Invocation::new(&self.config.git)
            .args(["worktree", "add"])
            .current_dir(clone)
            .stdout(self.stdout);

        match location {
            BranchLocation::Remote(remote_branch) => base
                .args(["--track", "-b", branch, "--"])
                .arg(target)
                .arg(remote_branch),
            BranchLocation::Local | BranchLocation::Unknown => {
                base.arg("--").arg(target).arg(branch)
            }
        }
    }
}
