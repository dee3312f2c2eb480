//! Workspace preparation: resolve, fetch, then add the branch worktree

use crate::config::Config;
use crate::git::{FetchOutcome, Fetcher, WorktreeManager, WorktreeOutcome};
use crate::paths::WorkspacePaths;
use crate::process::{ProcessRunner, StdoutMode};
use crate::reference::RepoRef;
use crate::Result;

/// Result of preparing a workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prepared {
    pub paths: WorkspacePaths,
    pub fetch: FetchOutcome,
    /// `None` when the reference had no branch qualifier
    pub worktree: Option<WorktreeOutcome>,
}

/// Brings a reference's checkout into existence under the workspace root
pub struct Workspace<'a> {
    config: &'a Config,
    runner: &'a dyn ProcessRunner,
    stdout: StdoutMode,
}

impl<'a> Workspace<'a> {
    pub fn new(config: &'a Config, runner: &'a dyn ProcessRunner) -> Self {
        Self {
            config,
            runner,
            stdout: StdoutMode::Inherit,
        }
    }

    /// Route subprocess stdout for every step
    pub fn with_stdout(mut self, stdout: StdoutMode) -> Self {
        self.stdout = stdout;
        self
    }

    /// Paths for `reference` under the configured root
    pub fn resolve(&self, reference: &RepoRef) -> WorkspacePaths {
        WorkspacePaths::resolve(&self.config.workspace_root, reference)
    }

    /// Clone the repository and create the branch worktree as needed
    pub async fn prepare(&self, reference: &RepoRef) -> Result<Prepared> {
        let paths = self.resolve(reference);
        tracing::debug!(
            reference = %reference,
            project = %paths.project.display(),
            clone = %paths.clone.display(),
            "Resolved workspace"
        );

        let fetch = Fetcher::new(self.config, self.runner)
            .with_stdout(self.stdout)
            .ensure(reference, &paths)
            .await?;

        let worktree = match reference.branch() {
            Some(branch) => Some(
                WorktreeManager::new(self.config, self.runner)
                    .with_stdout(self.stdout)
                    .ensure(&paths, branch)
                    .await?,
            ),
            None => None,
        };

        Ok(Prepared {
            paths,
            fetch,
            worktree,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::fake::RecordingRunner;
    use crate::Error;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_prepare_existing_workspace_runs_nothing() {
        let tmp = TempDir::new().unwrap();
        let config = Config::with_root(tmp.path());
        let reference = RepoRef::parse("acme/widget@feature1").unwrap();
        let runner = RecordingRunner::new();
        let workspace = Workspace::new(&config, &runner);

        let paths = workspace.resolve(&reference);
        std::fs::create_dir_all(&paths.clone).unwrap();
        std::fs::create_dir_all(&paths.branch_clone).unwrap();

        let prepared = workspace.prepare(&reference).await.unwrap();
        assert_eq!(prepared.fetch, FetchOutcome::AlreadyPresent);
        assert_eq!(prepared.worktree, Some(WorktreeOutcome::AlreadyPresent));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_prepare_without_branch_skips_worktree() {
        let tmp = TempDir::new().unwrap();
        let config = Config::with_root(tmp.path());
        let reference = RepoRef::parse("acme/widget").unwrap();
        let runner = RecordingRunner::new();

        let prepared = Workspace::new(&config, &runner)
            .with_stdout(StdoutMode::Stderr)
            .prepare(&reference)
            .await
            .unwrap();

        assert_eq!(prepared.fetch, FetchOutcome::Cloned);
        assert_eq!(prepared.worktree, None);
        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].stdout, StdoutMode::Stderr);
    }

    #[tokio::test]
    async fn test_fetch_failure_stops_before_worktree() {
        let tmp = TempDir::new().unwrap();
        let config = Config::with_root(tmp.path());
        let reference = RepoRef::parse("acme/widget@feature1").unwrap();
        let runner = RecordingRunner::new().then_exit(Some(128));

        let err = Workspace::new(&config, &runner).prepare(&reference).await.unwrap_err();
        assert!(matches!(err, Error::FetchFailure { .. }));
        assert_eq!(runner.calls().len(), 1);
    }
}
