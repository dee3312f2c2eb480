//! Fetching repositories into the workspace layout

use crate::config::Config;
use crate::paths::WorkspacePaths;
use crate::process::{Invocation, ProcessRunner, StdoutMode};
use crate::reference::RepoRef;
use crate::{Error, Result};

/// What the fetcher did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Clone path already existed; nothing ran
    AlreadyPresent,
    /// Cloned with git or the GitHub client
    Cloned,
    /// Downloaded with `go get`
    Downloaded,
}

/// Ensures the primary clone of a reference exists
pub struct Fetcher<'a> {
    config: &'a Config,
    runner: &'a dyn ProcessRunner,
    stdout: StdoutMode,
}

impl<'a> Fetcher<'a> {
    pub fn new(config: &'a Config, runner: &'a dyn ProcessRunner) -> Self {
        Self {
            config,
            runner,
            stdout: StdoutMode::Inherit,
        }
    }

    /// Route subprocess stdout (quiet mode sends it to stderr)
    pub fn with_stdout(mut self, stdout: StdoutMode) -> Self {
        self.stdout = stdout;
        self
    }

    /// Clone or download `reference` unless its clone path already exists
    pub async fn ensure(
        &self,
        reference: &RepoRef,
        paths: &WorkspacePaths,
    ) -> Result<FetchOutcome> {
        if paths.clone.exists() {
            tracing::debug!(path = %paths.clone.display(), "Clone present, skipping fetch");
            return Ok(FetchOutcome::AlreadyPresent);
        }

        if let Some(parent) = paths.clone.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::FetchFailure {
                command: "mkdir".to_string(),
                reason: format!("could not create {}: {}", parent.display(), e),
                code: None,
            })?;
        }

        let (invocation, outcome) = self.plan(reference, paths)?;
        self.execute(&invocation).await?;

        Ok(outcome)
    }

    /// Choose the command that will populate the clone path
    pub fn plan(
        &self,
        reference: &RepoRef,
        paths: &WorkspacePaths,
    ) -> Result<(Invocation, FetchOutcome)> {
        let invocation = match reference.github() {
            Some((owner, name)) if self.use_github_client() => {
                Invocation::new(&self.config.github_client)
                    .args(["repo", "clone", "--"])
                    .arg(format!("{}/{}", owner, name))
                    .arg(&paths.clone)
            }
            Some(_) => {
                let url = reference
                    .clone_url()
                    .ok_or_else(|| Error::InvalidReference(reference.to_string()))?;
                Invocation::new(&self.config.git)
                    .args(["clone", "--"])
                    .arg(url.as_str())
                    .arg(&paths.clone)
            }
            None => {
                let invocation = Invocation::new(&self.config.go)
                    .args(["get", "-d"])
                    .arg(reference.unqualified())
                    .env("GOPATH", &paths.project)
                    .env("GO111MODULE", "off");
                return Ok((invocation.stdout(self.stdout), FetchOutcome::Downloaded));
            }
        };

        Ok((invocation.stdout(self.stdout), FetchOutcome::Cloned))
    }

    fn use_github_client(&self) -> bool {
        if self.config.plain_clone {
            tracing::debug!("Plain clone forced by configuration");
            return false;
        }

        let available = self.runner.is_available(&self.config.github_client);
        if !available {
            tracing::debug!(
                client = %self.config.github_client,
                "GitHub client not found, using git"
            );
        }
        available
    }

    async fn execute(&self, invocation: &Invocation) -> Result<()> {
        let outcome = self.runner.run(invocation).await.map_err(|e| Error::FetchFailure {
            command: invocation.to_string(),
            reason: format!("could not be started: {}", e),
            code: None,
        })?;

        if !outcome.success() {
            return Err(Error::FetchFailure {
                command: invocation.to_string(),
                reason: outcome.describe(),
                code: outcome.code,
            });
        }

        Ok(())
    }
}
